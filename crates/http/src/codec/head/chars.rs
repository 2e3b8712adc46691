//! Byte classes of the request head grammar, taken from
//! [RFC 7230 appendix B](https://tools.ietf.org/html/rfc7230#appendix-B).
//!
//! Every class is a 256 entry lookup table built at compile time, so a
//! membership test is a single indexed load.

const TOKEN_PUNCTUATION: &[u8] = b"!#$%&'*+-.^_`|~";

/// Reserved URI punctuation allowed in a request target on top of the token set.
const TARGET_PUNCTUATION: &[u8] = b":/?#[]@!$&'()*+,;=%";

const fn alphanumeric_table(punctuation: &[&[u8]]) -> [bool; 256] {
    let mut table = [false; 256];
    let mut b = 0;
    while b < 256 {
        table[b] = (b as u8).is_ascii_alphanumeric();
        b += 1;
    }

    let mut set = 0;
    while set < punctuation.len() {
        let mut i = 0;
        while i < punctuation[set].len() {
            table[punctuation[set][i] as usize] = true;
            i += 1;
        }
        set += 1;
    }
    table
}

static TOKEN: [bool; 256] = alphanumeric_table(&[TOKEN_PUNCTUATION]);
static TARGET: [bool; 256] = alphanumeric_table(&[TOKEN_PUNCTUATION, TARGET_PUNCTUATION]);

/// `tchar`: letters, digits and ``!#$%&'*+-.^_`|~``.
#[inline]
pub fn is_token(b: u8) -> bool {
    TOKEN[b as usize]
}

/// Bytes of a request target; the target itself is never decoded.
#[inline]
pub fn is_target(b: u8) -> bool {
    TARGET[b as usize]
}

/// Visible ASCII plus space and horizontal tab.
#[inline]
pub fn is_field_value(b: u8) -> bool {
    matches!(b, 0x21..=0x7e | b' ' | b'\t')
}

#[inline]
pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

/// Linear whitespace: space or horizontal tab.
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_characters() {
        for b in b"GETPOST-x_y.z!#$%&'*+^`|~0123456789" {
            assert!(is_token(*b), "{} should be a token byte", *b as char);
        }
        for b in b" \t:/<>\"(),;=?@[]{}\\\x7f\r\n" {
            assert!(!is_token(*b), "{:?} should not be a token byte", *b as char);
        }
        assert!(!is_token(0xc2));
    }

    #[test]
    fn target_characters_extend_tokens() {
        for b in 0..=255u8 {
            if is_token(b) {
                assert!(is_target(b));
            }
        }
        for b in b":/?#[]@()*,;=%" {
            assert!(is_target(*b));
        }
        assert!(!is_target(b' '));
        assert!(!is_target(0xab));
    }

    #[test]
    fn field_value_characters() {
        let valid = (0x21..0x7f).filter(|b| is_field_value(*b)).count();
        assert_eq!(valid, 0x7e - 0x21 + 1);
        assert!(is_field_value(b' '));
        assert!(is_field_value(b'\t'));
        assert!(!is_field_value(0x7f));
        assert!(!is_field_value(b'\r'));
        assert!(!is_field_value(0x80));
    }
}
