//! Resumable parse primitives.
//!
//! Each primitive looks at the bytes available right now, consumes the
//! longest prefix it can and reports whether its production is complete. An
//! incomplete production consumes everything it was given and keeps its state
//! in the [`Token`] continuation buffer, so the same primitive can be called
//! again with the next fragment of input.

use bytes::Bytes;

use super::chars::is_whitespace;
use super::token::Token;

/// Outcome of running one primitive over the available bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The production completed after this many bytes; the rest belongs to the next step.
    Done(usize),
    /// All bytes were consumed and the production needs more input.
    Pending,
}

/// Appends the run of bytes in `class` to `token`.
///
/// Completes at the first byte outside the class, which is left unconsumed.
pub(crate) fn take_while(data: &[u8], class: fn(u8) -> bool, token: &mut Token) -> Step {
    match data.iter().position(|b| !class(*b)) {
        Some(end) => {
            token.extend(&data[..end]);
            Step::Done(end)
        }
        None => {
            token.extend(data);
            Step::Pending
        }
    }
}

/// Matches `expected` exactly, buffering a partial match in `token`.
///
/// Fails on the first mismatching byte with the buffered prefix plus that byte.
pub(crate) fn literal(data: &[u8], expected: &[u8], token: &mut Token) -> Result<Step, Bytes> {
    let matched = token.len();
    let wanted = &expected[matched..];
    let available = wanted.len().min(data.len());

    if let Some(index) = (0..available).find(|i| data[*i] != wanted[*i]) {
        token.extend(&data[..index]);
        return Err(token.with_offending(data[index]));
    }

    token.extend(&data[..available]);
    if token.len() == expected.len() { Ok(Step::Done(available)) } else { Ok(Step::Pending) }
}

/// Consumes exactly one byte from `class`, failing with the byte otherwise.
///
/// `data` must not be empty.
pub(crate) fn one_of(data: &[u8], class: fn(u8) -> bool) -> Result<u8, u8> {
    let b = data[0];
    if class(b) { Ok(b) } else { Err(b) }
}

/// Skips leading spaces and tabs.
///
/// The state machine seals the previous token before entering a whitespace
/// step, so nothing is appended to any buffer here.
pub(crate) fn skip_whitespace(data: &[u8]) -> Step {
    match data.iter().position(|b| !is_whitespace(*b)) {
        Some(end) => Step::Done(end),
        None => Step::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::head::chars::{is_digit, is_target, is_token};

    #[test]
    fn tokens_span_calls() {
        let mut token = Token::default();
        assert_eq!(take_while(b"on", is_token, &mut token), Step::Pending);
        assert_eq!(take_while(b"e two", is_token, &mut token), Step::Done(1));
        assert_eq!(&token.take()[..], b"one");
    }

    #[test]
    fn target_stops_at_space_and_non_ascii() {
        let mut token = Token::default();
        let data = b"whatever-you%C2%ABwant%C2%BB left-over";
        let Step::Done(end) = take_while(data, is_target, &mut token) else { panic!("target should complete") };
        assert_eq!(&data[end..], b" left-over");
        assert_eq!(&token.take()[..], b"whatever-you%C2%ABwant%C2%BB");

        let data = b"valid-target\xc2\xabnext";
        assert_eq!(take_while(data, is_target, &mut token), Step::Done(12));
    }

    #[test]
    fn numbers_stop_at_first_non_digit() {
        let mut token = Token::default();
        assert_eq!(take_while(b"1234abcd", is_digit, &mut token), Step::Done(4));
        assert_eq!(token.as_bytes(), b"1234");
    }

    #[test]
    fn literal_buffers_partial_matches() {
        let mut token = Token::default();
        assert_eq!(literal(b"fix", b"fixed", &mut token), Ok(Step::Pending));
        assert_eq!(literal(b"e", b"fixed", &mut token), Ok(Step::Pending));
        assert_eq!(literal(b"d\n", b"fixed", &mut token), Ok(Step::Done(1)));
        assert_eq!(&token.take()[..], b"fixed");
    }

    #[test]
    fn literal_fails_on_first_mismatch() {
        let mut token = Token::default();
        assert_eq!(literal(b"fi", b"fixed", &mut token), Ok(Step::Pending));
        assert_eq!(literal(b"sh", b"fixed", &mut token), Err(Bytes::from_static(b"fis")));
    }

    #[test]
    fn single_character() {
        assert_eq!(one_of(b"12", is_digit), Ok(b'1'));
        assert_eq!(one_of(b"x", is_digit), Err(b'x'));
    }

    #[test]
    fn whitespace_is_skipped() {
        assert_eq!(skip_whitespace(b" \t value"), Step::Done(3));
        assert_eq!(skip_whitespace(b"  "), Step::Pending);
        assert_eq!(skip_whitespace(b"v"), Step::Done(0));
    }
}
