//! Continuation buffer for the token currently being recognized.

use bytes::{Bytes, BytesMut};

/// Holds a partially recognized token across `feed` calls.
///
/// `started` tells "no byte seen yet" apart from "started but empty", which a
/// bare buffer cannot do.
#[derive(Debug, Default)]
pub(crate) struct Token {
    buf: BytesMut,
    started: bool,
}

impl Token {
    pub(crate) fn is_started(&self) -> bool {
        self.started
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        self.started = true;
        self.buf.extend_from_slice(bytes);
    }

    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Freezes the buffered bytes and returns the buffer to the unstarted state.
    pub(crate) fn take(&mut self) -> Bytes {
        self.started = false;
        self.buf.split().freeze()
    }

    /// The buffered bytes followed by `offending`, for error reports.
    pub(crate) fn with_offending(&self, offending: u8) -> Bytes {
        let mut found = BytesMut::with_capacity(self.buf.len() + 1);
        found.extend_from_slice(&self.buf);
        found.extend_from_slice(&[offending]);
        found.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstarted_differs_from_empty() {
        let mut token = Token::default();
        assert!(!token.is_started());

        token.extend(b"");
        assert!(token.is_started());
        assert!(token.is_empty());

        assert_eq!(token.take(), Bytes::new());
        assert!(!token.is_started());
    }

    #[test]
    fn take_freezes_and_clears() {
        let mut token = Token::default();
        token.extend(b"one");
        token.extend(b"two");
        let frozen = token.take();
        token.extend(b"x");

        assert_eq!(&frozen[..], b"onetwo");
        assert_eq!(token.as_bytes(), b"x");
        assert_eq!(&token.with_offending(b'!')[..], b"x!");
    }
}
