//! Decoder for bodies framed by a Content-Length header, as defined in
//! [RFC 7230 Section 3.3.2](https://tools.ietf.org/html/rfc7230#section-3.3.2).

use bytes::Bytes;
use tokio::io::{AsyncBufRead, AsyncReadExt};
use tracing::trace;

use crate::ensure;
use crate::protocol::BodyError;

/// Upper bound of the buffer reserved up front; a larger body grows the buffer as it arrives.
const INIT_BODY_CAPACITY: u64 = 64 * 1024;

/// Reads exactly `length` bytes and nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The number of bytes announced by the Content-Length header
    length: u64,
}

impl LengthDecoder {
    pub fn new(length: u64) -> Self {
        Self { length }
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    /// # Errors
    ///
    /// [`BodyError::Truncated`] when the source ends before `length` bytes arrived.
    pub async fn decode<R>(&self, reader: &mut R) -> Result<Bytes, BodyError>
    where
        R: AsyncBufRead + Unpin,
    {
        #[allow(clippy::cast_possible_truncation, reason = "bounded by INIT_BODY_CAPACITY")]
        let mut buf = Vec::with_capacity(self.length.min(INIT_BODY_CAPACITY) as usize);

        let received = (&mut *reader).take(self.length).read_to_end(&mut buf).await?;
        ensure!(received as u64 == self.length, BodyError::truncated(received as u64));

        trace!(len = received, "read content-length body");
        Ok(Bytes::from(buf))
    }
}
