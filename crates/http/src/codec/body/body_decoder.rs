//! Selects and runs the body framing announced by a request's headers.
//!
//! The framing is chosen in this order:
//! - a `Content-Length` header reads exactly that many bytes
//! - a `Transfer-Encoding` whose last coding is `chunked` decodes chunks
//! - otherwise the body is everything until the source ends

use bytes::Bytes;
use tokio::io::{AsyncBufRead, AsyncReadExt};
use tracing::trace;

use crate::codec::body::chunked_decoder::ChunkedDecoder;
use crate::codec::body::length_decoder::LengthDecoder;
use crate::ensure;
use crate::protocol::{BodyError, Headers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyDecoder {
    kind: Kind,
}

/// The framing of a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Length(u64),
    Chunked,
    ToEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Length(LengthDecoder),
    Chunked(ChunkedDecoder),
    ToEnd,
}

impl BodyKind {
    /// Determines the framing from the headers.
    ///
    /// # Errors
    ///
    /// [`BodyError::InvalidContentLength`] when `Content-Length` is not a plain
    /// non-negative decimal integer, which also covers repeated headers that
    /// were combined into a list.
    pub fn from_headers(headers: &Headers) -> Result<Self, BodyError> {
        if let Some(value) = headers.get("Content-Length") {
            let value = value.trim();
            ensure!(
                !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
                BodyError::invalid_content_length(format!("{value:?} is not a decimal length"))
            );
            let length = value.parse::<u64>().map_err(BodyError::invalid_content_length)?;
            return Ok(BodyKind::Length(length));
        }

        if headers.get("Transfer-Encoding").is_some_and(is_chunked) {
            return Ok(BodyKind::Chunked);
        }

        Ok(BodyKind::ToEnd)
    }
}

/// Checks whether the last transfer coding is `chunked`
fn is_chunked(transfer_encoding: &str) -> bool {
    transfer_encoding.rsplit(',').next().is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
}

impl BodyDecoder {
    pub fn new(kind: BodyKind) -> Self {
        let kind = match kind {
            BodyKind::Length(length) => Kind::Length(LengthDecoder::new(length)),
            BodyKind::Chunked => Kind::Chunked(ChunkedDecoder::new()),
            BodyKind::ToEnd => Kind::ToEnd,
        };
        Self { kind }
    }

    pub fn fix_length(size: u64) -> Self {
        Self::new(BodyKind::Length(size))
    }

    pub fn chunked() -> Self {
        Self::new(BodyKind::Chunked)
    }

    pub fn to_end() -> Self {
        Self::new(BodyKind::ToEnd)
    }

    pub fn from_headers(headers: &Headers) -> Result<Self, BodyError> {
        BodyKind::from_headers(headers).map(Self::new)
    }

    pub fn kind(&self) -> BodyKind {
        match self.kind {
            Kind::Length(decoder) => BodyKind::Length(decoder.length()),
            Kind::Chunked(_) => BodyKind::Chunked,
            Kind::ToEnd => BodyKind::ToEnd,
        }
    }

    pub fn is_chunked(&self) -> bool {
        matches!(self.kind, Kind::Chunked(_))
    }

    pub fn is_fix_length(&self) -> bool {
        matches!(self.kind, Kind::Length(_))
    }

    pub fn is_to_end(&self) -> bool {
        matches!(self.kind, Kind::ToEnd)
    }

    /// Reads the whole body from `reader`.
    ///
    /// Bytes after the body are left in the reader, except for the read-to-end
    /// framing which consumes everything.
    pub async fn decode<R>(&self, reader: &mut R) -> Result<Bytes, BodyError>
    where
        R: AsyncBufRead + Unpin,
    {
        match &self.kind {
            Kind::Length(length_decoder) => length_decoder.decode(reader).await,
            Kind::Chunked(chunked_decoder) => chunked_decoder.decode(reader).await,
            Kind::ToEnd => {
                let mut buf = Vec::new();
                let received = reader.read_to_end(&mut buf).await?;
                trace!(len = received, "read body until end of stream");
                Ok(Bytes::from(buf))
            }
        }
    }
}
