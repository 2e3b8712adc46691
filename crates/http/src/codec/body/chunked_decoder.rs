//! Decoder for HTTP chunked transfer encoding, as specified in
//! [RFC 7230 Section 4.1](https://tools.ietf.org/html/rfc7230#section-4.1).
//!
//! Each chunk starts with its size in hexadecimal, optionally followed by
//! extensions, then the chunk data and a line terminator. A zero-sized chunk
//! ends the body.
//!
//! Trailer fields after the last chunk are not parsed: the decoder stops right
//! after the `0` size line and leaves whatever follows in the reader.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tracing::trace;

use crate::ensure;
use crate::protocol::BodyError;

/// Longest chunk size line (size, extensions and terminator) that is accepted
const MAX_CHUNK_SIZE_LINE: u64 = 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkedDecoder;

impl ChunkedDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Reads chunks until the zero-sized one and returns their concatenated data.
    ///
    /// # Errors
    ///
    /// - [`BodyError::InvalidChunkSize`] for a size line that is not hexadecimal or too long
    /// - [`BodyError::InvalidChunkTerminator`] when chunk data is not followed by a line end
    /// - [`BodyError::Truncated`] when the source ends early
    pub async fn decode<R>(&self, reader: &mut R) -> Result<Bytes, BodyError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut body = BytesMut::new();
        let mut line = Vec::new();

        loop {
            match read_line(reader, &mut line).await? {
                Line::Complete => {}
                Line::Eof => return Err(BodyError::truncated(body.len() as u64)),
                Line::TooLong => return Err(BodyError::invalid_chunk_size(line)),
            }

            let size = parse_chunk_size(&line)?;
            trace!(size, "read chunk size");
            if size == 0 {
                trace!(len = body.len(), "finished reading chunked data");
                return Ok(body.freeze());
            }

            let mut chunk = Vec::new();
            let received = (&mut *reader).take(size).read_to_end(&mut chunk).await?;
            body.extend_from_slice(&chunk);
            ensure!(received as u64 == size, BodyError::truncated(body.len() as u64));

            match read_line(reader, &mut line).await? {
                Line::Complete => {}
                Line::Eof => return Err(BodyError::truncated(body.len() as u64)),
                Line::TooLong => return Err(BodyError::invalid_chunk_terminator(line)),
            }
            ensure!(matches!(&line[..], b"\r\n" | b"\n"), BodyError::invalid_chunk_terminator(line));
        }
    }
}

/// How a call to [`read_line`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    /// The line and its `\n` are in the buffer.
    Complete,
    /// The source ended before the `\n`, possibly after part of the line.
    Eof,
    /// [`MAX_CHUNK_SIZE_LINE`] bytes arrived without a `\n`.
    TooLong,
}

/// Reads one line, terminator included, into `line`.
async fn read_line<R>(reader: &mut R, line: &mut Vec<u8>) -> Result<Line, BodyError>
where
    R: AsyncBufRead + Unpin,
{
    line.clear();
    (&mut *reader).take(MAX_CHUNK_SIZE_LINE).read_until(b'\n', line).await?;

    if line.last() == Some(&b'\n') {
        Ok(Line::Complete)
    } else if line.len() as u64 >= MAX_CHUNK_SIZE_LINE {
        Ok(Line::TooLong)
    } else {
        Ok(Line::Eof)
    }
}

/// Parses `<hex size>[ ;extensions]\r\n`, ignoring the extensions.
fn parse_chunk_size(line: &[u8]) -> Result<u64, BodyError> {
    let content = line.strip_suffix(b"\n").unwrap_or(line);
    let content = content.strip_suffix(b"\r").unwrap_or(content);
    let size = content.split(|b| *b == b';').next().unwrap_or_default().trim_ascii();

    ensure!(!size.is_empty() && size.iter().all(u8::is_ascii_hexdigit), BodyError::invalid_chunk_size(line.to_vec()));

    // all bytes are hex digits, so only an overflow can fail here
    std::str::from_utf8(size)
        .ok()
        .and_then(|size| u64::from_str_radix(size, 16).ok())
        .ok_or_else(|| BodyError::invalid_chunk_size(line.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_basic() {
        let mut src: &[u8] = b"10\r\n1234567890abcdef\r\n0\r\n\r\n";
        let body = ChunkedDecoder::new().decode(&mut src).await.unwrap();

        assert_eq!(&body[..], b"1234567890abcdef");
        assert_eq!(src, b"\r\n");
    }

    #[tokio::test]
    async fn test_multiple_chunks() {
        let mut src: &[u8] = b"5\r\nhello\r\n7\r\n, world\r\n0\r\n\r\n";
        let body = ChunkedDecoder::new().decode(&mut src).await.unwrap();
        assert_eq!(&body[..], b"hello, world");
    }

    #[tokio::test]
    async fn test_chunks_with_extensions_and_padding() {
        let mut src: &[u8] = b"5;chunk-ext=value\r\nhello\r\nA  \r\n0123456789\r\n0\r\n\r\n";
        let body = ChunkedDecoder::new().decode(&mut src).await.unwrap();
        assert_eq!(&body[..], b"hello0123456789");
    }

    #[tokio::test]
    async fn test_trailers_are_left_unread() {
        let mut src: &[u8] = b"5\r\nhello\r\n0\r\nTrailer: value\r\n\r\n";
        let body = ChunkedDecoder::new().decode(&mut src).await.unwrap();

        assert_eq!(&body[..], b"hello");
        assert_eq!(src, b"Trailer: value\r\n\r\n");
    }

    #[tokio::test]
    async fn test_bare_lf_lines() {
        let mut src: &[u8] = b"3\nabc\n0\n\n";
        let body = ChunkedDecoder::new().decode(&mut src).await.unwrap();
        assert_eq!(&body[..], b"abc");
    }

    #[tokio::test]
    async fn test_read_boundaries_do_not_matter() {
        let data = b"4\r\nWiki\r\n6\r\npedia \r\nE\r\nin \r\n\r\nchunks.\r\n0\r\n\r\n";
        for capacity in [1, 2, 3, 7, 64] {
            let mut reader = BufReader::with_capacity(capacity, &data[..]);
            let body = ChunkedDecoder::new().decode(&mut reader).await.unwrap();
            assert_eq!(&body[..], b"Wikipedia in \r\n\r\nchunks.", "capacity {capacity}");
        }
    }

    #[tokio::test]
    async fn test_invalid_chunk_size() {
        for data in [&b"xyz\r\n"[..], b"+5\r\nhello\r\n", b"\r\n", b"fffffffffffffffff\r\n"] {
            let mut src = data;
            let err = ChunkedDecoder::new().decode(&mut src).await.unwrap_err();
            assert!(matches!(err, BodyError::InvalidChunkSize { .. }), "{err:?}");
        }
    }

    #[tokio::test]
    async fn test_missing_crlf() {
        let mut src: &[u8] = b"5\r\nhelloBad\r\n";
        let err = ChunkedDecoder::new().decode(&mut src).await.unwrap_err();
        assert!(matches!(err, BodyError::InvalidChunkTerminator { .. }));
        assert_eq!(err.status(), Some(http::StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_incomplete_chunk_is_truncated() {
        let mut src: &[u8] = b"5\r\nhel";
        let err = ChunkedDecoder::new().decode(&mut src).await.unwrap_err();
        assert!(matches!(err, BodyError::Truncated { received: 3, .. }));

        let mut src: &[u8] = b"5\r\nhello\r\n";
        let err = ChunkedDecoder::new().decode(&mut src).await.unwrap_err();
        assert!(matches!(err, BodyError::Truncated { received: 5, .. }));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_eof_inside_a_line_is_truncated() {
        for data in [&b"5\r\nhello\r\n0"[..], b"5\r\nhello\r", b"5\r\nhello\r\n1", b"a;ext"] {
            let mut src = data;
            let err = ChunkedDecoder::new().decode(&mut src).await.unwrap_err();
            assert!(matches!(err, BodyError::Truncated { .. }), "{data:?}: {err:?}");
            assert_eq!(err.status(), None);
        }
    }

    #[tokio::test]
    async fn test_overlong_size_line() {
        let data = vec![b'1'; MAX_CHUNK_SIZE_LINE as usize + 10];
        let mut src = &data[..];
        let err = ChunkedDecoder::new().decode(&mut src).await.unwrap_err();
        assert!(matches!(err, BodyError::InvalidChunkSize { .. }));
    }

    #[tokio::test]
    async fn test_large_chunk() {
        let size = 1024 * 1024;
        let mut data = format!("{size:x}\r\n").into_bytes();
        data.extend(vec![b'A'; size]);
        data.extend(b"\r\n0\r\n\r\n");

        let mut src = &data[..];
        let body = ChunkedDecoder::new().decode(&mut src).await.unwrap();
        assert_eq!(body.len(), size);
        assert!(body.iter().all(|&b| b == b'A'));
    }

    #[tokio::test]
    async fn test_zero_size_chunk() {
        let mut src: &[u8] = b"0\r\n\r\n";
        let body = ChunkedDecoder::new().decode(&mut src).await.unwrap();
        assert!(body.is_empty());
    }
}
