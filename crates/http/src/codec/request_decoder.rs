//! Request head decoding on top of [`HeadParser`].
//!
//! [`RequestAssembler`] is the [`ParseHandler`] that turns parser events into a
//! [`Request`]. [`RequestDecoder`] wraps the parser into a tokio-util
//! [`Decoder`] so a [`FramedRead`](tokio_util::codec::FramedRead) can yield
//! request heads; the bytes after each head stay in the read buffer.
//!
//! # Example
//!
//! ```
//! use jester_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from(&b"GET /index.html HTTP/1.1\r\nHost: exa"[..]);
//! assert!(decoder.decode(&mut buffer).unwrap().is_none());
//!
//! buffer.extend_from_slice(b"mple.com\r\n\r\nrest");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.target(), "/index.html");
//! assert_eq!(request.headers().get("host"), Some("example.com"));
//! assert_eq!(&buffer[..], b"rest");
//! ```

use std::io;
use std::mem;

use bytes::{Buf, Bytes, BytesMut};
use http::Method;
use tokio_util::codec::Decoder;
use tracing::{Span, debug};

use crate::codec::head::{HeadParser, ParseHandler, ParserConfig};
use crate::protocol::{HeaderRejection, HttpVersion, ParseError, Request};

/// Builds a [`Request`] from parser events.
///
/// Repeated headers are combined with [`Headers::append`](crate::protocol::Headers::append).
#[derive(Debug, Default)]
pub struct RequestAssembler {
    request: Option<Request>,
    finished: bool,
}

impl RequestAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the header block has ended.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    /// Hands out the request once the header block has ended.
    pub fn into_request(self) -> Option<Request> {
        if self.finished { self.request } else { None }
    }
}

impl ParseHandler for RequestAssembler {
    fn request_line_received(&mut self, method: Method, target: &str, version: HttpVersion) -> Result<(), ParseError> {
        self.request = Some(Request::new(method, target, version));
        Ok(())
    }

    fn header_parsed(&mut self, name: &str, value: Bytes) -> Result<(), ParseError> {
        let value = std::str::from_utf8(&value).map_err(|_| HeaderRejection::NonAsciiHeader)?;
        if let Some(request) = self.request.as_mut() {
            request.headers_mut().append(name, value);
        }
        Ok(())
    }

    fn headers_finished(&mut self) -> Result<(), ParseError> {
        self.finished = true;
        Ok(())
    }
}

/// Decodes request heads out of a byte buffer, one request per completed head.
#[derive(Debug)]
pub struct RequestDecoder {
    config: ParserConfig,
    span: Span,
    parser: HeadParser<RequestAssembler>,
}

impl RequestDecoder {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self::with_span(config, Span::none())
    }

    pub fn with_span(config: ParserConfig, span: Span) -> Self {
        let parser = HeadParser::with_config(RequestAssembler::new(), config).with_span(span.clone());
        Self { config, span, parser }
    }

    fn fresh_parser(&self) -> HeadParser<RequestAssembler> {
        HeadParser::with_config(RequestAssembler::new(), self.config).with_span(self.span.clone())
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Feeds everything buffered to the parser and consumes what it used.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: a head completed, the body (if any) is still in `src`
    /// - `Ok(None)`: the head is incomplete, all of `src` has been consumed
    /// - `Err(_)`: the head was rejected; the decoder must not be used again
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let left = self.parser.feed(&src[..])?.len();
        src.advance(src.len() - left);

        if !self.parser.is_done() {
            return Ok(None);
        }

        let fresh = self.fresh_parser();
        let parser = mem::replace(&mut self.parser, fresh);
        debug!(head_size = parser.consumed(), "decoded request head");
        Ok(parser.into_handler().into_request())
    }

    /// Like [`decode`](Self::decode), but a head cut off by the end of the
    /// stream is an [`UnexpectedEof`](io::ErrorKind::UnexpectedEof) error
    /// instead of a clean end.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }

        let consumed = self.parser.consumed();
        if consumed > 0 {
            debug!(consumed, state = ?self.parser.state(), "stream ended inside the request head");
            return Err(ParseError::io(io::Error::from(io::ErrorKind::UnexpectedEof)));
        }
        Ok(None)
    }
}
