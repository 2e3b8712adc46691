//! The request assembled from parser events.
//!
//! A [`Request`] is created as soon as the request line is recognized and
//! collects headers until the header block ends. Its body stays `None` until
//! the caller decodes it with [`Request::read_body`].

use std::fmt;

use bytes::Bytes;
use http::Method;
use tokio::io::AsyncBufRead;

use crate::codec::BodyDecoder;
use crate::protocol::{BodyError, Headers};

/// Protocol version from the request line, kept as the two digits that were sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HttpVersion {
    pub major: u8,
    pub minor: u8,
}

impl HttpVersion {
    pub const HTTP_10: HttpVersion = HttpVersion::new(1, 0);
    pub const HTTP_11: HttpVersion = HttpVersion::new(1, 1);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Maps onto [`http::Version`] when the pair names a known version.
    pub fn to_http(self) -> Option<http::Version> {
        match (self.major, self.minor) {
            (0, 9) => Some(http::Version::HTTP_09),
            (1, 0) => Some(http::Version::HTTP_10),
            (1, 1) => Some(http::Version::HTTP_11),
            (2, 0) => Some(http::Version::HTTP_2),
            (3, 0) => Some(http::Version::HTTP_3),
            _ => None,
        }
    }
}

impl From<(u8, u8)> for HttpVersion {
    fn from((major, minor): (u8, u8)) -> Self {
        Self::new(major, minor)
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    target: String,
    version: HttpVersion,
    headers: Headers,
    body: Option<Bytes>,
}

impl Request {
    pub fn new(method: Method, target: impl Into<String>, version: HttpVersion) -> Self {
        Self { method, target: target.into(), version, headers: Headers::new(), body: None }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request target exactly as sent; it is neither decoded nor normalized.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn set_body(&mut self, body: Bytes) {
        self.body = Some(body);
    }

    pub fn into_body(self) -> Option<Bytes> {
        self.body
    }

    /// Decodes the body from `reader` using the framing announced by the headers.
    ///
    /// Only one attempt is made. On failure the request must be abandoned
    /// together with its connection.
    pub async fn read_body<R>(&mut self, reader: &mut R) -> Result<&Bytes, BodyError>
    where
        R: AsyncBufRead + Unpin,
    {
        let decoder = BodyDecoder::from_headers(&self.headers)?;
        let body = decoder.decode(reader).await?;
        Ok(self.body.insert(body))
    }
}
