use std::fmt;
use std::io;

use bytes::Bytes;
use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("body error: {source}")]
    BodyError {
        #[from]
        source: BodyError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

impl HttpError {
    /// The status to answer with before closing, `None` means abort the connection.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::RequestError { source } => source.status(),
            HttpError::BodyError { source } => source.status(),
            HttpError::ResponseError { .. } => None,
        }
    }
}

/// The grammar production a [`ParseError::Grammar`] was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Production {
    Method,
    Target,
    Separator,
    LineEnding,
    HeaderName,
    HeaderValue,
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Production::Method => "method",
            Production::Target => "request target",
            Production::Separator => "separator",
            Production::LineEnding => "line ending",
            Production::HeaderName => "header name",
            Production::HeaderValue => "header value",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unexpected {found:?} while parsing {production}")]
    Grammar { production: Production, found: Bytes },

    #[error("malformed http version: {found:?}")]
    MalformedVersion { found: Bytes },

    #[error("header rejected: {0}")]
    Header(#[from] HeaderRejection),

    #[error("head size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHead { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("request rejected with {status}: {reason}")]
    Rejected { status: StatusCode, reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn grammar(production: Production, found: impl Into<Bytes>) -> Self {
        Self::Grammar { production, found: found.into() }
    }

    pub fn malformed_version(found: impl Into<Bytes>) -> Self {
        Self::MalformedVersion { found: found.into() }
    }

    pub fn too_large_head(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHead { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    /// Used by handlers to refuse a message with a specific status.
    pub fn rejected<S: ToString>(status: StatusCode, reason: S) -> Self {
        Self::Rejected { status, reason: reason.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ParseError::Grammar { .. } | ParseError::MalformedVersion { .. } => Some(StatusCode::BAD_REQUEST),
            ParseError::Header(rejection) => Some(rejection.status()),
            ParseError::TooLargeHead { .. } => Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE),
            ParseError::TooManyHeaders { .. } => Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE),
            ParseError::Rejected { status, .. } => Some(*status),
            ParseError::Io { .. } => None,
        }
    }

    /// Returns the header rejection reason, if this error is one.
    pub fn header_rejection(&self) -> Option<HeaderRejection> {
        match self {
            ParseError::Header(rejection) => Some(*rejection),
            _ => None,
        }
    }
}

/// Reasons a header line is refused. Every one of them maps to `400 Bad Request`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRejection {
    #[error("malformed header")]
    MalformedHeader,

    #[error("illegal header syntax")]
    IllegalHeaderSyntax,

    #[error("non-ascii header")]
    NonAsciiHeader,

    #[error("illegal token characters")]
    IllegalTokenCharacters,
}

impl HeaderRejection {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

#[derive(Error, Debug)]
pub enum BodyError {
    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("invalid chunk size line: {line:?}")]
    InvalidChunkSize { line: Bytes },

    #[error("invalid chunk terminator: {found:?}")]
    InvalidChunkTerminator { found: Bytes },

    /// The source ended before the framing said the body would.
    #[error("body truncated after {received} bytes")]
    Truncated {
        received: u64,
        #[source]
        source: io::Error,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl BodyError {
    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn invalid_chunk_size(line: impl Into<Bytes>) -> Self {
        Self::InvalidChunkSize { line: line.into() }
    }

    pub fn invalid_chunk_terminator(found: impl Into<Bytes>) -> Self {
        Self::InvalidChunkTerminator { found: found.into() }
    }

    pub fn truncated(received: u64) -> Self {
        Self::Truncated { received, source: io::Error::from(io::ErrorKind::UnexpectedEof) }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Malformed framing gets a `400`; a truncated or failed read gets no response at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BodyError::InvalidContentLength { .. }
            | BodyError::InvalidChunkSize { .. }
            | BodyError::InvalidChunkTerminator { .. } => Some(StatusCode::BAD_REQUEST),
            BodyError::Truncated { .. } | BodyError::Io { .. } => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
