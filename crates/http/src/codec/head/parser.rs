//! The resumable request head parser.
//!
//! [`HeadParser::feed`] accepts the request head in fragments of any size and
//! fires [`ParseHandler`] events as soon as each unit is recognized. Nothing
//! is ever re-scanned: every byte is looked at once by the step for the
//! current [`State`], and partially recognized tokens survive in a
//! continuation buffer until the next call.
//!
//! # Example
//!
//! ```
//! use jester_http::codec::{Event, HeadParser};
//! use jester_http::protocol::HttpVersion;
//!
//! let mut parser = HeadParser::new(Vec::new());
//! for b in b"GET / HTTP/1.1\r\nHost: example\r\n\r\n" {
//!     parser.feed(&[*b]).unwrap();
//! }
//!
//! assert!(parser.is_done());
//! assert_eq!(parser.handler()[0], Event::RequestLine {
//!     method: http::Method::GET,
//!     target: "/".to_string(),
//!     version: HttpVersion::HTTP_11,
//! });
//! ```

use bytes::Bytes;
use http::Method;
use tracing::{Span, trace};

use super::chars::{is_digit, is_field_value, is_target, is_token, is_whitespace};
use super::config::{LineEnding, ParserConfig};
use super::event::ParseHandler;
use super::state::{Eol, State};
use super::step::{self, Step};
use super::token::Token;
use crate::ensure;
use crate::protocol::{HeaderRejection, HttpVersion, ParseError, Production};

const VERSION_PREFIX: &[u8] = b"HTTP/";

/// Finished tokens waiting for the event that owns them.
#[derive(Debug, Default)]
struct Pending {
    method: Bytes,
    target: Bytes,
    major: u8,
    minor: u8,
    name: Bytes,
}

#[derive(Debug)]
pub struct HeadParser<H> {
    handler: H,
    config: ParserConfig,
    span: Span,
    state: State,
    token: Token,
    pending: Pending,
    consumed: usize,
    header_count: usize,
}

impl<H: ParseHandler> HeadParser<H> {
    pub fn new(handler: H) -> Self {
        Self::with_config(handler, ParserConfig::default())
    }

    pub fn with_config(handler: H, config: ParserConfig) -> Self {
        Self {
            handler,
            config,
            span: Span::none(),
            state: State::Method,
            token: Token::default(),
            pending: Pending::default(),
            consumed: 0,
            header_count: 0,
        }
    }

    /// Attaches the span parser diagnostics are recorded under, typically one per connection.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// True once the blank line ending the header block has been recognized.
    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Number of bytes the parser has consumed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Whether a partially recognized token is buffered, waiting for more input.
    pub fn has_partial_token(&self) -> bool {
        self.token.is_started()
    }

    /// Pushes `data` through the grammar, firing events as units complete.
    ///
    /// Returns the bytes left over once the head is complete; while the head
    /// is still incomplete everything is consumed and the result is empty.
    ///
    /// # Errors
    ///
    /// Any grammar violation, header rejection, configured limit or handler
    /// rejection. Errors are fatal: the parser must not be fed again.
    pub fn feed<'a>(&mut self, data: &'a [u8]) -> Result<&'a [u8], ParseError> {
        let span = self.span.clone();
        let _entered = span.enter();
        let mut rest = data;
        while !rest.is_empty() && !self.state.is_done() {
            let consumed = self.step(rest)?;
            rest = &rest[consumed..];

            self.consumed += consumed;
            let max_size = self.config.max_head_size();
            ensure!(self.consumed <= max_size, ParseError::too_large_head(self.consumed, max_size));
        }
        Ok(rest)
    }

    /// Runs the step of the current state once and returns how many bytes it consumed.
    ///
    /// A step may consume nothing when it only hands its terminating byte over
    /// to the next state.
    fn step(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            State::Method => self.token_run(data, is_token, Production::Method),
            State::Target => self.token_run(data, is_target, Production::Target),

            State::MethodSp | State::TargetSp => {
                step::one_of(data, |b| b == b' ')
                    .map_err(|b| ParseError::grammar(Production::Separator, Bytes::copy_from_slice(&[b])))?;
                self.state = self.state.next();
                Ok(1)
            }

            State::VersionPrefix => match step::literal(data, VERSION_PREFIX, &mut self.token) {
                Ok(Step::Done(n)) => {
                    self.state = self.state.next();
                    Ok(n)
                }
                Ok(Step::Pending) => Ok(data.len()),
                Err(found) => Err(ParseError::malformed_version(found)),
            },

            State::VersionMajor | State::VersionMinor => {
                let digit = step::one_of(data, is_digit)
                    .map_err(|b| ParseError::malformed_version(self.token.with_offending(b)))?;
                self.token.extend(&[digit]);
                if self.state == State::VersionMajor {
                    self.pending.major = digit - b'0';
                } else {
                    self.pending.minor = digit - b'0';
                    self.token.take();
                }
                self.state = self.state.next();
                Ok(1)
            }

            State::VersionDot => {
                let dot = step::one_of(data, |b| b == b'.')
                    .map_err(|b| ParseError::malformed_version(self.token.with_offending(b)))?;
                self.token.extend(&[dot]);
                self.state = self.state.next();
                Ok(1)
            }

            State::RequestLineEnd(eol) => {
                if let Some(next) = self.line_end(data[0], eol)? {
                    self.state = State::RequestLineEnd(next);
                } else {
                    self.state = self.state.next();
                    self.fire_request_line()?;
                }
                Ok(1)
            }

            State::HeaderStart => self.header_start(data[0]),

            State::HeaderName => self.header_name(data),

            State::NameWhitespace => match step::skip_whitespace(data) {
                Step::Pending => Ok(data.len()),
                Step::Done(n) if data[n] == b':' => Err(HeaderRejection::IllegalHeaderSyntax.into()),
                Step::Done(_) => Err(HeaderRejection::MalformedHeader.into()),
            },

            State::Ows => match step::skip_whitespace(data) {
                Step::Pending => Ok(data.len()),
                Step::Done(n) => {
                    self.state = self.state.next();
                    Ok(n)
                }
            },

            State::Value => self.header_value(data),

            State::HeaderLineEnd(eol) => {
                if let Some(next) = self.line_end(data[0], eol)? {
                    self.state = State::HeaderLineEnd(next);
                } else {
                    self.state = self.state.next();
                    self.fire_header()?;
                }
                Ok(1)
            }

            State::HeadEnd(eol) => {
                if let Some(next) = self.line_end(data[0], eol)? {
                    self.state = State::HeadEnd(next);
                } else {
                    self.state = self.state.next();
                    self.fire_headers_finished()?;
                }
                Ok(1)
            }

            State::Done => Ok(0),
        }
    }

    /// Method and target: a nonempty run of `class` bytes.
    fn token_run(&mut self, data: &[u8], class: fn(u8) -> bool, production: Production) -> Result<usize, ParseError> {
        match step::take_while(data, class, &mut self.token) {
            Step::Pending => Ok(data.len()),
            Step::Done(n) => {
                ensure!(!self.token.is_empty(), ParseError::grammar(production, Bytes::copy_from_slice(&data[n..=n])));
                let token = self.token.take();
                match production {
                    Production::Method => self.pending.method = token,
                    _ => self.pending.target = token,
                }
                self.state = self.state.next();
                Ok(n)
            }
        }
    }

    /// Consumes one byte of a line terminator.
    ///
    /// Returns the terminator state to continue in, or `None` when the line has ended.
    fn line_end(&self, b: u8, eol: Eol) -> Result<Option<Eol>, ParseError> {
        match (eol, b) {
            (Eol::Cr, b'\r') => Ok(Some(Eol::Lf)),
            (Eol::Cr, b'\n') if self.config.line_ending() == LineEnding::Lenient => Ok(None),
            (Eol::Lf, b'\n') => Ok(None),
            (_, b) => Err(ParseError::grammar(Production::LineEnding, Bytes::copy_from_slice(&[b]))),
        }
    }

    /// Decides between another header line and the end of the header block.
    fn header_start(&mut self, b: u8) -> Result<usize, ParseError> {
        match b {
            b'\r' => {
                self.state = State::HeadEnd(Eol::Lf);
                Ok(1)
            }
            b'\n' => {
                // a bare LF can only end the block when line endings are lenient
                if self.line_end(b, Eol::Cr)?.is_none() {
                    self.state = State::Done;
                    self.fire_headers_finished()?;
                }
                Ok(1)
            }
            // obsolete line folding
            b' ' | b'\t' => Err(HeaderRejection::IllegalHeaderSyntax.into()),
            _ => {
                let max_num = self.config.max_headers();
                ensure!(self.header_count < max_num, ParseError::too_many_headers(max_num));
                self.state = self.state.next();
                Ok(0)
            }
        }
    }

    fn header_name(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        let n = match step::take_while(data, is_token, &mut self.token) {
            Step::Pending => return Ok(data.len()),
            Step::Done(n) => n,
        };

        match data[n] {
            b':' if self.token.is_empty() => Err(HeaderRejection::MalformedHeader.into()),
            b':' => {
                self.pending.name = self.token.take();
                self.state = self.state.next();
                Ok(n + 1)
            }
            b if is_whitespace(b) => {
                self.state = State::NameWhitespace;
                Ok(n + 1)
            }
            b'\r' | b'\n' => Err(HeaderRejection::MalformedHeader.into()),
            b if !b.is_ascii() => Err(HeaderRejection::NonAsciiHeader.into()),
            _ => Err(HeaderRejection::IllegalTokenCharacters.into()),
        }
    }

    fn header_value(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        let n = match step::take_while(data, is_field_value, &mut self.token) {
            Step::Pending => return Ok(data.len()),
            Step::Done(n) => n,
        };

        match data[n] {
            b'\r' | b'\n' => {
                self.state = self.state.next();
                Ok(n)
            }
            b if !b.is_ascii() => Err(HeaderRejection::NonAsciiHeader.into()),
            b => Err(ParseError::grammar(Production::HeaderValue, Bytes::copy_from_slice(&[b]))),
        }
    }

    fn fire_request_line(&mut self) -> Result<(), ParseError> {
        let pending = &mut self.pending;
        let method = Method::from_bytes(&pending.method)
            .map_err(|_| ParseError::grammar(Production::Method, pending.method.clone()))?;
        let target = ascii(&pending.target, Production::Target)?;
        let version = HttpVersion::new(pending.major, pending.minor);

        trace!(%method, request_target = target, %version, "request line received");
        self.handler.request_line_received(method, target, version)?;

        pending.method = Bytes::new();
        pending.target = Bytes::new();
        Ok(())
    }

    fn fire_header(&mut self) -> Result<(), ParseError> {
        let name = std::mem::take(&mut self.pending.name);
        let name = ascii(&name, Production::HeaderName)?;

        let value = self.token.take();
        let end = value.iter().rposition(|b| !is_whitespace(*b)).map_or(0, |i| i + 1);
        let value = value.slice(..end);

        self.header_count += 1;
        trace!(header = name, value_len = value.len(), "header parsed");
        self.handler.header_parsed(name, value)
    }

    fn fire_headers_finished(&mut self) -> Result<(), ParseError> {
        trace!(headers = self.header_count, head_size = self.consumed, "headers finished");
        self.handler.headers_finished()
    }
}

/// Views a token as text; the byte classes only admit ASCII, so failure means a
/// grammar bug rather than bad input, but it is still reported as bad input.
fn ascii(bytes: &Bytes, production: Production) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|_| ParseError::grammar(production, bytes.clone()))
}
