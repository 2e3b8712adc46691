//! Typed notifications fired by the head parser.
//!
//! A [`ParseHandler`] receives each recognized unit exactly once, in the order
//! its bytes arrived. Returning an error from a callback rejects the message;
//! the parser hands that error back from `feed` untouched.

use bytes::Bytes;
use http::Method;

use crate::protocol::{HttpVersion, ParseError};

pub trait ParseHandler {
    fn request_line_received(&mut self, _method: Method, _target: &str, _version: HttpVersion) -> Result<(), ParseError> {
        Ok(())
    }

    /// `name` is exactly as sent; `value` has its surrounding whitespace stripped.
    fn header_parsed(&mut self, _name: &str, _value: Bytes) -> Result<(), ParseError> {
        Ok(())
    }

    fn headers_finished(&mut self) -> Result<(), ParseError> {
        Ok(())
    }
}

impl<H: ParseHandler + ?Sized> ParseHandler for &mut H {
    fn request_line_received(&mut self, method: Method, target: &str, version: HttpVersion) -> Result<(), ParseError> {
        (**self).request_line_received(method, target, version)
    }

    fn header_parsed(&mut self, name: &str, value: Bytes) -> Result<(), ParseError> {
        (**self).header_parsed(name, value)
    }

    fn headers_finished(&mut self) -> Result<(), ParseError> {
        (**self).headers_finished()
    }
}

/// A parser notification as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    RequestLine { method: Method, target: String, version: HttpVersion },
    Header { name: String, value: Bytes },
    HeadersFinished,
}

/// Records every event, mostly useful in tests and diagnostics.
impl ParseHandler for Vec<Event> {
    fn request_line_received(&mut self, method: Method, target: &str, version: HttpVersion) -> Result<(), ParseError> {
        self.push(Event::RequestLine { method, target: target.to_string(), version });
        Ok(())
    }

    fn header_parsed(&mut self, name: &str, value: Bytes) -> Result<(), ParseError> {
        self.push(Event::Header { name: name.to_string(), value });
        Ok(())
    }

    fn headers_finished(&mut self) -> Result<(), ParseError> {
        self.push(Event::HeadersFinished);
        Ok(())
    }
}
