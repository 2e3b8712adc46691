//! Three-phase gate for writing a response.
//!
//! A response moves through [`Phase::NotStarted`], [`Phase::StatusSent`] and
//! [`Phase::BodyStarted`], never backwards:
//!
//! - headers set before the status are buffered and written right after the status line
//! - headers set after the status are written immediately
//! - headers set once the body has started are dropped with a warning
//!
//! The gate does no buffering of its own beyond the pending headers; every
//! status line, header line and body chunk is one [`ResponseSink::write`].

use std::fmt::Display;
use std::io;

use bytes::{Bytes, BytesMut};
use http::StatusCode;
use tracing::{Span, trace, warn};

use crate::protocol::headers::normalize_name;
use crate::protocol::{Headers, SendError};

/// Destination of the response bytes, typically a buffer in front of a socket.
pub trait ResponseSink {
    fn write(&mut self, data: Bytes) -> io::Result<()>;
}

impl ResponseSink for BytesMut {
    fn write(&mut self, data: Bytes) -> io::Result<()> {
        self.extend_from_slice(&data);
        Ok(())
    }
}

/// Keeps every write separately.
impl ResponseSink for Vec<Bytes> {
    fn write(&mut self, data: Bytes) -> io::Result<()> {
        self.push(data);
        Ok(())
    }
}

impl<S: ResponseSink + ?Sized> ResponseSink for &mut S {
    fn write(&mut self, data: Bytes) -> io::Result<()> {
        (**self).write(data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    NotStarted,
    StatusSent,
    BodyStarted,
}

#[derive(Debug)]
pub struct ResponseGate<S> {
    sink: S,
    headers: Headers,
    phase: Phase,
    span: Span,
}

impl<S: ResponseSink> ResponseGate<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, headers: Headers::new(), phase: Phase::NotStarted, span: Span::none() }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Every header set so far, including those already written.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Sets `name` to `value`, replacing any earlier value.
    pub fn set_header<V: Display>(&mut self, name: &str, value: V) -> Result<(), SendError> {
        if self.reject_header(name) {
            return Ok(());
        }

        let value = value.to_string();
        self.headers.insert(name, &value);
        self.write_header(name, &value)
    }

    /// Adds `value` to `name`. Before the status, values are combined into one
    /// header line; after it, each call writes its own line.
    pub fn add_header<V: Display>(&mut self, name: &str, value: V) -> Result<(), SendError> {
        if self.reject_header(name) {
            return Ok(());
        }

        let value = value.to_string();
        self.headers.append(name, &value);
        self.write_header(name, &value)
    }

    /// Writes the status line followed by every buffered header.
    ///
    /// Only the first call has an effect.
    pub fn send_status(&mut self, status: StatusCode, reason: &str) -> Result<(), SendError> {
        if self.phase != Phase::NotStarted {
            warn!(parent: &self.span, status = status.as_u16(), "status already sent, ignoring");
            return Ok(());
        }

        trace!(parent: &self.span, status = status.as_u16(), reason, "sending status");
        self.sink.write(Bytes::from(format!("HTTP/1.1 {} {}\r\n", status.as_u16(), reason)))?;
        self.phase = Phase::StatusSent;

        for (name, value) in self.headers.iter() {
            self.sink.write(Bytes::from(format!("{name}: {value}\r\n")))?;
        }
        Ok(())
    }

    /// Writes a chunk of the body.
    ///
    /// The first chunk sends `200 OK` if no status was sent, then ends the
    /// header block.
    pub fn send_body(&mut self, chunk: impl Into<Bytes>) -> Result<(), SendError> {
        if self.phase == Phase::NotStarted {
            self.send_status(StatusCode::OK, "OK")?;
        }

        if self.phase == Phase::StatusSent {
            self.sink.write(Bytes::from_static(b"\r\n"))?;
            self.phase = Phase::BodyStarted;
        }

        self.sink.write(chunk.into())?;
        Ok(())
    }

    /// True when the header must not be recorded because the body has started.
    fn reject_header(&self, name: &str) -> bool {
        if self.phase == Phase::BodyStarted {
            warn!(parent: &self.span, header = name, "body already started, dropping header");
            return true;
        }
        false
    }

    fn write_header(&mut self, name: &str, value: &str) -> Result<(), SendError> {
        if self.phase == Phase::StatusSent {
            let name = normalize_name(name);
            self.sink.write(Bytes::from(format!("{name}: {value}\r\n")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writes(gate: &ResponseGate<Vec<Bytes>>) -> Vec<&[u8]> {
        gate.sink().iter().map(|b| &b[..]).collect()
    }

    #[test]
    fn headers_are_sent_with_status() {
        let mut gate = ResponseGate::new(Vec::new());
        gate.set_header("one", 1).unwrap();
        gate.set_header("2", "two").unwrap();
        gate.set_header("tres", 3).unwrap();
        assert!(gate.sink().is_empty());

        gate.send_status(StatusCode::OK, "what ev").unwrap();
        assert_eq!(gate.phase(), Phase::StatusSent);
        assert_eq!(writes(&gate), [&b"HTTP/1.1 200 what ev\r\n"[..], b"One: 1\r\n", b"2: two\r\n", b"Tres: 3\r\n"]);
    }

    #[test]
    fn add_header_appends_values() {
        let mut gate = ResponseGate::new(Vec::new());
        gate.add_header("Header", "first").unwrap();
        gate.add_header("Header", "second").unwrap();
        assert_eq!(gate.headers().get("Header"), Some("first,second"));
    }

    #[test]
    fn set_header_overwrites_header() {
        let mut gate = ResponseGate::new(Vec::new());
        gate.add_header("Header", "first").unwrap();
        gate.add_header("Header", "second").unwrap();
        gate.set_header("Header", "final").unwrap();
        assert_eq!(gate.headers().get("Header"), Some("final"));
    }

    #[test]
    fn headers_are_written_after_status_is_sent() {
        let mut gate = ResponseGate::new(Vec::new());
        gate.send_status(StatusCode::OK, "ok").unwrap();

        gate.add_header("one", "two").unwrap();
        gate.set_header("x-three", "four").unwrap();
        assert_eq!(writes(&gate)[1..], [&b"One: two\r\n"[..], b"X-Three: four\r\n"]);
    }

    #[test]
    fn headers_are_dropped_after_body_started() {
        let mut gate = ResponseGate::new(Vec::new());
        gate.send_status(StatusCode::OK, "Bah").unwrap();
        gate.send_body("body").unwrap();
        let before = gate.sink().len();

        gate.add_header("Foo", "Bar").unwrap();
        gate.set_header("Bah", "Boo").unwrap();
        assert_eq!(gate.sink().len(), before);
        assert!(!gate.headers().contains("Foo"));
    }

    #[test]
    fn status_is_sent_once() {
        let mut gate = ResponseGate::new(Vec::new());
        gate.send_status(StatusCode::OK, "Reason").unwrap();
        gate.send_status(StatusCode::INTERNAL_SERVER_ERROR, "Fail").unwrap();
        assert_eq!(writes(&gate), [&b"HTTP/1.1 200 Reason\r\n"[..]]);
    }

    #[test]
    fn ok_status_is_sent_with_body() {
        let mut gate = ResponseGate::new(Vec::new());
        gate.send_body("foo").unwrap();
        gate.send_body("bar").unwrap();

        assert_eq!(gate.phase(), Phase::BodyStarted);
        assert_eq!(writes(&gate), [&b"HTTP/1.1 200 OK\r\n"[..], b"\r\n", b"foo", b"bar"]);
    }

    #[test]
    fn bytes_mut_sink_collects_the_wire_format() {
        let mut gate = ResponseGate::new(BytesMut::new());
        gate.set_header("content-type", "text/plain").unwrap();
        gate.send_status(StatusCode::NOT_FOUND, "Not Found").unwrap();
        gate.send_body(Bytes::from_static(b"missing")).unwrap();

        assert_eq!(&gate.into_sink()[..], b"HTTP/1.1 404 Not Found\r\nContent-Type: text/plain\r\n\r\nmissing");
    }

    #[test]
    fn sink_failure_surfaces() {
        struct Closed;

        impl ResponseSink for Closed {
            fn write(&mut self, _data: Bytes) -> io::Result<()> {
                Err(io::Error::from(io::ErrorKind::BrokenPipe))
            }
        }

        let mut gate = ResponseGate::new(Closed);
        let err = gate.send_body("data").unwrap_err();
        assert!(matches!(err, SendError::Io { ref source } if source.kind() == io::ErrorKind::BrokenPipe));
        assert_eq!(gate.phase(), Phase::NotStarted);
    }

    #[test]
    fn status_line_is_not_repeated_after_failed_header_write() {
        /// Accepts `remaining` writes, then fails.
        struct FailsAfter {
            remaining: usize,
            written: Vec<Bytes>,
        }

        impl ResponseSink for FailsAfter {
            fn write(&mut self, data: Bytes) -> io::Result<()> {
                if self.remaining == 0 {
                    return Err(io::Error::from(io::ErrorKind::BrokenPipe));
                }
                self.remaining -= 1;
                self.written.push(data);
                Ok(())
            }
        }

        let mut gate = ResponseGate::new(FailsAfter { remaining: 1, written: Vec::new() });
        gate.set_header("One", 1).unwrap();
        assert!(gate.send_status(StatusCode::OK, "OK").is_err());
        assert_eq!(gate.phase(), Phase::StatusSent);

        gate.send_status(StatusCode::OK, "OK").unwrap();
        let statuses = gate.sink().written.iter().filter(|data| data.starts_with(b"HTTP/1.1")).count();
        assert_eq!(statuses, 1);
    }
}
