//! The boundary between the codec and a transport.
//!
//! - [`read_request`]: drives the head parser from an
//!   [`AsyncBufRead`](tokio::io::AsyncBufRead), leaving the body in the reader
//! - [`ResponseGate`]: orders status, headers and body of an outgoing response
//!   into a [`ResponseSink`]
//!
//! Connection lifecycle (accepting, keep-alive, timeouts) is left to the caller.

mod request_reader;
mod response_gate;

pub use request_reader::read_request;
pub use response_gate::Phase;
pub use response_gate::ResponseGate;
pub use response_gate::ResponseSink;
