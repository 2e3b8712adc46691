//! A resumable HTTP/1.1 request parser with body decoding and a response gate.
//!
//! The request head (request line and header block) can arrive in fragments of
//! any size, down to a single byte per call. The parser never re-scans input
//! and never loses a partially recognized token between calls, so every split
//! of the same bytes produces the same sequence of events.
//!
//! # Example
//!
//! ```no_run
//! use jester_http::codec::ParserConfig;
//! use jester_http::connection::{ResponseGate, read_request};
//! use bytes::BytesMut;
//! use http::StatusCode;
//! use tokio::io::{AsyncWriteExt, BufReader};
//! use tokio::net::TcpListener;
//! use tracing::{Level, error, info};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.expect("bind failed");
//!     let (stream, _remote_addr) = listener.accept().await.expect("accept failed");
//!     let (reader, mut writer) = stream.into_split();
//!     let mut reader = BufReader::new(reader);
//!
//!     let mut request = match read_request(&mut reader, ParserConfig::default()).await {
//!         Ok(Some(request)) => request,
//!         Ok(None) => return,
//!         Err(e) => {
//!             error!(cause = %e, status = ?e.status(), "can't read request");
//!             return;
//!         }
//!     };
//!     info!(method = %request.method(), target = request.target(), "received request");
//!
//!     if let Err(e) = request.read_body(&mut reader).await {
//!         error!(cause = %e, "can't read request body");
//!         return;
//!     }
//!
//!     let mut gate = ResponseGate::new(BytesMut::new());
//!     gate.set_header("Content-Type", "text/plain").unwrap();
//!     gate.send_status(StatusCode::OK, "OK").unwrap();
//!     gate.send_body("Hello World!\r\n").unwrap();
//!     writer.write_all(&gate.into_sink()).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! - [`codec`]: the head parser, its events, request assembly and body decoding
//! - [`protocol`]: [`Request`](protocol::Request), [`Headers`](protocol::Headers) and the error types
//! - [`connection`]: reading requests from an async source and gating response writes
//!
//! ## Parsing
//!
//! [`codec::HeadParser`] is an explicit state machine fed with
//! [`feed`](codec::HeadParser::feed). Each recognized unit is reported to a
//! [`codec::ParseHandler`]: the request line, every header, and the end of the
//! header block. [`codec::RequestAssembler`] is the handler building a request;
//! `Vec<Event>` records the events as values.
//!
//! ## Bodies
//!
//! Bodies are never read implicitly. Once the head is complete the caller asks
//! for the body with [`protocol::Request::read_body`], which selects the framing
//! from `Content-Length` and `Transfer-Encoding` and reads from an
//! [`AsyncBufRead`](tokio::io::AsyncBufRead).
//!
//! ## Error Handling
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::ParseError`]: Request head errors
//! - [`protocol::BodyError`]: Body framing errors
//! - [`protocol::SendError`]: Response sending errors
//!
//! `status()` on each of them tells whether a response should be attempted
//! before closing the connection.
//!
//! # Limitations
//!
//! - Chunked trailers are not parsed
//! - The request target is kept as sent, it is not decoded or validated as a URL
//! - Maximum head size: 8KB by default
//! - Maximum number of headers: 64 by default

pub mod codec;
pub mod connection;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
