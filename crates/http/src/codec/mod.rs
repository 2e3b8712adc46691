//! Request decoding.
//!
//! The codec module turns raw bytes into [`Request`](crate::protocol::Request)s:
//!
//! - Request head:
//!   - [`HeadParser`]: resumable parser that fires [`ParseHandler`] events, see [`head`]
//!   - [`RequestAssembler`]: the handler that builds a request from those events
//!   - [`RequestDecoder`]: tokio-util [`Decoder`](tokio_util::codec::Decoder) over the parser
//!
//! - Request body:
//!   - [`BodyKind`]: framing selected from the headers
//!   - [`BodyDecoder`]: reads a whole body from an [`AsyncBufRead`](tokio::io::AsyncBufRead)
//!
//! # Example
//!
//! ```
//! use jester_http::codec::{BodyDecoder, RequestDecoder};
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! # futures::executor::block_on(async {
//! let mut buffer = BytesMut::from(&b"POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello"[..]);
//! let request = RequestDecoder::new().decode(&mut buffer).unwrap().unwrap();
//!
//! let decoder = BodyDecoder::from_headers(request.headers()).unwrap();
//! let body = decoder.decode(&mut &buffer[..]).await.unwrap();
//! assert_eq!(&body[..], b"hello");
//! # });
//! ```

mod body;
pub mod head;
mod request_decoder;

pub use body::BodyDecoder;
pub use body::BodyKind;
pub use body::ChunkedDecoder;
pub use body::LengthDecoder;
pub use head::Eol;
pub use head::Event;
pub use head::HeadParser;
pub use head::LineEnding;
pub use head::ParseHandler;
pub use head::ParserConfig;
pub use head::State;
pub use request_decoder::RequestAssembler;
pub use request_decoder::RequestDecoder;
