//! Request body decoding.
//!
//! A body is read in one go from an [`AsyncBufRead`](tokio::io::AsyncBufRead)
//! positioned right after the header block. [`BodyKind`] picks the framing
//! from the headers and [`BodyDecoder`] runs it:
//!
//! - [`LengthDecoder`]: exactly `Content-Length` bytes
//! - [`ChunkedDecoder`]: chunked transfer coding, trailers left unread
//! - read-to-end: everything until the source is exhausted

mod body_decoder;
mod chunked_decoder;
mod length_decoder;

pub use body_decoder::BodyDecoder;
pub use body_decoder::BodyKind;
pub use chunked_decoder::ChunkedDecoder;
pub use length_decoder::LengthDecoder;
