//! Protocol types shared by the codec and connection layers.
//!
//! - **Headers** ([`headers`]): the case-normalizing [`Headers`] container
//! - **Request** ([`request`]): the [`Request`] assembled from parser events and its [`HttpVersion`]
//! - **Error Handling** ([`error`]):
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request head errors, with [`HeaderRejection`] reasons
//!   - [`BodyError`]: Body framing errors and truncated bodies
//!   - [`SendError`]: Response sending errors
//!
//! Every error exposes a `status()`: `Some` when the peer should get a response
//! before the connection is closed, `None` when the connection should simply be
//! dropped.

pub mod headers;
pub use headers::Headers;

mod request;
pub use request::HttpVersion;
pub use request::Request;

mod error;
pub use error::BodyError;
pub use error::HeaderRejection;
pub use error::HttpError;
pub use error::ParseError;
pub use error::Production;
pub use error::SendError;
