//! Incremental parsing of the request line and header block.
//!
//! # Components
//!
//! - [`chars`]: byte classes of the grammar
//! - [`HeadParser`]: the state machine driven by `feed`
//! - [`ParseHandler`] / [`Event`]: typed notifications for recognized units
//! - [`ParserConfig`]: line ending strictness and size limits
//!
//! Internally the parser is built from small resumable steps (a token run, a
//! fixed literal, a single byte from a set, a whitespace skip) that keep
//! partially recognized tokens in a continuation buffer between calls. This
//! is what makes any split of the input produce the same events.

pub mod chars;
mod config;
mod event;
mod parser;
mod state;
mod step;
mod token;

pub use config::LineEnding;
pub use config::ParserConfig;
pub use event::Event;
pub use event::ParseHandler;
pub use parser::HeadParser;
pub use state::Eol;
pub use state::State;
