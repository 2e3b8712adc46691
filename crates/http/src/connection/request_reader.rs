//! Reads one request head at a time from a buffered async source.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, trace};

use crate::codec::{HeadParser, ParserConfig, RequestAssembler};
use crate::protocol::{ParseError, Request};

/// Parses the next request head from `reader`.
///
/// Only the bytes belonging to the head are consumed, so the reader is left
/// positioned at the start of the body, ready for
/// [`Request::read_body`].
///
/// # Returns
///
/// - `Ok(Some(request))`: a complete head, without body
/// - `Ok(None)`: the source ended cleanly before the first byte of a request
/// - `Err(ParseError::Io)`: the source failed or ended in the middle of the head
/// - `Err(_)`: the head was rejected
pub async fn read_request<R>(reader: &mut R, config: ParserConfig) -> Result<Option<Request>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut parser = HeadParser::with_config(RequestAssembler::new(), config);

    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            if parser.consumed() == 0 {
                trace!("source ended before a new request");
                return Ok(None);
            }

            debug!(
                consumed = parser.consumed(),
                state = ?parser.state(),
                partial_token = parser.has_partial_token(),
                "source ended inside the request head"
            );
            return Err(ParseError::io(io::Error::from(io::ErrorKind::UnexpectedEof)));
        }

        let len = buf.len();
        let left = parser.feed(buf)?.len();
        reader.consume(len - left);

        if parser.is_done() {
            return Ok(parser.into_handler().into_request());
        }
    }
}
