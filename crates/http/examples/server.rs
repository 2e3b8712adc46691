//! Answers every request with a short summary of what was parsed.
//!
//! ```text
//! cargo run -p jester-http --example server
//! curl -v -d 'hello' http://127.0.0.1:8080/echo
//! ```

use std::net::SocketAddr;

use bytes::BytesMut;
use http::StatusCode;
use jester_http::codec::{BodyKind, ParserConfig};
use jester_http::connection::{ResponseGate, read_request};
use jester_http::protocol::{HttpError, Request, SendError};
use tokio::io::{AsyncBufRead, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{Instrument, Level, Span, error, info, info_span, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!(port = 8080, "start listening");
    let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    loop {
        let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let span = info_span!("connection", %remote_addr);
        tokio::spawn(
            async move {
                match process(tcp_stream, remote_addr).await {
                    Ok(()) => info!("finished process, connection shutdown"),
                    Err(e) => error!(cause = %e, "connection aborted"),
                }
            }
            .instrument(span),
        );
    }
}

async fn process(tcp_stream: TcpStream, remote_addr: SocketAddr) -> Result<(), HttpError> {
    let (reader, mut writer) = tcp_stream.into_split();
    let mut reader = BufReader::new(reader);

    loop {
        let response = match next_request(&mut reader).await {
            Ok(Some(request)) => respond(&request, remote_addr)?,
            Ok(None) => return Ok(()),
            Err(e) => match e.status() {
                Some(status) => {
                    warn!(cause = %e, %status, "bad request, answering before close");
                    let response = respond_error(status)?;
                    writer.write_all(&response).await.map_err(SendError::io)?;
                    return Err(e);
                }
                None => return Err(e),
            },
        };

        writer.write_all(&response).await.map_err(SendError::io)?;
    }
}

async fn next_request<R>(reader: &mut R) -> Result<Option<Request>, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let Some(mut request) = read_request(reader, ParserConfig::default()).await? else {
        return Ok(None);
    };

    // without framing headers the body runs until the client closes, which a
    // keep-alive client never does
    if BodyKind::from_headers(request.headers())? != BodyKind::ToEnd {
        request.read_body(reader).await?;
    }

    Ok(Some(request))
}

fn respond(request: &Request, remote_addr: SocketAddr) -> Result<BytesMut, HttpError> {
    info!(method = %request.method(), target = request.target(), "receiving request");

    let body = format!(
        "{} {} {} from {}\r\nheaders: {}\r\nbody: {} bytes\r\n",
        request.method(),
        request.target(),
        request.version(),
        remote_addr,
        request.headers().len(),
        request.body().map_or(0, |body| body.len()),
    );

    let mut gate = ResponseGate::new(BytesMut::new()).with_span(Span::current());
    gate.set_header("Content-Type", "text/plain")?;
    gate.set_header("Content-Length", body.len())?;
    gate.send_status(StatusCode::OK, "OK")?;
    gate.send_body(body)?;
    Ok(gate.into_sink())
}

fn respond_error(status: StatusCode) -> Result<BytesMut, HttpError> {
    let mut gate = ResponseGate::new(BytesMut::new()).with_span(Span::current());
    gate.set_header("Content-Length", 0)?;
    gate.set_header("Connection", "close")?;
    gate.send_status(status, status.canonical_reason().unwrap_or("Error"))?;
    gate.send_body("")?;
    Ok(gate.into_sink())
}
