use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::dispatch::Dispatcher;
use crate::http::parser::{MAX_LINE_LEN, is_header_terminator, parse_request_line};
use crate::http::response::StatusCode;
use crate::http::writer::write_status;

/// One accepted client connection, good for a single request.
pub struct Connection<S> {
    stream: S,
    dispatcher: Arc<Dispatcher>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, dispatcher: Arc<Dispatcher>) -> Self {
        Self { stream, dispatcher }
    }

    /// Reads one request, writes its response and closes the write side.
    pub async fn run(self) -> anyhow::Result<()> {
        let (reader, mut writer) = tokio::io::split(self.stream);
        let mut reader = BufReader::new(reader);

        let Some(line) = read_request(&mut reader).await? else {
            // Client closed connection
            tracing::debug!("Connection closed before a request line arrived");
            return Ok(());
        };

        match parse_request_line(&line) {
            Ok(request) => {
                tracing::info!(method = %request.method, path = %request.path, "Request received");
                self.dispatcher.dispatch(&request, &mut writer).await?;
            }
            Err(e) => {
                tracing::warn!(line = %line.trim_end(), error = %e, "Rejecting request");
                write_status(&mut writer, StatusCode::BadRequest, "").await?;
            }
        }

        writer.flush().await?;
        writer.shutdown().await?;
        Ok(())
    }
}

/// Reads the request line and discards the header lines after it.
///
/// Returns `None` if the peer closed the connection before sending a line.
/// Header lines are skipped up to the first empty line or EOF.
pub async fn read_request<R>(reader: &mut R) -> anyhow::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    if !read_line_limited(reader, &mut line, MAX_LINE_LEN).await? {
        return Ok(None);
    }

    let mut header = Vec::new();
    loop {
        header.clear();
        if !read_line_limited(reader, &mut header, MAX_LINE_LEN).await? || is_header_terminator(&header) {
            break;
        }
    }

    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

/// Reads up to and including the next `\n`, keeping at most `limit` bytes.
///
/// The rest of an over-long line is consumed and dropped. Returns false at
/// EOF when nothing was read.
async fn read_line_limited<R>(reader: &mut R, buf: &mut Vec<u8>, limit: usize) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    let mut read_any = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(read_any);
        }
        read_any = true;

        let (chunk, done) = match available.iter().position(|&b| b == b'\n') {
            Some(pos) => (&available[..=pos], true),
            None => (available, false),
        };

        let room = limit.saturating_sub(buf.len());
        buf.extend_from_slice(&chunk[..chunk.len().min(room)]);

        let used = chunk.len();
        reader.consume(used);

        if done {
            return Ok(true);
        }
    }
}
