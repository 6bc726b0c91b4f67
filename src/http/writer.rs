use std::time::SystemTime;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::StatusCode;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Name sent in the `Server` header.
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");
/// Version sent in the `Server` header.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header name used both when writing and when checking CGI output.
pub const CONTENT_TYPE_HEADER: &str = "Content-type:";

/// Serializes the status line and standard headers.
///
/// With a content type the `Content-type` line and the blank line ending the
/// header block are appended. Without one the block is left open so a CGI
/// child can emit its own `Content-type` and terminator.
pub fn serialize_header(status: StatusCode, content_type: Option<&str>, now: SystemTime) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        status.as_u16(),
        status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    buf.extend_from_slice(format!("Date: {}\r\n", httpdate::fmt_http_date(now)).as_bytes());
    buf.extend_from_slice(format!("Server: {}/{}\r\n", SERVER_NAME, SERVER_VERSION).as_bytes());

    if let Some(content_type) = content_type {
        buf.extend_from_slice(format!("{} {}\r\n", CONTENT_TYPE_HEADER, content_type).as_bytes());
        // Header/body separator
        buf.extend_from_slice(b"\r\n");
    }

    buf
}

/// Writes the header block for `status` to `stream`.
pub async fn write_header<W>(
    stream: &mut W,
    status: StatusCode,
    content_type: Option<&str>,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let buf = serialize_header(status, content_type, SystemTime::now());
    stream.write_all(&buf).await?;
    Ok(())
}

/// Writes a complete plain-text status response.
///
/// The body is the status message template with `item` substituted, or
/// nothing if the status has no template.
pub async fn write_status<W>(stream: &mut W, status: StatusCode, item: &str) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_header(stream, status, Some("text/plain")).await?;

    if let Some(message) = status.message(item) {
        stream.write_all(message.as_bytes()).await?;
    }

    stream.flush().await?;
    Ok(())
}
