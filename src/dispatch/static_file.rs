use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::dispatch::Dispatcher;
use crate::http::path::extension;
use crate::http::response::StatusCode;
use crate::http::writer::{write_header, write_status};

impl Dispatcher {
    /// Streams the file at `item` byte for byte under a 200 header.
    ///
    /// A file that cannot be opened is answered with 404.
    pub async fn send_file<W>(&self, item: &str, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.send_file_as(item, extension(item), stream).await
    }

    /// Like [`send_file`](Self::send_file), but the content type is looked
    /// up for `ext` instead of the extension of `item`.
    pub async fn send_file_as<W>(&self, item: &str, ext: &str, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let mut file = match File::open(self.resolve_path(item)).await {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!(path = %item, error = %e, "Cannot open file");
                return write_status(stream, StatusCode::NotFound, item).await;
            }
        };

        let content_type = self.content_types().resolve(ext).await;
        write_header(stream, StatusCode::Ok, Some(&content_type)).await?;

        let sent = tokio::io::copy(&mut file, stream).await?;
        stream.flush().await?;

        tracing::debug!(path = %item, bytes = sent, content_type = %content_type, "File sent");
        Ok(())
    }
}
