use std::io::ErrorKind;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::dispatch::Dispatcher;
use crate::http::path::{extension, split_query};
use crate::http::response::StatusCode;
use crate::http::writer::write_header;

impl Dispatcher {
    /// Answers a HEAD request with headers only.
    ///
    /// Missing resources get a 404 header. CGI programs are run to learn
    /// the content type they declare; a program that declares none gets a
    /// 500 header. Directories report `text/html`, files the type mapped to
    /// their extension.
    pub async fn head<W>(&self, item: &str, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        // Only CGI paths carry a query string; anything else is taken literally.
        let is_cgi = self.is_cgi(item);
        let (resource, query) = if is_cgi {
            split_query(item)
        } else {
            (item, None)
        };

        let meta = match tokio::fs::metadata(self.resolve_path(resource)).await {
            Ok(meta) => Some(meta),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return self.head_only(stream, StatusCode::NotFound, "text/plain").await;
            }
            Err(_) => None,
        };

        let content_type = if is_cgi {
            match self.read_cgi_content_type(resource, query).await {
                Some(content_type) => content_type,
                None => {
                    tracing::warn!(path = %resource, "CGI program did not declare a content type");
                    return self
                        .head_only(stream, StatusCode::InternalServerError, "text/plain")
                        .await;
                }
            }
        } else if meta.is_some_and(|m| m.is_dir()) {
            "text/html".to_string()
        } else {
            self.content_types().resolve(extension(resource)).await
        };

        self.head_only(stream, StatusCode::Ok, &content_type).await
    }

    async fn head_only<W>(&self, stream: &mut W, status: StatusCode, content_type: &str) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        write_header(stream, status, Some(content_type)).await?;
        stream.flush().await?;
        Ok(())
    }
}
