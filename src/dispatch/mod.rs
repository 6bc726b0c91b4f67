//! Request dispatch
//!
//! This module classifies a parsed request and hands it to exactly one
//! response strategy: file transfer, directory listing, CGI execution,
//! header-only answer or status page.

pub mod cgi;
pub mod head;
pub mod listing;
pub mod static_file;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWrite;

use crate::http::mime::ContentTypes;
use crate::http::path::{self, extension, sanitize};
use crate::http::request::{Method, Request};
use crate::http::response::StatusCode;
use crate::http::writer::write_status;

/// Extension that marks a resource as a CGI program unless configured otherwise.
pub const DEFAULT_CGI_EXTENSION: &str = "cgi";

/// Response strategy selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    /// Directory listing (or its index file)
    Listing,
    /// HEAD request; headers only
    Head,
    /// Execute a CGI program
    CgiExec,
    /// Stream a regular file
    FileTransfer,
    /// Plain-text error page
    StatusError,
    /// Method other than GET or HEAD
    Unimplemented,
}

/// Serves requests out of a single root directory.
///
/// Holds everything the strategies need: the root that sanitized paths are
/// joined onto, the shared content-type table and the CGI extension.
#[derive(Debug)]
pub struct Dispatcher {
    root: PathBuf,
    content_types: Arc<ContentTypes>,
    cgi_extension: String,
}

impl Dispatcher {
    pub fn new(root: impl Into<PathBuf>, content_types: Arc<ContentTypes>) -> Self {
        Self {
            root: root.into(),
            content_types,
            cgi_extension: DEFAULT_CGI_EXTENSION.to_string(),
        }
    }

    /// Replaces the extension that selects CGI execution.
    pub fn with_cgi_extension(mut self, extension: impl Into<String>) -> Self {
        self.cgi_extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    /// Maps a sanitized path onto the filesystem.
    pub fn resolve_path(&self, item: &str) -> PathBuf {
        if item == path::ROOT {
            self.root.clone()
        } else {
            self.root.join(item)
        }
    }

    /// True if `item`, ignoring any query string, carries the CGI extension.
    pub fn is_cgi(&self, item: &str) -> bool {
        let (resource, _) = path::split_query(item);
        extension(resource) == self.cgi_extension
    }

    /// Decides which strategy handles `item` and the status to answer with.
    ///
    /// Rules are applied in order, first match wins:
    /// 1. HEAD always gets headers only, before anything touches the disk.
    /// 2. Any other method but GET is unimplemented.
    /// 3. CGI paths are picked by extension; they may carry a `?query`
    ///    and are validated by the CGI strategy itself.
    /// 4. Missing resources are 404.
    /// 5. Directories are listed, everything else is transferred.
    pub async fn classify(&self, method: &Method, item: &str) -> (RequestType, StatusCode) {
        match method {
            Method::HEAD => return (RequestType::Head, StatusCode::Ok),
            Method::GET => {}
            Method::Other(_) => return (RequestType::Unimplemented, StatusCode::NotImplemented),
        }

        if self.is_cgi(item) {
            return (RequestType::CgiExec, StatusCode::Ok);
        }

        match tokio::fs::metadata(self.resolve_path(item)).await {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                (RequestType::StatusError, StatusCode::NotFound)
            }
            Ok(meta) if meta.is_dir() => (RequestType::Listing, StatusCode::Ok),
            _ => (RequestType::FileTransfer, StatusCode::Ok),
        }
    }

    /// Sanitizes the request path, classifies it and writes the response.
    pub async fn dispatch<W>(&self, request: &Request, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let item = sanitize(&request.path);
        let (kind, status) = self.classify(&request.method, &item).await;

        tracing::debug!(
            method = %request.method,
            path = %item,
            kind = ?kind,
            status = status.as_u16(),
            "Request classified"
        );

        match kind {
            RequestType::Listing => self.list_directory(&item, stream).await,
            RequestType::Head => self.head(&item, stream).await,
            RequestType::CgiExec => self.exec_cgi(&item, &request.method, stream).await,
            RequestType::FileTransfer => self.send_file(&item, stream).await,
            RequestType::StatusError | RequestType::Unimplemented => {
                write_status(stream, status, &item).await
            }
        }
    }
}
