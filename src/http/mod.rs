//! HTTP protocol implementation.
//!
//! This module implements the wire side of a one-request-per-connection
//! HTTP/1.1 server.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: Reads the request line, discards headers and hands the request to the dispatcher
//! - **`parser`**: Parses the request line
//! - **`request`**: HTTP request and method representation
//! - **`path`**: Sanitizes requested paths and splits off query strings
//! - **`response`**: Status codes, reason phrases and message templates
//! - **`writer`**: Serializes the status line and standard headers
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection Lifecycle
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Request line, then headers up to the blank line
//!        └──────┬──────┘
//!               │ Request line parsed (else 400)
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← Sanitize, classify, run one strategy
//!        └──────┬───────────┘
//!               │ Response written
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tinyhttpd::dispatch::Dispatcher;
//! use tinyhttpd::http::connection::Connection;
//! use tinyhttpd::http::mime::ContentTypes;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let dispatcher = Arc::new(Dispatcher::new("/srv/www", Arc::new(ContentTypes::new("text/plain"))));
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let dispatcher = dispatcher.clone();
//!         tokio::spawn(async move {
//!             if let Err(e) = Connection::new(socket, dispatcher).run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod path;
pub mod request;
pub mod response;
pub mod writer;
