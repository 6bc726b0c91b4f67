//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;

use tinyhttpd::config::Config;
use tinyhttpd::dispatch::Dispatcher;
use tinyhttpd::http::connection::Connection;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub fn dispatcher(root: &Path) -> Arc<Dispatcher> {
    let content_types = Config::default().content_type_table().unwrap();
    Arc::new(Dispatcher::new(root, Arc::new(content_types)))
}

/// Writes an executable shell script at `path`.
pub fn write_script(path: &Path, body: &str) {
    std::fs::write(path, format!("#!/bin/sh\n{}", body)).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Sends `request` over an in-memory connection and returns everything written back.
pub async fn roundtrip(dispatcher: Arc<Dispatcher>, request: &[u8]) -> Vec<u8> {
    let (mut client, server) = tokio::io::duplex(64 * 1024);
    let handle = tokio::spawn(Connection::new(server, dispatcher).run());

    client.write_all(request).await.unwrap();
    client.shutdown().await.unwrap();
    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();

    handle.await.unwrap().unwrap();
    response
}

/// Splits a response at the first blank line into (header block, body).
pub fn split_response(response: &[u8]) -> (String, Vec<u8>) {
    let pos = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    (
        String::from_utf8_lossy(&response[..pos + 4]).into_owned(),
        response[pos + 4..].to_vec(),
    )
}
