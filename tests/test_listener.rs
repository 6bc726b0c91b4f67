//! Tests against a real listening socket.

mod common;

use std::time::Duration;

use tinyhttpd::server::listener;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn start(root: &std::path::Path) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(listener::serve(listener, common::dispatcher(root)));
    addr
}

async fn fetch(addr: std::net::SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_serves_file_over_tcp() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("hello.txt"), b"hello over tcp").unwrap();
    let addr = start(root.path()).await;

    let response = fetch(addr, b"GET /hello.txt HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.ends_with("\r\n\r\nhello over tcp"));
}

#[tokio::test]
async fn test_connections_are_independent() {
    let root = tempfile::tempdir().unwrap();
    common::write_script(
        &root.path().join("slow.cgi"),
        "printf 'Content-type: text/plain\\r\\n\\r\\n'\nsleep 5\necho done\n",
    );
    std::fs::write(root.path().join("fast.txt"), b"fast").unwrap();
    let addr = start(root.path()).await;

    // Keep the slow request in flight while the fast one is served.
    let mut slow = TcpStream::connect(addr).await.unwrap();
    slow.write_all(b"GET /slow.cgi HTTP/1.1\r\n\r\n").await.unwrap();

    let fast = tokio::time::timeout(
        Duration::from_secs(3),
        fetch(addr, b"GET /fast.txt HTTP/1.1\r\n\r\n"),
    )
    .await
    .expect("fast request blocked behind slow CGI");

    assert!(fast.ends_with("fast"));
    drop(slow);
}

#[tokio::test]
async fn test_bad_request_over_tcp() {
    let root = tempfile::tempdir().unwrap();
    let addr = start(root.path()).await;

    let response = fetch(addr, b"NONSENSE\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
}
