use std::time::{Duration, SystemTime};

use tinyhttpd::http::response::StatusCode;
use tinyhttpd::http::writer::{SERVER_NAME, SERVER_VERSION, serialize_header, write_status};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
    assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
    assert_eq!(StatusCode::NotImplemented.reason_phrase(), "Not Implemented");
}

#[test]
fn test_ok_has_no_message() {
    assert_eq!(StatusCode::Ok.message("anything"), None);
}

#[test]
fn test_message_substitutes_path() {
    let msg = StatusCode::NotFound.message("docs/missing.txt").unwrap();
    assert_eq!(msg, "The item you requested: docs/missing.txt\r\nis not found\r\n");

    let msg = StatusCode::Forbidden.message("secret").unwrap();
    assert!(msg.contains("secret"));
}

#[test]
fn test_messages_without_placeholder_ignore_path() {
    assert_eq!(
        StatusCode::NotImplemented.message("x").unwrap(),
        "That command is not yet implemented\r\n"
    );
    assert_eq!(
        StatusCode::BadRequest.message("").unwrap(),
        "\r\nI cannot understand your request\r\n"
    );
}

#[test]
fn test_header_with_content_type() {
    let now = SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_777);
    let header = String::from_utf8(serialize_header(StatusCode::Ok, Some("text/html"), now)).unwrap();

    let expected = format!(
        "HTTP/1.1 200 OK\r\nDate: Sun, 06 Nov 1994 08:49:37 GMT\r\nServer: {}/{}\r\nContent-type: text/html\r\n\r\n",
        SERVER_NAME, SERVER_VERSION
    );
    assert_eq!(header, expected);
}

#[test]
fn test_header_without_content_type_is_left_open() {
    let header = String::from_utf8(serialize_header(StatusCode::Ok, None, SystemTime::now())).unwrap();

    assert!(header.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(header.contains("\r\nDate: "));
    assert!(header.ends_with(&format!("Server: {}/{}\r\n", SERVER_NAME, SERVER_VERSION)));
    assert!(!header.contains("Content-type"));
    assert!(!header.contains("\r\n\r\n"));
}

#[test]
fn test_date_header_is_http_date() {
    let header = String::from_utf8(serialize_header(StatusCode::NotFound, Some("text/plain"), SystemTime::now())).unwrap();
    let date = header
        .lines()
        .find_map(|line| line.strip_prefix("Date: "))
        .unwrap();

    assert!(httpdate::parse_http_date(date).is_ok());
    assert!(date.ends_with("GMT"));
}

#[tokio::test]
async fn test_write_status_body() {
    let mut out = Vec::new();
    write_status(&mut out, StatusCode::NotFound, "nosuchfile.txt").await.unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(out.contains("Content-type: text/plain\r\n\r\n"));
    assert!(out.ends_with("The item you requested: nosuchfile.txt\r\nis not found\r\n"));
}

#[test]
fn test_status_display() {
    assert_eq!(StatusCode::NotImplemented.to_string(), "501 Not Implemented");
}
