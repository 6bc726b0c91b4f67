use crate::http::request::{Method, Request};

/// Longest request or header line kept, terminator included.
pub const MAX_LINE_LEN: usize = 4096;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer than two whitespace-separated tokens on the request line
    InvalidRequest,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidRequest => f.write_str("malformed request line"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses `<METHOD> <PATH> [...]` into a [`Request`].
///
/// Only the first two tokens are used; the protocol version and anything
/// after it are ignored.
pub fn parse_request_line(line: &str) -> Result<Request, ParseError> {
    let mut parts = line.split_whitespace();

    let method = parts.next().ok_or(ParseError::InvalidRequest)?;
    let path = parts.next().ok_or(ParseError::InvalidRequest)?;

    Ok(Request::new(Method::parse(method), path))
}

/// Returns true for the empty line that ends the header block.
pub fn is_header_terminator(line: &[u8]) -> bool {
    line == b"\r\n" || line == b"\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = parse_request_line("GET /index.html HTTP/1.1\r\n").unwrap();

        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "/index.html");
    }

    #[test]
    fn version_is_optional() {
        let req = parse_request_line("HEAD /\r\n").unwrap();
        assert_eq!(req.method, Method::HEAD);
        assert_eq!(req.path, "/");
    }

    #[test]
    fn single_token_is_rejected() {
        assert_eq!(parse_request_line("GET\r\n"), Err(ParseError::InvalidRequest));
        assert_eq!(parse_request_line("\r\n"), Err(ParseError::InvalidRequest));
    }
}
