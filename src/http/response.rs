/// HTTP status codes the server responds with.
///
/// - `Ok` (200): Request successful
/// - `BadRequest` (400): Request line could not be parsed
/// - `Forbidden` (403): Resource exists but may not be accessed
/// - `NotFound` (404): Resource not found
/// - `InternalServerError` (500): Server or CGI failure
/// - `NotImplemented` (501): Method other than GET or HEAD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
}

/// Placeholder replaced by the offending resource path in message templates.
const PATH_PLACEHOLDER: &str = "{path}";

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use tinyhttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use tinyhttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }

    /// Plain-text body template, if this status carries one.
    pub fn message_template(&self) -> Option<&'static str> {
        match self {
            StatusCode::Ok => None,
            StatusCode::BadRequest => Some("\r\nI cannot understand your request\r\n"),
            StatusCode::Forbidden => {
                Some("You are not allowed to access the item you requested: {path}\r\n")
            }
            StatusCode::NotFound => Some("The item you requested: {path}\r\nis not found\r\n"),
            StatusCode::InternalServerError => Some("General server error\r\n"),
            StatusCode::NotImplemented => Some("That command is not yet implemented\r\n"),
        }
    }

    /// Renders the body for this status with `item` substituted in.
    ///
    /// Returns `None` when the status has no template.
    pub fn message(&self, item: &str) -> Option<String> {
        self.message_template()
            .map(|template| template.replace(PATH_PLACEHOLDER, item))
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
