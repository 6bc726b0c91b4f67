//! Request path normalisation.

/// Marker for the server root once every segment has been stripped.
pub const ROOT: &str = ".";

/// Removes every `..` segment from a requested resource path.
///
/// The path is split on `/`, empty and `..` segments are dropped and the
/// survivors are joined back together. Nothing is resolved on disk, so
/// symlinks are left alone. An empty result maps to [`ROOT`].
///
/// # Example
///
/// ```
/// # use tinyhttpd::http::path::sanitize;
/// assert_eq!(sanitize("/docs/../../etc/passwd"), "docs/etc/passwd");
/// assert_eq!(sanitize("/"), ".");
/// ```
pub fn sanitize(path: &str) -> String {
    let cleaned = path
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "..")
        .collect::<Vec<_>>()
        .join("/");

    if cleaned.is_empty() {
        ROOT.to_string()
    } else {
        cleaned
    }
}

/// Splits `path` at the last `?` into the resource and its query string.
pub fn split_query(path: &str) -> (&str, Option<&str>) {
    match path.rsplit_once('?') {
        Some((resource, query)) => (resource, Some(query)),
        None => (path, None),
    }
}

/// Returns the extension of the last path segment, or `""` if it has none.
pub fn extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_traversal() {
        assert_eq!(sanitize("/a/../b"), "a/b");
        assert_eq!(sanitize("../../.."), ".");
    }

    #[test]
    fn keeps_query_attached() {
        assert_eq!(sanitize("/run.cgi?x=../y"), "run.cgi?x=../y");
        assert_eq!(split_query("run.cgi?x=../y"), ("run.cgi", Some("x=../y")));
    }

    #[test]
    fn extension_of_last_segment_only() {
        assert_eq!(extension("dir.d/file"), "");
        assert_eq!(extension("dir/file.tar.gz"), "gz");
        assert_eq!(extension("."), "");
    }
}
