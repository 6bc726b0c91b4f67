use std::ffi::OsString;
use std::io::ErrorKind;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::dispatch::Dispatcher;
use crate::http::path::{self, extension};
use crate::http::request::Method;
use crate::http::response::StatusCode;
use crate::http::writer::{write_header, write_status};

const INDEX_HTML: &str = "index.html";
const INDEX_CGI: &str = "index.cgi";

impl Dispatcher {
    /// Serves a directory.
    ///
    /// An unreadable directory is answered with 403 (permission) or 404. An
    /// `index.html`, or failing that an `index.cgi`, is served in place of
    /// the listing; both names match case-insensitively.
    pub async fn list_directory<W>(&self, item: &str, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let names = match self.read_entries(item).await {
            Ok(names) => names,
            Err(status) => return write_status(stream, status, item).await,
        };

        if let Some(index) = find_index(&names, INDEX_HTML) {
            // Typed by the canonical name so `INDEX.HTML` still goes out as html.
            return self
                .send_file_as(&join(item, &index), extension(INDEX_HTML), stream)
                .await;
        }
        if let Some(index) = find_index(&names, INDEX_CGI) {
            return self.exec_cgi(&join(item, &index), &Method::GET, stream).await;
        }

        let page = self.render_listing(item, names).await;

        write_header(stream, StatusCode::Ok, Some("text/html")).await?;
        stream.write_all(page.as_bytes()).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Reads the entry names of `item`, `.` and `..` excluded.
    async fn read_entries(&self, item: &str) -> Result<Vec<OsString>, StatusCode> {
        let mut dir = tokio::fs::read_dir(self.resolve_path(item))
            .await
            .map_err(|e| {
                tracing::debug!(path = %item, error = %e, "Cannot open directory");
                match e.kind() {
                    ErrorKind::PermissionDenied => StatusCode::Forbidden,
                    _ => StatusCode::NotFound,
                }
            })?;

        let mut names = Vec::new();
        loop {
            match dir.next_entry().await {
                Ok(Some(entry)) => names.push(entry.file_name()),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(path = %item, error = %e, "Directory listing not permitted");
                    return Err(StatusCode::Forbidden);
                }
            }
        }
        Ok(names)
    }

    /// Renders the HTML table for `item`, entries sorted by name.
    async fn render_listing(&self, item: &str, mut names: Vec<OsString>) -> String {
        names.sort();

        let is_top = item == path::ROOT;
        let title = if is_top { "" } else { item };

        let mut page = String::new();
        page.push_str("<html>\r\n<head>\r\n");
        page.push_str(&format!("<title>Index of /{}</title>\r\n", escape_html(title)));
        page.push_str("</head>\r\n\r\n<body>\r\n");
        page.push_str(&format!("<h1>Index of /{}</h1>\r\n", escape_html(title)));
        page.push_str("<table>\r\n");
        page.push_str(
            "<tr class=\"header\"><th>Name</th><th>Last modified</th><th>Size</th></tr>\r\n",
        );

        if !is_top {
            let parent = item.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("");
            page.push_str(&format!(
                "<tr><td valign=top><a href=\"/{}\">Parent Directory</a></td><td></td><td></td></tr>\r\n",
                escape_html(parent)
            ));
        }

        for name in &names {
            let name = name.to_string_lossy();
            let entry_path = join(item, &name);
            let (modified, size) = match tokio::fs::symlink_metadata(self.resolve_path(&entry_path)).await {
                Ok(meta) => {
                    let modified = meta
                        .modified()
                        .map(httpdate::fmt_http_date)
                        .unwrap_or_default();
                    let size = if meta.is_dir() {
                        "-".to_string()
                    } else {
                        meta.len().to_string()
                    };
                    (modified, size)
                }
                Err(_) => (String::new(), String::new()),
            };

            page.push_str(&format!(
                "<tr><td valign=top><a href=\"/{}\">{}</a></td><td>{}</td><td>{}</td></tr>\r\n",
                escape_html(&entry_path),
                escape_html(&name),
                modified,
                size
            ));
        }

        page.push_str("</table>\r\n</body>\r\n</html>\r\n");
        page
    }
}

/// Joins an entry name onto a sanitized directory path.
fn join(dir: &str, name: &str) -> String {
    if dir == path::ROOT {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Finds `wanted` among `names` ignoring ASCII case, keeping the on-disk spelling.
fn find_index(names: &[OsString], wanted: &str) -> Option<String> {
    names
        .iter()
        .filter_map(|name| name.to_str())
        .find(|name| name.eq_ignore_ascii_case(wanted))
        .map(str::to_string)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_lookup_ignores_case() {
        let names = vec![OsString::from("a.txt"), OsString::from("Index.HTML")];
        assert_eq!(find_index(&names, INDEX_HTML), Some("Index.HTML".to_string()));
        assert_eq!(find_index(&names, INDEX_CGI), None);
    }

    #[test]
    fn join_at_root() {
        assert_eq!(join(".", "a"), "a");
        assert_eq!(join("docs/img", "a.png"), "docs/img/a.png");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<a&b>"), "&lt;a&amp;b&gt;");
    }
}
