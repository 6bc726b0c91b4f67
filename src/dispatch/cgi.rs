//! CGI program execution
//!
//! The child's standard output and standard error are piped and copied onto
//! the connection as they arrive, so the child's output is the remainder of
//! the response. Finished children are reaped by a detached task.

use std::io::ErrorKind;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Stdio;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};

use crate::dispatch::Dispatcher;
use crate::http::path::split_query;
use crate::http::request::Method;
use crate::http::response::StatusCode;
use crate::http::writer::{CONTENT_TYPE_HEADER, write_header, write_status};

/// Default buffer size for streaming child output
const BUFFER_SIZE: usize = 8192;

impl Dispatcher {
    /// Runs the CGI program named by `item` and streams its output.
    ///
    /// `item` may end in `?query`, which is passed on as `QUERY_STRING`.
    /// A missing program is answered with 404, one that is not executable
    /// with 403 and one that fails to start with 500. Otherwise a 200 header
    /// without `Content-type` is written and the child supplies the rest.
    pub async fn exec_cgi<W>(&self, item: &str, method: &Method, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let (program, query) = split_query(item);
        let program_path = self.resolve_path(program);

        if let Err(status) = check_executable(&program_path).await {
            return write_status(stream, status, program).await;
        }

        let spawned = self
            .cgi_command(&program_path, method, query.unwrap_or(""))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(program = %program, error = %e, "Failed to start CGI program");
                return write_status(stream, StatusCode::InternalServerError, program).await;
            }
        };

        tracing::info!(
            program = %program,
            method = %method,
            query = query.unwrap_or(""),
            "CGI program started"
        );

        write_header(stream, StatusCode::Ok, None).await?;
        stream.flush().await?;

        let result = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => pipe_output(stdout, stderr, stream).await,
            _ => Err(anyhow::anyhow!("CGI child has no output pipes")),
        };

        if result.is_err() {
            // Client is gone; a child blocked on output would never exit.
            if let Err(e) = child.start_kill() {
                tracing::trace!(program = %program, error = %e, "CGI child already gone");
            }
        }
        reap(child, program.to_string());

        let sent = result?;
        tracing::debug!(program = %program, bytes = sent, "CGI output relayed");
        Ok(())
    }

    /// Runs the CGI program for a HEAD request and returns the content type
    /// declared on the first line of its output.
    ///
    /// Returns `None` if the program cannot be started or its first line is
    /// not a `Content-type:` header. The child is killed once the line is read.
    pub async fn read_cgi_content_type(&self, program: &str, query: Option<&str>) -> Option<String> {
        let program_path = self.resolve_path(program);

        let spawned = self
            .cgi_command(&program_path, &Method::HEAD, query.unwrap_or(""))
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(program = %program, error = %e, "Failed to start CGI program for HEAD");
                return None;
            }
        };

        let mut first_line = String::new();
        let read = match child.stdout.take() {
            Some(stdout) => BufReader::new(stdout).read_line(&mut first_line).await,
            None => Ok(0),
        };

        // Output past the first line is not wanted.
        if let Err(e) = child.start_kill() {
            tracing::trace!(program = %program, error = %e, "CGI child already gone");
        }
        reap(child, program.to_string());

        match read {
            Ok(n) if n > 0 => parse_content_type(&first_line),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(program = %program, error = %e, "Failed to read CGI output");
                None
            }
        }
    }

    fn cgi_command(&self, program_path: &Path, method: &Method, query: &str) -> Command {
        let mut command = Command::new(program_path);
        command
            .env("REQUEST_METHOD", method.as_str())
            .env("QUERY_STRING", query)
            .current_dir(self.root())
            .stdin(Stdio::null());
        command
    }
}

/// Checks that `path` names an executable regular file.
///
/// A missing file maps to 404; anything else that prevents execution maps
/// to 403.
pub async fn check_executable(path: &Path) -> Result<(), StatusCode> {
    let meta = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => StatusCode::NotFound,
        _ => StatusCode::Forbidden,
    })?;

    if !meta.is_file() || meta.permissions().mode() & 0o111 == 0 {
        return Err(StatusCode::Forbidden);
    }
    Ok(())
}

/// Extracts `<type>` from a `Content-type: <type>` line.
///
/// The header name is matched case-insensitively.
pub fn parse_content_type(line: &str) -> Option<String> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?;
    if !name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER) {
        return None;
    }
    tokens.next().map(str::to_string)
}

/// Copies child stdout and stderr onto `stream` until both reach EOF.
async fn pipe_output<W>(
    mut stdout: ChildStdout,
    mut stderr: ChildStderr,
    stream: &mut W,
) -> anyhow::Result<usize>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut out_buf = BytesMut::with_capacity(BUFFER_SIZE);
    let mut err_buf = BytesMut::with_capacity(BUFFER_SIZE);
    let mut out_open = true;
    let mut err_open = true;
    let mut total = 0;

    while out_open || err_open {
        tokio::select! {
            n = stdout.read_buf(&mut out_buf), if out_open => {
                if n? == 0 {
                    out_open = false;
                } else {
                    stream.write_all(&out_buf).await?;
                    total += out_buf.len();
                    out_buf.clear();
                }
            }
            n = stderr.read_buf(&mut err_buf), if err_open => {
                if n? == 0 {
                    err_open = false;
                } else {
                    stream.write_all(&err_buf).await?;
                    total += err_buf.len();
                    err_buf.clear();
                }
            }
        }
    }

    stream.flush().await?;
    Ok(total)
}

/// Waits for `child` in the background so it never lingers as a zombie.
fn reap(mut child: Child, program: String) {
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => tracing::debug!(program = %program, status = %status, "CGI child exited"),
            Err(e) => tracing::warn!(program = %program, error = %e, "Failed to reap CGI child"),
        }
    });
}
