//! Static File Server
//!
//! Serves the built front-end from a single directory. Uses tokio directly
//! (no HTTP framework): one task per connection, one request per connection.

use crate::error::Result;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info};

const READ_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_REQUEST_BYTES: usize = 64 * 1024;
const ACCEPT_RETRY_BASE: Duration = Duration::from_millis(50);
const ACCEPT_RETRY_MAX: Duration = Duration::from_secs(1);

/// Pause before the next `accept` after `failures` consecutive errors.
pub fn accept_backoff(failures: u32) -> Duration {
    let factor = 1u32 << failures.saturating_sub(1).min(5);
    (ACCEPT_RETRY_BASE * factor).min(ACCEPT_RETRY_MAX)
}

/// Content type for a file, keyed on its extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Map a request target onto a file under `dist_dir`.
///
/// `/` is `index.html` and the query string is dropped. Targets that try to
/// leave the directory resolve to nothing.
pub fn resolve_asset_path(dist_dir: &Path, target: &str) -> Option<PathBuf> {
    let path = target.split('?').next().unwrap_or("");
    if path == "/" {
        return Some(dist_dir.join("index.html"));
    }

    let mut resolved = dist_dir.to_path_buf();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s => resolved.push(s),
        }
    }
    Some(resolved)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticResponse {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl StaticResponse {
    pub fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type),
            body,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            content_type: None,
            body: b"Not found".to_vec(),
        }
    }

    pub fn bad_request() -> Self {
        Self {
            status: 400,
            content_type: None,
            body: b"Bad request".to_vec(),
        }
    }

    fn status_text(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            408 => "Request Timeout",
            _ => "Unknown",
        }
    }

    /// Serialize as an HTTP/1.1 response.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, self.status_text());
        if let Some(content_type) = self.content_type {
            head.push_str(&format!("Content-Type: {}\r\n", content_type));
        }
        head.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n",
            self.body.len()
        ));

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

/// Answer one raw request. Every read failure becomes a 404.
pub async fn respond(dist_dir: &Path, request: &str) -> StaticResponse {
    let request_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() < 2 {
        return StaticResponse::bad_request();
    }

    let (method, target) = (parts[0], parts[1]);
    let Some(path) = resolve_asset_path(dist_dir, target) else {
        debug!("Rejected path {} {}", method, target);
        return StaticResponse::not_found();
    };

    match tokio::fs::read(&path).await {
        Ok(content) => {
            debug!("{} {} -> {}", method, target, path.display());
            StaticResponse::ok(mime_type_for(&path), content)
        }
        Err(e) => {
            debug!("{} {} not served: {}", method, target, e);
            StaticResponse::not_found()
        }
    }
}

/// Static asset server bound to a listener
pub struct StaticServer {
    listener: TcpListener,
    dist_dir: Arc<PathBuf>,
}

impl StaticServer {
    pub async fn bind(addr: &str, dist_dir: impl Into<PathBuf>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            dist_dir: Arc::new(dist_dir.into()),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the task is dropped.
    pub async fn run(self) -> Result<()> {
        let port = self.local_addr()?.port();
        info!("Benefits Calculator running at http://localhost:{}", port);
        info!("Serving assets from {}", self.dist_dir.display());

        let mut failures = 0u32;
        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(conn) => {
                    failures = 0;
                    conn
                }
                Err(e) => {
                    // EMFILE and friends fail again immediately
                    failures = failures.saturating_add(1);
                    let delay = accept_backoff(failures);
                    error!("Failed to accept connection: {} (retrying in {:?})", e, delay);
                    tokio::time::sleep(delay).await;
                    continue;
                }
            };
            debug!("New connection from: {}", addr);

            let dist_dir = Arc::clone(&self.dist_dir);
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, &dist_dir).await {
                    error!("Error handling connection from {}: {}", addr, e);
                }
            });
        }
    }
}

async fn handle_connection(mut stream: TcpStream, dist_dir: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    let mut temp_buf = [0; 8192];

    let read_result = timeout(READ_TIMEOUT, async {
        loop {
            let n = stream.read(&mut temp_buf).await?;
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&temp_buf[..n]);
            if buffer.windows(4).any(|w| w == b"\r\n\r\n") || buffer.len() >= MAX_REQUEST_BYTES {
                break;
            }
        }
        Ok::<_, std::io::Error>(())
    })
    .await;

    let response = match read_result {
        Ok(Ok(())) => {
            let request = String::from_utf8_lossy(&buffer);
            respond(dist_dir, &request).await
        }
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => StaticResponse {
            status: 408,
            content_type: None,
            body: b"Request timeout".to_vec(),
        },
    };

    stream.write_all(&response.to_bytes()).await?;
    stream.flush().await?;
    stream.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_table() {
        let cases = [
            ("index.html", "text/html"),
            ("assets/app.js", "application/javascript"),
            ("style.css", "text/css"),
            ("data.json", "application/json"),
            ("logo.png", "image/png"),
            ("photo.jpg", "image/jpeg"),
            ("icon.svg", "image/svg+xml"),
            ("photo.jpeg", "application/octet-stream"),
            ("favicon.ico", "application/octet-stream"),
            ("README", "application/octet-stream"),
        ];
        for (file, expected) in cases {
            assert_eq!(mime_type_for(Path::new(file)), expected, "{}", file);
        }
    }

    #[test]
    fn test_resolve_asset_path() {
        let dist = Path::new("/srv/dist");
        assert_eq!(resolve_asset_path(dist, "/"), Some(dist.join("index.html")));
        assert_eq!(resolve_asset_path(dist, "/assets/app.js"), Some(dist.join("assets/app.js")));
        assert_eq!(resolve_asset_path(dist, "/app.js?v=2"), Some(dist.join("app.js")));
        assert_eq!(resolve_asset_path(dist, "/?x=1"), Some(dist.join("index.html")));
        assert_eq!(resolve_asset_path(dist, "/../etc/passwd"), None);
        assert_eq!(resolve_asset_path(dist, "/assets/../../secret"), None);
    }

    #[test]
    fn test_response_bytes() {
        let bytes = StaticResponse::not_found().to_bytes();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(!text.contains("Content-Type"));
        assert!(text.ends_with("\r\n\r\nNot found"));

        let ok = String::from_utf8(StaticResponse::ok("text/css", b"a{}".to_vec()).to_bytes()).unwrap();
        assert!(ok.contains("Content-Type: text/css\r\n"));
        assert!(ok.contains("Content-Length: 3\r\n"));
    }

    #[test]
    fn test_accept_backoff() {
        assert_eq!(accept_backoff(1), Duration::from_millis(50));
        assert_eq!(accept_backoff(2), Duration::from_millis(100));
        assert_eq!(accept_backoff(4), Duration::from_millis(400));
        assert_eq!(accept_backoff(6), Duration::from_secs(1));
        assert_eq!(accept_backoff(u32::MAX), Duration::from_secs(1));
        assert!(accept_backoff(0) > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_respond_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>calc</h1>").unwrap();

        let index = respond(dir.path(), "GET / HTTP/1.1\r\nHost: x\r\n\r\n").await;
        assert_eq!(index.status, 200);
        assert_eq!(index.content_type, Some("text/html"));
        assert_eq!(index.body, b"<h1>calc</h1>".to_vec());

        let missing = respond(dir.path(), "GET /nope.js HTTP/1.1\r\n\r\n").await;
        assert_eq!(missing, StaticResponse::not_found());

        // A directory is not a file
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        assert_eq!(respond(dir.path(), "GET /assets HTTP/1.1\r\n\r\n").await.status, 404);

        assert_eq!(respond(dir.path(), "").await.status, 400);
    }
}
