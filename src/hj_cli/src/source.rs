use std::{
    fmt::Display,
    io::{self, Read},
    path::PathBuf,
    time::Duration,
};

use reqwest::{blocking::Client, StatusCode};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("failed to read from stdin")]
    Stdin(#[source] io::Error),
    #[error("failed to fetch URL {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP error: {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("failed to read response from {url}")]
    ReadResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read file {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where the HTML text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Url(String),
    File(PathBuf),
}

impl Source {
    /// Classifies a command-line token; an empty token has no source.
    pub fn parse(token: &str) -> Option<Source> {
        if token.is_empty() {
            None
        } else if token == "-" {
            Some(Source::Stdin)
        } else if token.starts_with("http://") || token.starts_with("https://") {
            Some(Source::Url(token.to_string()))
        } else {
            Some(Source::File(PathBuf::from(token)))
        }
    }

    /// Reads the whole source. `timeout` bounds URL fetches only.
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    pub fn read(&self, timeout: Duration) -> Result<String, AcquireError> {
        let bytes = match self {
            Source::Stdin => {
                let mut buf = Vec::new();
                io::stdin()
                    .lock()
                    .read_to_end(&mut buf)
                    .map_err(AcquireError::Stdin)?;
                buf
            }
            Source::Url(url) => fetch(url, timeout)?,
            Source::File(path) => std::fs::read(path).map_err(|source| AcquireError::ReadFile {
                path: path.clone(),
                source,
            })?,
        };
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Stdin => f.write_str("stdin"),
            Source::Url(url) => f.write_str(url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn fetch(url: &str, timeout: Duration) -> Result<Vec<u8>, AcquireError> {
    let fetch_err = |source| AcquireError::Fetch {
        url: url.to_string(),
        source,
    };
    let client = Client::builder().timeout(timeout).build().map_err(fetch_err)?;
    let response = client.get(url).send().map_err(fetch_err)?;

    let status = response.status();
    debug!(url, %status, "fetched");
    if status != StatusCode::OK {
        return Err(AcquireError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .map_err(|source| AcquireError::ReadResponse {
            url: url.to_string(),
            source,
        })?;
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use std::{
        io::{BufRead, BufReader, Write},
        net::TcpListener,
        thread,
    };

    use pretty_assertions::assert_eq;

    use super::*;

    /// Serves one canned HTTP response on a loopback port.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            write!(
                stream,
                "HTTP/1.1 {status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
        });
        format!("http://{addr}/page.html")
    }

    #[test]
    fn test_parse_token() {
        assert_eq!(Source::parse(""), None);
        assert_eq!(Source::parse("-"), Some(Source::Stdin));
        assert_eq!(
            Source::parse("https://example.com"),
            Some(Source::Url("https://example.com".to_string()))
        );
        assert_eq!(
            Source::parse("http://example.com/a"),
            Some(Source::Url("http://example.com/a".to_string()))
        );
        assert_eq!(
            Source::parse("ftp://example.com"),
            Some(Source::File(PathBuf::from("ftp://example.com")))
        );
        assert_eq!(
            Source::parse("index.html"),
            Some(Source::File(PathBuf::from("index.html")))
        );
        assert_eq!(Source::parse("--"), Some(Source::File(PathBuf::from("--"))));
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, b"<p>caf\xe9</p>").unwrap();
        let html = Source::File(path).read(Duration::from_secs(1)).unwrap();
        assert_eq!(html, "<p>caf\u{fffd}</p>");
    }

    #[test]
    fn test_missing_file() {
        let err = Source::File(PathBuf::from("does/not/exist.html"))
            .read(Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, AcquireError::ReadFile { .. }));
        assert_eq!(err.to_string(), "failed to read file does/not/exist.html");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_fetch_ok() {
        let url = serve_once("200 OK", "<p>remote</p>");
        let html = Source::Url(url).read(Duration::from_secs(5)).unwrap();
        assert_eq!(html, "<p>remote</p>");
    }

    #[test]
    fn test_fetch_non_200() {
        let url = serve_once("404 Not Found", "missing");
        let err = Source::Url(url).read(Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, AcquireError::HttpStatus { status: 404, .. }));
        assert_eq!(err.to_string(), "HTTP error: 404");
    }

    #[test]
    fn test_fetch_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);
        let err = Source::Url(url.clone()).read(Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, AcquireError::Fetch { .. }));
        assert_eq!(err.to_string(), format!("failed to fetch URL {url}"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_display() {
        assert_eq!(Source::Stdin.to_string(), "stdin");
        assert_eq!(Source::File(PathBuf::from("a.html")).to_string(), "a.html");
    }
}
