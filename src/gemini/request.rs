//! Gemini request line parsing.
//!
//! A request is one absolute URL of at most 1024 bytes followed by CRLF.

use tokio::io::{AsyncRead, AsyncReadExt};
use url::Url;

use crate::articles::QueryParams;

/// Longest accepted URL, excluding the line terminator.
pub const MAX_REQUEST_BYTES: usize = 1024;

/// Errors raised while reading a request line.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request line exceeds {MAX_REQUEST_BYTES} bytes")]
    TooLong,

    #[error("connection closed before end of request line")]
    Incomplete,

    #[error("request line is not valid UTF-8")]
    NotUtf8,

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("URL must not contain userinfo")]
    UserInfo,

    #[error("URL has no host")]
    MissingHost,
}

/// A parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    url: Url,
    params: QueryParams,
}

impl Request {
    /// Parse a request URL (without the line terminator).
    pub fn parse(line: &str) -> Result<Self, RequestError> {
        if line.len() > MAX_REQUEST_BYTES {
            return Err(RequestError::TooLong);
        }
        let url = Url::parse(line)?;
        if url.scheme() != "gemini" {
            return Err(RequestError::UnsupportedScheme(url.scheme().to_string()));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(RequestError::UserInfo);
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(RequestError::MissingHost);
        }

        let params = QueryParams::parse(url.query().unwrap_or(""));
        Ok(Self { url, params })
    }

    /// Read and parse one request line from `reader`.
    ///
    /// A bare LF is accepted as terminator as well as CRLF.
    pub async fn read_from<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Self, RequestError> {
        let mut buf = [0u8; MAX_REQUEST_BYTES + 2];
        let mut len = 0;

        let end = loop {
            if let Some(pos) = buf[..len].iter().position(|b| *b == b'\n') {
                break pos;
            }
            if len == buf.len() {
                return Err(RequestError::TooLong);
            }
            let n = reader.read(&mut buf[len..]).await?;
            if n == 0 {
                return Err(RequestError::Incomplete);
            }
            len += n;
        };

        let line = buf[..end].strip_suffix(b"\r").unwrap_or(&buf[..end]);
        let line = std::str::from_utf8(line).map_err(|_| RequestError::NotUtf8)?;
        Self::parse(line)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Path component; an empty path is reported as `/`.
    pub fn path(&self) -> &str {
        match self.url.path() {
            "" => "/",
            path => path,
        }
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }
}
