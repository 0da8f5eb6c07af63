//! Gemini responses.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::render::GEMTEXT_MIME;

/// Longest meta string sent on the header line.
pub const MAX_META_BYTES: usize = 1024;

/// Response status codes used by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Redirect,
    TemporaryFailure,
    CgiError,
    PermanentFailure,
    NotFound,
    ProxyRequestRefused,
    BadRequest,
    CertificateRequired,
    CertificateNotAuthorized,
}

impl Status {
    pub fn code(&self) -> u8 {
        match self {
            Status::Success => 20,
            Status::Redirect => 30,
            Status::TemporaryFailure => 40,
            Status::CgiError => 42,
            Status::PermanentFailure => 50,
            Status::NotFound => 51,
            Status::ProxyRequestRefused => 53,
            Status::BadRequest => 59,
            Status::CertificateRequired => 60,
            Status::CertificateNotAuthorized => 61,
        }
    }
}

/// A complete response: header line and, on success, a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: Status,
    meta: String,
    body: Option<String>,
}

impl Response {
    /// Header-only response.
    pub fn new(status: Status, meta: impl Into<String>) -> Self {
        Self {
            status,
            meta: sanitize_meta(&meta.into()),
            body: None,
        }
    }

    pub fn success(mime: &str, body: String) -> Self {
        Self {
            status: Status::Success,
            meta: sanitize_meta(mime),
            body: Some(body),
        }
    }

    /// Successful gemtext page.
    pub fn gemtext(body: String) -> Self {
        Self::success(GEMTEXT_MIME, body)
    }

    pub fn redirect(target: impl Into<String>) -> Self {
        Self::new(Status::Redirect, target)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn meta(&self) -> &str {
        &self.meta
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Write the header line and body, then flush.
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> std::io::Result<()> {
        let header = format!("{} {}\r\n", self.status.code(), self.meta);
        writer.write_all(header.as_bytes()).await?;
        if let Some(body) = &self.body {
            writer.write_all(body.as_bytes()).await?;
        }
        writer.flush().await
    }
}

/// Meta must stay on the header line and within the length limit.
fn sanitize_meta(meta: &str) -> String {
    let mut clean: String = meta
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();
    if clean.len() > MAX_META_BYTES {
        let mut cut = MAX_META_BYTES;
        while !clean.is_char_boundary(cut) {
            cut -= 1;
        }
        clean.truncate(cut);
    }
    clean
}
