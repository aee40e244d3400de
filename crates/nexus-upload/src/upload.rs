//! HTTP PUT transport for the archive.
//!
//! One request, no retries. The archive streams from disk rather than being
//! buffered, basic-auth credentials are always attached (empty ones
//! included), and whatever the server answers is captured verbatim for the
//! caller to narrate. Only failure to exchange a request at all is an error
//! here; an unhappy status code is still a response.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Body, Client};

use crate::error::{PublishError, Result};

/// How much of the response body is kept for display.
pub const BODY_EXCERPT_LIMIT: usize = 500;

/// What the repository answered.
#[derive(Debug, Clone)]
pub struct UploadResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in arrival order, names lowercased.
    pub headers: Vec<(String, String)>,
    /// Leading excerpt of the trimmed response body.
    pub body_excerpt: String,
    /// Whether the body had more beyond the excerpt.
    pub body_truncated: bool,
}

impl UploadResponse {
    /// The repository accepts an upload with exactly `200 OK`; any other
    /// status, including other 2xx codes, counts as a rejection.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// PUT `file_path` to `url` with basic authentication.
///
/// The connection timeout bounds only connection establishment; the transfer
/// itself is unbounded so a slow link never cuts off a large archive.
pub fn put_file(
    url: &str,
    file_path: &Path,
    username: &str,
    password: &str,
    connect_timeout: Duration,
) -> Result<UploadResponse> {
    let file = File::open(file_path).map_err(|source| PublishError::FileRead {
        path: file_path.to_path_buf(),
        source,
    })?;
    let length = file
        .metadata()
        .map_err(|source| PublishError::FileRead {
            path: file_path.to_path_buf(),
            source,
        })?
        .len();

    let client = Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(None)
        .build()
        .map_err(|source| PublishError::Transport {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .put(url)
        .basic_auth(username, Some(password))
        .body(Body::sized(file, length))
        .send()
        .map_err(|source| PublishError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let body = response.text().map_err(|source| PublishError::Transport {
        url: url.to_string(),
        source,
    })?;
    let trimmed = body.trim();
    let body_excerpt: String = trimmed.chars().take(BODY_EXCERPT_LIMIT).collect();
    let body_truncated = trimmed.chars().count() > BODY_EXCERPT_LIMIT;

    Ok(UploadResponse {
        status,
        headers,
        body_excerpt,
        body_truncated,
    })
}
