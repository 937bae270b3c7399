//! Jenkins HTTP fetch layer
//!
//! One authenticated-or-anonymous GET per call, body returned as text.
//! Interpretation of the fetched documents lives in [`crate::status`]; this
//! layer only moves bytes and reports what went wrong.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::config::Credential;

/// Errors that can occur while fetching from the Jenkins API
#[derive(Debug, Error)]
pub enum JenkinsError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Upstream answered {status} for {url}")]
    Status { url: String, status: reqwest::StatusCode },

    #[error("Malformed payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

/// Result type for Jenkins API operations
pub type JenkinsResult<T> = Result<T, JenkinsError>;

/// Client for fetching documents from a Jenkins server
///
/// Holds one connection pool for the process lifetime. Every request is
/// bounded by the timeout given at construction, so a stalled upstream can
/// never hang a scrape indefinitely.
#[derive(Debug, Clone)]
pub struct JenkinsClient {
    client: Client,
    credential: Option<Credential>,
}

impl JenkinsClient {
    /// Create a client with the given per-request timeout.
    ///
    /// When a [`Credential`] is supplied it is attached to every request as
    /// a basic-auth header; otherwise requests go out anonymous.
    pub fn new(timeout: Duration, credential: Option<Credential>) -> JenkinsResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, credential })
    }

    /// GET `url` and return the response body as text.
    ///
    /// Non-2xx answers are an error; no retries are attempted.
    pub async fn get_text(&self, url: &str) -> JenkinsResult<String> {
        let url = Url::parse(url)?;

        let mut request = self.client.get(url.clone());
        if let Some(credential) = &self.credential {
            request = request.basic_auth(&credential.username, Some(&credential.token));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(JenkinsError::Status {
                url: url.into(),
                status: response.status(),
            });
        }

        Ok(response.text().await?)
    }
}
