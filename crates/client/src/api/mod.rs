//! Typed wrappers over the Campus Events REST API.
//!
//! Every call takes the [`Session`] explicitly when it needs one. Non-success
//! responses are mapped to [`ClientError`] using the `message` field the
//! backend puts in every error body.

mod auth;
mod catalog;
mod events;
mod notifications;
mod profile;

pub use events::EventQuery;

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use domain::models::MessageResponse;

use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::session::Session;

/// Header carrying a per-attempt key on registration mutations.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// HTTP client for the events API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ClientError::Http)?;

        Self::with_http(http, &config.base_url)
    }

    /// Builds a client around an existing `reqwest::Client`.
    pub fn with_http(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Config(format!("invalid request path '{}': {}", path, e)))
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        session: Option<&Session>,
    ) -> Result<RequestBuilder, ClientError> {
        let url = self.url(path)?;
        debug!(method = %method, url = %url, authenticated = session.is_some(), "Building request");

        let builder = self.http.request(method, url);
        Ok(match session {
            Some(session) => builder.bearer_auth(session.token()),
            None => builder,
        })
    }

    /// Sends the request and decodes a success body as `T`.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let path = response.url().path().to_string();

        if !status.is_success() {
            let fallback = status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string();
            let message = match response.json::<MessageResponse>().await {
                Ok(body) if !body.message.trim().is_empty() => body.message,
                _ => fallback,
            };

            warn!(
                status = status.as_u16(),
                path = %path,
                message = %message,
                "Events API returned an error"
            );
            return Err(ClientError::from_status(status.as_u16(), message));
        }

        debug!(status = status.as_u16(), path = %path, "Events API request succeeded");
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("{}: {}", path, e)))
    }
}

/// Parses the base URL and makes sure relative joins keep its path.
fn normalize_base_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    Url::parse(&with_slash)
        .map_err(|e| ClientError::Config(format!("invalid base URL '{}': {}", raw, e)))
}
