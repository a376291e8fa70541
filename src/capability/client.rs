//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Optional bearer authentication per request
//! - Mapping of transport and status failures to capability errors
//!
//! Retrying is left to the orchestrator, which retries a failed fetch once.

use crate::error::CapabilityError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default timeout for HTTP requests (20 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("groundwork/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper shared by all capability bindings
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, CapabilityError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, CapabilityError> {
        Self::with_config(timeout, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, CapabilityError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                let message = format!("failed to create HTTP client: {}", e);
                CapabilityError::unreachable("HTTP client", message)
            })?;

        Ok(Self { client })
    }

    /// Send a GET request; only transport failures are errors here
    async fn send(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, CapabilityError> {
        let mut request = self.client.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                CapabilityError::timeout(url)
            } else {
                CapabilityError::unreachable(url, e.to_string())
            }
        })
    }

    /// Perform a GET request, mapping failures to capability errors
    ///
    /// Rate limiting and server errors are `Unreachable` (worth a retry);
    /// other client errors are `InvalidResponse` (permanent).
    pub async fn get(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, CapabilityError> {
        let response = self.send(url, bearer).await?;
        check_status(url, response)
    }

    /// Perform a GET request and return the body as text
    pub async fn get_text(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<String, CapabilityError> {
        let response = self.get(url, bearer).await?;
        response.text().await.map_err(|e| {
            if e.is_timeout() {
                CapabilityError::timeout(url)
            } else {
                CapabilityError::invalid_response(url, format!("failed to read body: {}", e))
            }
        })
    }

    /// Perform a GET request and parse the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<T, CapabilityError> {
        let response = self.get(url, bearer).await?;
        parse_json(url, response).await
    }

    /// Like [`get_json`](Self::get_json), but a 404 yields `Ok(None)`
    pub async fn get_json_optional<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<Option<T>, CapabilityError> {
        let response = self.send(url, bearer).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(url, response)?;
        parse_json(url, response).await.map(Some)
    }
}

fn check_status(
    url: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, CapabilityError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(CapabilityError::unreachable(url, "rate limit exceeded"));
    }
    if status.is_client_error() {
        return Err(CapabilityError::invalid_response(url, format!("HTTP {}", status)));
    }
    if !status.is_success() {
        return Err(CapabilityError::unreachable(url, format!("HTTP {}", status)));
    }
    Ok(response)
}

async fn parse_json<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> Result<T, CapabilityError> {
    response.json::<T>().await.map_err(|e| {
        CapabilityError::invalid_response(url, format!("failed to parse JSON: {}", e))
    })
}
