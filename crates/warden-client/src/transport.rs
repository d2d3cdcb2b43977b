// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Transport seam between the gateway and the remote account service.
//!
//! The gateway only builds [`ApiRequest`]s and interprets [`ApiResponse`]s.
//! Putting bytes on the wire is the job of a [`Transport`]; [`HttpTransport`]
//! does it with `reqwest`, tests script it with a mock.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use warden_core::{AuthError, AuthResult, SessionToken};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Request / Response
// =============================================================================

/// HTTP method of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    /// Returns the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to the account service, relative to its base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL, e.g. `account/login`.
    pub path: String,
    /// JSON body.
    pub body: Option<serde_json::Value>,
    /// Token to present as a bearer credential.
    pub bearer: Option<SessionToken>,
}

impl ApiRequest {
    /// Creates a request without body or credential.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Creates a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Creates a POST request with a JSON body.
    pub fn post<T: Serialize>(path: impl Into<String>, body: &T) -> AuthResult<Self> {
        Self::new(Method::Post, path).with_json(body)
    }

    /// Sets the JSON body.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> AuthResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| AuthError::transport(format!("Failed to encode request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Attaches a bearer credential.
    pub fn with_bearer(mut self, token: SessionToken) -> Self {
        self.bearer = Some(token);
        self
    }
}

/// A response from the account service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body text.
    pub body: String,
}

impl ApiResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a response with a JSON body.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, body.to_string())
    }

    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Parses the body as a JSON value, `None` if it is empty or not JSON.
    pub fn value(&self) -> Option<serde_json::Value> {
        if self.body.trim().is_empty() {
            return None;
        }
        serde_json::from_str(&self.body).ok()
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Sends requests to the account service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns whatever response arrived.
    ///
    /// Only failures to obtain a response at all are errors; non-2xx
    /// statuses are returned as responses.
    async fn send(&self, request: ApiRequest) -> AuthResult<ApiResponse>;

    /// Transport name for logging.
    fn name(&self) -> &str {
        "transport"
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: ApiRequest) -> AuthResult<ApiResponse> {
        (**self).send(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// =============================================================================
// HttpTransport
// =============================================================================

/// [`Transport`] over HTTP using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> AuthResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a transport for `base_url` with a request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> AuthResult<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AuthError::configuration(format!(
                "api url must start with http:// or https://: {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> AuthResult<ApiResponse> {
        let url = self.url(&request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        tracing::debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self.client.request(method, &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.as_str());
        }

        let response = builder.send().await.map_err(classify_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify_error)?;

        tracing::debug!(method = %request.method, url = %url, status, "Received response");

        Ok(ApiResponse { status, body })
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn classify_error(err: reqwest::Error) -> AuthError {
    let message = if err.is_timeout() {
        "Request to the identity service timed out".to_string()
    } else if err.is_connect() {
        "Unable to connect to the identity service".to_string()
    } else {
        format!("Request failed: {}", err)
    };
    tracing::warn!(error = %err, "{}", message);
    AuthError::transport(message)
}

// =============================================================================
// Tests
// =============================================================================
