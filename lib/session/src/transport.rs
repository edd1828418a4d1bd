//! Outbound request/response values and the wire transport beneath the gateway.
//!
//! The transport only moves bytes. Credential attachment and failure policy
//! belong to [`ApiGateway`](crate::gateway::ApiGateway), which wraps it.

use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::GatewayError;
use async_trait::async_trait;
use rootcause::prelude::Report;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use spendwise_core::Result;
use std::fmt;

/// HTTP method of an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Ephemeral description of a single resource call.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    method: Method,
    path: String,
    body: Option<JsonValue>,
    bearer: Option<Credential>,
}

impl OutboundRequest {
    /// Creates a request without a body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets or removes the bearer credential.
    ///
    /// Only the gateway calls this; collaborators never attach credentials.
    #[must_use]
    pub(crate) fn with_bearer(mut self, bearer: Option<Credential>) -> Self {
        self.bearer = bearer;
        self
    }

    /// Returns the method.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the path relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the JSON body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&JsonValue> {
        self.body.as_ref()
    }

    /// Returns the attached bearer credential, if any.
    #[must_use]
    pub fn bearer(&self) -> Option<&Credential> {
        self.bearer.as_ref()
    }
}

/// Response to an outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: String,
}

impl ApiResponse {
    /// Creates a response from its status and raw body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true if the server rejected the credential.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    /// Decodes the body as JSON.
    ///
    /// An empty body decodes as JSON `null`, so `()` and `Option<T>` targets
    /// accept bodiless responses.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        if self.body.trim().is_empty() {
            serde_json::from_value(JsonValue::Null)
        } else {
            serde_json::from_str(&self.body)
        }
    }

    /// Extracts a human-readable error message from the body.
    ///
    /// Prefers a `message` or `error` field of a JSON body and falls back to
    /// the raw text.
    #[must_use]
    pub fn error_message(&self) -> String {
        if let Ok(JsonValue::Object(fields)) = serde_json::from_str::<JsonValue>(&self.body) {
            for key in ["message", "error"] {
                if let Some(JsonValue::String(message)) = fields.get(key) {
                    return message.clone();
                }
            }
        }
        self.body.trim().to_string()
    }
}

/// Moves a request to the service and returns whatever came back.
///
/// Implementations report transport-level failures as
/// [`GatewayError::Network`] and return every HTTP status as a response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes the request.
    async fn execute(&self, request: &OutboundRequest) -> Result<ApiResponse, GatewayError>;
}

/// Transport over HTTP using reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for the configured service.
    pub fn new(config: &ClientConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| GatewayError::Network {
                path: String::new(),
                details: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &OutboundRequest) -> Result<ApiResponse, GatewayError> {
        let network_error = |e: reqwest::Error| -> Report<GatewayError> {
            GatewayError::Network {
                path: request.path().to_string(),
                details: e.to_string(),
            }
            .into()
        };

        let mut builder = self
            .client
            .request(request.method().as_reqwest(), self.url(request.path()));
        if let Some(bearer) = request.bearer() {
            builder = builder.bearer_auth(bearer.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(network_error)?;

        Ok(ApiResponse::new(status, body))
    }
}
