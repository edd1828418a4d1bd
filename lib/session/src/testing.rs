//! Scripted transport for exercising the session layer without a network.

use crate::error::GatewayError;
use crate::transport::{ApiResponse, Method, OutboundRequest, Transport};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use spendwise_core::Result;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;

enum Reply {
    Respond(ApiResponse),
    Fail(String),
}

struct Scripted {
    reply: Reply,
    release: Option<Arc<Notify>>,
}

/// A call observed by the transport.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) bearer: Option<String>,
    pub(crate) body: Option<JsonValue>,
}

/// Transport answering from per-route queues of scripted replies.
///
/// Unscripted routes answer 404.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    pub(crate) fn respond(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(
            method,
            path,
            Scripted {
                reply: Reply::Respond(ApiResponse::new(status, body)),
                release: None,
            },
        );
    }

    /// Scripts a reply that is held back until `release` is notified.
    pub(crate) fn respond_when(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: &str,
        release: Arc<Notify>,
    ) {
        self.push(
            method,
            path,
            Scripted {
                reply: Reply::Respond(ApiResponse::new(status, body)),
                release: Some(release),
            },
        );
    }

    pub(crate) fn fail(&self, method: Method, path: &str, details: &str) {
        self.push(
            method,
            path,
            Scripted {
                reply: Reply::Fail(details.to_string()),
                release: None,
            },
        );
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &OutboundRequest) -> Result<ApiResponse, GatewayError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                method: request.method(),
                path: request.path().to_string(),
                bearer: request.bearer().map(|c| c.as_str().to_string()),
                body: request.body().cloned(),
            });

        let scripted = self
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&(request.method(), request.path().to_string()))
            .and_then(VecDeque::pop_front);

        let Some(scripted) = scripted else {
            return Ok(ApiResponse::new(404, ""));
        };

        if let Some(release) = scripted.release {
            release.notified().await;
        }

        match scripted.reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(details) => Err(GatewayError::Network {
                path: request.path().to_string(),
                details,
            }
            .into()),
        }
    }
}
