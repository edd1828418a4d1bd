//! Conversational assistant and automated spending analysis.

use serde::{Deserialize, Serialize};
use spendwise_core::Result;
use spendwise_session::{ApiGateway, GatewayError};
use std::fmt;
use tracing::instrument;

const ANALYZE_PATH: &str = "/ai/analyze";
const CHAT_PATH: &str = "/ai/chat";

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
}

/// The assistant's answer to a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
}

impl From<ChatReply> for ChatMessage {
    fn from(reply: ChatReply) -> Self {
        Self::assistant(reply.message)
    }
}

/// Automated analysis of the current user's spending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingAnalysis {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub overspending_categories: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub next_month_prediction: Option<String>,
}

/// Client for the assistant endpoints.
#[derive(Clone)]
pub struct AssistantClient {
    gateway: ApiGateway,
}

impl AssistantClient {
    #[must_use]
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Requests an analysis of the user's recorded spending.
    #[instrument(skip(self))]
    pub async fn analyze(&self) -> Result<SpendingAnalysis, GatewayError> {
        self.gateway.post_empty(ANALYZE_PATH).await
    }

    /// Sends the whole conversation so far and returns the next reply.
    ///
    /// The service is stateless; callers keep the history.
    #[instrument(skip(self, history), fields(turns = history.len()))]
    pub async fn chat(&self, history: &[ChatMessage]) -> Result<ChatReply, GatewayError> {
        self.gateway
            .post_json(CHAT_PATH, &ChatRequest { messages: history })
            .await
    }
}
