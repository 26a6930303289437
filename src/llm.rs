//! Hosted chat model collaborators.
//!
//! The conversation core only needs "history in, reply out"; the
//! [`ChatModel`] trait is that seam. Two HTTP backends are provided: Groq's
//! OpenAI-compatible endpoint and a local Ollama server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::memory::Message;

/// Groq chat completions endpoint.
pub const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Ollama API endpoint for local LLM inference.
pub const OLLAMA_CHAT_URL: &str = "http://localhost:11434/api/chat";

/// Turns an ordered chat history into a single reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends the full history and returns the model's reply text.
    ///
    /// # Errors
    /// Returns [`LlmError`] when the service is unreachable, rejects the
    /// request, or answers without content.
    async fn complete(&self, history: &[Message]) -> Result<String, LlmError>;
}

#[async_trait]
impl<T: ChatModel + ?Sized> ChatModel for Box<T> {
    async fn complete(&self, history: &[Message]) -> Result<String, LlmError> {
        (**self).complete(history).await
    }
}

/// Request body shared by the OpenAI-compatible and Ollama chat APIs.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Reply message as returned by both APIs.
#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ReplyMessage,
}

/// Response body from the OpenAI-compatible endpoint.
#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

/// Response body from Ollama's chat endpoint.
#[derive(Deserialize)]
struct OllamaResponse {
    message: ReplyMessage,
}

/// Chat model served by Groq.
pub struct GroqChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GroqChat {
    /// Creates a Groq-backed model.
    ///
    /// # Errors
    /// Returns `LlmError::Config` if `api_key` is empty.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("GROQ_API_KEY is not set".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
        })
    }
}

#[async_trait]
impl ChatModel for GroqChat {
    async fn complete(&self, history: &[Message]) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: history,
            stream: None,
        };
        tracing::debug!(model = %self.model, messages = history.len(), "sending chat request");
        let response = self
            .client
            .post(GROQ_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let body: CompletionResponse = checked(response).await?.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyReply)
    }
}

/// Chat model served by a local Ollama instance.
pub struct OllamaChat {
    client: reqwest::Client,
    model: String,
}

impl OllamaChat {
    /// Creates an Ollama-backed model on the default local endpoint.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ChatModel for OllamaChat {
    async fn complete(&self, history: &[Message]) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: history,
            stream: Some(false),
        };
        tracing::debug!(model = %self.model, messages = history.len(), "sending Ollama request");
        let response = self.client.post(OLLAMA_CHAT_URL).json(&request).send().await?;
        let body: OllamaResponse = checked(response).await?.json().await?;
        body.message
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyReply)
    }
}

/// Converts a non-success HTTP status into `LlmError::Status`.
async fn checked(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::error!(status = %status, body = %body, "chat API error");
    Err(LlmError::Status {
        status: status.as_u16(),
        body,
    })
}
