//! Assistant collaborator: turns one user message plus the current resume into a
//! reply and a list of raw actions.
//!
//! `AppState` carries an `Option<Arc<dyn Assistant>>`; with no API key configured the
//! chat endpoint reports the assistant as unavailable.

pub mod client;
pub mod prompts;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::chat::{ChatMessage, MessageRole};

pub use client::{LlmClient, LlmError, PromptMessage, MODEL};

pub const DEFAULT_REPLY: &str = "I've updated your resume!";

// ────────────────────────────────────────────────────────────────────────────
// Turn input / output
// ────────────────────────────────────────────────────────────────────────────

/// Everything the assistant sees for one turn.
#[derive(Debug, Clone)]
pub struct AssistantTurn {
    /// Serialised structured resume data.
    pub structured: String,
    /// Freeform markup, only while freeform mode is active.
    pub custom_html: Option<String>,
    /// Truncated inner markup of the rendered document.
    pub snapshot: Option<String>,
    pub transcript: Vec<ChatMessage>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub message: String,
    /// Raw actions, handed to the dispatcher unparsed.
    pub actions: Vec<Value>,
}

/// Model output before defaults are applied.
#[derive(Debug, Default, Deserialize)]
pub struct RawReply {
    pub message: Option<String>,
    pub actions: Option<Value>,
}

impl From<RawReply> for AssistantReply {
    fn from(raw: RawReply) -> Self {
        let message = raw
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REPLY.to_string());
        let actions = match raw.actions {
            Some(Value::Array(actions)) => actions,
            Some(other) => {
                warn!("assistant actions field is not an array: {other}");
                Vec::new()
            }
            None => Vec::new(),
        };
        AssistantReply { message, actions }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait Assistant: Send + Sync {
    async fn respond(&self, turn: &AssistantTurn) -> Result<AssistantReply, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic-backed implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmAssistant {
    client: LlmClient,
}

impl LlmAssistant {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Assistant for LlmAssistant {
    async fn respond(&self, turn: &AssistantTurn) -> Result<AssistantReply, LlmError> {
        let system = system_prompt(turn);
        let messages = conversation(&turn.transcript, &turn.message);
        debug!(
            messages = messages.len(),
            system_chars = system.len(),
            "sending assistant turn"
        );
        let raw: RawReply = self.client.call_json(&system, &messages).await?;
        Ok(raw.into())
    }
}

pub fn system_prompt(turn: &AssistantTurn) -> String {
    let mut parts = vec![prompts::RESUME_INSTRUCTIONS.to_string(), turn.structured.clone()];
    if let Some(markup) = &turn.custom_html {
        parts.push(prompts::custom_html_context(markup));
    }
    if let Some(snapshot) = &turn.snapshot {
        parts.push(prompts::snapshot_context(snapshot));
    }
    parts.join("\n\n")
}

/// Prior transcript plus the new message, shaped for the Messages API: it must open
/// with a user turn and roles must alternate, so leading assistant turns are dropped
/// and consecutive same-role turns are merged.
pub fn conversation(transcript: &[ChatMessage], message: &str) -> Vec<PromptMessage> {
    let mut messages: Vec<PromptMessage> = Vec::with_capacity(transcript.len() + 1);
    let turns = transcript
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .chain(std::iter::once((MessageRole::User, message)));

    for (role, content) in turns {
        if messages.is_empty() && role == MessageRole::Assistant {
            continue;
        }
        match messages.last_mut() {
            Some(last) if last.role == role => {
                last.content.push_str("\n\n");
                last.content.push_str(content);
            }
            _ => messages.push(PromptMessage {
                role,
                content: content.to_string(),
            }),
        }
    }
    messages
}
