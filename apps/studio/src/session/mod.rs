//! One editing session: the Resume aggregate plus everything derived from it that
//! has to outlive a single request (highlights, chat transcript, last motion frame).
//!
//! All mutation goes through the session behind one `tokio::sync::Mutex`, so action
//! dispatch, highlight expiry and rendering never interleave.

pub mod handlers;

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::actions::{apply_actions, DispatchReport};
use crate::assistant::prompts::structured_context;
use crate::assistant::{AssistantReply, AssistantTurn};
use crate::highlight::{ExpiryTicket, HighlightTarget, Highlights, HIGHLIGHT_DURATION};
use crate::models::chat::{ChatMessage, MessageRole};
use crate::render::motion::MotionFrame;
use crate::render::{render_document, truncate_snapshot, RenderedDocument};
use crate::store::templates::template_by_id;
use crate::store::{RenderMode, Resume};

pub type SharedSession = Arc<Mutex<Session>>;

#[derive(Debug, Default)]
pub struct Session {
    pub resume: Resume,
    pub highlights: Highlights,
    pub transcript: Vec<ChatMessage>,
    frame: Option<MotionFrame>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSession {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn apply_actions(&mut self, actions: &[Value]) -> DispatchReport {
        apply_actions(&mut self.resume, &mut self.highlights, actions)
    }

    /// Renders the document against the last frame and keeps the new one. Every
    /// highlighted key that rendered is observed; the returned tickets are the first
    /// observations and must be scheduled for expiry.
    pub fn render(&mut self) -> (RenderedDocument, Vec<ExpiryTicket>) {
        let rendered = render_document(&self.resume, &self.highlights, self.frame.as_ref());
        self.frame = rendered.frame.clone();
        let tickets = rendered
            .highlighted
            .iter()
            .filter_map(|key| self.highlights.observe(key))
            .collect();
        (rendered, tickets)
    }

    /// Truncated inner markup of the document. Does not touch motion or highlights.
    pub fn snapshot(&self, max_chars: usize) -> String {
        let rendered = render_document(&self.resume, &self.highlights, None);
        truncate_snapshot(&rendered.snapshot, max_chars)
    }

    /// Applies a gallery template. Returns false when the id is unknown.
    pub fn apply_template(&mut self, id: &str) -> bool {
        let Some(template) = template_by_id(id) else {
            return false;
        };
        self.resume.apply_template(template);
        self.highlights.add(&HighlightTarget::Styling);
        true
    }

    pub fn set_freeform_mode(&mut self, enabled: bool) {
        self.resume.set_freeform_mode(enabled);
    }

    pub fn clear_custom_html(&mut self) {
        self.resume.clear_custom_html();
    }

    pub fn reset(&mut self) {
        self.resume.reset();
        self.highlights.clear();
        self.frame = None;
    }

    /// Builds the assistant's view of the session for a new user message.
    pub fn assistant_turn(
        &self,
        message: &str,
        snapshot_max_chars: usize,
    ) -> Result<AssistantTurn, serde_json::Error> {
        let custom_html = match self.resume.render_mode() {
            RenderMode::Freeform(markup) => Some(markup.to_string()),
            RenderMode::Structured => None,
        };
        let snapshot = Some(self.snapshot(snapshot_max_chars)).filter(|s| !s.is_empty());
        Ok(AssistantTurn {
            structured: structured_context(&self.resume)?,
            custom_html,
            snapshot,
            transcript: self.transcript.clone(),
            message: message.to_string(),
        })
    }

    /// Records the exchange and applies the reply's actions.
    pub fn complete_turn(&mut self, message: &str, reply: &AssistantReply) -> DispatchReport {
        self.transcript
            .push(ChatMessage::new(MessageRole::User, message));
        self.transcript
            .push(ChatMessage::new(MessageRole::Assistant, reply.message.clone()));
        self.apply_actions(&reply.actions)
    }
}

/// Spawns one timer per ticket. Each expires its highlight generation after
/// [`HIGHLIGHT_DURATION`] unless a later add has superseded it.
pub fn schedule_expiry(session: &SharedSession, tickets: Vec<ExpiryTicket>) {
    for ticket in tickets {
        let session = Arc::clone(session);
        tokio::spawn(async move {
            tokio::time::sleep(HIGHLIGHT_DURATION).await;
            let expired = session.lock().await.highlights.expire(&ticket);
            debug!(
                key = %ticket.key,
                generation = ticket.generation,
                expired,
                "highlight timer fired"
            );
        });
    }
}
