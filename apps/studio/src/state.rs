use std::sync::Arc;

use tokio::sync::Mutex;

use crate::assistant::Assistant;
use crate::config::Config;
use crate::session::{Session, SharedSession};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    /// `None` when no API key is configured.
    pub assistant: Option<Arc<dyn Assistant>>,
    /// Held for a whole chat turn so the next turn sees this turn's edits.
    pub turn_gate: Arc<Mutex<()>>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, assistant: Option<Arc<dyn Assistant>>) -> Self {
        Self {
            session: Session::shared(),
            assistant,
            turn_gate: Arc::new(Mutex::new(())),
            config,
        }
    }
}
