//! Highlight Annotator: transient "recently changed" markers.
//!
//! Every `add` stamps the key with a fresh generation. The first observation of a
//! generation hands out an [`ExpiryTicket`]; redeeming the ticket after
//! [`HIGHLIGHT_DURATION`] removes the key only if no later `add` bumped it. Stale
//! tickets from superseded generations are harmless no-ops, so nothing ever has to
//! cancel a timer.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightTarget {
    Header,
    ProfileImage,
    Skills,
    Styling,
    Experience { id: Option<String> },
    Education { id: Option<String> },
    Custom { section_id: String, item_id: Option<String> },
}

impl HighlightTarget {
    pub fn key(&self) -> String {
        match self {
            HighlightTarget::Header => "header".to_string(),
            HighlightTarget::ProfileImage => "profile-image".to_string(),
            HighlightTarget::Skills => "skills".to_string(),
            HighlightTarget::Styling => "styling".to_string(),
            HighlightTarget::Experience { id } => scoped("experience", id.as_deref()),
            HighlightTarget::Education { id } => scoped("education", id.as_deref()),
            HighlightTarget::Custom {
                section_id,
                item_id: Some(item_id),
            } => format!("custom-{section_id}-{item_id}"),
            HighlightTarget::Custom {
                section_id,
                item_id: None,
            } => format!("custom-{section_id}"),
        }
    }
}

fn scoped(kind: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{kind}-{id}"),
        None => kind.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryTicket {
    pub key: String,
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct Mark {
    set_at: DateTime<Utc>,
    generation: u64,
    observed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveHighlight {
    pub key: String,
    pub set_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Highlights {
    marks: HashMap<String, Mark>,
    next_generation: u64,
}

impl Highlights {
    /// Marks the target, overwriting any earlier timestamp for the same key.
    pub fn add(&mut self, target: &HighlightTarget) -> String {
        self.add_at(target, Utc::now())
    }

    pub fn add_at(&mut self, target: &HighlightTarget, now: DateTime<Utc>) -> String {
        let key = target.key();
        self.next_generation += 1;
        self.marks.insert(
            key.clone(),
            Mark {
                set_at: now,
                generation: self.next_generation,
                observed: false,
            },
        );
        key
    }

    pub fn is_highlighted(&self, key: &str) -> bool {
        self.marks.contains_key(key)
    }

    /// Records that a consumer displayed `key`. Returns a ticket the first time a
    /// given generation is observed and `None` on every repeat.
    pub fn observe(&mut self, key: &str) -> Option<ExpiryTicket> {
        let mark = self.marks.get_mut(key)?;
        if mark.observed {
            return None;
        }
        mark.observed = true;
        Some(ExpiryTicket {
            key: key.to_string(),
            generation: mark.generation,
        })
    }

    /// Removes the key if the ticket still names its current generation.
    pub fn expire(&mut self, ticket: &ExpiryTicket) -> bool {
        let current = self
            .marks
            .get(&ticket.key)
            .is_some_and(|mark| mark.generation == ticket.generation);
        if current {
            self.marks.remove(&ticket.key);
        }
        current
    }

    pub fn remove(&mut self, key: &str) {
        self.marks.remove(key);
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    pub fn active(&self) -> Vec<ActiveHighlight> {
        let mut active: Vec<_> = self
            .marks
            .iter()
            .map(|(key, mark)| ActiveHighlight {
                key: key.clone(),
                set_at: mark.set_at,
            })
            .collect();
        active.sort_by(|a, b| a.key.cmp(&b.key));
        active
    }
}
