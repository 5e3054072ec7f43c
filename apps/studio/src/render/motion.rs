//! Motion overlay for structured renders.
//!
//! The overlay compares the previous frame against the current one and annotates
//! nodes so the client can animate: entering sections grow in, sections that left
//! are re-inserted as ghosts at their old index so they can collapse out, and
//! sections whose estimated box moved get an inverse translate to animate back to
//! identity. It only ever decorates nodes; the set of live sections is exactly
//! what the resolver produced.

use serde::Serialize;

use crate::layout::{Column, LayoutSnapshot, Rect};
use crate::render::vnode::VNode;

/// Offsets below this many pixels are not worth animating.
const MOVE_EPSILON_PX: f32 = 0.5;

pub const MOTION_ATTR: &str = "data-motion";

#[derive(Debug, Clone, PartialEq)]
struct FrameEntry {
    column: Column,
    id: String,
    index: usize,
    node: VNode,
    rect: Option<Rect>,
}

/// What was on screen after the last structured render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionFrame {
    entries: Vec<FrameEntry>,
}

impl MotionFrame {
    fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    fn rect_of(&self, id: &str) -> Option<Rect> {
        self.entries.iter().find(|e| e.id == id).and_then(|e| e.rect)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MotionSummary {
    pub entered: Vec<String>,
    pub exited: Vec<String>,
    pub moved: Vec<String>,
}

impl MotionSummary {
    pub fn is_still(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty() && self.moved.is_empty()
    }
}

/// Rendered sections of one column, before any motion decoration.
#[derive(Debug, Clone)]
pub struct ColumnNodes {
    pub column: Column,
    pub sections: Vec<(String, VNode)>,
}

impl ColumnNodes {
    fn holds(columns: &[ColumnNodes], id: &str) -> bool {
        columns
            .iter()
            .any(|c| c.sections.iter().any(|(section_id, _)| section_id == id))
    }
}

/// Records the undecorated nodes and their boxes for the next comparison.
pub fn capture(columns: &[ColumnNodes], snapshot: &LayoutSnapshot) -> MotionFrame {
    let entries = columns
        .iter()
        .flat_map(|col| {
            col.sections
                .iter()
                .enumerate()
                .map(|(index, (id, node))| FrameEntry {
                    column: col.column,
                    id: id.clone(),
                    index,
                    node: node.clone(),
                    rect: snapshot.position(id),
                })
        })
        .collect();
    MotionFrame { entries }
}

/// Decorates the current columns against `previous`. With no previous frame the
/// document appears without motion.
pub fn apply(
    previous: Option<&MotionFrame>,
    columns: Vec<ColumnNodes>,
    snapshot: &LayoutSnapshot,
) -> (Vec<(Column, Vec<VNode>)>, MotionSummary) {
    let mut summary = MotionSummary::default();
    let Some(previous) = previous else {
        let plain = columns
            .into_iter()
            .map(|col| {
                let nodes = col.sections.into_iter().map(|(_, node)| node).collect();
                (col.column, nodes)
            })
            .collect();
        return (plain, summary);
    };

    let exits: Vec<&FrameEntry> = previous
        .entries
        .iter()
        .filter(|e| !ColumnNodes::holds(&columns, &e.id))
        .collect();
    for exit in &exits {
        if !summary.exited.contains(&exit.id) {
            summary.exited.push(exit.id.clone());
        }
    }

    let mut decorated = Vec::with_capacity(columns.len());
    for col in columns {
        let mut nodes = Vec::with_capacity(col.sections.len());
        for (id, node) in col.sections {
            let node = if !previous.contains(&id) {
                if !summary.entered.contains(&id) {
                    summary.entered.push(id.clone());
                }
                node.with_attr(MOTION_ATTR, "enter")
            } else {
                match (previous.rect_of(&id), snapshot.position(&id)) {
                    (Some(before), Some(after)) => {
                        let dx = before.x - after.x;
                        let dy = before.y - after.y;
                        if dx.abs() > MOVE_EPSILON_PX || dy.abs() > MOVE_EPSILON_PX {
                            if !summary.moved.contains(&id) {
                                summary.moved.push(id.clone());
                            }
                            node.with_attr(MOTION_ATTR, "move")
                                .with_style("--flip-dx", format!("{dx:.1}px"))
                                .with_style("--flip-dy", format!("{dy:.1}px"))
                        } else {
                            node
                        }
                    }
                    _ => node,
                }
            };
            nodes.push(node);
        }

        let mut ghosts: Vec<&&FrameEntry> = exits.iter().filter(|e| e.column == col.column).collect();
        ghosts.sort_by_key(|e| e.index);
        for ghost in ghosts {
            let at = ghost.index.min(nodes.len());
            nodes.insert(
                at,
                ghost
                    .node
                    .clone()
                    .with_attr(MOTION_ATTR, "exit")
                    .with_attr("aria-hidden", "true"),
            );
        }
        decorated.push((col.column, nodes));
    }

    (decorated, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{estimate, resolve};
    use crate::models::resume::Experience;
    use crate::store::Resume;

    fn node(id: &str) -> VNode {
        VNode::element("section").with_attr("data-section-id", id)
    }

    fn column(ids: &[&str]) -> Vec<ColumnNodes> {
        vec![ColumnNodes {
            column: Column::Main,
            sections: ids.iter().map(|id| (id.to_string(), node(id))).collect(),
        }]
    }

    fn motion_of(nodes: &[VNode]) -> Vec<(String, Option<String>)> {
        nodes
            .iter()
            .map(|n| {
                (
                    n.attr("data-section-id").unwrap_or_default().to_string(),
                    n.attr(MOTION_ATTR).map(str::to_string),
                )
            })
            .collect()
    }

    #[test]
    fn test_first_frame_is_still() {
        let snapshot = LayoutSnapshot::default();
        let (columns, summary) = apply(None, column(&["header", "skills"]), &snapshot);
        assert!(summary.is_still());
        assert!(columns[0].1.iter().all(|n| n.attr(MOTION_ATTR).is_none()));
    }

    #[test]
    fn test_enter_and_exit_ghost_position() {
        let snapshot = LayoutSnapshot::default();
        let previous = capture(&column(&["header", "education", "skills"]), &snapshot);
        let (columns, summary) = apply(
            Some(&previous),
            column(&["header", "skills", "projects"]),
            &snapshot,
        );

        assert_eq!(summary.entered, vec!["projects"]);
        assert_eq!(summary.exited, vec!["education"]);
        assert_eq!(
            motion_of(&columns[0].1),
            vec![
                ("header".to_string(), None),
                ("education".to_string(), Some("exit".to_string())),
                ("skills".to_string(), None),
                ("projects".to_string(), Some("enter".to_string())),
            ]
        );
    }

    #[test]
    fn test_reorder_produces_inverse_offsets() {
        let mut resume = Resume::default();
        resume.personal_info.name = "Ada".to_string();
        resume.skills = vec!["Rust".to_string()];
        resume.experience.push(Experience {
            id: "e1".to_string(),
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            location: None,
            start_date: "2020".to_string(),
            end_date: "2021".to_string(),
            current: false,
            achievements: vec![],
        });

        let before = estimate(&resolve(&resume), &resume.styling);
        let previous = capture(&column(&["header", "experience", "skills"]), &before);

        resume.reorder_sections(&[
            "skills".to_string(),
            "header".to_string(),
            "experience".to_string(),
        ]);
        let after = estimate(&resolve(&resume), &resume.styling);
        let (columns, summary) = apply(
            Some(&previous),
            column(&["skills", "header", "experience"]),
            &after,
        );

        assert!(summary.entered.is_empty() && summary.exited.is_empty());
        assert_eq!(summary.moved.len(), 3);
        let skills = &columns[0].1[0];
        assert_eq!(skills.attr(MOTION_ATTR), Some("move"));
        // Skills moved up, so it starts translated downwards.
        let html = skills.to_html();
        assert!(html.contains("--flip-dy: ") && !html.contains("--flip-dy: -"));
    }
}
