// Rendering engine: turns the aggregate into markup.
// Two mutually exclusive modes. Freeform emits the stored markup verbatim inside a
// fixed page container; structured runs resolver -> leaf renderers -> motion overlay.

pub mod motion;
pub mod sections;
pub mod tokens;
pub mod vnode;

use serde::Serialize;

use crate::highlight::{HighlightTarget, Highlights};
use crate::layout::pagination::{COLUMN_GAP_REM, LEFT_COLUMN_FRACTION};
use crate::layout::{estimate, resolve, Column};
use crate::store::{RenderMode, Resume};

use self::motion::{ColumnNodes, MotionFrame, MotionSummary};
use self::sections::SectionRenderer;
use self::tokens::{rem, Tokens, PAGE_BREAK_BACKGROUND};
use self::vnode::VNode;

pub const DOCUMENT_ID: &str = "resume-document";

const PREVIEW_CSS: &str = "\
#resume-document [data-motion=\"enter\"] { animation: resume-enter 0.4s ease-in-out; }
#resume-document [data-motion=\"exit\"] { animation: resume-exit 0.4s ease-in-out forwards; overflow: hidden; pointer-events: none; }
#resume-document [data-motion=\"move\"] { animation: resume-move 0.4s ease-in-out; }
@keyframes resume-enter { from { opacity: 0; max-height: 0; overflow: hidden; } to { opacity: 1; max-height: 200vh; } }
@keyframes resume-exit { from { opacity: 1; max-height: 200vh; } to { opacity: 0; max-height: 0; } }
@keyframes resume-move { from { transform: translate(var(--flip-dx), var(--flip-dy)); } to { transform: none; } }
.highlight-flash { animation: resume-highlight 0.8s ease-out; }
@keyframes resume-highlight { from { background-color: rgba(85, 171, 163, 0.25); } to { background-color: transparent; } }";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentMode {
    Structured,
    Freeform,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    pub mode: DocumentMode,
    /// Full preview markup: page-break overlay, motion annotations, document.
    pub markup: String,
    /// Inner markup of the document container, without motion ghosts.
    pub snapshot: String,
    /// Highlight keys that rendered with emphasis.
    pub highlighted: Vec<String>,
    /// Estimated A4 pages. Freeform markup is opaque, so it has no estimate.
    pub page_count: Option<u32>,
    pub motion: MotionSummary,
    #[serde(skip)]
    pub frame: Option<MotionFrame>,
}

pub fn render_document(
    resume: &Resume,
    highlights: &Highlights,
    previous: Option<&MotionFrame>,
) -> RenderedDocument {
    match resume.render_mode() {
        RenderMode::Freeform(markup) => render_freeform(markup),
        RenderMode::Structured => render_structured(resume, highlights, previous),
    }
}

fn preview(document: VNode) -> String {
    VNode::element("div")
        .with_attr("class", "resume-preview")
        .with_style("position", "relative")
        .with_child(VNode::element("style").with_child(VNode::raw(PREVIEW_CSS)))
        .with_child(
            VNode::element("div")
                .with_attr("class", "resume-page-breaks")
                .with_attr("aria-hidden", "true")
                .with_style("position", "absolute")
                .with_style("inset", "0")
                .with_style("pointer-events", "none")
                .with_style("background-image", PAGE_BREAK_BACKGROUND)
                .with_style("background-position", "top"),
        )
        .with_child(document)
        .to_html()
}

fn render_freeform(markup: &str) -> RenderedDocument {
    let document = VNode::element("div")
        .with_attr("id", DOCUMENT_ID)
        .with_attr("class", "resume-document resume-document--freeform")
        .with_style("max-width", "56rem")
        .with_style("margin", "0 auto")
        .with_style("padding", "2rem")
        .with_style("min-height", "297mm")
        .with_style("background-color", "#ffffff")
        .with_style("position", "relative")
        .with_child(VNode::raw(markup));

    RenderedDocument {
        mode: DocumentMode::Freeform,
        snapshot: document.inner_html(),
        markup: preview(document),
        highlighted: Vec::new(),
        page_count: None,
        motion: MotionSummary::default(),
        frame: None,
    }
}

fn document_container(tokens: &Tokens<'_>, columns: Vec<(Column, Vec<VNode>)>) -> VNode {
    let mut container = VNode::element("div")
        .with_attr("id", DOCUMENT_ID)
        .with_attr("class", "resume-document");
    for (key, value) in tokens.variables() {
        container = container.with_style(key, value);
    }
    for (key, value) in tokens.container() {
        container = container.with_style(key, value);
    }

    let stack = |nodes: Vec<VNode>| {
        tokens
            .stack(tokens.scale.section_gap)
            .into_iter()
            .fold(VNode::element("div"), |node, (k, v)| node.with_style(k, v))
            .with_children(nodes)
    };

    let two_column = columns.iter().any(|(column, _)| *column != Column::Main);
    if !two_column {
        let nodes = columns.into_iter().flat_map(|(_, nodes)| nodes).collect();
        return container.with_child(stack(nodes));
    }

    let left = (LEFT_COLUMN_FRACTION * 100.0).round();
    let mut grid = VNode::element("div")
        .with_attr("class", "resume-columns")
        .with_style("display", "grid")
        .with_style(
            "grid-template-columns",
            format!("{left}% {}%", 100.0 - left),
        )
        .with_style("gap", rem(COLUMN_GAP_REM));
    for (column, nodes) in columns {
        let mut side = stack(nodes).with_attr(
            "class",
            match column {
                Column::Left => "resume-column resume-column--left",
                _ => "resume-column resume-column--right",
            },
        );
        if column == Column::Left {
            side = side.with_style("padding-right", "1rem");
        }
        grid = grid.with_child(side);
    }
    container.with_child(grid)
}

fn render_structured(
    resume: &Resume,
    highlights: &Highlights,
    previous: Option<&MotionFrame>,
) -> RenderedDocument {
    let tokens = Tokens::new(&resume.styling);
    let layout = resolve(resume);
    let geometry = estimate(&layout, &resume.styling);
    let mut renderer = SectionRenderer::new(&tokens, highlights);

    let columns: Vec<ColumnNodes> = layout
        .columns()
        .into_iter()
        .map(|(column, sections)| ColumnNodes {
            column,
            sections: sections
                .iter()
                .map(|section| (section.id.to_string(), renderer.section(section)))
                .collect(),
        })
        .collect();

    let frame = motion::capture(&columns, &geometry);
    let plain: Vec<(Column, Vec<VNode>)> = columns
        .iter()
        .map(|col| {
            let nodes = col.sections.iter().map(|(_, node)| node.clone()).collect();
            (col.column, nodes)
        })
        .collect();
    let snapshot = document_container(&tokens, plain).inner_html();

    let (animated, summary) = motion::apply(previous, columns, &geometry);
    let document = document_container(&tokens, animated);
    let document = renderer.flash(document, &HighlightTarget::Styling);

    RenderedDocument {
        mode: DocumentMode::Structured,
        markup: preview(document),
        snapshot,
        highlighted: renderer.into_highlighted(),
        page_count: Some(geometry.page_count()),
        motion: summary,
        frame: Some(frame),
    }
}

/// Caps a snapshot at `max_chars` characters, noting how much was cut.
pub fn truncate_snapshot(snapshot: &str, max_chars: usize) -> String {
    let total = snapshot.chars().count();
    if total <= max_chars {
        return snapshot.to_string();
    }
    let kept: String = snapshot.chars().take(max_chars).collect();
    let marker = VNode::comment(format!("TRUNCATED: {} chars omitted", total - max_chars));
    format!("{kept}\n{}", marker.to_html())
}
