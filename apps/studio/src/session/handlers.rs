use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::actions::DispatchReport;
use crate::errors::AppError;
use crate::highlight::ActiveHighlight;
use crate::layout::resolve;
use crate::models::template::{ResumeTemplate, TemplateCategory};
use crate::render::motion::MotionSummary;
use crate::render::DocumentMode;
use crate::session::schedule_expiry;
use crate::state::AppState;
use crate::store::templates::{gallery, templates_by_category};
use crate::store::Resume;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub mode: DocumentMode,
    pub markup: String,
    pub page_count: Option<u32>,
    pub highlighted: Vec<String>,
    pub motion: MotionSummary,
    pub has_content: bool,
}

#[derive(Deserialize)]
pub struct FreeformRequest {
    pub enabled: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeformState {
    pub enabled: bool,
    pub has_markup: bool,
}

#[derive(Deserialize)]
pub struct TemplateQuery {
    pub category: Option<TemplateCategory>,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub report: DispatchReport,
}

fn freeform_state(resume: &Resume) -> FreeformState {
    FreeformState {
        enabled: resume.custom_html_mode,
        has_markup: resume.custom_html.is_some(),
    }
}

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<Resume> {
    Json(state.session.lock().await.resume.clone())
}

/// POST /api/v1/resume/actions
pub async fn handle_apply_actions(
    State(state): State<AppState>,
    Json(actions): Json<Vec<Value>>,
) -> Json<DispatchReport> {
    Json(state.session.lock().await.apply_actions(&actions))
}

/// POST /api/v1/resume/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<Resume> {
    let mut session = state.session.lock().await;
    session.reset();
    info!("Session reset");
    Json(session.resume.clone())
}

/// GET /api/v1/resume/sections
pub async fn handle_get_sections(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let session = state.session.lock().await;
    let layout = serde_json::to_value(resolve(&session.resume)).map_err(anyhow::Error::from)?;
    Ok(Json(layout))
}

/// GET /api/v1/resume/render
pub async fn handle_render(State(state): State<AppState>) -> Json<RenderResponse> {
    let (rendered, tickets, has_content) = {
        let mut session = state.session.lock().await;
        let (rendered, tickets) = session.render();
        (rendered, tickets, session.resume.has_content())
    };
    schedule_expiry(&state.session, tickets);

    Json(RenderResponse {
        mode: rendered.mode,
        markup: rendered.markup,
        page_count: rendered.page_count,
        highlighted: rendered.highlighted,
        motion: rendered.motion,
        has_content,
    })
}

/// GET /api/v1/resume/snapshot
pub async fn handle_snapshot(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state
        .session
        .lock()
        .await
        .snapshot(state.config.snapshot_max_chars);
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], snapshot)
}

/// PUT /api/v1/resume/freeform
pub async fn handle_set_freeform(
    State(state): State<AppState>,
    Json(req): Json<FreeformRequest>,
) -> Json<FreeformState> {
    let mut session = state.session.lock().await;
    session.set_freeform_mode(req.enabled);
    Json(freeform_state(&session.resume))
}

/// DELETE /api/v1/resume/freeform
pub async fn handle_clear_freeform(State(state): State<AppState>) -> Json<FreeformState> {
    let mut session = state.session.lock().await;
    session.clear_custom_html();
    Json(freeform_state(&session.resume))
}

/// GET /api/v1/highlights
pub async fn handle_get_highlights(State(state): State<AppState>) -> Json<Vec<ActiveHighlight>> {
    Json(state.session.lock().await.highlights.active())
}

/// GET /api/v1/templates
pub async fn handle_list_templates(
    Query(query): Query<TemplateQuery>,
) -> Json<Vec<&'static ResumeTemplate>> {
    let templates = match query.category {
        Some(category) => templates_by_category(category),
        None => gallery().iter().collect(),
    };
    Json(templates)
}

/// POST /api/v1/templates/:id/apply
pub async fn handle_apply_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Resume>, AppError> {
    let mut session = state.session.lock().await;
    if !session.apply_template(&id) {
        return Err(AppError::NotFound(format!("Template '{id}' not found")));
    }
    info!("Applied template {id}");
    Ok(Json(session.resume.clone()))
}

/// POST /api/v1/chat
///
/// The session lock is released while the assistant is thinking; the turn gate
/// keeps a second chat turn from starting before this one's actions land.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let assistant = state
        .assistant
        .clone()
        .ok_or(AppError::AssistantUnavailable)?;
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let _turn = state.turn_gate.lock().await;
    let turn = state
        .session
        .lock()
        .await
        .assistant_turn(message, state.config.snapshot_max_chars)
        .map_err(anyhow::Error::from)?;

    let reply = assistant.respond(&turn).await?;

    let report = state.session.lock().await.complete_turn(message, &reply);
    info!(
        "Chat turn: {} actions applied, {} skipped",
        report.applied, report.skipped
    );
    Ok(Json(ChatResponse {
        message: reply.message,
        report,
    }))
}
