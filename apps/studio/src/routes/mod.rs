pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume aggregate
        .route("/api/v1/resume", get(handlers::handle_get_resume))
        .route(
            "/api/v1/resume/actions",
            post(handlers::handle_apply_actions),
        )
        .route("/api/v1/resume/reset", post(handlers::handle_reset))
        .route("/api/v1/resume/sections", get(handlers::handle_get_sections))
        // Rendering
        .route("/api/v1/resume/render", get(handlers::handle_render))
        .route("/api/v1/resume/snapshot", get(handlers::handle_snapshot))
        .route(
            "/api/v1/resume/freeform",
            put(handlers::handle_set_freeform).delete(handlers::handle_clear_freeform),
        )
        .route("/api/v1/highlights", get(handlers::handle_get_highlights))
        // Template gallery
        .route("/api/v1/templates", get(handlers::handle_list_templates))
        .route(
            "/api/v1/templates/:id/apply",
            post(handlers::handle_apply_template),
        )
        // Assistant
        .route("/api/v1/chat", post(handlers::handle_chat))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    use super::*;
    use crate::assistant::{Assistant, AssistantReply, AssistantTurn, LlmError};
    use crate::config::Config;

    /// Replies with fixed actions and remembers the turns it was given.
    struct StubAssistant {
        actions: Vec<Value>,
        seen: Mutex<Vec<AssistantTurn>>,
    }

    #[async_trait]
    impl Assistant for StubAssistant {
        async fn respond(&self, turn: &AssistantTurn) -> Result<AssistantReply, LlmError> {
            self.seen.lock().await.push(turn.clone());
            Ok(AssistantReply {
                message: "Done".to_string(),
                actions: self.actions.clone(),
            })
        }
    }

    fn app(assistant: Option<Arc<dyn Assistant>>) -> Router {
        build_router(AppState::new(Config::default(), assistant))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("request");
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(None), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["assistant"], false);
    }

    #[tokio::test]
    async fn test_actions_then_render() {
        let app = app(None);
        let (status, report) = send(
            &app,
            "POST",
            "/api/v1/resume/actions",
            Some(json!([
                {"type": "update_personal_info", "payload": {"name": "Ada Lovelace"}},
                {"type": "teleport", "payload": {}}
            ])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["applied"], 1);
        assert_eq!(report["skipped"], 1);

        let (_, rendered) = send(&app, "GET", "/api/v1/resume/render", None).await;
        assert_eq!(rendered["mode"], "structured");
        assert_eq!(rendered["hasContent"], true);
        assert_eq!(rendered["pageCount"], 1);
        assert!(rendered["markup"].as_str().unwrap_or_default().contains("Ada Lovelace"));
        assert_eq!(rendered["highlighted"], json!(["header"]));

        let (_, resume) = send(&app, "GET", "/api/v1/resume", None).await;
        assert_eq!(resume["personalInfo"]["name"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_sections_reflect_visibility() {
        let app = app(None);
        send(
            &app,
            "POST",
            "/api/v1/resume/actions",
            Some(json!([{"type": "update_skills", "payload": ["Rust"]}])),
        )
        .await;
        let (status, layout) = send(&app, "GET", "/api/v1/resume/sections", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(layout["columns"], "single");
        let ids: Vec<_> = layout["sections"]
            .as_array()
            .map(|s| s.iter().map(|x| x["id"].clone()).collect())
            .unwrap_or_default();
        assert_eq!(ids, vec![json!("header"), json!("skills")]);
    }

    #[tokio::test]
    async fn test_freeform_toggle_and_clear() {
        let app = app(None);
        send(
            &app,
            "POST",
            "/api/v1/resume/actions",
            Some(json!([{"type": "set_custom_html", "payload": "<p>mine</p>"}])),
        )
        .await;
        let (_, state) = send(
            &app,
            "PUT",
            "/api/v1/resume/freeform",
            Some(json!({"enabled": false})),
        )
        .await;
        assert_eq!(state, json!({"enabled": false, "hasMarkup": true}));

        let (_, state) = send(&app, "DELETE", "/api/v1/resume/freeform", None).await;
        assert_eq!(state, json!({"enabled": false, "hasMarkup": false}));
    }

    #[tokio::test]
    async fn test_snapshot_is_html() {
        let app = app(None);
        send(
            &app,
            "POST",
            "/api/v1/resume/actions",
            Some(json!([{"type": "set_custom_html", "payload": "<p>mine</p>"}])),
        )
        .await;
        let request = Request::builder()
            .uri("/api/v1/resume/snapshot")
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        assert_eq!(
            response.headers()["content-type"],
            "text/html; charset=utf-8"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert_eq!(&bytes[..], b"<p>mine</p>");
    }

    #[tokio::test]
    async fn test_templates() {
        let app = app(None);
        let (_, all) = send(&app, "GET", "/api/v1/templates", None).await;
        assert_eq!(all.as_array().map(Vec::len), Some(6));

        let (_, minimal) = send(&app, "GET", "/api/v1/templates?category=minimal", None).await;
        assert!(minimal
            .as_array()
            .is_some_and(|t| t.iter().all(|t| t["category"] == "minimal")));

        let (status, _) = send(&app, "POST", "/api/v1/templates/nope/apply", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, resume) =
            send(&app, "POST", "/api/v1/templates/modern-two-column/apply", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resume["layoutConfig"]["columns"], 2);

        let (_, highlights) = send(&app, "GET", "/api/v1/highlights", None).await;
        assert_eq!(highlights[0]["key"], "styling");
    }

    #[tokio::test]
    async fn test_reset() {
        let app = app(None);
        send(
            &app,
            "POST",
            "/api/v1/resume/actions",
            Some(json!([{"type": "update_skills", "payload": ["Rust"]}])),
        )
        .await;
        let (_, resume) = send(&app, "POST", "/api/v1/resume/reset", None).await;
        assert_eq!(resume["skills"], json!([]));
        let (_, highlights) = send(&app, "GET", "/api/v1/highlights", None).await;
        assert_eq!(highlights, json!([]));
    }

    #[tokio::test]
    async fn test_chat_without_assistant_is_unavailable() {
        let (status, body) = send(
            &app(None),
            "POST",
            "/api/v1/chat",
            Some(json!({"message": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "ASSISTANT_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_chat_applies_actions_before_next_turn() {
        let stub = Arc::new(StubAssistant {
            actions: vec![json!({"type": "add_skill", "payload": "Rust"})],
            seen: Mutex::new(Vec::new()),
        });
        let app = app(Some(stub.clone() as Arc<dyn Assistant>));

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/chat",
            Some(json!({"message": "I write Rust"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Done");
        assert_eq!(body["report"]["applied"], 1);

        send(&app, "POST", "/api/v1/chat", Some(json!({"message": "again"}))).await;
        let seen = stub.seen.lock().await;
        assert_eq!(seen.len(), 2);
        assert!(seen[1].structured.contains("\"skills\":[\"Rust\"]"));
        assert_eq!(seen[1].transcript.len(), 2);
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_message() {
        let stub: Arc<dyn Assistant> = Arc::new(StubAssistant {
            actions: Vec::new(),
            seen: Mutex::new(Vec::new()),
        });
        let (status, _) = send(
            &app(Some(stub)),
            "POST",
            "/api/v1/chat",
            Some(json!({"message": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
