//! Axum router and request/response DTOs.
//!
//! Three routes: `POST /api/chat` (turn processing), `POST /api/contact`
//! (explicit contact submission), `GET /health`. CORS is configured from
//! settings; the widget is embedded on third-party pages.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderValue, Method, header};
use axum::response::Json;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use parlor_engine::{TurnEngine, TurnRequest};

use crate::error::ApiError;

/// Shared state accessible from handlers.
#[derive(Clone)]
pub struct AppState {
    /// The turn orchestrator.
    pub engine: Arc<TurnEngine>,
    /// When the server started.
    pub start_time: Instant,
}

/// Build the router with all routes and the CORS layer.
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/contact", post(contact_handler))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(parsed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/chat` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Visitor message. Required and non-empty.
    #[serde(default)]
    pub message: Option<String>,
    /// Session identity from a prior turn, if any.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// `POST /api/chat` response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Assistant reply.
    pub response: String,
    /// Session identity to send with the next turn.
    pub session_id: String,
    /// Whether contact information was captured during this turn.
    pub contact_captured: bool,
}

/// `POST /api/contact` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    /// Session the contact belongs to. Required.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Optional visitor name.
    #[serde(default)]
    pub name: Option<String>,
    /// Visitor email. Required and valid.
    #[serde(default)]
    pub email: Option<String>,
}

/// `POST /api/contact` response body.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// Caller-facing acknowledgement.
    pub message: String,
}

/// `GET /health` response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Seconds since startup.
    pub uptime_secs: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /api/chat
async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = req.message.unwrap_or_default();
    if message.is_empty() {
        return Err(ApiError::bad_request("Message is required"));
    }

    let outcome = state
        .engine
        .process_turn(TurnRequest {
            message,
            session_id: req.session_id,
        })
        .await?;

    Ok(Json(ChatResponse {
        response: outcome.reply,
        session_id: outcome.session_id,
        contact_captured: outcome.contact_captured,
    }))
}

/// POST /api/contact
async fn contact_handler(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, ApiError> {
    let Some(session_id) = req.session_id.filter(|s| !s.is_empty()) else {
        return Err(ApiError::bad_request("Session ID is required"));
    };
    let email = req.email.unwrap_or_default();

    state
        .engine
        .submit_contact(&session_id, req.name.as_deref(), &email)?;

    Ok(Json(ContactResponse {
        success: true,
        message: "Thank you! We'll be in touch soon.".into(),
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use parlor_core::chat::ChatMessage;
    use parlor_llm::{CompletionBackend, CompletionError};
    use parlor_mailer::{DisabledTransport, MailerConfig, NotificationDispatcher};
    use parlor_store::ChatStore;
    use parlor_store::connection::open_pool;
    use tower::ServiceExt;

    struct StubBackend {
        fail: bool,
    }

    #[async_trait]
    impl CompletionBackend for StubBackend {
        async fn complete(
            &self,
            _system_prompt: &str,
            _history: &[ChatMessage],
            user_message: &str,
        ) -> Result<String, CompletionError> {
            if self.fail {
                Err(CompletionError::Api {
                    status: 500,
                    message: "down".into(),
                })
            } else {
                Ok(format!("re: {user_message}"))
            }
        }
    }

    struct Harness {
        app: Router,
        store: Arc<ChatStore>,
        _dir: tempfile::TempDir,
    }

    fn harness(fail_completion: bool) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let pool = open_pool(&dir.path().join("chat.db"), 2).unwrap();
        let store = Arc::new(ChatStore::new(pool));

        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::new(DisabledTransport),
            MailerConfig::default(),
        ));
        let engine = Arc::new(TurnEngine::new(
            Arc::clone(&store),
            Arc::new(StubBackend {
                fail: fail_completion,
            }),
            dispatcher,
            "preamble",
            10,
        ));

        let state = AppState {
            engine,
            start_time: Instant::now(),
        };
        Harness {
            app: router(state, &["*".to_owned()]),
            store,
            _dir: dir,
        }
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 100_000)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let h = harness(false);
        let resp = h
            .app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let parsed = body_json(resp).await;
        assert_eq!(parsed["status"], "ok");
        assert!(parsed["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn chat_happy_path() {
        let h = harness(false);
        let resp = h
            .app
            .oneshot(post_json("/api/chat", serde_json::json!({"message": "Hello"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let parsed = body_json(resp).await;
        assert_eq!(parsed["response"], "re: Hello");
        assert_eq!(parsed["contactCaptured"], false);
        assert!(
            parsed["sessionId"]
                .as_str()
                .unwrap()
                .starts_with("sess_")
        );
    }

    #[tokio::test]
    async fn chat_missing_message_is_400() {
        let h = harness(false);
        let resp = h
            .app
            .oneshot(post_json("/api/chat", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Message is required");
    }

    #[tokio::test]
    async fn chat_empty_message_is_400() {
        let h = harness(false);
        let resp = h
            .app
            .oneshot(post_json("/api/chat", serde_json::json!({"message": ""})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_completion_failure_is_502() {
        let h = harness(true);
        let resp = h
            .app
            .oneshot(post_json("/api/chat", serde_json::json!({"message": "hi"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(resp).await["error"], "AI service is unavailable");
    }

    #[tokio::test]
    async fn chat_capture_is_reported() {
        let h = harness(false);
        let resp = h
            .app
            .oneshot(post_json(
                "/api/chat",
                serde_json::json!({"message": "I'm Jane, jane@corp.co"}),
            ))
            .await
            .unwrap();
        let parsed = body_json(resp).await;
        assert_eq!(parsed["contactCaptured"], true);
    }

    #[tokio::test]
    async fn contact_happy_path() {
        let h = harness(false);
        let session = h.store.resolve_or_create(None).unwrap();

        let resp = h
            .app
            .oneshot(post_json(
                "/api/contact",
                serde_json::json!({"sessionId": session.id, "name": "Jane", "email": "jane@corp.co"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let parsed = body_json(resp).await;
        assert_eq!(parsed["success"], true);

        let stored = h.store.session(&session.id).unwrap().unwrap();
        assert_eq!(stored.visitor_email, "jane@corp.co");
    }

    #[tokio::test]
    async fn contact_missing_session_id_is_400() {
        let h = harness(false);
        let resp = h
            .app
            .oneshot(post_json(
                "/api/contact",
                serde_json::json!({"email": "jane@corp.co"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Session ID is required");
    }

    #[tokio::test]
    async fn contact_unknown_session_is_404() {
        let h = harness(false);
        let resp = h
            .app
            .oneshot(post_json(
                "/api/contact",
                serde_json::json!({"sessionId": "sess_missing", "email": "jane@corp.co"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn contact_invalid_email_is_400() {
        let h = harness(false);
        let session = h.store.resolve_or_create(None).unwrap();
        let resp = h
            .app
            .oneshot(post_json(
                "/api/contact",
                serde_json::json!({"sessionId": session.id, "email": "nope"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Valid email is required");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let h = harness(false);
        let resp = h
            .app
            .oneshot(
                Request::builder()
                    .uri("/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn session_persists_across_requests() {
        let h = harness(false);
        let first = h
            .app
            .clone()
            .oneshot(post_json("/api/chat", serde_json::json!({"message": "one"})))
            .await
            .unwrap();
        let session_id = body_json(first).await["sessionId"]
            .as_str()
            .unwrap()
            .to_owned();

        let second = h
            .app
            .oneshot(post_json(
                "/api/chat",
                serde_json::json!({"message": "two", "sessionId": session_id}),
            ))
            .await
            .unwrap();
        let parsed = body_json(second).await;
        assert_eq!(parsed["sessionId"], session_id);

        let transcript = h.store.transcript(&session_id).unwrap().unwrap();
        assert_eq!(transcript.messages.len(), 4);
    }
}
