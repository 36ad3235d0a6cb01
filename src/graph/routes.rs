use super::page::index_page;
use crate::style;
use crate::sync::{ChartOption, Outcome, Session};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across handlers. Events are handled one at a time under the lock.
pub struct AppState {
    pub session: Mutex<Session>,
}

#[derive(Serialize)]
struct EventResponse {
    rendered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    option: Option<ChartOption>,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/option", get(option_handler))
        .route("/api/filters", get(filters_handler))
        .route("/api/event", post(event_handler))
        .route("/api/positions", get(positions_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server hosting an interactive session
pub async fn serve(
    session: Session,
    port: u16,
    open_browser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        session: Mutex::new(session),
    });
    let app = router(state);

    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    style::header("flowmap server");
    style::status(&format!("Open in browser: {}", style::url(&url)));
    style::hint("Press Ctrl+C to stop");

    if open_browser {
        if let Err(e) = open::that(&url) {
            style::warning(&format!("Could not open browser: {}", e));
        }
    }

    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    Html(index_page())
}

async fn option_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(session.option())
}

async fn filters_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(*session.controller().filters())
}

async fn event_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Response {
    let mut session = state.session.lock().await;
    match session.apply(&payload) {
        Ok(outcome) => {
            let rendered = outcome == Outcome::Rendered;
            let option = if rendered {
                Some(session.option())
            } else {
                None
            };
            Json(EventResponse { rendered, option }).into_response()
        }
        Err(e) => {
            tracing::warn!("Dropped engine event: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

async fn positions_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.lock().await;
    session.positions_tsv()
}
