pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post, put},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
/// The single-page interview UI. It only talks to the JSON API below.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/model",
            put(handlers::handle_select_model),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            post(handlers::handle_upload_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/sessions/:id/question",
            post(handlers::handle_ensure_question),
        )
        .route(
            "/api/v1/sessions/:id/answer",
            post(handlers::handle_submit_answer),
        )
        .route(
            "/api/v1/sessions/:id/clarification",
            post(handlers::handle_clarify),
        )
        .route("/api/v1/sessions/:id/next", post(handlers::handle_next))
        .route(
            "/api/v1/sessions/:id/report",
            get(handlers::handle_get_report),
        )
        .with_state(state)
}
