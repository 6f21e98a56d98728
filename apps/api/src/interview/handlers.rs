//! Axum route handlers for the Interview API.
//!
//! Every action handler locks its session for the whole action, so requests
//! against one session are applied one at a time.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::model::{EvaluationModel, MAX_ROUNDS};
use crate::interview::report::InterviewReport;
use crate::interview::session::{Session, StateKind};
use crate::interview::store::SessionHandle;
use crate::interview::view::SessionView;
use crate::resume::extract_resume_text;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SelectModelRequest {
    pub model: EvaluationModel,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

async fn lookup(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

fn view(state: &AppState, session: &Session) -> Json<SessionView> {
    Json(SessionView::new(session, state.interview.llm_enabled()))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let handle = state.sessions.create().await;
    let session = handle.lock().await;
    info!(session_id = %session.id, "Session created");
    (StatusCode::CREATED, view(&state, &session))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = lookup(&state, id).await?;
    let session = handle.lock().await;
    Ok(view(&state, &session))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    info!(session_id = %id, "Session discarded");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/model
///
/// Takes effect on the next evaluation.
pub async fn handle_select_model(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectModelRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = lookup(&state, id).await?;
    let mut session = handle.lock().await;
    session.selected_model = request.model;
    Ok(view(&state, &session))
}

/// POST /api/v1/sessions/:id/resume
///
/// Multipart upload; the PDF must be in the `file` field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let handle = lookup(&state, id).await?;
    let pdf = read_file_field(&mut multipart).await?;
    let resume_text = extract_resume_text(pdf).await?;

    let mut session = handle.lock().await;
    state.interview.load_resume(&mut session, resume_text)?;
    Ok(view(&state, &session))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            return field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")));
        }
    }
    Err(AppError::Validation(
        "Multipart field 'file' with the resume PDF is required".to_string(),
    ))
}

/// POST /api/v1/sessions/:id/question
///
/// Generates the round's question if it does not exist yet.
pub async fn handle_ensure_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = lookup(&state, id).await?;
    let mut session = handle.lock().await;
    state.interview.ensure_question(&mut session).await?;
    Ok(view(&state, &session))
}

/// POST /api/v1/sessions/:id/answer
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = lookup(&state, id).await?;
    let mut session = handle.lock().await;
    state
        .interview
        .submit_answer(&mut session, &request.answer)
        .await?;
    Ok(view(&state, &session))
}

/// POST /api/v1/sessions/:id/clarification
pub async fn handle_clarify(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = lookup(&state, id).await?;
    let mut session = handle.lock().await;
    state.interview.clarify(&mut session).await?;
    Ok(view(&state, &session))
}

/// POST /api/v1/sessions/:id/next
pub async fn handle_next(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = lookup(&state, id).await?;
    let mut session = handle.lock().await;
    state.interview.advance(&mut session)?;
    Ok(view(&state, &session))
}

/// GET /api/v1/sessions/:id/report
///
/// Only available once every round is done.
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewReport>, AppError> {
    let handle = lookup(&state, id).await?;
    let session = handle.lock().await;
    if session.state().kind() != StateKind::Completed {
        return Err(AppError::Conflict(format!(
            "Report is available after {MAX_ROUNDS} rounds; {} completed so far",
            session.state().round()
        )));
    }
    Ok(Json(InterviewReport::from_history(session.state().history())))
}
