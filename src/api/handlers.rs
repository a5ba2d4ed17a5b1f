//! HTTP request handlers

use super::types::{ActionsResponse, ErrorResponse, RecordingRequest, SuccessResponse};
use super::AppState;
use crate::runtime::{SessionError, SessionSnapshot};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Call lifecycle
        .route("/api/calls/:call_id/incoming", post(incoming_call))
        .route("/api/calls/:call_id/recording", post(recording_completed))
        .route("/api/calls/:call_id/hangup", post(call_ended))
        // Session inspection
        .route("/api/calls/:call_id", get(get_call))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Call Lifecycle
// ============================================================

async fn incoming_call(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Result<Json<ActionsResponse>, AppError> {
    let actions = state.engine.on_call_started(&call_id).await?;
    Ok(Json(ActionsResponse { call_id, actions }))
}

async fn recording_completed(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
    payload: Result<Json<RecordingRequest>, JsonRejection>,
) -> Result<Json<ActionsResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let tag = req.tag();
    let outcome = req.into_outcome().map_err(AppError::BadRequest)?;

    let actions = state
        .engine
        .on_recording_completed(&call_id, outcome, tag)
        .await?;
    Ok(Json(ActionsResponse { call_id, actions }))
}

async fn call_ended(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Json<SuccessResponse> {
    state.engine.on_call_ended(&call_id).await;
    Json(SuccessResponse { ok: true })
}

async fn get_call(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state.engine.registry().snapshot(&call_id).await?;
    Ok(Json(snapshot))
}

async fn get_version() -> &'static str {
    concat!("ivr-engine ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Duplicate(_) | SessionError::StaleRecording { .. } => {
                AppError::Conflict(e.to_string())
            }
            SessionError::NotFound(_) => AppError::NotFound(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
