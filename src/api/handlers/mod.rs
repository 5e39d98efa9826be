use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::state::{AppState, UpdateError};
use crate::export::ScrollCard;
use crate::models::*;
use crate::zodiac::Zodiac;

// ============================================================
// Error Handling
// ============================================================

/// Map a rejected store update to a response. Transition errors are safe to
/// show; they describe what the user did, not the server.
fn update_error(e: UpdateError) -> (StatusCode, String) {
    match e {
        UpdateError::NotFound => (StatusCode::NOT_FOUND, "Session not found".to_string()),
        UpdateError::Rejected(SessionError::Input(e)) => {
            tracing::debug!("Invalid input: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        UpdateError::Rejected(e) => {
            tracing::debug!("Rejected transition: {}", e);
            (StatusCode::CONFLICT, e.to_string())
        }
    }
}

fn not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Session not found".to_string())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Zodiac
// ============================================================

#[derive(Debug, Serialize)]
pub struct ZodiacResponse {
    pub year: i32,
    pub index: usize,
    pub label: &'static str,
    pub english_name: &'static str,
}

pub async fn get_zodiac(Path(year): Path<i32>) -> Json<ZodiacResponse> {
    let sign = Zodiac::from_year(year);
    Json(ZodiacResponse {
        year,
        index: sign.index(),
        label: sign.label(),
        english_name: sign.english_name(),
    })
}

// ============================================================
// Sessions
// ============================================================

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<Session>) {
    let session = state.sessions.create();
    tracing::info!(session = %session.id(), "session created");
    (StatusCode::CREATED, Json(session))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, (StatusCode, String)> {
    state.sessions.get(id).map(Json).ok_or_else(not_found)
}

/// Submit a reading and wait for it to settle.
///
/// The session is moved to `Loading` before the provider is called, so a
/// concurrent submit for the same session is turned away with 409. The
/// provider call and settle step run in their own task so the session still
/// settles if the client goes away mid-request.
pub async fn divine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UserInput>,
) -> Result<Json<Session>, (StatusCode, String)> {
    let submitted = input.clone();
    state
        .sessions
        .update(id, move |s| s.submit(submitted))
        .map_err(update_error)?;

    let settle = tokio::spawn(async move {
        let outcome = state.oracle.divine(&input).await;
        state.sessions.update(id, move |s| match outcome {
            Ok(result) => s.succeed(result),
            Err(e) => s.fail(e.to_string()),
        })
    });

    let settled = settle
        .await
        .map_err(|e| {
            tracing::error!(session = %id, error = %e, "settle task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        })?
        .map_err(update_error)?;

    tracing::info!(session = %id, state = settled.state().as_str(), "reading settled");
    Ok(Json(settled))
}

pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, (StatusCode, String)> {
    state
        .sessions
        .update(id, Session::reset)
        .map(Json)
        .map_err(update_error)
}

/// Drop a session once the user is done with it. Refused while a reading is
/// in flight.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.sessions.remove(id).map_err(update_error)?;
    tracing::info!(session = %id, "session deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_scroll(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state.sessions.get(id).ok_or_else(not_found)?;
    let (Some(input), Some(result)) = (session.input(), session.result()) else {
        return Err((StatusCode::CONFLICT, "No reading to export".to_string()));
    };
    let card = ScrollCard::new(input, result);
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        card.to_string(),
    ))
}
