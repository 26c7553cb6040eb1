use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use glasshouse_types::api::{CreateMessageRequest, ErrorResponse};

use crate::{AppState, run_blocking};

pub async fn list_messages(State(state): State<AppState>) -> Result<Response, StatusCode> {
    let store = state.messages.clone();
    let messages = run_blocking(move || store.list()).await?;
    Ok(Json(messages).into_response())
}

pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, StatusCode> {
    let store = state.messages.clone();
    let message = run_blocking(move || store.find_by_id(&id)).await?;

    match message {
        Some(message) => Ok(Json(message).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("message not found")),
        )
            .into_response()),
    }
}

pub async fn create_message(
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<Response, StatusCode> {
    let body = req.body.as_deref().map(str::trim).unwrap_or_default().to_string();
    if body.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("message body is required")),
        )
            .into_response());
    }

    let store = state.messages.clone();
    let message = run_blocking(move || store.insert(&body)).await?;

    match message {
        Some(message) => Ok((StatusCode::CREATED, Json(message)).into_response()),
        // The insert ran but the re-read found nothing; an injected
        // statement can delete the row before it is fetched back.
        None => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("failed to create message")),
        )
            .into_response()),
    }
}

pub async fn delete_all_messages(State(state): State<AppState>) -> Result<StatusCode, StatusCode> {
    let store = state.messages.clone();
    run_blocking(move || store.clear()).await?;
    Ok(StatusCode::NO_CONTENT)
}
