use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use glasshouse_types::api::ErrorResponse;

use crate::{AppState, run_blocking};

pub async fn get_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, StatusCode> {
    let files = state.files.clone();
    let file = run_blocking(move || Ok(files.get_file(&filename))).await?;

    match file {
        Some(file) => Ok(Json(file).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("file not found")),
        )
            .into_response()),
    }
}
