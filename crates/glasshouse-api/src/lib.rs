pub mod files;
pub mod messages;
pub mod pages;

use std::sync::Arc;

use axum::{Json, Router, http::StatusCode, routing::get};
use tracing::error;

use glasshouse_db::MessageStore;
use glasshouse_files::FileStore;
use glasshouse_types::api::{HealthResponse, HelloResponse};

use crate::pages::RenderVariant;

pub type AppState = Arc<AppStateInner>;

/// Shared state for all route handlers. Which implementations sit behind
/// the trait objects, and which renderer runs, is decided once by the
/// composition root.
pub struct AppStateInner {
    pub messages: Arc<dyn MessageStore>,
    pub files: Arc<dyn FileStore>,
    pub render: RenderVariant,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home).post(pages::submit_message))
        .route("/hello", get(hello))
        .route("/health", get(health))
        .route(
            "/messages",
            get(messages::list_messages)
                .post(messages::create_message)
                .delete(messages::delete_all_messages),
        )
        .route("/messages/{id}", get(messages::get_message))
        .route("/files/{*filename}", get(files::get_file))
        .with_state(state)
}

async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello, world!".to_string(),
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Run a blocking store call off the async runtime, mapping both a join
/// failure and a store failure to a 500.
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T, StatusCode>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("Store call failed: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
