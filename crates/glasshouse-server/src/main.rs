use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use glasshouse_api::AppStateInner;
use glasshouse_api::pages::RenderVariant;
use glasshouse_db::{
    Database, MessageStore, SecureMessageRepository, VulnerableMessageRepository,
};
use glasshouse_files::{FileStore, SecureFileRepository, VulnerableFileRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glasshouse=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("GLASSHOUSE_DB_PATH").unwrap_or_else(|_| "data/glasshouse.db".into());
    let public_dir = std::env::var("GLASSHOUSE_PUBLIC_DIR").unwrap_or_else(|_| "public".into());
    let mode = std::env::var("GLASSHOUSE_MODE").unwrap_or_else(|_| "vulnerable".into());
    let host = std::env::var("GLASSHOUSE_HOST").unwrap_or_else(|_| "127.0.0.1".into());
    let port: u16 = std::env::var("GLASSHOUSE_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = Arc::new(Database::open_path(&db_path)?);

    // The composition root is the single place that decides which
    // implementations sit behind the capability traits.
    let (messages, files, render): (Arc<dyn MessageStore>, Arc<dyn FileStore>, RenderVariant) =
        match mode.as_str() {
            "vulnerable" => {
                warn!("Running in VULNERABLE mode: injection, traversal, and XSS paths are live");
                (
                    Arc::new(VulnerableMessageRepository::new(db)),
                    Arc::new(VulnerableFileRepository::new(&public_dir)),
                    RenderVariant::Raw,
                )
            }
            "secure" => (
                Arc::new(SecureMessageRepository::new(db)),
                Arc::new(SecureFileRepository::new(&public_dir)?),
                RenderVariant::Escaped,
            ),
            other => anyhow::bail!(
                "unknown GLASSHOUSE_MODE '{other}' (expected 'vulnerable' or 'secure')"
            ),
        };

    let state = Arc::new(AppStateInner {
        messages,
        files,
        render,
    });

    let app = glasshouse_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Glasshouse listening on {} ({} mode)", addr, mode);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
