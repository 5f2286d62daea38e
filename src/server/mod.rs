//! # HTTP Server for Certificate Templates
//!
//! Serves the template store and certificate rendering over a JSON API.
//!
//! ## Usage
//!
//! ```bash
//! laurel serve --listen 0.0.0.0:8080 --data-dir ./templates
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/api` | Service banner |
//! | GET | `/api/templates` | List templates |
//! | POST | `/api/templates` | Create a template |
//! | GET | `/api/templates/:id` | Fetch a template |
//! | DELETE | `/api/templates/:id` | Delete a template |
//! | POST | `/api/certificates/generate` | Template plus values to fill |
//! | POST | `/api/certificates/render` | Download the filled document |
//! | POST | `/api/certificates/preview` | PNG preview at preview zoom |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::{LaurelError, Result};
use crate::store::{FileStore, MemoryStore, TemplateStore};

/// Request body limit; templates carry their background inline.
const BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Build the application router over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api", get(handlers::templates::root))
        .route(
            "/api/templates",
            get(handlers::templates::list).post(handlers::templates::create),
        )
        .route(
            "/api/templates/:id",
            get(handlers::templates::get_one).delete(handlers::templates::delete),
        )
        .route(
            "/api/certificates/generate",
            post(handlers::certificates::generate),
        )
        .route(
            "/api/certificates/render",
            post(handlers::certificates::render),
        )
        .route(
            "/api/certificates/preview",
            post(handlers::certificates::preview),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use laurel::config::RenderConfig;
/// use laurel::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), laurel::error::LaurelError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     data_dir: None,
///     render: RenderConfig::default(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<()> {
    let fonts = config.render.font_book()?;
    let store: Arc<dyn TemplateStore> = match &config.data_dir {
        Some(dir) => Arc::new(FileStore::open(dir).await?),
        None => Arc::new(MemoryStore::new()),
    };

    tracing::info!(
        listen = %config.listen_addr,
        data_dir = ?config.data_dir,
        font_dir = ?config.render.font_dir,
        export_scale = config.render.export_scale,
        "Laurel HTTP server starting"
    );
    if config.data_dir.is_none() {
        tracing::warn!("No data dir given, templates are kept in memory only");
    }

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            LaurelError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {}: {}", config.listen_addr, e),
            ))
        })?;

    let app = router(Arc::new(AppState::new(config, store, fonts)));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
