//! HTTP surface for the cadenza composition catalog.
//!
//! # API Endpoints
//!
//! | Method | Path                     | Description                          |
//! |--------|--------------------------|--------------------------------------|
//! | GET    | `/health`                | Health check                         |
//! | GET    | `/api/composition`       | List compositions (query filters)    |
//! | POST   | `/api/composition`       | Create a composition                 |
//! | GET    | `/api/composition/{id}`  | Fetch one composition                |
//! | PATCH  | `/api/composition/{id}`  | Partially update a composition       |
//! | DELETE | `/api/composition/{id}`  | Delete a composition                 |
//! | GET    | `/api/composer`          | List composers                       |
//! | GET    | `/api/composer/{id}`     | Fetch one composer                   |
//! | DELETE | `/api/composer/{id}`     | Delete a composer and its works      |

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;

use cadenza_core::Catalog;

pub mod api;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::ApiError;

/// Application state shared across HTTP handlers.
///
/// The catalog owns a single SQLite connection, so requests take turns on
/// it through the mutex.
#[derive(Debug, Clone)]
pub struct AppState {
    catalog: Arc<Mutex<Catalog>>,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
        }
    }

    /// Run one catalog operation while holding the connection.
    pub(crate) fn with_catalog<T>(
        &self,
        f: impl FnOnce(&Catalog) -> cadenza_core::Result<T>,
    ) -> Result<T, ApiError> {
        let catalog = self.catalog.lock().map_err(|_| ApiError::Unavailable)?;
        f(&catalog).map_err(ApiError::from)
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route(
            "/api/composition",
            get(api::list_compositions).post(api::create_composition),
        )
        .route(
            "/api/composition/{id}",
            get(api::get_composition)
                .patch(api::update_composition)
                .delete(api::delete_composition),
        )
        .route("/api/composer", get(api::list_composers))
        .route(
            "/api/composer/{id}",
            get(api::get_composer).delete(api::delete_composer),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `listen_addr` and serve until Ctrl-C.
pub async fn serve(listen_addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind {listen_addr}"))?;
    tracing::info!("cadenza listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("cadenza stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
    }
}
