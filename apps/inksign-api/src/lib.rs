//! InkSign API - document storage and ink signatures over HTTP
//!
//! Provides REST endpoints for:
//! - Uploading, listing and replacing PDFs
//! - Viewing and downloading stored PDFs
//! - Painting signature strokes onto a stored PDF

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod locks;
pub mod models;
pub mod state;
pub mod storage;

pub use config::Config;
pub use state::AppState;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    // The web client is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.max_upload_bytes;

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Document storage
        .route("/upload", post(handlers::upload))
        .route("/pdfrecords", get(handlers::list_records))
        .route("/view/:id", get(handlers::view))
        .route("/download/:id", get(handlers::download))
        .route("/update/:id", put(handlers::replace))
        // Signing
        .route("/add-signature/:id", put(handlers::add_signature))
        // Add middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
