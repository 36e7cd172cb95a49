//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - The talent submission route
//! - Health check
//! - Error-to-response translation

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit};
use talent_core::{talent::TalentDispatcher, upload::UploadFilter};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload filter for resume files.
    pub uploads: Arc<UploadFilter>,
    /// Sends submissions to the admin inbox.
    pub dispatcher: Arc<TalentDispatcher>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    // Room for the text fields and multipart framing around a full-size file.
    let body_limit = usize::try_from(state.uploads.config().max_file_size.saturating_mul(2))
        .unwrap_or(usize::MAX);

    Router::new()
        .merge(routes::api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
