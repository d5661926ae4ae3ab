//! Link-preview embed generator and base64 upload relay.
//!
//! - `GET /embed` renders an HTML page whose Open Graph / Twitter Card tags
//!   come from query parameters ([`embed`]).
//! - `POST /upload-base64` forwards a base64 file to an external host
//!   ([`relay`]) and returns its public URL.

pub mod config;
pub mod embed;
pub mod error;
pub mod handlers;
pub mod relay;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Build the application router. `max_body_bytes` bounds the upload body.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/embed", get(handlers::embed::get_embed))
        .route(
            "/upload-base64",
            post(handlers::upload::upload_base64).layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .with_state(state)
}
