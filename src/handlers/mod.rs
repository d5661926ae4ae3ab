pub mod embed;
pub mod upload;

use axum::Json;
use serde_json::{json, Value};

/// GET /health: liveness probe. The service has no backing store to check.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "embed-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
