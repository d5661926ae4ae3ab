use axum::{extract::State, Json};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    embed::decode::decode_base64_lenient,
    error::{AppError, AppResult},
    state::AppState,
};

/// Content type sent to the relay when none is declared or detected.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    /// Base64 payload, either alphabet, padding optional.
    pub data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub filename: String,
}

// ============================================================================
// Handler
// ============================================================================

/// POST /upload-base64: decode a base64 file and relay it to external storage.
///
/// Validation happens before the relay is touched: a missing or empty
/// `filename` or `data` is a 400. Relay failures are a 500 carrying the
/// relay's error text; there is no retry.
pub async fn upload_base64(
    State(state): State<AppState>,
    Json(req): Json<UploadRequest>,
) -> AppResult<Json<UploadResponse>> {
    info!(
        filename = ?req.filename,
        mime_type = ?req.mime_type,
        data_length = req.data.as_ref().map(String::len),
        "Upload request received"
    );

    let (filename, data) = match (
        req.filename.filter(|f| !f.is_empty()),
        req.data.filter(|d| !d.is_empty()),
    ) {
        (Some(filename), Some(data)) => (filename, data),
        _ => {
            info!("Rejecting upload: missing filename or data");
            return Err(AppError::Validation("Missing filename or data".into()));
        }
    };

    // Large payloads would stall the runtime if decoded inline.
    let bytes = tokio::task::spawn_blocking(move || decode_base64_lenient(&data))
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "Base64 decode task failed");
            AppError::Internal
        })?;
    info!(size = bytes.len(), "Decoded upload payload");

    let content_type = resolve_content_type(req.mime_type.as_deref(), &bytes);

    let url = state
        .relay
        .store(Bytes::from(bytes), &filename, &content_type)
        .await?;
    info!(url = %url, filename = %filename, "Upload relayed");

    Ok(Json(UploadResponse {
        success: true,
        url,
        filename,
    }))
}

// ============================================================================
// Private helpers
// ============================================================================

/// Declared MIME type if present, else one sniffed from magic bytes, else
/// [`DEFAULT_CONTENT_TYPE`].
fn resolve_content_type(declared: Option<&str>, data: &[u8]) -> String {
    declared
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .or_else(|| infer::get(data).map(|t| t.mime_type().to_string()))
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

// ── Unit tests ────────────────────────────────────────────────────────────────
