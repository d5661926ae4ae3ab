//! Upload relay: hands a decoded payload to an external file host and
//! returns the public URL it assigns.

pub mod catbox;

use bytes::Bytes;
use thiserror::Error;

pub use catbox::CatboxRelay;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("storage request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("storage provider rejected upload: {0}")]
    Rejected(String),

    #[error("upload client error: {0}")]
    Client(String),
}

/// External storage for uploaded files.
///
/// Implementations make a single attempt; callers surface failures as-is.
#[axum::async_trait]
pub trait UploadRelay: Send + Sync {
    async fn store(
        &self,
        bytes: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<String, RelayError>;
}
