use std::time::Duration;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, StatusCode};
use url::Url;

use super::{RelayError, UploadRelay};

pub const DEFAULT_API_URL: &str = "https://catbox.moe/user/api.php";
pub const USER_AGENT: &str = concat!("embed-server/", env!("CARGO_PKG_VERSION"));

/// Relay backed by the Catbox file host API.
///
/// One multipart `fileupload` request per call. The client (and its
/// connection pool) is built once and shared across requests.
pub struct CatboxRelay {
    client: ReqwestClient,
    endpoint: Url,
    userhash: Option<String>,
}

impl CatboxRelay {
    pub fn new(
        endpoint: Url,
        userhash: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RelayError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            userhash,
        })
    }

    fn form(&self, bytes: Bytes, filename: &str, content_type: &str) -> Result<Form, RelayError> {
        let len = bytes.len() as u64;
        let part = Part::stream_with_length(bytes, len)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|_| {
                RelayError::Client(format!("invalid content type '{content_type}'"))
            })?;

        let mut form = Form::new().text("reqtype", "fileupload");
        if let Some(hash) = &self.userhash {
            form = form.text("userhash", hash.clone());
        }
        Ok(form.part("fileToUpload", part))
    }
}

#[axum::async_trait]
impl UploadRelay for CatboxRelay {
    async fn store(
        &self,
        bytes: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<String, RelayError> {
        let form = self.form(bytes, filename, content_type)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        parse_response(status, &body)
    }
}

/// Catbox answers with the file URL as plain text; anything else is an
/// error message.
fn parse_response(status: StatusCode, body: &str) -> Result<String, RelayError> {
    let body = body.trim();
    if status.is_success() && body.starts_with("http") {
        return Ok(body.to_string());
    }

    tracing::warn!(status = %status, body = %body, "Catbox rejected upload");
    if body.is_empty() {
        Err(RelayError::Rejected(format!("HTTP {status}")))
    } else {
        Err(RelayError::Rejected(body.to_string()))
    }
}
