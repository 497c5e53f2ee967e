use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::{BatchCaptionRequest, ChatCaptionRequest};
use crate::clip;
use crate::error::CaptionError;

/// Default backend address, matching the backend's bind port.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5057";

/// The HTTP seam between the clients and the captioning backend.
///
/// Implementations return the raw response body as JSON; shape
/// interpretation stays in [`parse_chat_response`](super::parse_chat_response)
/// and [`parse_batch_response`](super::parse_batch_response). Tests
/// substitute a fake implementation, so no real network is needed.
#[async_trait]
pub trait CaptionTransport: Send + Sync {
    /// One `POST /api/chat-caption` multipart request.
    async fn chat_caption(&self, request: &ChatCaptionRequest) -> Result<Value, CaptionError>;
    /// One `POST /api/batch-caption` JSON request.
    async fn batch_caption(&self, request: &BatchCaptionRequest) -> Result<Value, CaptionError>;
}

/// reqwest-backed transport.
///
/// No timeout is set: a batch response only arrives after the backend has
/// processed the whole folder, which can take a long while.
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value, CaptionError> {
        // Error statuses still carry a JSON body with an `error` field,
        // so the status itself is not checked here.
        let text = resp
            .text()
            .await
            .map_err(|e| CaptionError::Transport(format!("failed to read response: {e}")))?;
        serde_json::from_str(&text)
            .map_err(|e| CaptionError::Transport(format!("failed to parse response JSON: {e}")))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl CaptionTransport for HttpTransport {
    async fn chat_caption(&self, request: &ChatCaptionRequest) -> Result<Value, CaptionError> {
        let part = Part::bytes(request.attachment.bytes.clone())
            .file_name(request.attachment.file_name.clone())
            .mime_str(clip::mime_type(&request.attachment.file_name))
            .map_err(|e| CaptionError::Transport(format!("invalid clip mime: {e}")))?;

        let form = Form::new()
            .part("file", part)
            .text("system_prompt", request.system_prompt.clone())
            .text("num_frames", request.num_frames.to_string())
            .text("sampling_type", request.sampling_type.as_str())
            .text("model", request.model.clone())
            .text("prefill", request.prefill.clone());

        let resp = self
            .client
            .post(self.url("/api/chat-caption"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CaptionError::Transport(format!("chat-caption request failed: {e}")))?;

        Self::read_json(resp).await
    }

    async fn batch_caption(&self, request: &BatchCaptionRequest) -> Result<Value, CaptionError> {
        let resp = self
            .client
            .post(self.url("/api/batch-caption"))
            .json(&request.to_wire())
            .send()
            .await
            .map_err(|e| CaptionError::Transport(format!("batch-caption request failed: {e}")))?;

        Self::read_json(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let transport = HttpTransport::new("http://localhost:5057/");
        assert_eq!(transport.url("/api/chat-caption"), "http://localhost:5057/api/chat-caption");

        let transport = HttpTransport::new("http://localhost:5057");
        assert_eq!(transport.url("/api/batch-caption"), "http://localhost:5057/api/batch-caption");
    }

    #[test]
    fn default_points_at_local_backend() {
        let transport = HttpTransport::default();
        assert_eq!(transport.base_url, DEFAULT_BASE_URL);
    }
}
