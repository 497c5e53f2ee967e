//! The two captioning clients.
//!
//! [`ChatCaptionClient`] issues one single-file request; [`BatchCaptionClient`]
//! issues one folder-wide request. Both hold a [`CaptionTransport`] handle,
//! send exactly one request per call, and never retry.

use std::sync::Arc;

use crate::api::{
    BatchCaptionRequest, BatchCaptionResponse, CaptionTransport, ChatCaptionRequest,
    ChatCaptionResult, ClipAttachment, parse_batch_response, parse_chat_response,
};
use crate::config::CaptionConfig;
use crate::error::CaptionError;
use crate::log::{LogSink, render_chat_result, render_error};

/// Client for `POST /api/chat-caption`.
pub struct ChatCaptionClient {
    transport: Arc<dyn CaptionTransport>,
}

impl ChatCaptionClient {
    pub fn new(transport: Arc<dyn CaptionTransport>) -> Self {
        Self { transport }
    }

    /// Submit one clip for captioning.
    ///
    /// A missing attachment fails immediately with the fixed validation
    /// error and issues no network call.
    pub async fn submit(
        &self,
        attachment: Option<ClipAttachment>,
        config: &CaptionConfig,
    ) -> Result<ChatCaptionResult, CaptionError> {
        let attachment = attachment.ok_or(CaptionError::NoFileAttached)?;
        let request = ChatCaptionRequest::new(attachment, config);
        let body = self.transport.chat_caption(&request).await?;
        parse_chat_response(&body)
    }

    /// Submit one clip and render the outcome into `sink`.
    ///
    /// With an attachment, two transcript lines precede the result line;
    /// with none, exactly the validation message is appended.
    pub async fn submit_logged(
        &self,
        attachment: Option<ClipAttachment>,
        config: &CaptionConfig,
        sink: &mut dyn LogSink,
    ) {
        if let Some(ref clip) = attachment {
            sink.append(format!("Attached: {}", clip.file_name));
            sink.append("Thinking... extracting frames and querying the model".to_string());
        }
        match self.submit(attachment, config).await {
            Ok(result) => sink.append(render_chat_result(&result)),
            Err(e) => sink.append(render_error(&e)),
        }
    }
}

/// Client for `POST /api/batch-caption`.
///
/// The whole folder is processed backend-side before any response arrives,
/// so a single call covers the entire job.
pub struct BatchCaptionClient {
    transport: Arc<dyn CaptionTransport>,
}

impl BatchCaptionClient {
    pub fn new(transport: Arc<dyn CaptionTransport>) -> Self {
        Self { transport }
    }

    /// Submit one folder-wide captioning job.
    pub async fn submit(
        &self,
        request: &BatchCaptionRequest,
    ) -> Result<BatchCaptionResponse, CaptionError> {
        let body = self.transport.batch_caption(request).await?;
        parse_batch_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    use crate::log::ResultLog;

    /// Canned-response transport that counts calls.
    struct FakeTransport {
        response: Value,
        calls: Mutex<usize>,
    }

    impl FakeTransport {
        fn new(response: Value) -> Arc<Self> {
            Arc::new(Self { response, calls: Mutex::new(0) })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CaptionTransport for FakeTransport {
        async fn chat_caption(&self, _request: &ChatCaptionRequest) -> Result<Value, CaptionError> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.response.clone())
        }

        async fn batch_caption(&self, _request: &BatchCaptionRequest) -> Result<Value, CaptionError> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.response.clone())
        }
    }

    fn attachment() -> ClipAttachment {
        ClipAttachment::new("clip.mp4", vec![0u8; 16])
    }

    // ── ChatCaptionClient ────────────────────────────────────────────

    #[tokio::test]
    async fn chat_no_file_makes_no_network_call() {
        let transport = FakeTransport::new(json!({"caption": "x", "frames_used": 1}));
        let client = ChatCaptionClient::new(transport.clone());

        let result = client.submit(None, &CaptionConfig::default()).await;
        assert!(matches!(result, Err(CaptionError::NoFileAttached)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn chat_success_maps_response() {
        let transport = FakeTransport::new(json!({"caption": "a dog runs", "frames_used": 8}));
        let client = ChatCaptionClient::new(transport.clone());

        let result = client
            .submit(Some(attachment()), &CaptionConfig::default())
            .await
            .unwrap();
        assert_eq!(result.caption, "a dog runs");
        assert_eq!(result.frames_used, 8);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn chat_server_error_maps_response() {
        let transport = FakeTransport::new(json!({"error": "Unsupported file extension"}));
        let client = ChatCaptionClient::new(transport);

        let result = client
            .submit(Some(attachment()), &CaptionConfig::default())
            .await;
        match result {
            Err(CaptionError::Server(msg)) => assert_eq!(msg, "Unsupported file extension"),
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn chat_logged_no_file_appends_only_validation_line() {
        let transport = FakeTransport::new(json!({"caption": "x", "frames_used": 1}));
        let client = ChatCaptionClient::new(transport.clone());
        let mut log = ResultLog::new();

        client
            .submit_logged(None, &CaptionConfig::default(), &mut log)
            .await;
        assert_eq!(log.lines(), ["Error: no file attached"]);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn chat_logged_success_renders_template() {
        let transport = FakeTransport::new(json!({"caption": "a dog runs", "frames_used": 8}));
        let client = ChatCaptionClient::new(transport);
        let mut log = ResultLog::new();

        client
            .submit_logged(Some(attachment()), &CaptionConfig::default(), &mut log)
            .await;
        assert_eq!(log.lines().len(), 3);
        assert_eq!(log.lines()[0], "Attached: clip.mp4");
        assert_eq!(log.lines()[2], "[frames used: 8] a dog runs");
    }

    // ── BatchCaptionClient ───────────────────────────────────────────

    #[tokio::test]
    async fn batch_submit_parses_response() {
        let transport = FakeTransport::new(json!({
            "count": 1,
            "results": [{"file": "a.mp4", "ok": true, "out": "a.txt"}]
        }));
        let client = BatchCaptionClient::new(transport.clone());

        let request = BatchCaptionRequest::new("/clips", CaptionConfig::default());
        let response = client.submit(&request).await.unwrap();
        assert_eq!(response.count, 1);
        assert_eq!(response.results.len(), 1);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn batch_submit_surfaces_server_error() {
        let transport = FakeTransport::new(json!({"error": "Invalid target folder"}));
        let client = BatchCaptionClient::new(transport);

        let request = BatchCaptionRequest::new("/missing", CaptionConfig::default());
        assert!(matches!(
            client.submit(&request).await,
            Err(CaptionError::Server(_))
        ));
    }
}
