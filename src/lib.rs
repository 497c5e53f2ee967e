//! # clip-captioner
//!
//! Client for a video clip captioning backend: submit one clip for a chat
//! caption, or point the backend at a folder for a batch job, and render
//! the outcomes as ordered log lines.
//!
//! The backend does the heavy lifting (frame extraction and
//! vision-language inference); this crate owns the job lifecycle, the two
//! request/response protocols, and the partial-failure reporting.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use clip_captioner::api::{BatchCaptionRequest, ClipAttachment, HttpTransport};
//! use clip_captioner::client::ChatCaptionClient;
//! use clip_captioner::config::CaptionConfig;
//! use clip_captioner::controller::BatchController;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let transport = Arc::new(HttpTransport::default());
//!     let config = CaptionConfig::default();
//!
//!     // Caption a single clip.
//!     let chat = ChatCaptionClient::new(transport.clone());
//!     let bytes = std::fs::read("clip.mp4")?;
//!     let result = chat
//!         .submit(Some(ClipAttachment::new("clip.mp4", bytes)), &config)
//!         .await?;
//!     println!("[frames used: {}] {}", result.frames_used, result.caption);
//!
//!     // Caption a whole folder in one request.
//!     let mut controller = BatchController::new(transport);
//!     let request = BatchCaptionRequest::new("/data/clips", config);
//!     controller.start_batch(request).await;
//!     for line in controller.log().lines() {
//!         println!("{line}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Failure reporting
//!
//! A batch response reports every clip: captioned (`✓`), skipped (`↷`),
//! or failed (`✗`), in backend order. A failed clip never aborts the rest
//! of the run; a top-level server error replaces the item lines with a
//! single `Error:` line.
//!
//! Pressing start while a job runs only resets local state and the toggle
//! label — the in-flight request is not aborted and the backend keeps
//! processing. See [`controller::BatchAction::AdvisoryStop`].
//!
//! ## Modules
//!
//! - [`api`] — wire types, response parsing, and the HTTP transport seam
//! - [`client`] — the chat and batch captioning clients
//! - [`clip`] — supported clip extensions and MIME detection
//! - [`config`] — captioning settings and JSON load/save
//! - [`controller`] — the batch job state machine and driver
//! - [`error`] — error taxonomy
//! - [`log`] — the append-only result log and its render templates

pub mod api;
pub mod client;
pub mod clip;
pub mod config;
pub mod controller;
pub mod error;
pub mod log;

pub use api::{
    BatchCaptionRequest, BatchCaptionResponse, BatchResultItem, CaptionTransport,
    ChatCaptionRequest, ChatCaptionResult, ClipAttachment, HttpTransport,
};
pub use client::{BatchCaptionClient, ChatCaptionClient};
pub use config::{CaptionConfig, SamplingType};
pub use controller::{BatchController, BatchEvent, BatchJobState};
pub use error::{CaptionError, ProtocolViolation};
pub use log::{LogSink, ResultLog};
