//! Wire types and response parsing for the captioning backend.
//!
//! The backend exposes two endpoints (field names are part of the
//! compatibility contract):
//!
//! - `POST /api/chat-caption` — multipart form with the clip and the
//!   caption settings; answers `{"caption", "frames_used"}` or `{"error"}`.
//! - `POST /api/batch-caption` — one JSON body naming a folder; answers
//!   `{"count", "results": [...]}` or `{"error"}`.
//!
//! Responses are parsed over [`serde_json::Value`] by field presence
//! because that is the contract: batch result entries are classified by
//! which of `ok` / `skipped` / `error` they carry, not by a schema.

pub mod http;

pub use http::{CaptionTransport, HttpTransport};

use serde_json::Value;

use crate::config::{CaptionConfig, SamplingType};
use crate::error::{CaptionError, ProtocolViolation};

/// A clip picked for a single-file chat caption: the raw bytes plus the
/// file name the multipart part is labelled with.
#[derive(Debug, Clone)]
pub struct ClipAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ClipAttachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// One single-file captioning request: the attachment plus the config
/// fields the chat endpoint consumes, snapshotted at build time.
#[derive(Debug, Clone)]
pub struct ChatCaptionRequest {
    pub attachment: ClipAttachment,
    pub system_prompt: String,
    pub num_frames: u32,
    pub sampling_type: SamplingType,
    pub model: String,
    pub prefill: String,
}

impl ChatCaptionRequest {
    /// Snapshot the chat-relevant subset of `config`.
    pub fn new(attachment: ClipAttachment, config: &CaptionConfig) -> Self {
        Self {
            attachment,
            system_prompt: config.system_prompt.clone(),
            num_frames: config.num_frames,
            sampling_type: config.sampling_type,
            model: config.model.clone(),
            prefill: config.prefill.clone(),
        }
    }
}

/// A successful chat caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCaptionResult {
    pub caption: String,
    pub frames_used: u32,
}

/// One folder-wide captioning request. The whole folder is processed
/// backend-side before any response arrives; there is no chunking and no
/// progress streaming.
#[derive(Debug, Clone)]
pub struct BatchCaptionRequest {
    pub target_folder: String,
    pub config: CaptionConfig,
}

impl BatchCaptionRequest {
    pub fn new(target_folder: impl Into<String>, config: CaptionConfig) -> Self {
        Self {
            target_folder: target_folder.into(),
            config,
        }
    }

    /// The JSON body for `/api/batch-caption`. `notify_on_done` is a
    /// client-side flag and is not sent.
    pub fn to_wire(&self) -> Value {
        serde_json::json!({
            "target_folder": self.target_folder,
            "system_prompt": self.config.system_prompt,
            "model": self.config.model,
            "prefill": self.config.prefill,
            "num_frames": self.config.num_frames,
            "sampling_type": self.config.sampling_type.as_str(),
            "overwrite": self.config.overwrite,
            "prepend_existing": self.config.prepend_existing,
        })
    }
}

/// One entry of a batch response, exactly one variant per entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchResultItem {
    /// Captioned; `out` is the caption file written next to the clip.
    Ok { file: String, out: String },
    /// Left unprocessed by the backend (e.g. a caption already exists).
    Skipped { file: String, reason: String },
    /// This clip failed; the remaining entries are unaffected.
    Failed { file: String, error: String },
}

/// A parsed batch response. `results` preserves response order; entries
/// that match none of the expected shapes survive as violations rather
/// than being dropped.
#[derive(Debug, Clone)]
pub struct BatchCaptionResponse {
    pub count: u64,
    pub results: Vec<Result<BatchResultItem, ProtocolViolation>>,
}

/// Map a chat-caption response body to a result.
///
/// A top-level `error` is a server error; `caption` + `frames_used` is a
/// success; anything else is malformed and counts as a transport failure.
pub fn parse_chat_response(value: &Value) -> Result<ChatCaptionResult, CaptionError> {
    if let Some(err) = value.get("error").and_then(Value::as_str) {
        return Err(CaptionError::Server(err.to_string()));
    }

    let caption = value.get("caption").and_then(Value::as_str);
    let frames_used = value.get("frames_used").and_then(Value::as_u64);
    match (caption, frames_used) {
        (Some(caption), Some(frames_used)) => Ok(ChatCaptionResult {
            caption: caption.to_string(),
            frames_used: frames_used as u32,
        }),
        _ => Err(CaptionError::Transport(
            "malformed chat-caption response".to_string(),
        )),
    }
}

/// Map a batch-caption response body to a [`BatchCaptionResponse`].
pub fn parse_batch_response(value: &Value) -> Result<BatchCaptionResponse, CaptionError> {
    if let Some(err) = value.get("error").and_then(Value::as_str) {
        return Err(CaptionError::Server(err.to_string()));
    }

    let count = value
        .get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| CaptionError::Transport("malformed batch-caption response: missing count".to_string()))?;
    let entries = value
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| CaptionError::Transport("malformed batch-caption response: missing results".to_string()))?;

    let results = entries.iter().map(classify_entry).collect();
    Ok(BatchCaptionResponse { count, results })
}

/// Classify one batch result entry.
///
/// Priority order, matching the backend's output: a true `ok` wins, then a
/// true `skipped`, then the presence of `error`. Failed entries arrive as
/// `{"ok": false, "error": ...}`, so `ok` must be checked for truth, not
/// presence. An entry fitting none of the shapes is a protocol violation.
pub fn classify_entry(entry: &Value) -> Result<BatchResultItem, ProtocolViolation> {
    let file = entry.get("file").and_then(Value::as_str).map(String::from);

    let item = if entry.get("ok").and_then(Value::as_bool) == Some(true) {
        match (&file, entry.get("out").and_then(Value::as_str)) {
            (Some(file), Some(out)) => Some(BatchResultItem::Ok {
                file: file.clone(),
                out: out.to_string(),
            }),
            _ => None,
        }
    } else if entry.get("skipped").and_then(Value::as_bool) == Some(true) {
        match (&file, entry.get("reason").and_then(Value::as_str)) {
            (Some(file), Some(reason)) => Some(BatchResultItem::Skipped {
                file: file.clone(),
                reason: reason.to_string(),
            }),
            _ => None,
        }
    } else {
        match (&file, entry.get("error").and_then(Value::as_str)) {
            (Some(file), Some(error)) => Some(BatchResultItem::Failed {
                file: file.clone(),
                error: error.to_string(),
            }),
            _ => None,
        }
    };

    item.ok_or(ProtocolViolation { file })
}
