//! The result log and its render templates.
//!
//! Both clients' outcomes end up here as plain text lines. The sink is
//! append-only and ordered: item lines appear in exactly the order the
//! backend returned them, and a new batch run clears the log before its
//! request goes out, so lines from different runs never interleave.

use crate::api::{BatchResultItem, ChatCaptionResult};
use crate::error::{CaptionError, ProtocolViolation};

/// An ordered, append-only text sink.
///
/// `append` never fails and never reorders or drops lines. Injected into
/// the clients and controller so tests can substitute their own sink.
pub trait LogSink {
    /// Drop all lines. Called once per batch run, before submission.
    fn clear(&mut self);
    /// Add one line at the end.
    fn append(&mut self, line: String);
}

/// The in-memory result log. Session-scoped; nothing is persisted.
#[derive(Debug, Default)]
pub struct ResultLog {
    lines: Vec<String>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl LogSink for ResultLog {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn append(&mut self, line: String) {
        self.lines.push(line);
    }
}

/// `Processed {count} files`
pub fn render_batch_header(count: u64) -> String {
    format!("Processed {count} files")
}

/// `✓ a.mp4 -> a.txt` / `↷ b.mp4 (skipped: exists)` / `✗ c.mp4: boom`
pub fn render_item(item: &BatchResultItem) -> String {
    match item {
        BatchResultItem::Ok { file, out } => format!("✓ {file} -> {out}"),
        BatchResultItem::Skipped { file, reason } => format!("↷ {file} (skipped: {reason})"),
        BatchResultItem::Failed { file, error } => format!("✗ {file}: {error}"),
    }
}

/// Distinct marker for an entry that matched none of the expected shapes.
/// The entry is rendered rather than dropped.
pub fn render_violation(violation: &ProtocolViolation) -> String {
    let file = violation.file.as_deref().unwrap_or("<unknown>");
    format!("? {file}: unrecognized result entry")
}

/// `[frames used: 8] a dog runs`
pub fn render_chat_result(result: &ChatCaptionResult) -> String {
    format!("[frames used: {}] {}", result.frames_used, result.caption)
}

/// `Error: {message}` — the one template every error kind renders through.
pub fn render_error(error: &CaptionError) -> String {
    format!("Error: {error}")
}
