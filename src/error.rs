use thiserror::Error;

/// Errors surfaced by the captioning clients and controller.
///
/// Every variant displays as a bare message so callers can render the
/// uniform `Error: {msg}` log line without variant-specific formatting.
/// None of these abort the session; they are converted to a single log
/// line at the client/controller boundary.
#[derive(Debug, Error)]
pub enum CaptionError {
    /// No clip was attached to a chat-caption submission. Detected before
    /// any network call is made.
    #[error("no file attached")]
    NoFileAttached,

    /// The request could not be sent, or the response body could not be
    /// read or parsed as the expected JSON shape.
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a top-level `error` field. For a batch
    /// run this short-circuits per-item rendering entirely.
    #[error("{0}")]
    Server(String),
}

/// A batch result entry that matches none of the three expected shapes
/// (ok / skipped / failed).
///
/// Violations are fatal for that entry only: the entry is still rendered
/// (distinctly) and the remaining entries are processed normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolViolation {
    /// The entry's `file` field, when it carried a usable one.
    pub file: Option<String>,
}
