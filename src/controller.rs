//! Batch job lifecycle.
//!
//! A [`BatchController`] owns the run/idle flag, the result log, and the
//! batch client. The flag lives as an explicit two-state machine whose
//! transitions are a pure function of (state, event), which makes the
//! "stop only resets local state" limitation a visible, testable no-op
//! transition instead of a hidden side effect.

use std::sync::Arc;

use crate::api::{BatchCaptionRequest, CaptionTransport};
use crate::client::BatchCaptionClient;
use crate::log::{LogSink, ResultLog, render_batch_header, render_error, render_item, render_violation};

/// Run state of a batch job. At most one Running job per controller; the
/// controller returns to Idle exactly once per job, whether by completion,
/// error, or advisory re-toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchJobState {
    Idle,
    Running,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchEvent {
    /// The start/cancel affordance was pressed.
    Pressed,
    /// The in-flight request completed (success or error).
    Finished,
}

/// What the controller must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    /// Clear the log and submit the request.
    Submit,
    /// Reset local state and the affordance only. The in-flight request
    /// is not aborted and no message is sent to the backend.
    AdvisoryStop,
    /// Nothing to do.
    Ignore,
}

impl BatchJobState {
    /// Pure transition function.
    pub fn apply(self, event: BatchEvent) -> (BatchJobState, BatchAction) {
        match (self, event) {
            (BatchJobState::Idle, BatchEvent::Pressed) => (BatchJobState::Running, BatchAction::Submit),
            (BatchJobState::Running, BatchEvent::Pressed) => (BatchJobState::Idle, BatchAction::AdvisoryStop),
            (_, BatchEvent::Finished) => (BatchJobState::Idle, BatchAction::Ignore),
        }
    }
}

/// Drives folder-wide captioning jobs, one at a time.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use clip_captioner::api::{BatchCaptionRequest, HttpTransport};
/// use clip_captioner::config::CaptionConfig;
/// use clip_captioner::controller::BatchController;
///
/// # async fn example() {
/// let mut controller = BatchController::new(Arc::new(HttpTransport::default()));
/// let request = BatchCaptionRequest::new("/data/clips", CaptionConfig::default());
/// controller.start_batch(request).await;
/// for line in controller.log().lines() {
///     println!("{line}");
/// }
/// # }
/// ```
pub struct BatchController {
    state: BatchJobState,
    client: BatchCaptionClient,
    log: ResultLog,
}

impl BatchController {
    pub fn new(transport: Arc<dyn CaptionTransport>) -> Self {
        Self {
            state: BatchJobState::Idle,
            client: BatchCaptionClient::new(transport),
            log: ResultLog::new(),
        }
    }

    pub fn state(&self) -> BatchJobState {
        self.state
    }

    /// The toggle label, always mirroring the current state.
    pub fn button_label(&self) -> &'static str {
        match self.state {
            BatchJobState::Running => "Cancel Batch",
            BatchJobState::Idle => "Start Batch Process / Cancel",
        }
    }

    pub fn log(&self) -> &ResultLog {
        &self.log
    }

    /// Handle a press of the start/cancel affordance.
    ///
    /// From Idle: clears the log, submits the job, renders the outcome,
    /// and returns to Idle. From Running: flips back to Idle without a
    /// second request — an advisory half-measure, not a cancellation; the
    /// in-flight job keeps running backend-side.
    pub async fn start_batch(&mut self, request: BatchCaptionRequest) {
        let (next, action) = self.state.apply(BatchEvent::Pressed);
        self.state = next;

        match action {
            BatchAction::Submit => {
                self.log.clear();
                self.log.append("Submitting batch job...".to_string());

                match self.client.submit(&request).await {
                    Ok(response) => {
                        self.log.append(render_batch_header(response.count));
                        for entry in &response.results {
                            let line = match entry {
                                Ok(item) => render_item(item),
                                Err(violation) => render_violation(violation),
                            };
                            self.log.append(line);
                        }
                        if request.config.notify_on_done {
                            log::info!("Batch complete.");
                        }
                    }
                    Err(e) => self.log.append(render_error(&e)),
                }

                let (next, _) = self.state.apply(BatchEvent::Finished);
                self.state = next;
            }
            BatchAction::AdvisoryStop | BatchAction::Ignore => {}
        }
    }
}
