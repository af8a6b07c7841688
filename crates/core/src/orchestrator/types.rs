//! Types for the image orchestrator.

use serde::Serialize;
use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::generation::GenerationError;
use crate::trips::TripMode;

/// Errors from the poll driver.
#[derive(Debug, Error)]
pub enum PollError {
    /// The status check itself failed; propagated without retry.
    #[error(transparent)]
    Check(#[from] GenerationError),

    /// The attempt cap ran out before the job produced a result.
    #[error("gave up after {attempts} status checks")]
    TimedOut { attempts: u32 },

    /// Shutdown was signalled while waiting for the next check.
    #[error("polling cancelled by shutdown")]
    Cancelled,
}

/// A single mode's pipeline failure.
///
/// Each variant names the stage the pipeline died in; nothing was
/// persisted for the mode on this attempt.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Job submission failed.
    #[error("submit failed: {0}")]
    Submit(GenerationError),

    /// Status polling ended without a usable result.
    #[error("poll failed: {0}")]
    Poll(PollError),

    /// Result download failed.
    #[error("download failed: {0}")]
    Download(GenerationError),

    /// Persisting the image failed.
    #[error("store failed: {0}")]
    Store(ArtifactError),
}

impl PipelineError {
    /// The stage the pipeline failed in.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Submit(_) => "submit",
            PipelineError::Poll(_) => "poll",
            PipelineError::Download(_) => "download",
            PipelineError::Store(_) => "store",
        }
    }
}

/// A mode whose pipeline failed, rendered for reports and API responses.
#[derive(Debug, Clone, Serialize)]
pub struct FailedMode {
    pub mode: TripMode,
    pub stage: String,
    pub error: String,
}

/// Outcome of one orchestrator run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    /// Modes that got a new image stored this run.
    pub generated: Vec<TripMode>,
    /// Modes skipped because an image already existed or a pipeline was
    /// already in flight.
    pub skipped: Vec<TripMode>,
    /// Modes whose pipeline failed.
    pub failed: Vec<FailedMode>,
}

impl GenerationReport {
    /// Whether no pipeline failed this run.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Current status of the orchestrator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrchestratorStatus {
    /// Whether any pipeline is currently in flight.
    pub running: bool,
    /// Modes with an active pipeline.
    pub in_flight: Vec<TripMode>,
    /// Modes with a stored image.
    pub stored: Vec<TripMode>,
    /// Outcome of the most recent run, if any finished yet.
    pub last_report: Option<GenerationReport>,
}
