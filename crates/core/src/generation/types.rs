//! Types for the image generation service boundary.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::trips::TripMode;

/// Errors from the generation service boundary.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// Transport-level failure on an outbound call.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered, but the response was malformed or incomplete.
    #[error("service error: {0}")]
    Service(String),
}

/// Opaque handle for a job queued on the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One status check result.
///
/// `done == false`, or `done == true` without a result url, both mean the
/// job is still in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobStatus {
    pub done: bool,
    pub result_url: Option<String>,
}

impl JobStatus {
    /// A job still waiting in the service's queue.
    pub fn pending() -> Self {
        Self::default()
    }

    /// A finished job whose result reference has not appeared yet.
    pub fn done_without_url() -> Self {
        Self {
            done: true,
            result_url: None,
        }
    }

    /// A finished job with a fetchable result.
    pub fn ready(url: impl Into<String>) -> Self {
        Self {
            done: true,
            result_url: Some(url.into()),
        }
    }

    /// The fetchable result url, present only when the job is genuinely
    /// finished.
    pub fn ready_url(&self) -> Option<&str> {
        if self.done {
            self.result_url.as_deref()
        } else {
            None
        }
    }
}

/// Lifecycle of an in-flight generation job.
///
/// Submitted -> Pending -> Ready, or -> Failed from either. Ready and
/// Failed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Submitted,
    Pending,
    Ready,
    Failed,
}

/// An in-flight generation job.
///
/// Lives only for the duration of one pipeline run; never persisted.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    /// Handle assigned by the generation service.
    pub id: JobId,
    /// Travel mode the job generates an image for.
    pub mode: TripMode,
    /// Current lifecycle state.
    pub state: JobState,
    /// Result url, populated once the job is ready.
    pub result_url: Option<String>,
}

impl GenerationJob {
    /// A freshly submitted job.
    pub fn submitted(id: JobId, mode: TripMode) -> Self {
        Self {
            id,
            mode,
            state: JobState::Submitted,
            result_url: None,
        }
    }

    /// The job was accepted and is waiting for the service to produce a
    /// result.
    pub fn mark_pending(&mut self) {
        self.state = JobState::Pending;
    }

    /// The job produced a fetchable result.
    pub fn mark_ready(&mut self, url: impl Into<String>) {
        self.state = JobState::Ready;
        self.result_url = Some(url.into());
    }

    /// The job can no longer produce a result.
    pub fn mark_failed(&mut self) {
        self.state = JobState::Failed;
    }
}

/// Trait for generation service backends.
///
/// A pure boundary adapter: no side effects beyond the network calls.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Queue a generation job for a mode; returns the service's job
    /// handle.
    async fn submit(&self, mode: TripMode) -> Result<JobId, GenerationError>;

    /// Check the status of a queued job. "Not ready yet" is a valid
    /// result, not an error.
    async fn status(&self, job: &JobId) -> Result<JobStatus, GenerationError>;

    /// Fetch the finished image. The full body is accumulated before
    /// returning.
    async fn download(&self, url: &str) -> Result<Vec<u8>, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_url_requires_done_and_url() {
        assert_eq!(JobStatus::pending().ready_url(), None);
        assert_eq!(JobStatus::done_without_url().ready_url(), None);
        assert_eq!(
            JobStatus::ready("http://x/img.jpg").ready_url(),
            Some("http://x/img.jpg")
        );

        // A url without the done flag is still "not ready"
        let status = JobStatus {
            done: false,
            result_url: Some("http://x/img.jpg".to_string()),
        };
        assert_eq!(status.ready_url(), None);
    }

    #[test]
    fn test_job_lifecycle_transitions() {
        let mut job = GenerationJob::submitted(JobId("j1".to_string()), TripMode::Foot);
        assert_eq!(job.state, JobState::Submitted);
        assert!(job.result_url.is_none());

        job.mark_pending();
        assert_eq!(job.state, JobState::Pending);

        job.mark_ready("http://x/img.jpg");
        assert_eq!(job.state, JobState::Ready);
        assert_eq!(job.result_url.as_deref(), Some("http://x/img.jpg"));
    }

    #[test]
    fn test_job_state_serialization() {
        assert_eq!(
            serde_json::to_string(&JobState::Submitted).unwrap(),
            "\"submitted\""
        );
        assert_eq!(serde_json::to_string(&JobState::Ready).unwrap(), "\"ready\"");
    }

    #[test]
    fn test_error_display() {
        let err = GenerationError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "network error: connection refused");

        let err = GenerationError::Service("no job id".to_string());
        assert_eq!(err.to_string(), "service error: no job id");
    }
}
