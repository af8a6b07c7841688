//! Mock generation client for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::generation::{GenerationClient, GenerationError, JobId, JobStatus};
use crate::trips::TripMode;

/// A recorded client call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Submit(TripMode),
    Status(String),
    Download(String),
}

/// Scripted behavior for one mode's job.
#[derive(Debug)]
struct JobScript {
    job_id: String,
    /// Statuses returned by successive status calls; the last one repeats
    /// once the queue drains.
    statuses: VecDeque<JobStatus>,
    last: JobStatus,
}

/// Mock implementation of the GenerationClient trait.
///
/// Provides controllable behavior for testing:
/// - Script status responses per mode
/// - Map result urls to payloads
/// - Inject submit/status/download failures
/// - Record every call for assertions
///
/// # Example
///
/// ```rust,ignore
/// let client = MockGenerationClient::new();
///
/// // Job "j1" reports pending once, then ready
/// client.set_job(TripMode::Foot, "j1", vec![
///     JobStatus::pending(),
///     JobStatus::ready("http://x/img.jpg"),
/// ]).await;
/// client.set_payload("http://x/img.jpg", vec![0u8; 100]).await;
///
/// // Run the pipeline, then check what was called
/// assert_eq!(client.submit_count().await, 1);
/// ```
#[derive(Clone)]
pub struct MockGenerationClient {
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    scripts: Arc<RwLock<HashMap<TripMode, JobScript>>>,
    payloads: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    submit_errors: Arc<RwLock<HashMap<TripMode, GenerationError>>>,
    status_errors: Arc<RwLock<HashMap<String, GenerationError>>>,
    download_errors: Arc<RwLock<HashMap<String, GenerationError>>>,
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerationClient {
    /// Create a new mock client with no scripted jobs.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(RwLock::new(Vec::new())),
            scripts: Arc::new(RwLock::new(HashMap::new())),
            payloads: Arc::new(RwLock::new(HashMap::new())),
            submit_errors: Arc::new(RwLock::new(HashMap::new())),
            status_errors: Arc::new(RwLock::new(HashMap::new())),
            download_errors: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Script the job for a mode: submit returns `job_id`, successive
    /// status calls walk `statuses` and repeat the last entry.
    pub async fn set_job(&self, mode: TripMode, job_id: impl Into<String>, statuses: Vec<JobStatus>) {
        let queue: VecDeque<JobStatus> = statuses.into();
        let last = queue.back().cloned().unwrap_or_default();
        self.scripts.write().await.insert(
            mode,
            JobScript {
                job_id: job_id.into(),
                statuses: queue,
                last,
            },
        );
    }

    /// Convenience: a job that is ready on the first status call, with
    /// its payload registered.
    pub async fn set_ready_job(
        &self,
        mode: TripMode,
        job_id: impl Into<String>,
        url: impl Into<String>,
        payload: Vec<u8>,
    ) {
        let url = url.into();
        self.set_job(mode, job_id, vec![JobStatus::ready(url.clone())])
            .await;
        self.set_payload(url, payload).await;
    }

    /// Register the payload served for a result url.
    pub async fn set_payload(&self, url: impl Into<String>, payload: Vec<u8>) {
        self.payloads.write().await.insert(url.into(), payload);
    }

    /// Make every submit for a mode fail with the given error.
    pub async fn fail_submit(&self, mode: TripMode, error: GenerationError) {
        self.submit_errors.write().await.insert(mode, error);
    }

    /// Make every status check for a job id fail with the given error.
    pub async fn fail_status(&self, job_id: impl Into<String>, error: GenerationError) {
        self.status_errors.write().await.insert(job_id.into(), error);
    }

    /// Make every download of a url fail with the given error.
    pub async fn fail_download(&self, url: impl Into<String>, error: GenerationError) {
        self.download_errors.write().await.insert(url.into(), error);
    }

    /// All recorded calls, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Number of submit calls recorded.
    pub async fn submit_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, RecordedCall::Submit(_)))
            .count()
    }

    /// Number of status calls recorded.
    pub async fn status_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, RecordedCall::Status(_)))
            .count()
    }

    /// Number of download calls recorded.
    pub async fn download_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, RecordedCall::Download(_)))
            .count()
    }

    /// Whether any recorded call touched the given mode's job.
    pub async fn touched_mode(&self, mode: TripMode) -> bool {
        let job_id = self
            .scripts
            .read()
            .await
            .get(&mode)
            .map(|s| s.job_id.clone());

        self.calls.read().await.iter().any(|call| match call {
            RecordedCall::Submit(m) => *m == mode,
            RecordedCall::Status(id) => job_id.as_deref() == Some(id.as_str()),
            RecordedCall::Download(_) => false,
        })
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn submit(&self, mode: TripMode) -> Result<JobId, GenerationError> {
        self.calls.write().await.push(RecordedCall::Submit(mode));

        if let Some(err) = self.submit_errors.read().await.get(&mode) {
            return Err(err.clone());
        }

        self.scripts
            .read()
            .await
            .get(&mode)
            .map(|script| JobId(script.job_id.clone()))
            .ok_or_else(|| {
                GenerationError::Service(format!("no job scripted for mode: {}", mode))
            })
    }

    async fn status(&self, job: &JobId) -> Result<JobStatus, GenerationError> {
        self.calls
            .write()
            .await
            .push(RecordedCall::Status(job.0.clone()));

        if let Some(err) = self.status_errors.read().await.get(&job.0) {
            return Err(err.clone());
        }

        let mut scripts = self.scripts.write().await;
        let script = scripts
            .values_mut()
            .find(|s| s.job_id == job.0)
            .ok_or_else(|| GenerationError::Service(format!("unknown job id: {}", job)))?;

        Ok(script.statuses.pop_front().unwrap_or_else(|| script.last.clone()))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, GenerationError> {
        self.calls
            .write()
            .await
            .push(RecordedCall::Download(url.to_string()));

        if let Some(err) = self.download_errors.read().await.get(url) {
            return Err(err.clone());
        }

        self.payloads
            .read()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| GenerationError::Network(format!("no payload registered for: {}", url)))
    }
}
