//! Bounded-interval polling driver.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::debug;

use crate::config::GenerationConfig;
use crate::generation::{GenerationError, JobStatus};
use crate::metrics;

use super::types::PollError;

/// Poll timing parameters.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Wait between consecutive status checks.
    pub interval: Duration,
    /// Maximum number of status checks before giving up (`None` = keep
    /// polling forever).
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: Some(120),
        }
    }
}

impl From<&GenerationConfig> for PollConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.poll_interval_secs),
            max_attempts: match config.max_poll_attempts {
                0 => None,
                n => Some(n),
            },
        }
    }
}

/// Repeatedly run `check` until it reports a finished job with a result
/// url, then return that url.
///
/// "Done" without a url counts as not ready: the service can flip the
/// completion flag before the result reference is available. Errors from
/// the check are terminal; only "not ready" is retried. The wait between
/// checks suspends without blocking, so sibling pipelines keep making
/// progress. A closed shutdown channel counts as a shutdown signal.
pub async fn poll_ready<F, Fut>(
    mut check: F,
    config: &PollConfig,
    shutdown: &mut broadcast::Receiver<()>,
) -> Result<String, PollError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<JobStatus, GenerationError>>,
{
    let mut attempts: u32 = 0;

    loop {
        let status = check().await?;
        attempts += 1;
        metrics::POLL_CHECKS.inc();

        if let Some(url) = status.ready_url() {
            return Ok(url.to_string());
        }

        debug!(attempts, done = status.done, "Job not ready, waiting");

        if let Some(max) = config.max_attempts {
            if attempts >= max {
                return Err(PollError::TimedOut { attempts });
            }
        }

        tokio::select! {
            _ = shutdown.recv() => return Err(PollError::Cancelled),
            _ = tokio::time::sleep(config.interval) => {}
        }
    }
}
