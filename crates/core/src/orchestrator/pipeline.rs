//! Submit -> poll -> download -> store for one travel mode.

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::artifact::{ArtifactStore, TripImage, TripImageMeta};
use crate::generation::{GenerationClient, GenerationJob};
use crate::metrics;
use crate::trips::TripMode;

use super::poll::{poll_ready, PollConfig};
use super::types::PipelineError;

/// Run the full generation pipeline for one mode.
///
/// Steps are strictly ordered: submit precedes any poll, the terminal
/// poll precedes the download, the download precedes the store write.
/// Nothing is persisted unless every step succeeds; the store write is
/// the final step.
pub async fn run_pipeline(
    mode: TripMode,
    client: &dyn GenerationClient,
    store: &dyn ArtifactStore,
    poll_config: &PollConfig,
    shutdown: &mut broadcast::Receiver<()>,
) -> Result<TripImageMeta, PipelineError> {
    let id = match client.submit(mode).await {
        Ok(id) => id,
        Err(e) => {
            metrics::PIPELINE_FAILURES.with_label_values(&["submit"]).inc();
            return Err(PipelineError::Submit(e));
        }
    };

    let mut job = GenerationJob::submitted(id, mode);
    info!(mode = %mode, job_id = %job.id, "Generation job submitted");

    job.mark_pending();
    let job_id = job.id.clone();
    let polled = poll_ready(|| client.status(&job_id), poll_config, shutdown).await;
    let url = match polled {
        Ok(url) => url,
        Err(e) => {
            job.mark_failed();
            metrics::PIPELINE_FAILURES.with_label_values(&["poll"]).inc();
            return Err(PipelineError::Poll(e));
        }
    };

    job.mark_ready(url.clone());
    debug!(mode = %mode, job_id = %job.id, url = %url, "Generation result ready");

    let payload = match client.download(&url).await {
        Ok(payload) => payload,
        Err(e) => {
            job.mark_failed();
            metrics::PIPELINE_FAILURES.with_label_values(&["download"]).inc();
            return Err(PipelineError::Download(e));
        }
    };

    metrics::DOWNLOADED_BYTES.inc_by(payload.len() as u64);
    debug!(mode = %mode, bytes = payload.len(), "Image downloaded");

    let image = TripImage::from_payload(mode, payload);
    let meta = match store.put(image) {
        Ok(meta) => meta,
        Err(e) => {
            job.mark_failed();
            metrics::PIPELINE_FAILURES.with_label_values(&["store"]).inc();
            return Err(PipelineError::Store(e));
        }
    };

    info!(mode = %mode, bytes = meta.size_bytes, "Trip image stored");

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactError, SqliteArtifactStore};
    use crate::generation::{GenerationError, JobStatus};
    use crate::testing::MockGenerationClient;
    use std::time::Duration;

    fn fast_poll() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(10),
            max_attempts: Some(10),
        }
    }

    #[tokio::test]
    async fn test_successful_run_stores_image() {
        let client = MockGenerationClient::new();
        client
            .set_job(
                crate::trips::TripMode::Foot,
                "j1",
                vec![JobStatus::ready("http://x/img.jpg")],
            )
            .await;
        client.set_payload("http://x/img.jpg", vec![9u8; 42]).await;

        let store = SqliteArtifactStore::in_memory().unwrap();
        let (tx, mut rx) = broadcast::channel(1);

        let meta = run_pipeline(
            crate::trips::TripMode::Foot,
            &client,
            &store,
            &fast_poll(),
            &mut rx,
        )
        .await
        .unwrap();

        assert_eq!(meta.size_bytes, 42);
        let stored = store.get(crate::trips::TripMode::Foot).unwrap();
        assert_eq!(stored.payload.len(), 42);
        drop(tx);
    }

    #[tokio::test]
    async fn test_submit_failure_persists_nothing() {
        let client = MockGenerationClient::new();
        client
            .fail_submit(
                crate::trips::TripMode::Bike,
                GenerationError::Network("refused".to_string()),
            )
            .await;

        let store = SqliteArtifactStore::in_memory().unwrap();
        let (tx, mut rx) = broadcast::channel(1);

        let err = run_pipeline(
            crate::trips::TripMode::Bike,
            &client,
            &store,
            &fast_poll(),
            &mut rx,
        )
        .await
        .unwrap_err();

        assert_eq!(err.stage(), "submit");
        assert!(matches!(
            store.get(crate::trips::TripMode::Bike),
            Err(ArtifactError::NotFound(_))
        ));
        drop(tx);
    }

    #[tokio::test]
    async fn test_download_failure_persists_nothing() {
        let client = MockGenerationClient::new();
        client
            .set_job(
                crate::trips::TripMode::Car,
                "j2",
                vec![JobStatus::ready("http://x/broken.jpg")],
            )
            .await;
        client
            .fail_download(
                "http://x/broken.jpg",
                GenerationError::Network("reset".to_string()),
            )
            .await;

        let store = SqliteArtifactStore::in_memory().unwrap();
        let (tx, mut rx) = broadcast::channel(1);

        let err = run_pipeline(
            crate::trips::TripMode::Car,
            &client,
            &store,
            &fast_poll(),
            &mut rx,
        )
        .await
        .unwrap_err();

        assert_eq!(err.stage(), "download");
        assert!(matches!(
            store.get(crate::trips::TripMode::Car),
            Err(ArtifactError::NotFound(_))
        ));
        drop(tx);
    }

    #[tokio::test]
    async fn test_poll_timeout_surfaces_as_poll_stage() {
        let client = MockGenerationClient::new();
        client
            .set_job(
                crate::trips::TripMode::Foot,
                "j3",
                vec![JobStatus::pending()],
            )
            .await;

        let store = SqliteArtifactStore::in_memory().unwrap();
        let (tx, mut rx) = broadcast::channel(1);

        let poll = PollConfig {
            interval: Duration::from_millis(1),
            max_attempts: Some(2),
        };

        let err = run_pipeline(crate::trips::TripMode::Foot, &client, &store, &poll, &mut rx)
            .await
            .unwrap_err();

        assert_eq!(err.stage(), "poll");
        assert_eq!(client.status_count().await, 2);
        drop(tx);
    }
}
