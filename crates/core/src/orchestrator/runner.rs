//! Image orchestrator implementation.
//!
//! Tops up the image store at startup: one pipeline per missing travel
//! mode, skipping modes that already have a stored image or an active
//! pipeline. Pipelines run concurrently and fail independently.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{error, info, warn};

use crate::artifact::ArtifactStore;
use crate::generation::GenerationClient;
use crate::metrics;
use crate::trips::TripMode;

use super::pipeline::run_pipeline;
use super::poll::PollConfig;
use super::types::{FailedMode, GenerationReport, OrchestratorStatus};

/// Drives trip-image generation for the fixed mode set.
pub struct ImageOrchestrator {
    client: Arc<dyn GenerationClient>,
    store: Arc<dyn ArtifactStore>,
    poll_config: PollConfig,

    // Runtime state
    in_flight: Mutex<HashSet<TripMode>>,
    last_report: RwLock<Option<GenerationReport>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ImageOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        client: Arc<dyn GenerationClient>,
        store: Arc<dyn ArtifactStore>,
        poll_config: PollConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            client,
            store,
            poll_config,
            in_flight: Mutex::new(HashSet::new()),
            last_report: RwLock::new(None),
            shutdown_tx,
        }
    }

    /// Generate images for every mode that has none stored.
    ///
    /// Modes with a stored image are skipped individually, so a partially
    /// populated store gets topped up. A mode whose pipeline is already
    /// in flight (an overlapping call) is skipped too. Per-mode failures
    /// do not abort sibling modes, are never retried here, and leave
    /// nothing persisted for the failed mode.
    pub async fn ensure_images(&self) -> GenerationReport {
        let missing = match self.store.missing_modes() {
            Ok(missing) => missing,
            Err(e) => {
                error!("Failed to query stored images: {}", e);
                let report = GenerationReport {
                    generated: vec![],
                    skipped: vec![],
                    failed: TripMode::ALL
                        .iter()
                        .map(|&mode| FailedMode {
                            mode,
                            stage: "store".to_string(),
                            error: e.to_string(),
                        })
                        .collect(),
                };
                *self.last_report.write().await = Some(report.clone());
                return report;
            }
        };

        // Claim the missing modes not already being generated; at most
        // one pipeline per mode is active at any time.
        let claimed: Vec<TripMode> = {
            let mut in_flight = self.in_flight.lock().await;
            missing
                .iter()
                .copied()
                .filter(|&mode| in_flight.insert(mode))
                .collect()
        };

        let mut report = GenerationReport {
            skipped: TripMode::ALL
                .iter()
                .copied()
                .filter(|mode| !claimed.contains(mode))
                .collect(),
            ..GenerationReport::default()
        };

        if claimed.is_empty() {
            info!("All trip images present, nothing to generate");
            *self.last_report.write().await = Some(report.clone());
            return report;
        }

        info!(modes = ?claimed, "Generating trip images");

        let results = join_all(claimed.iter().map(|&mode| {
            let client = Arc::clone(&self.client);
            let store = Arc::clone(&self.store);
            let poll_config = self.poll_config.clone();
            let mut shutdown = self.shutdown_tx.subscribe();

            async move {
                let start = Instant::now();
                let result = run_pipeline(
                    mode,
                    client.as_ref(),
                    store.as_ref(),
                    &poll_config,
                    &mut shutdown,
                )
                .await;
                (mode, start.elapsed(), result)
            }
        }))
        .await;

        {
            let mut in_flight = self.in_flight.lock().await;
            for mode in &claimed {
                in_flight.remove(mode);
            }
        }

        for (mode, elapsed, result) in results {
            match result {
                Ok(meta) => {
                    metrics::PIPELINE_RUNS
                        .with_label_values(&[mode.as_str(), "stored"])
                        .inc();
                    metrics::PIPELINE_DURATION
                        .with_label_values(&["stored"])
                        .observe(elapsed.as_secs_f64());
                    info!(mode = %mode, bytes = meta.size_bytes, "Trip image generated");
                    report.generated.push(mode);
                }
                Err(e) => {
                    metrics::PIPELINE_RUNS
                        .with_label_values(&[mode.as_str(), "failed"])
                        .inc();
                    metrics::PIPELINE_DURATION
                        .with_label_values(&["failed"])
                        .observe(elapsed.as_secs_f64());
                    warn!(mode = %mode, "Trip image generation failed: {}", e);
                    report.failed.push(FailedMode {
                        mode,
                        stage: e.stage().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if report.all_succeeded() {
            info!(
                generated = report.generated.len(),
                skipped = report.skipped.len(),
                "Trip image generation complete"
            );
        } else {
            warn!(
                generated = report.generated.len(),
                failed = report.failed.len(),
                "Trip image generation finished with failures"
            );
        }

        *self.last_report.write().await = Some(report.clone());
        report
    }

    /// Signal in-flight pipelines to stop at their next suspension point.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Snapshot of orchestrator state for the status endpoint.
    pub async fn status(&self) -> OrchestratorStatus {
        let in_flight: Vec<TripMode> = {
            let guard = self.in_flight.lock().await;
            TripMode::ALL
                .iter()
                .copied()
                .filter(|mode| guard.contains(mode))
                .collect()
        };

        let stored = self
            .store
            .list_meta()
            .map(|metas| metas.into_iter().map(|m| m.mode).collect())
            .unwrap_or_default();

        OrchestratorStatus {
            running: !in_flight.is_empty(),
            in_flight,
            stored,
            last_report: self.last_report.read().await.clone(),
        }
    }
}
