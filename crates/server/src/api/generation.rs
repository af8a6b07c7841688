//! Generation status API handlers.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use shamrock_core::{GenerationReport, TripMode};

use crate::state::AppState;

/// Response for the generation status endpoint.
#[derive(Debug, Serialize)]
pub struct GenerationStatusResponse {
    /// Whether generation is enabled at all.
    pub enabled: bool,
    /// Whether any pipeline is currently in flight.
    pub running: bool,
    /// Modes with an active pipeline.
    pub in_flight: Vec<TripMode>,
    /// Modes with a stored image.
    pub stored: Vec<TripMode>,
    /// Outcome of the most recent run, if any finished yet.
    pub last_report: Option<GenerationReport>,
}

/// Current state of trip image generation.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<GenerationStatusResponse> {
    match state.orchestrator() {
        Some(orchestrator) => {
            let status = orchestrator.status().await;
            Json(GenerationStatusResponse {
                enabled: true,
                running: status.running,
                in_flight: status.in_flight,
                stored: status.stored,
                last_report: status.last_report,
            })
        }
        None => {
            let stored = state
                .store()
                .list_meta()
                .map(|metas| metas.into_iter().map(|m| m.mode).collect())
                .unwrap_or_default();

            Json(GenerationStatusResponse {
                enabled: false,
                running: false,
                in_flight: vec![],
                stored,
                last_report: None,
            })
        }
    }
}
