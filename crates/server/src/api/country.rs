//! Country facts API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use shamrock_core::CountryFacts;

use crate::state::AppState;

/// Error response
#[derive(Debug, Serialize)]
pub struct CountryErrorResponse {
    pub error: String,
}

/// Proxied country facts for the destination country.
pub async fn get_country(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountryFacts>, impl IntoResponse> {
    match state.country().fetch().await {
        Ok(facts) => Ok(Json(facts)),
        Err(e) => {
            warn!("Country facts lookup failed: {}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(CountryErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
