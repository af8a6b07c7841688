//! Static trip route handlers.

use axum::{extract::Path, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use shamrock_core::{waypoints, TripMode, Waypoint};

/// Error response
#[derive(Debug, Serialize)]
pub struct TripErrorResponse {
    pub error: String,
}

/// The waypoint route for a travel mode.
pub async fn get_waypoints(
    Path(mode): Path<String>,
) -> Result<Json<&'static [Waypoint]>, impl IntoResponse> {
    match mode.parse::<TripMode>() {
        Ok(mode) => Ok(Json(waypoints(mode))),
        Err(e) => Err((
            StatusCode::NOT_FOUND,
            Json(TripErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}
