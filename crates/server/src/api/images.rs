//! Trip image API handlers.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use shamrock_core::{ArtifactError, TripMode};

use crate::state::AppState;

/// Error response
#[derive(Debug, Serialize)]
pub struct ImageErrorResponse {
    pub error: String,
}

/// Serve the stored image for a travel mode.
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ImageErrorResponse>)> {
    let mode: TripMode = match mode.parse() {
        Ok(mode) => mode,
        Err(e) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ImageErrorResponse {
                    error: e.to_string(),
                }),
            ));
        }
    };

    match state.store().get(mode) {
        Ok(image) => Ok((
            [(header::CONTENT_TYPE, image.content_type.clone())],
            image.payload,
        )),
        Err(ArtifactError::NotFound(_)) => Err((
            StatusCode::NOT_FOUND,
            Json(ImageErrorResponse {
                error: format!("no image stored for mode: {}", mode),
            }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ImageErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}
