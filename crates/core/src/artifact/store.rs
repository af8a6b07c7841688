//! Image storage trait.

use thiserror::Error;

use crate::trips::TripMode;

use super::{TripImage, TripImageMeta};

/// Error type for image store operations.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// No image stored for the requested mode.
    #[error("no image stored for mode: {0}")]
    NotFound(TripMode),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

/// Trait for image storage backends.
///
/// Writes are upserts keyed by mode: the store never holds more than one
/// image per mode.
pub trait ArtifactStore: Send + Sync {
    /// Persist an image, replacing any previous image for the same mode.
    fn put(&self, image: TripImage) -> Result<TripImageMeta, ArtifactError>;

    /// Read the image stored for a mode.
    fn get(&self, mode: TripMode) -> Result<TripImage, ArtifactError>;

    /// Whether an image exists for the mode.
    fn exists(&self, mode: TripMode) -> Result<bool, ArtifactError>;

    /// Whether any image exists at all.
    fn exists_any(&self) -> Result<bool, ArtifactError>;

    /// Modes with no stored image, in [`TripMode::ALL`] order.
    fn missing_modes(&self) -> Result<Vec<TripMode>, ArtifactError>;

    /// Metadata for every stored image, ordered by mode.
    fn list_meta(&self) -> Result<Vec<TripImageMeta>, ArtifactError>;
}
