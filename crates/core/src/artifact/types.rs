//! Stored trip image types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::trips::TripMode;

/// Content type every generated image is stored and served with,
/// regardless of what the generation service reports.
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// A generated image persisted for one travel mode.
///
/// At most one image exists per mode; writes replace the previous row.
/// Never mutated after creation.
#[derive(Debug, Clone)]
pub struct TripImage {
    /// Travel mode this image belongs to. Sole lookup key.
    pub mode: TripMode,
    /// Raw image bytes.
    pub payload: Vec<u8>,
    /// Media type of the payload.
    pub content_type: String,
    /// Hex sha256 of the payload.
    pub checksum: String,
    /// When the image was stored.
    pub created_at: DateTime<Utc>,
}

impl TripImage {
    /// Build an image record from freshly downloaded bytes.
    pub fn from_payload(mode: TripMode, payload: Vec<u8>) -> Self {
        let checksum = format!("{:x}", Sha256::digest(&payload));
        Self {
            mode,
            payload,
            content_type: IMAGE_CONTENT_TYPE.to_string(),
            checksum,
            created_at: Utc::now(),
        }
    }
}

/// Image metadata without the payload, for listings and status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct TripImageMeta {
    pub mode: TripMode,
    pub content_type: String,
    pub size_bytes: u64,
    pub checksum: String,
    pub created_at: DateTime<Utc>,
}

impl From<&TripImage> for TripImageMeta {
    fn from(image: &TripImage) -> Self {
        Self {
            mode: image.mode,
            content_type: image.content_type.clone(),
            size_bytes: image.payload.len() as u64,
            checksum: image.checksum.clone(),
            created_at: image.created_at,
        }
    }
}
