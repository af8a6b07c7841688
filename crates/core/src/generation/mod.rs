//! Image generation service boundary.

mod horde;
mod types;

pub use horde::HordeClient;
pub use types::{GenerationClient, GenerationError, GenerationJob, JobId, JobState, JobStatus};
