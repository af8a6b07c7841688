//! Trip-image generation orchestration.
//!
//! The startup entry point that tops up the image store: a poll driver
//! for slow generation jobs, a per-mode pipeline, and a runner that
//! gates, guards and aggregates.

mod pipeline;
mod poll;
mod runner;
mod types;

pub use pipeline::run_pipeline;
pub use poll::{poll_ready, PollConfig};
pub use runner::ImageOrchestrator;
pub use types::{FailedMode, GenerationReport, OrchestratorStatus, PipelineError, PollError};
