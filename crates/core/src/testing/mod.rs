//! Testing utilities and mock implementations.
//!
//! Mock implementations of the external service traits, allowing
//! orchestrator and pipeline tests without real infrastructure.

mod mock_generation_client;

pub use mock_generation_client::{MockGenerationClient, RecordedCall};
