pub mod artifact;
pub mod config;
pub mod country;
pub mod generation;
pub mod metrics;
pub mod orchestrator;
pub mod testing;
pub mod trips;

pub use artifact::{
    ArtifactError, ArtifactStore, SqliteArtifactStore, TripImage, TripImageMeta,
    IMAGE_CONTENT_TYPE,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    GenerationConfig, HordeConfig, SanitizedConfig, ServerConfig,
};
pub use country::{CountryClient, CountryError, CountryFacts};
pub use generation::{
    GenerationClient, GenerationError, GenerationJob, HordeClient, JobId, JobState, JobStatus,
};
pub use orchestrator::{
    FailedMode, GenerationReport, ImageOrchestrator, OrchestratorStatus, PipelineError,
    PollConfig, PollError,
};
pub use trips::{waypoints, TripMode, UnknownTripMode, Waypoint};
