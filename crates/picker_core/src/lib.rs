//! Core bookkeeping for interactive particle picking.
//! This crate is the single source of truth for picking state invariants.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod service;

pub use config::{ConfigError, PickerConfig, DEFAULT_TRAINING_AUTO_FEATURE_VECTORS_GENERIC};
pub use error::{empty_field_msg, PickerError, PickerResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::family::{Family, FamilyValidationError, SharedFamily};
pub use model::micrograph::{Micrograph, MicrographId, MicrographValidationError, SharedMicrograph};
pub use model::micrograph_family::MicrographFamilyData;
pub use model::particle::{AutomaticParticle, Particle, ParticleId, ParticleValidationError};
pub use model::state::{FamilyState, MicrographFamilyState};
pub use service::picking_session::{CounterAudit, FamilyPickingSession};

/// Minimal health-check API for shell integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
