//! Manual and automatic particle records.
//!
//! # Responsibility
//! - Define the picked coordinate and its auto-picker refinement.
//! - Provide soft-delete helpers for automatic particles.
//!
//! # Invariants
//! - `id` is stable and is the identity used for list membership.
//! - `deleted` starts as `false`; a deleted candidate keeps its `cost`.

use crate::model::micrograph::MicrographId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one picked particle.
pub type ParticleId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleValidationError {
    NilId,
}

impl Display for ParticleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "particle id must not be nil"),
        }
    }
}

impl Error for ParticleValidationError {}

/// A user-placed coordinate on a micrograph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Particle {
    pub id: ParticleId,
    /// Pixel column.
    pub x: i32,
    /// Pixel row.
    pub y: i32,
    /// Micrograph this coordinate was placed on.
    pub micrograph: MicrographId,
}

impl Particle {
    /// Creates a particle with a generated stable ID.
    pub fn new(micrograph: MicrographId, x: i32, y: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            micrograph,
        }
    }

    /// Creates a particle with a caller-provided ID, as loaded from disk.
    ///
    /// # Errors
    /// - Returns `NilId` when `id` is nil.
    pub fn with_id(
        id: ParticleId,
        micrograph: MicrographId,
        x: i32,
        y: i32,
    ) -> Result<Self, ParticleValidationError> {
        if id.is_nil() {
            return Err(ParticleValidationError::NilId);
        }
        Ok(Self {
            id,
            x,
            y,
            micrograph,
        })
    }
}

/// A particle proposed by the supervised auto-picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomaticParticle {
    pub particle: Particle,
    /// Classifier cost reported by the auto-picker.
    pub cost: f64,
    /// Soft-delete flag; a deleted candidate stays visible to training.
    pub deleted: bool,
}

impl AutomaticParticle {
    pub fn new(micrograph: MicrographId, x: i32, y: i32, cost: f64) -> Self {
        Self::from_particle(Particle::new(micrograph, x, y), cost)
    }

    /// Wraps an existing coordinate as an auto-picker candidate.
    pub fn from_particle(particle: Particle, cost: f64) -> Self {
        Self {
            particle,
            cost,
            deleted: false,
        }
    }

    pub fn id(&self) -> ParticleId {
        self.particle.id
    }

    /// Marks this candidate as rejected.
    pub fn soft_delete(&mut self) {
        self.deleted = true;
    }

    pub fn is_live(&self) -> bool {
        !self.deleted
    }
}
