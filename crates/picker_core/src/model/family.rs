//! Particle family (class) with aggregate pick counters.
//!
//! # Responsibility
//! - Carry the family name, presentation color and workflow step.
//! - Hold manual and automatic particle totals across all micrographs.
//!
//! # Invariants
//! - `name` is non-empty and filename-safe.
//! - Counters are mutated only by `MicrographFamilyData` operations.
//! - Counters never go below zero; an attempt is logged as a bug.

use crate::model::is_file_safe_name;
use crate::model::state::FamilyState;
use log::error;
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Family handle shared by every record of that family.
pub type SharedFamily = Rc<RefCell<Family>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyValidationError {
    EmptyName,
    UnsafeName(String),
}

impl Display for FamilyValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "family name must not be empty"),
            Self::UnsafeName(name) => {
                write!(f, "family name `{name}` cannot be used in a filename")
            }
        }
    }
}

impl Error for FamilyValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    name: String,
    /// Opaque to core; forwarded to the shell.
    color: String,
    step: FamilyState,
    particles: usize,
    autoparticles: usize,
}

impl Family {
    /// Creates a family with zeroed counters.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is blank.
    /// - `UnsafeName` when `name` contains path separators or control chars.
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        step: FamilyState,
    ) -> Result<Self, FamilyValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FamilyValidationError::EmptyName);
        }
        if !is_file_safe_name(&name) {
            return Err(FamilyValidationError::UnsafeName(name));
        }
        Ok(Self {
            name,
            color: color.into(),
            step,
            particles: 0,
            autoparticles: 0,
        })
    }

    /// Wraps this family in a shared handle for records to reference.
    pub fn into_shared(self) -> SharedFamily {
        Rc::new(RefCell::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn step(&self) -> FamilyState {
        self.step
    }

    /// Moves the family to another workflow step.
    pub fn set_step(&mut self, step: FamilyState) {
        self.step = step;
    }

    /// Manual particles across all micrographs.
    pub fn particles(&self) -> usize {
        self.particles
    }

    /// Automatic particles across all micrographs, less delete requests.
    pub fn autoparticles(&self) -> usize {
        self.autoparticles
    }

    pub fn total_particles(&self) -> usize {
        self.particles + self.autoparticles
    }

    pub(crate) fn increment_particles(&mut self) {
        self.particles += 1;
    }

    pub(crate) fn decrement_particles(&mut self) {
        self.particles = self.checked_decrement(self.particles, "particles");
    }

    pub(crate) fn increment_autoparticles(&mut self) {
        self.autoparticles += 1;
    }

    pub(crate) fn decrement_autoparticles(&mut self) {
        self.autoparticles = self.checked_decrement(self.autoparticles, "autoparticles");
    }

    pub(crate) fn set_counters(&mut self, particles: usize, autoparticles: usize) {
        self.particles = particles;
        self.autoparticles = autoparticles;
    }

    fn checked_decrement(&self, value: usize, counter: &str) -> usize {
        value.checked_sub(1).unwrap_or_else(|| {
            error!(
                "event=counter_underflow module=model status=error family={} counter={}",
                self.name, counter
            );
            0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Family, FamilyValidationError};
    use crate::model::state::FamilyState;

    #[test]
    fn new_starts_with_zero_counters() {
        let family = Family::new("ribo", "#00ff00", FamilyState::Manual).unwrap();
        assert_eq!(family.name(), "ribo");
        assert_eq!(family.color(), "#00ff00");
        assert_eq!(family.step(), FamilyState::Manual);
        assert_eq!(family.particles(), 0);
        assert_eq!(family.autoparticles(), 0);
    }

    #[test]
    fn new_rejects_blank_and_unsafe_names() {
        assert_eq!(
            Family::new("  ", "red", FamilyState::Available).unwrap_err(),
            FamilyValidationError::EmptyName
        );
        assert_eq!(
            Family::new("a/b", "red", FamilyState::Available).unwrap_err(),
            FamilyValidationError::UnsafeName("a/b".to_string())
        );
    }

    #[test]
    fn decrement_saturates_at_zero() {
        let mut family = Family::new("ribo", "red", FamilyState::Manual).unwrap();
        family.increment_particles();
        family.decrement_particles();
        family.decrement_particles();
        family.decrement_autoparticles();
        assert_eq!(family.particles(), 0);
        assert_eq!(family.autoparticles(), 0);
    }
}
