//! Workflow step and per-record lifecycle tags.
//!
//! # Responsibility
//! - Define the closed set of family workflow steps.
//! - Define the closed set of (micrograph, family) record states.
//! - Own the one table mapping record states to action labels.
//!
//! # Invariants
//! - Labels are the exact variant names; shells show them verbatim.
//! - `MicrographFamilyState::Autopick` is an action label only and is never
//!   stored by core operations.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Workflow step carried by a family.
///
/// Transitions are driven by the surrounding workflow; core code only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FamilyState {
    /// Nothing picked for this family yet.
    Available,
    /// Only manual picking happens.
    Manual,
    /// The auto-picker may run and the user corrects its output.
    Supervised,
}

impl FamilyState {
    /// Returns the exact textual name of this step.
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Manual => "Manual",
            Self::Supervised => "Supervised",
        }
    }
}

impl Display for FamilyState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Lifecycle state of one (micrograph, family) record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MicrographFamilyState {
    /// No work done yet for this pair.
    Available,
    /// At least one manual pick under a manual family step.
    Manual,
    /// Supervised output accepted and open for corrections.
    Correct,
    /// Results are frozen.
    ReadOnly,
    /// Action label offered from `Available` under a supervised family.
    Autopick,
}

impl MicrographFamilyState {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Available,
        Self::Manual,
        Self::Correct,
        Self::ReadOnly,
        Self::Autopick,
    ];

    /// Returns the exact textual name used as an action label.
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Manual => "Manual",
            Self::Correct => "Correct",
            Self::ReadOnly => "ReadOnly",
            Self::Autopick => "Autopick",
        }
    }

    /// Parses a persisted label back into a state.
    ///
    /// Matching is exact; returns `None` for unknown labels.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_label() == label)
    }
}

impl Display for MicrographFamilyState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}
