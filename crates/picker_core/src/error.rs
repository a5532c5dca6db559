//! Picking operation errors and shared diagnostic helpers.
//!
//! # Responsibility
//! - Define the two programmer-error categories raised by record operations.
//! - Provide the "empty field" diagnostic used across the core.
//!
//! # Invariants
//! - Errors are reported at the call site and never recovered inside core.
//! - A failed operation leaves lists, state and family counters unchanged.

use crate::model::state::MicrographFamilyState;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PickerResult<T> = Result<T, PickerError>;

/// Error raised when a shell calls a record operation it should not have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    /// A required value is missing or does not refer to anything known.
    InvalidArgument(String),
    /// The operation is forbidden in the record's current state.
    InvalidState {
        state: MicrographFamilyState,
        micrograph: String,
        family: String,
    },
}

impl Display for PickerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::InvalidState {
                state,
                micrograph,
                family,
            } => write!(
                f,
                "invalid state {state} on micrograph {micrograph} and family {family} for adding automatic particles"
            ),
        }
    }
}

impl Error for PickerError {}

/// Formats the diagnostic for a required field that was not provided.
pub fn empty_field_msg(field: &str) -> String {
    format!("{field} must not be empty")
}

#[cfg(test)]
mod tests {
    use super::{empty_field_msg, PickerError};
    use crate::model::state::MicrographFamilyState;

    #[test]
    fn empty_field_msg_names_field() {
        assert_eq!(empty_field_msg("particle"), "particle must not be empty");
    }

    #[test]
    fn invalid_state_names_state_micrograph_and_family() {
        let err = PickerError::InvalidState {
            state: MicrographFamilyState::Available,
            micrograph: "mic07".to_string(),
            family: "ribo".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Available"));
        assert!(message.contains("mic07"));
        assert!(message.contains("ribo"));
    }
}
