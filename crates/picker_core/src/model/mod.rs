//! Picking domain model.
//!
//! # Responsibility
//! - Define particles, families, micrographs and the per-pair record.
//! - Keep family counters consistent with the per-pair particle lists.
//!
//! # Invariants
//! - Family counters are written only through `MicrographFamilyData`.
//! - Automatic particles are soft-deleted, never removed from their list.
//! - Family and micrograph names are safe to embed in output filenames.

pub mod family;
pub mod micrograph;
pub mod micrograph_family;
pub mod particle;
pub mod state;

use once_cell::sync::Lazy;
use regex::Regex;

static FILE_SAFE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^/\\\x00-\x1f]+$").expect("valid file-safe name regex"));

/// Returns whether `name` can be embedded in an output filename as-is.
pub(crate) fn is_file_safe_name(name: &str) -> bool {
    FILE_SAFE_NAME_RE.is_match(name)
}
