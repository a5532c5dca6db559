//! Family-scoped picking services.
//!
//! # Responsibility
//! - Own the records of one family across micrographs.
//! - Provide the family-wide operations records cannot do on their own.

pub mod picking_session;
