//! Domain model for the workout log.
//!
//! # Responsibility
//! - Define the exercise / session / set records read from and written to
//!   storage.
//! - Provide the session draft value the presentation layer composes before
//!   saving.
//!
//! # Invariants
//! - Exercises exclusively own sessions; sessions exclusively own sets.
//! - Deletion is hard and cascades parent -> children; nothing is orphaned.

pub mod exercise;
pub mod session;
pub mod set;
