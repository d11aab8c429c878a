//! Domain atoms for composing a complaint report.
//!
//! Each atom owns one concept: its data model, the service that drives it,
//! and the platform traits it consumes. Atoms never reach for global state;
//! collaborators are handed in by whoever composes them.

pub mod capability;
pub mod location;
pub mod media;
pub mod reports;
