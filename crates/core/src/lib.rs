//! `neuroscan-core`: identifiers and validation errors shared by every crate.
//!
//! This crate contains no I/O and no runtime dependencies.

pub mod error;
pub mod id;

pub use error::{ConfigError, IdError};
pub use id::{JobId, OwnerId};
