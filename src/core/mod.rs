//! Core types and error handling for ringup.
//!
//! The error type here is the single currency every upgrade component deals
//! in: each collaborator reports failures through [`UpgradeError`], and the
//! orchestrator annotates them with the phase in which they occurred without
//! otherwise modifying them.

pub mod error;

pub use error::UpgradeError;
