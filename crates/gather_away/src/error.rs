//! Error types for the GatherAway policy gate
//!
//! This module defines the error hierarchy for the gather_away crate using `thiserror`.
//! Fallible operations return `Result<T, GatherError>`.
//!
//! None of these errors ever reach the event path. The plugin context recovers
//! from each of them locally (defaults, empty preferences, capability absent)
//! and logs what happened.
//!
//! # Error Variants
//!
//! - [`GatherError::Io`]: Filesystem operations (auto-converts from `std::io::Error`)
//! - [`GatherError::JsonDecode`]: JSON parsing errors (auto-converts from `serde_json::Error`)
//! - [`GatherError::InvalidConfig`]: A configuration document that parsed but makes no sense
//! - [`GatherError::PermissionLookup`]: The permission oracle could not answer
//!
//! # Example
//!
//! ```rust
//! use gather_away::error::GatherError;
//!
//! fn example() -> Result<(), GatherError> {
//!     // Auto-conversion from std::io::Error
//!     let _file = std::fs::read_to_string("/nonexistent")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for all gather_away operations
///
/// Two variants support automatic conversion via the `?` operator:
/// - `JsonDecode` from `serde_json::Error`
/// - `Io` from `std::io::Error`
#[derive(Error, Debug)]
pub enum GatherError {
    /// I/O operation failed
    ///
    /// Raised while reading or writing the config, preference or language files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize a JSON document
    #[error("Failed to parse JSON: {0}")]
    JsonDecode(#[from] serde_json::Error),

    /// Configuration document is structurally valid JSON but unusable
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig {
        /// Path of the offending file
        path: String,
        /// Description of what went wrong
        reason: String,
    },

    /// Permission oracle could not answer a capability query
    ///
    /// Callers treat this as "capability absent".
    #[error("Permission lookup failed: {0}")]
    PermissionLookup(String),
}
