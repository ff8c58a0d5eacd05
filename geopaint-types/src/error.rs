//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error, PartialEq)]
pub enum GeopaintTypesError {
    /// Geometry conversion error.
    #[error("invalid input geometry: {0}")]
    Conversion(String),
    /// Two nested structures that must have the same shape differ.
    #[error("structure mismatch: expected {expected}, found {found}")]
    StructureMismatch {
        /// Shape of the reference structure.
        expected: String,
        /// Shape of the structure that did not match it.
        found: String,
    },
}
