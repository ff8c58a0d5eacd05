//! Error type of the crate.

use geopaint_types::error::GeopaintTypesError;
use thiserror::Error;

/// Error type of the crate.
#[derive(Debug, Error)]
pub enum GeopaintError {
    /// A symbol description cannot be parsed.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(#[from] serde_json::Error),
    /// Geometry data is inconsistent.
    #[error(transparent)]
    Geometry(#[from] GeopaintTypesError),
}
