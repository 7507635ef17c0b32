//! Error types for pantry_tracker

use crate::reconcile::RecordId;
use thiserror::Error;

/// Unified error type for pantry_tracker operations
#[derive(Debug, Error)]
pub enum PantryError {
    /// Input rejected before any effect was planned (empty name after
    /// normalization, zero quantity, or quantity overflow on merge)
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// No record with this id in the view or in storage
    #[error("no record with id {0}")]
    NotFound(RecordId),
    /// No record with this normalized name in the view
    #[error("no item named {0}")]
    UnknownItem(String),
    /// Database operation failed
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Result alias for pantry_tracker operations
pub type Result<T> = std::result::Result<T, PantryError>;
