// shelfkeep-core/src/error.rs
//! Error taxonomy for catalog operations
//!
//! Every failure is handed back as a value. The catalog never aborts the
//! process; whether a failure is fatal is decided by the caller.

use thiserror::Error;

use crate::entity::EntityId;

/// Errors produced by the catalog core
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Operation referenced an id the registry does not hold
    #[error("Entity with ID {0} not found")]
    NotFound(EntityId),

    /// Negative, non-finite or otherwise out-of-range attribute value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Record source has no collection by this name
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// Record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Shorthand for an `InvalidValue` built from anything displayable
    pub fn invalid(field: impl Into<String>, value: impl ToString) -> Self {
        CatalogError::InvalidValue {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// True for `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }

    /// True for `InvalidValue`
    pub fn is_invalid_value(&self) -> bool {
        matches!(self, CatalogError::InvalidValue { .. })
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
