//! Error types for container access.
//!
//! These are the failures a plain map or list reports for invalid access.
//! Proxies propagate them unchanged, and a call that fails never leaves an
//! entry in the action log.

use thiserror::Error;

/// Structured error types for map and list access.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContainerError {
    /// Map key does not exist
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    /// List position outside the current bounds
    #[error("List index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// Pop from a list with no elements
    #[error("Pop from empty list")]
    EmptyList,

    /// Value-based lookup found no equal element
    #[error("Value not found in list: {value}")]
    ValueNotFound { value: String },

    /// A value had a different shape than the operation needs
    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },
}

impl ContainerError {
    /// Check if this error is a failed key or value lookup
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContainerError::KeyNotFound { .. } | ContainerError::ValueNotFound { .. }
        )
    }

    /// Check if this error is a list bounds failure
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            ContainerError::IndexOutOfRange { .. } | ContainerError::EmptyList
        )
    }

    /// Check if this error is related to type mismatches
    pub fn is_type_error(&self) -> bool {
        matches!(self, ContainerError::TypeMismatch { .. })
    }

    /// Get the key if this is a key lookup error
    pub fn key(&self) -> Option<&str> {
        match self {
            ContainerError::KeyNotFound { key } => Some(key),
            _ => None,
        }
    }

    /// Get the offending index if this is a bounds error
    pub fn index(&self) -> Option<i64> {
        match self {
            ContainerError::IndexOutOfRange { index, .. } => Some(*index),
            _ => None,
        }
    }
}

// Conversion from ContainerError to the main Error type
impl From<ContainerError> for crate::Error {
    fn from(err: ContainerError) -> Self {
        crate::Error::Container(err)
    }
}
