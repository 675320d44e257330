//! Error types for collection access and query evaluation.

use thiserror::Error;

/// Errors raised by collection operations and query terminals.
///
/// Nothing in this crate catches these; they surface from the call that
/// hit them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollectionError {
    /// Index past the end of the collection.
    #[error("index {index} out of range for collection of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A where/select/sort term named an attribute the element does not have.
    #[error("'{type_name}' has no attribute '{attribute}'")]
    AttributeNotFound {
        attribute: String,
        type_name: &'static str,
    },

    /// An ordering operator was applied to values that cannot be ordered.
    #[error("'{op}' not supported between {left} and {right} values")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// A comparator token outside `==`, `!=`, `>=`, `<=`, `>`, `<`
    /// evaluated under a strict operator policy.
    #[error("unknown comparison operator '{0}'")]
    UnknownOperator(String),
}

impl CollectionError {
    pub(crate) fn attribute_not_found<T: ?Sized>(attribute: &str) -> Self {
        CollectionError::AttributeNotFound {
            attribute: attribute.to_string(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// Result type for collection and query operations.
pub type Result<T> = std::result::Result<T, CollectionError>;
