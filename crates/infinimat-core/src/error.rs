//! Error handling for sparse matrix operations
//!
//! Every failure in this crate is a local, synchronous misuse of the access
//! contract: a wrong number of indices or a strict erase of a missing key.
//! None of them leave the matrix partially mutated.

use std::fmt;
use thiserror::Error;

/// Error type for store, collector and matrix operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Index sequence length does not match the matrix dimensionality
    #[error("Invalid arity: expected {expected} indices, got {actual}")]
    InvalidArity { expected: usize, actual: usize, operation: Option<String> },

    /// Strict erase of a key that has no association
    #[error("Key not found: {key:?}")]
    NotFound { key: Vec<usize>, operation: Option<String> },

    /// A read or write was attempted before all indices were collected
    #[error("Too few indices: expected {expected}, collected {collected}")]
    TooFewIndices { expected: usize, collected: usize },

    /// An index was supplied after the collector was already complete
    #[error("Too many indices: expected {expected}, rejected extra index {index}")]
    TooManyIndices { expected: usize, index: usize },
}

impl MatrixError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            MatrixError::InvalidArity { .. } => "arity",
            MatrixError::NotFound { .. } => "not_found",
            MatrixError::TooFewIndices { .. } => "collector",
            MatrixError::TooManyIndices { .. } => "collector",
        }
    }

    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MatrixError::InvalidArity { .. } => ErrorSeverity::Medium,
            MatrixError::NotFound { .. } => ErrorSeverity::Low,
            MatrixError::TooFewIndices { .. } => ErrorSeverity::Medium,
            MatrixError::TooManyIndices { .. } => ErrorSeverity::Medium,
        }
    }

    /// Get structured context information for debugging
    pub fn context(&self) -> ErrorContext {
        match self {
            MatrixError::InvalidArity { expected, actual, operation } => ErrorContext {
                expected_arity: Some(*expected),
                actual_arity: Some(*actual),
                operation: operation.clone(),
                ..Default::default()
            },
            MatrixError::NotFound { key, operation } => ErrorContext {
                key: Some(key.clone()),
                operation: operation.clone(),
                ..Default::default()
            },
            MatrixError::TooFewIndices { expected, collected } => ErrorContext {
                expected_arity: Some(*expected),
                actual_arity: Some(*collected),
                ..Default::default()
            },
            MatrixError::TooManyIndices { expected, index } => ErrorContext {
                expected_arity: Some(*expected),
                actual_arity: Some(expected + 1),
                rejected_index: Some(*index),
                ..Default::default()
            },
        }
    }

    /// Every error here is caller-correctable; nothing is transient.
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// True for any variant caused by a wrong number of indices
    pub fn is_arity_error(&self) -> bool {
        matches!(
            self,
            MatrixError::InvalidArity { .. }
                | MatrixError::TooFewIndices { .. }
                | MatrixError::TooManyIndices { .. }
        )
    }
}

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Low => write!(f, "LOW"),
            ErrorSeverity::Medium => write!(f, "MEDIUM"),
            ErrorSeverity::High => write!(f, "HIGH"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Structured error context for debugging
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorContext {
    pub expected_arity: Option<usize>,
    pub actual_arity: Option<usize>,
    pub key: Option<Vec<usize>>,
    pub rejected_index: Option<usize>,
    pub operation: Option<String>,
}

/// Result type alias for matrix operations
pub type MatrixResult<T> = Result<T, MatrixError>;

/// Convenience constructors for common error scenarios
impl MatrixError {
    /// Create an arity error for key construction
    pub fn invalid_arity(expected: usize, actual: usize) -> Self {
        Self::InvalidArity { expected, actual, operation: None }
    }

    /// Create a not-found error for the given raw key
    pub fn not_found(key: &[usize]) -> Self {
        Self::NotFound { key: key.to_vec(), operation: None }
    }

    /// Create a collector error for a premature read or write
    pub fn too_few_indices(expected: usize, collected: usize) -> Self {
        Self::TooFewIndices { expected, collected }
    }

    /// Create a collector error for an index past the dimensionality
    pub fn too_many_indices(expected: usize, index: usize) -> Self {
        Self::TooManyIndices { expected, index }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Record which operation produced the error
    fn with_operation_context(self, operation: &str) -> MatrixResult<T>;
}

impl<T> ResultExt<T> for MatrixResult<T> {
    fn with_operation_context(self, operation: &str) -> MatrixResult<T> {
        self.map_err(|mut err| {
            match &mut err {
                MatrixError::InvalidArity { operation: op, .. }
                | MatrixError::NotFound { operation: op, .. } => {
                    *op = Some(operation.to_string());
                }
                _ => {}
            }
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MatrixError::invalid_arity(2, 3);
        assert_eq!(err.to_string(), "Invalid arity: expected 2 indices, got 3");

        let err = MatrixError::not_found(&[100, 100]);
        assert_eq!(err.to_string(), "Key not found: [100, 100]");

        let err = MatrixError::too_many_indices(2, 7);
        assert_eq!(err.to_string(), "Too many indices: expected 2, rejected extra index 7");
    }

    #[test]
    fn test_error_classification() {
        assert!(MatrixError::too_few_indices(2, 1).is_arity_error());
        assert!(MatrixError::too_many_indices(2, 1).is_arity_error());
        assert!(MatrixError::invalid_arity(2, 1).is_arity_error());
        assert!(!MatrixError::not_found(&[1]).is_arity_error());

        assert_eq!(MatrixError::not_found(&[1]).severity(), ErrorSeverity::Low);
        assert_eq!(MatrixError::not_found(&[1]).category(), "not_found");
        assert!(MatrixError::invalid_arity(3, 2).is_recoverable());
    }

    #[test]
    fn test_operation_context() {
        let result: MatrixResult<()> = Err(MatrixError::not_found(&[4, 2]));
        let err = result.with_operation_context("erase").unwrap_err();

        let context = err.context();
        assert_eq!(context.operation.as_deref(), Some("erase"));
        assert_eq!(context.key, Some(vec![4, 2]));

        // Collector errors carry no operation slot and pass through unchanged
        let result: MatrixResult<()> = Err(MatrixError::too_few_indices(3, 1));
        let err = result.with_operation_context("read").unwrap_err();
        assert_eq!(err, MatrixError::too_few_indices(3, 1));
    }

    #[test]
    fn test_context_serializes() {
        let context = MatrixError::too_many_indices(2, 9).context();
        let json = serde_json::to_string(&context).unwrap();
        assert!(json.contains("\"rejected_index\":9"));
        assert!(json.contains("\"expected_arity\":2"));
    }
}
