//! Error types for the core engine.
//!
//! Structural errors (dimension, precision, parameters) are rejected at the
//! boundary and surfaced to the caller, never silently coerced. Convergence
//! issues are *not* errors: the ranker reports them as a status on the
//! result set, because a degraded ranking is still useful.

use thiserror::Error;
use uuid::Uuid;

/// Result alias for core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in the store, quantizer, ranker, or pipeline.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input vector length does not match the configured field dimension.
    #[error("dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch {
        /// Configured `field_dim` of the store or quantizer.
        expected: usize,
        /// Length of the offending input.
        actual: usize,
    },

    /// Quantization precision outside the supported range.
    #[error("invalid quantization precision: {bits} bits (supported range 1..=16)")]
    InvalidPrecision {
        /// The rejected bits-per-dimension value.
        bits: u32,
    },

    /// Lookup or removal of an unknown candidate id.
    #[error("candidate not found: {0}")]
    NotFound(Uuid),

    /// A configuration parameter failed validation.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Description of what's wrong with the parameter.
        message: String,
    },
}

impl CoreError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an InvalidPrecision error.
    pub fn invalid_precision(bits: u32) -> Self {
        Self::InvalidPrecision { bits }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let e = CoreError::dimension_mismatch(8, 5);
        assert_eq!(e.to_string(), "dimension mismatch: expected 8, actual 5");

        let e = CoreError::invalid_precision(0);
        assert!(e.to_string().contains("0 bits"));

        let id = Uuid::nil();
        let e = CoreError::NotFound(id);
        assert!(e.to_string().contains(&id.to_string()));

        let e = CoreError::invalid_parameter("pareto_alpha must be > 0");
        assert!(e.to_string().contains("pareto_alpha"));
    }
}
