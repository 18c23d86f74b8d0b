//! Scalar quantization: f32 field vectors → fixed-precision codes.
//!
//! Quantization is used purely for storage compactness and fast approximate
//! distance. The exact re-ranking stage in the store removes its error from
//! final results for any finite candidate pool.

/// Quantizer, bounds, and code types with asymmetric distance loops.
pub mod scalar;

pub use scalar::{QuantizationBounds, QuantizedCode, Quantizer};
