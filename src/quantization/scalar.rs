//! Scalar quantization implementation.
//!
//! Each f32 component is linearly mapped into `2^precision` uniform buckets
//! between store-wide per-dimension bounds, and reconstructed as the bucket
//! midpoint. Store-wide bounds (rather than per-vector) keep codes
//! comparable across vectors sharing one store; each code still carries a
//! copy of the bounds that produced it, so decode is self-contained and
//! independently testable.
//!
//! Reconstruction error per dimension is bounded by
//! `(max_i - min_i) / 2^precision`.

use crate::config;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Store-wide per-dimension quantization bounds.
///
/// Components outside the bounds clamp to them at encode time, so bounds
/// should cover the expected component range. Use [`QuantizationBounds::calibrate`]
/// to fit them from a sample of real vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantizationBounds {
    /// Per-dimension lower bounds.
    pub mins: Vec<f32>,
    /// Per-dimension upper bounds.
    pub maxs: Vec<f32>,
}

impl QuantizationBounds {
    /// Uniform bounds: the same `(min, max)` interval for every dimension.
    pub fn uniform(field_dim: usize, min: f32, max: f32) -> CoreResult<Self> {
        if !(min < max) {
            return Err(CoreError::invalid_parameter(format!(
                "quantization bounds require min < max, got [{min}, {max}]"
            )));
        }
        Ok(Self {
            mins: vec![min; field_dim],
            maxs: vec![max; field_dim],
        })
    }

    /// Fit per-dimension bounds from a sample of vectors.
    ///
    /// Every sample vector must share one dimension. Dimensions where the
    /// sample is constant get a degenerate `min == max` interval; such
    /// dimensions encode to the mid code and decode to `min`.
    pub fn calibrate(sample: &[Vec<f32>]) -> CoreResult<Self> {
        let first = sample
            .first()
            .ok_or_else(|| CoreError::invalid_parameter("calibration sample is empty"))?;
        let dim = first.len();

        let mut mins = vec![f32::MAX; dim];
        let mut maxs = vec![f32::MIN; dim];
        for v in sample {
            if v.len() != dim {
                return Err(CoreError::dimension_mismatch(dim, v.len()));
            }
            for (i, &x) in v.iter().enumerate() {
                if x < mins[i] {
                    mins[i] = x;
                }
                if x > maxs[i] {
                    maxs[i] = x;
                }
            }
        }
        Ok(Self { mins, maxs })
    }

    /// Number of dimensions covered by these bounds.
    pub fn dim(&self) -> usize {
        self.mins.len()
    }
}

/// A quantized field vector: one fixed-precision code per dimension plus the
/// bounds used to produce it.
///
/// Immutable value type — it owns a copy of the bounds rather than viewing
/// into the store, so encode/decode remain testable in isolation and codes
/// survive a store re-calibration unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantizedCode {
    /// One code per dimension, each in `[0, 2^precision_bits - 1]`.
    pub codes: Vec<u16>,
    /// Per-dimension lower bounds at encode time.
    pub mins: Vec<f32>,
    /// Per-dimension upper bounds at encode time.
    pub maxs: Vec<f32>,
    /// Bits per dimension used for encoding.
    pub precision_bits: u32,
}

impl QuantizedCode {
    /// Returns the dimensionality of the code.
    pub fn dim(&self) -> usize {
        self.codes.len()
    }

    /// Number of buckets per dimension (`2^precision_bits`).
    pub fn levels(&self) -> u32 {
        1u32 << self.precision_bits
    }

    /// Reconstructed value of dimension `i`: the bucket midpoint.
    #[inline]
    pub fn component(&self, i: usize) -> f32 {
        let min = self.mins[i];
        let range = self.maxs[i] - min;
        if range < f32::EPSILON {
            return min;
        }
        min + (self.codes[i] as f32 + 0.5) * range / self.levels() as f32
    }

    /// Decode back to f32. Lossy: per-dimension error is at most
    /// `(max_i - min_i) / 2^precision_bits`.
    pub fn decode(&self) -> Vec<f32> {
        (0..self.codes.len()).map(|i| self.component(i)).collect()
    }
}

/// Lossy encoder between full-precision field vectors and fixed-precision codes.
///
/// Construction validates the precision (1..=16 bits) and that the bounds
/// match the field dimension; both are immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quantizer {
    field_dim: usize,
    precision_bits: u32,
    bounds: QuantizationBounds,
}

impl Quantizer {
    /// Creates a quantizer for vectors of length `field_dim`.
    ///
    /// Fails with `InvalidPrecision` unless
    /// `1 <= precision_bits <= 16`, and with `DimensionMismatch` if the
    /// bounds don't cover exactly `field_dim` dimensions.
    pub fn new(
        field_dim: usize,
        precision_bits: u32,
        bounds: QuantizationBounds,
    ) -> CoreResult<Self> {
        if !(config::MIN_PRECISION_BITS..=config::MAX_PRECISION_BITS).contains(&precision_bits) {
            return Err(CoreError::invalid_precision(precision_bits));
        }
        if bounds.dim() != field_dim {
            return Err(CoreError::dimension_mismatch(field_dim, bounds.dim()));
        }
        Ok(Self {
            field_dim,
            precision_bits,
            bounds,
        })
    }

    /// Configured field dimension.
    pub fn field_dim(&self) -> usize {
        self.field_dim
    }

    /// Configured bits per dimension.
    pub fn precision_bits(&self) -> u32 {
        self.precision_bits
    }

    /// Number of buckets per dimension (`2^precision_bits`).
    pub fn levels(&self) -> u32 {
        1u32 << self.precision_bits
    }

    /// Encode a vector into a fixed-precision code.
    ///
    /// Components outside the store-wide bounds clamp to them. Fails with
    /// `DimensionMismatch` if the vector length is wrong.
    pub fn encode(&self, vector: &[f32]) -> CoreResult<QuantizedCode> {
        if vector.len() != self.field_dim {
            return Err(CoreError::dimension_mismatch(self.field_dim, vector.len()));
        }

        let levels = self.levels();
        let max_code = (levels - 1) as u16;
        let codes = vector
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let min = self.bounds.mins[i];
                let range = self.bounds.maxs[i] - min;
                if range < f32::EPSILON {
                    // Degenerate dimension: single mid bucket.
                    return (levels / 2).min(max_code as u32) as u16;
                }
                let clamped = v.clamp(min, self.bounds.maxs[i]);
                let bucket = ((clamped - min) / range * levels as f32).floor() as u32;
                bucket.min(max_code as u32) as u16
            })
            .collect();

        Ok(QuantizedCode {
            codes,
            mins: self.bounds.mins.clone(),
            maxs: self.bounds.maxs.clone(),
            precision_bits: self.precision_bits,
        })
    }

    /// Decode a code back to f32 (bucket midpoints).
    ///
    /// Delegates to [`QuantizedCode::decode`]; the code is self-contained.
    pub fn decode(&self, code: &QuantizedCode) -> Vec<f32> {
        code.decode()
    }
}

/// Asymmetric squared Euclidean distance: f32 query vs quantized code.
///
/// Reconstructs each stored component on the fly; f64 accumulation to
/// minimize rounding error over long vectors.
pub fn euclidean_sq_asym(query: &[f32], code: &QuantizedCode) -> f32 {
    debug_assert_eq!(query.len(), code.dim());
    let mut sum = 0.0f64;
    for (i, &q) in query.iter().enumerate() {
        let diff = (q - code.component(i)) as f64;
        sum += diff * diff;
    }
    sum as f32
}

/// Asymmetric cosine similarity: f32 query vs quantized code.
pub fn cosine_asym(query: &[f32], code: &QuantizedCode) -> f32 {
    debug_assert_eq!(query.len(), code.dim());
    let mut dot = 0.0f64;
    let mut norm_q = 0.0f64;
    let mut norm_s = 0.0f64;
    for (i, &q) in query.iter().enumerate() {
        let s = code.component(i) as f64;
        let q = q as f64;
        dot += q * s;
        norm_q += q * q;
        norm_s += s * s;
    }
    let denom = norm_q.sqrt() * norm_s.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }
    (dot / denom) as f32
}

/// Asymmetric dot product: f32 query vs quantized code.
pub fn dot_product_asym(query: &[f32], code: &QuantizedCode) -> f32 {
    debug_assert_eq!(query.len(), code.dim());
    let mut sum = 0.0f64;
    for (i, &q) in query.iter().enumerate() {
        sum += q as f64 * code.component(i) as f64;
    }
    sum as f32
}
