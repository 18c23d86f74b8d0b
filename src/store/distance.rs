//! Distance metric implementations for field-vector search.
//!
//! Each metric has three variants: exact f32-vs-f32 (linear scan and
//! shortlist re-ranking), asymmetric f32-query-vs-code (the approximate
//! first stage), and a bounded similarity mapping to \[0, 1\] consumed by
//! the blessing evaluator.

use crate::quantization::scalar::{cosine_asym, dot_product_asym, euclidean_sq_asym};
use crate::quantization::QuantizedCode;
use serde::{Deserialize, Serialize};

/// Distance metric used for vector similarity computation.
///
/// A constructor-time, immutable choice of the store: changing the metric
/// changes the epc axis downstream, so it is fixed for the store's lifetime.
/// All metrics return a distance value where **lower is better**.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Squared Euclidean distance (L2²). Range: \[0, ∞).
    Euclidean,
    /// Cosine distance: `1 - cosine_similarity`. Range: \[0, 2\].
    Cosine,
    /// Negative dot product: `-dot(a, b)`. Lower = higher similarity.
    DotProduct,
}

impl Default for DistanceMetric {
    fn default() -> Self {
        DistanceMetric::Euclidean
    }
}

impl DistanceMetric {
    /// Exact f32-vs-f32 distance. No quantization loss.
    pub fn distance_exact(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::Euclidean => euclidean_sq_f32(a, b),
            DistanceMetric::Cosine => 1.0 - cosine_f32(a, b),
            DistanceMetric::DotProduct => -dot_product_f32(a, b),
        }
    }

    /// Approximate distance: f32 query vs quantized code.
    ///
    /// The query keeps full f32 precision; stored components are
    /// reconstructed per dimension on the fly.
    pub fn distance_code(&self, query: &[f32], code: &QuantizedCode) -> f32 {
        match self {
            DistanceMetric::Euclidean => euclidean_sq_asym(query, code),
            DistanceMetric::Cosine => 1.0 - cosine_asym(query, code),
            DistanceMetric::DotProduct => -dot_product_asym(query, code),
        }
    }

    /// Similarity in \[0, 1\] between two exact vectors, higher = more similar.
    ///
    /// The mapping is monotone in the underlying distance:
    /// - Euclidean: `1 / (1 + l2)`
    /// - Cosine: `(1 + cos) / 2`
    /// - DotProduct: logistic `1 / (1 + e^(-dot))`
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        let s = match self {
            DistanceMetric::Euclidean => 1.0 / (1.0 + euclidean_sq_f32(a, b).max(0.0).sqrt()),
            DistanceMetric::Cosine => (1.0 + cosine_f32(a, b)) / 2.0,
            DistanceMetric::DotProduct => 1.0 / (1.0 + (-dot_product_f32(a, b)).exp()),
        };
        s.clamp(0.0, 1.0)
    }
}

/// Squared Euclidean distance with f64 accumulation.
pub fn euclidean_sq_f32(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let mut sum = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let diff = (x - y) as f64;
        sum += diff * diff;
    }
    sum as f32
}

/// Cosine similarity with f64 accumulation. Zero-norm inputs yield 0.
pub fn cosine_f32(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }
    (dot / denom) as f32
}

/// Dot product with f64 accumulation.
pub fn dot_product_f32(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let mut sum = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        sum += x as f64 * y as f64;
    }
    sum as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantization::{QuantizationBounds, Quantizer};

    #[test]
    fn test_euclidean_exact() {
        let d = DistanceMetric::Euclidean.distance_exact(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 25.0).abs() < 1e-5, "squared l2 should be 25, got {d}");
    }

    #[test]
    fn test_cosine_exact_orthogonal() {
        let d = DistanceMetric::Cosine.distance_exact(&[1.0, 0.0], &[0.0, 1.0]);
        assert!((d - 1.0).abs() < 1e-5, "orthogonal cosine distance = 1, got {d}");
    }

    #[test]
    fn test_dot_product_exact() {
        let d = DistanceMetric::DotProduct.distance_exact(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        assert!((d - (-32.0)).abs() < 1e-4, "negative dot should be -32, got {d}");
    }

    #[test]
    fn test_similarity_bounds_and_ordering() {
        let q = [1.0f32, 0.0, 0.0];
        let near = [0.9f32, 0.1, 0.0];
        let far = [-1.0f32, 0.0, 0.0];
        for metric in [
            DistanceMetric::Euclidean,
            DistanceMetric::Cosine,
            DistanceMetric::DotProduct,
        ] {
            let s_near = metric.similarity(&q, &near);
            let s_far = metric.similarity(&q, &far);
            assert!((0.0..=1.0).contains(&s_near), "{metric:?}: {s_near}");
            assert!((0.0..=1.0).contains(&s_far), "{metric:?}: {s_far}");
            assert!(s_near > s_far, "{metric:?}: near {s_near} <= far {s_far}");
        }
    }

    #[test]
    fn test_similarity_self_is_max() {
        let v = [0.3f32, -0.2, 0.8];
        let s = DistanceMetric::Euclidean.similarity(&v, &v);
        assert!((s - 1.0).abs() < 1e-6, "self-similarity should be 1, got {s}");
    }

    #[test]
    fn test_code_distance_tracks_exact() {
        let bounds = QuantizationBounds::uniform(4, -1.0, 1.0).unwrap();
        let quantizer = Quantizer::new(4, 8, bounds).unwrap();
        let query = [0.2f32, -0.4, 0.6, 0.0];
        let stored = [0.5f32, 0.1, -0.3, 0.9];
        let code = quantizer.encode(&stored).unwrap();
        for metric in [
            DistanceMetric::Euclidean,
            DistanceMetric::Cosine,
            DistanceMetric::DotProduct,
        ] {
            let exact = metric.distance_exact(&query, &stored);
            let approx = metric.distance_code(&query, &code);
            assert!(
                (exact - approx).abs() < 0.05,
                "{metric:?}: exact={exact}, approx={approx}"
            );
        }
    }
}
