//! Vector storage: distance metrics and the field-vector store.
//!
//! The store owns the candidate collection (quantized codes and/or raw
//! vectors) and answers similarity queries with a two-stage search:
//! approximate scan over quantized codes, then exact re-ranking of the
//! shortlist. An exact linear-scan mode is available as a configuration
//! toggle for callers that trade memory for accuracy.

/// Distance metrics: euclidean, cosine, and dot product.
pub mod distance;
/// The field-vector store: configuration, data, and search.
pub mod field_store;

pub use distance::DistanceMetric;
pub use field_store::{FieldVectorStore, PoolCandidate, StoreConfig};
