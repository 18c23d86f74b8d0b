//! # pbjrag-core
//!
//! Embeddable field-vector retrieval engine: a scalar-quantized vector store
//! coupled to a multi-objective, state-dependent ranking engine
//! ("blessing ranking").
//!
//! ## Features
//!
//! - **Scalar quantization** with configurable precision (1–16 bits per
//!   dimension) and store-wide calibrated bounds, for compact storage and
//!   fast approximate distance
//! - **Two-stage search**: approximate scan over quantized codes followed by
//!   exact re-ranking of the shortlist, bounding quantization error to the
//!   shortlist stage; an exact linear-scan mode is available as a toggle
//! - **Blessing evaluation**: five-axis candidate scoring (epc, qualia,
//!   contradiction, presence, resonance) against a query and the evolving
//!   selection context
//! - **Pareto ranking**: non-dominated sorting, power-mean scalarization with
//!   a risk exponent, and iterative greedy refinement with a stability
//!   criterion and iteration cap
//!
//! ## Architecture
//!
//! ```text
//! RetrievalPipeline → FieldVectorStore → { Quantizer, DistanceMetric }
//!                   → ParetoRanker → BlessingEvaluator ⇄ SelectionContext
//! ```
//!
//! This is a synchronous core library with zero async dependencies — suitable
//! for embedding directly in Rust or behind a language binding. Embedding
//! generation, persistence, and any network surface are the caller's concern.

/// Blessing scoring: the five-axis score vector, selection context, and evaluator.
pub mod blessing;
/// Candidate types: `Candidate`, `CandidateMetadata`, and `MetadataValue`.
pub mod candidate;
/// Global configuration constants: limits, defaults, and tuning parameters.
pub mod config;
/// Error taxonomy for the core: dimension, precision, lookup, and parameter errors.
pub mod error;
/// Pareto ranking: dominance, non-dominated sorting, scalarization, and the ranking loop.
pub mod pareto;
/// Retrieval pipeline: candidate pool fetch and ranked query orchestration.
pub mod pipeline;
/// Scalar quantization: f32 → fixed-precision codes with store-wide bounds.
pub mod quantization;
/// Vector storage: distance metrics and the field-vector store with two-stage search.
pub mod store;
