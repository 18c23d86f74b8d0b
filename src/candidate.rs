//! Candidate types for pbjrag-core.
//!
//! A `Candidate` represents a stored record with a unique UUID and the
//! metadata signals the blessing evaluator consumes. The field vector itself
//! is stored separately (quantized or raw) in the store. `MetadataValue`
//! supports boolean, integer, float, and string values for caller-defined
//! annotations the core carries but does not interpret.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A typed metadata value attached to a candidate.
///
/// Opaque to the core: carried through ingestion and returned with results,
/// never read by the ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MetadataValue {
    /// Boolean value (`true` / `false`).
    Boolean(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating-point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
}

/// Metadata signals supplied by the external embedding collaborator.
///
/// The evaluator reads exactly four signals: `quality` feeds the qualia
/// axis, `topics` feed presence (inverse coverage), and `intents` /
/// `intent_embedding` feed resonance. All of them are optional; absent
/// signals fall back to neutral axis scores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateMetadata {
    /// Content-derived quality heuristic, clamped to \[0, 1\] by the evaluator.
    pub quality: Option<f32>,
    /// Topic tags used for coverage (presence) computation.
    pub topics: Vec<String>,
    /// Intent tags matched against the query's intent tags (resonance).
    pub intents: Vec<String>,
    /// Secondary intent embedding from the external embedder, compared by
    /// cosine against the query's intent embedding when both are present.
    pub intent_embedding: Option<Vec<f32>>,
    /// Arbitrary caller annotations, not read by the core.
    pub extra: HashMap<String, MetadataValue>,
}

impl CandidateMetadata {
    /// Set the raw quality score.
    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Set the topic tags.
    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.topics = topics;
        self
    }

    /// Set the intent tags.
    pub fn with_intents(mut self, intents: Vec<String>) -> Self {
        self.intents = intents;
        self
    }

    /// Set the secondary intent embedding.
    pub fn with_intent_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.intent_embedding = Some(embedding);
        self
    }
}

/// A stored candidate: unique id plus metadata.
///
/// Candidates are created on ingestion, immutable thereafter, and destroyed
/// on explicit removal. The ranker never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique identifier (UUID v4). Also the deterministic tie-break key.
    pub id: Uuid,
    /// Evaluator signals and caller annotations.
    pub metadata: CandidateMetadata,
}

impl Candidate {
    /// Creates a new candidate with a random UUID.
    pub fn new(metadata: CandidateMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            metadata,
        }
    }

    /// Creates a candidate with a specific UUID.
    pub fn with_id(id: Uuid, metadata: CandidateMetadata) -> Self {
        Self { id, metadata }
    }
}
