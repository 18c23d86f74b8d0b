//! The five-axis blessing evaluator.
//!
//! Given a candidate, the query, pool-level statistics, and the current
//! [`SelectionContext`], produces a [`BlessingVector`]. Every axis is
//! deterministic for a fixed `(candidate, query, context)` triple — no
//! hidden randomness — and the evaluator never mutates shared state, so
//! per-iteration evaluation fans out safely across candidates.
//!
//! Axis derivation:
//! - `epc`: query similarity, min-max normalized across the candidate pool,
//!   shaped by a steep sigmoid centered at 0.5
//! - `qualia`: metadata quality clamped to \[0, 1\]; neutral 0.5 if absent
//! - `contradiction`: max vector similarity to any context member
//! - `presence`: 1 − max topic-tag Jaccard overlap against context members
//! - `resonance`: intent-embedding cosine when both sides carry one, intent
//!   tag Jaccard otherwise; neutral 0.5 when neither side has a signal

use crate::blessing::context::SelectionContext;
use crate::blessing::vector::BlessingVector;
use crate::config;
use crate::store::distance::cosine_f32;
use crate::store::{DistanceMetric, PoolCandidate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Query-side intent signal, supplied by the external embedder alongside
/// the query vector. Both fields are optional; with neither present the
/// resonance axis stays neutral.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryIntent {
    /// Query intent tags.
    pub tags: Vec<String>,
    /// Secondary intent embedding.
    pub embedding: Option<Vec<f32>>,
}

impl QueryIntent {
    /// Intent with tags only.
    pub fn from_tags(tags: Vec<String>) -> Self {
        Self {
            tags,
            embedding: None,
        }
    }
}

/// Pool-level similarity statistics, computed once per ranking pass and
/// used to normalize the epc axis across the pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolStats {
    min_similarity: f32,
    max_similarity: f32,
}

/// Computes blessing vectors for pool candidates.
#[derive(Debug, Clone, Copy)]
pub struct BlessingEvaluator {
    metric: DistanceMetric,
}

impl BlessingEvaluator {
    /// Creates an evaluator using the store's distance metric, keeping one
    /// similarity contract between search and epc.
    pub fn new(metric: DistanceMetric) -> Self {
        Self { metric }
    }

    /// Compute min/max query similarity across the pool.
    ///
    /// Fixed for the whole ranking pass so epc stays stable while the
    /// context evolves.
    pub fn pool_stats(&self, query: &[f32], pool: &[PoolCandidate]) -> PoolStats {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for c in pool {
            let s = self.metric.similarity(query, &c.vector);
            if s < min {
                min = s;
            }
            if s > max {
                max = s;
            }
        }
        PoolStats {
            min_similarity: min,
            max_similarity: max,
        }
    }

    /// Evaluate one candidate against the query and the current context.
    pub fn evaluate(
        &self,
        candidate: &PoolCandidate,
        query: &[f32],
        intent: &QueryIntent,
        stats: &PoolStats,
        ctx: &SelectionContext,
    ) -> BlessingVector {
        let epc = self.epc(candidate, query, stats);
        let qualia = candidate
            .metadata
            .quality
            .unwrap_or(config::NEUTRAL_AXIS_SCORE)
            .clamp(0.0, 1.0);
        let contradiction = self.contradiction(candidate, ctx);
        let presence = self.presence(candidate, ctx);
        let resonance = self.resonance(candidate, intent);
        BlessingVector::new(epc, qualia, contradiction, presence, resonance)
    }

    /// Monotonic transform of query similarity: min-max normalize across
    /// the pool, then apply the steep sigmoid the original EPC curve uses.
    fn epc(&self, candidate: &PoolCandidate, query: &[f32], stats: &PoolStats) -> f32 {
        let s = self.metric.similarity(query, &candidate.vector);
        let range = stats.max_similarity - stats.min_similarity;
        let normalized = if range < f32::EPSILON {
            1.0
        } else {
            (s - stats.min_similarity) / range
        };
        sigmoid(normalized)
    }

    /// Maximum similarity of this candidate to any already-selected
    /// candidate: high means it duplicates something in the context.
    /// The only axis that reads raw vector similarity against the context.
    fn contradiction(&self, candidate: &PoolCandidate, ctx: &SelectionContext) -> f32 {
        ctx.selected()
            .iter()
            .map(|sel| self.metric.similarity(&candidate.vector, &sel.vector))
            .fold(0.0f32, f32::max)
    }

    /// Inverse topic coverage: 1 − max Jaccard overlap of topic tags with
    /// any context member. An empty context or untagged candidate counts as
    /// fully under-represented.
    fn presence(&self, candidate: &PoolCandidate, ctx: &SelectionContext) -> f32 {
        if candidate.metadata.topics.is_empty() {
            return 1.0;
        }
        let max_overlap = ctx
            .selected()
            .iter()
            .map(|sel| jaccard(&candidate.metadata.topics, &sel.metadata.topics))
            .fold(0.0f32, f32::max);
        1.0 - max_overlap
    }

    /// Intent alignment between candidate metadata and query intent.
    fn resonance(&self, candidate: &PoolCandidate, intent: &QueryIntent) -> f32 {
        if let (Some(ce), Some(qe)) = (&candidate.metadata.intent_embedding, &intent.embedding) {
            if ce.len() == qe.len() && !ce.is_empty() {
                return ((1.0 + cosine_f32(ce, qe)) / 2.0).clamp(0.0, 1.0);
            }
        }
        if candidate.metadata.intents.is_empty() || intent.tags.is_empty() {
            return config::NEUTRAL_AXIS_SCORE;
        }
        jaccard(&candidate.metadata.intents, &intent.tags)
    }
}

/// Steep sigmoid centered at 0.5; keeps \[0, 1\] inputs in (0, 1).
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-config::EPC_SIGMOID_STEEPNESS * (x - 0.5)).exp())
}

/// Jaccard overlap of two tag sets. Empty-on-either-side yields 0.
fn jaccard(a: &[String], b: &[String]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let sa: HashSet<&str> = a.iter().map(String::as_str).collect();
    let sb: HashSet<&str> = b.iter().map(String::as_str).collect();
    let intersection = sa.intersection(&sb).count();
    let union = sa.union(&sb).count();
    intersection as f32 / union as f32
}
