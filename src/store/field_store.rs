//! The field-vector store.
//!
//! A [`FieldVectorStore`] owns the candidate collection and answers
//! similarity queries. In quantized mode (the default) vectors are stored as
//! fixed-precision codes and search runs in two stages: a cheap approximate
//! scan over all codes selects a shortlist, whose members are then re-ranked
//! with exact distances. With `quantized` disabled the store keeps raw f32
//! vectors and performs a full exact linear scan instead — a mode switch,
//! not a separate component.
//!
//! Mutations (`add` / `remove`) take the write lock; searches take read
//! locks and are safe against each other. Cloning a store produces a new
//! handle to the same shared data.

use crate::candidate::{Candidate, CandidateMetadata};
use crate::config;
use crate::error::{CoreError, CoreResult};
use crate::quantization::{QuantizationBounds, QuantizedCode, Quantizer};
use crate::store::distance::DistanceMetric;
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Store configuration, immutable for the lifetime of a store instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Dimension shared by every vector in the store.
    pub field_dim: usize,
    /// Bits per dimension for quantized storage.
    pub precision_bits: u32,
    /// Store-wide quantization bounds.
    pub bounds: QuantizationBounds,
    /// Distance metric; changing it changes downstream epc computation, so
    /// it is fixed at construction.
    pub metric: DistanceMetric,
    /// When false, the store skips quantization entirely and performs exact
    /// linear scans over raw vectors (trading memory for accuracy).
    pub quantized: bool,
    /// In quantized mode, additionally retain raw f32 vectors so the
    /// re-ranking stage is exact rather than decode-based.
    pub store_raw_vectors: bool,
    /// Shortlist oversampling factor for the approximate stage.
    pub shortlist_factor: usize,
}

impl StoreConfig {
    /// Default configuration for the given dimension: 8-bit quantized
    /// storage over uniform \[-1, 1\] bounds, euclidean metric.
    pub fn new(field_dim: usize) -> Self {
        Self {
            field_dim,
            precision_bits: config::DEFAULT_PRECISION_BITS,
            bounds: QuantizationBounds {
                mins: vec![config::DEFAULT_BOUND_MIN; field_dim],
                maxs: vec![config::DEFAULT_BOUND_MAX; field_dim],
            },
            metric: DistanceMetric::default(),
            quantized: true,
            store_raw_vectors: false,
            shortlist_factor: config::DEFAULT_SHORTLIST_FACTOR,
        }
    }

    /// Switch to exact linear-scan mode (no quantization).
    pub fn exact(mut self) -> Self {
        self.quantized = false;
        self
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the quantization precision.
    pub fn with_precision_bits(mut self, bits: u32) -> Self {
        self.precision_bits = bits;
        self
    }

    /// Set the quantization bounds.
    pub fn with_bounds(mut self, bounds: QuantizationBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Retain raw vectors alongside codes in quantized mode.
    pub fn with_raw_vectors(mut self, store_raw: bool) -> Self {
        self.store_raw_vectors = store_raw;
        self
    }
}

/// A stored entry: candidate plus its vector representation(s).
///
/// Invariant: `code` is present iff the store is quantized; `raw` is present
/// in exact mode and in quantized mode with `store_raw_vectors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    candidate: Candidate,
    code: Option<QuantizedCode>,
    raw: Option<Vec<f32>>,
}

impl StoredEntry {
    /// Exact vector for re-ranking: raw when retained, decoded otherwise.
    fn exact_vector(&self) -> Vec<f32> {
        match (&self.raw, &self.code) {
            (Some(raw), _) => raw.clone(),
            (None, Some(code)) => code.decode(),
            // Unreachable by the entry invariant; empty vec keeps this total.
            (None, None) => Vec::new(),
        }
    }
}

/// Internal store data, protected by a `RwLock`.
#[derive(Debug)]
struct StoreData {
    config: StoreConfig,
    quantizer: Option<Quantizer>,
    entries: HashMap<Uuid, StoredEntry>,
}

/// A candidate materialized for the ranking stage: id, exact (or decoded)
/// vector, metadata snapshot, and store distance to the query.
#[derive(Debug, Clone)]
pub struct PoolCandidate {
    /// Candidate id.
    pub id: Uuid,
    /// Exact vector when available, decoded otherwise.
    pub vector: Vec<f32>,
    /// Metadata snapshot at pool-fetch time.
    pub metadata: CandidateMetadata,
    /// Distance to the query under the store metric.
    pub distance: f32,
}

/// Thread-safe store of field vectors with two-stage similarity search.
///
/// All operations acquire either a read or write lock on the internal data.
/// Cloning produces a new handle to the same shared store.
#[derive(Debug, Clone)]
pub struct FieldVectorStore {
    data: Arc<RwLock<StoreData>>,
}

impl FieldVectorStore {
    /// Creates an empty store.
    ///
    /// Fails with `InvalidParameter` for a zero or oversized dimension and
    /// with `InvalidPrecision` / `DimensionMismatch` if the quantization
    /// configuration is inconsistent.
    pub fn new(config: StoreConfig) -> CoreResult<Self> {
        if config.field_dim == 0 {
            return Err(CoreError::invalid_parameter("field_dim must be positive"));
        }
        if config.field_dim > config::MAX_FIELD_DIM {
            return Err(CoreError::invalid_parameter(format!(
                "field_dim {} exceeds maximum {}",
                config.field_dim,
                config::MAX_FIELD_DIM
            )));
        }
        if config.shortlist_factor == 0 {
            return Err(CoreError::invalid_parameter(
                "shortlist_factor must be positive",
            ));
        }

        let quantizer = if config.quantized {
            Some(Quantizer::new(
                config.field_dim,
                config.precision_bits,
                config.bounds.clone(),
            )?)
        } else {
            None
        };

        Ok(Self {
            data: Arc::new(RwLock::new(StoreData {
                config,
                quantizer,
                entries: HashMap::new(),
            })),
        })
    }

    /// Configured field dimension.
    pub fn field_dim(&self) -> usize {
        self.data.read().config.field_dim
    }

    /// Configured distance metric.
    pub fn metric(&self) -> DistanceMetric {
        self.data.read().config.metric
    }

    /// Number of stored candidates.
    pub fn len(&self) -> usize {
        self.data.read().entries.len()
    }

    /// Whether the store holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.data.read().entries.is_empty()
    }

    /// Whether the store contains the given id.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.data.read().entries.contains_key(id)
    }

    /// Returns a clone of the stored candidate, or `None` if absent.
    pub fn get(&self, id: &Uuid) -> Option<Candidate> {
        self.data.read().entries.get(id).map(|e| e.candidate.clone())
    }

    /// Ingest a vector with metadata. Returns the assigned store-unique id.
    ///
    /// Fails with `DimensionMismatch` if the vector length is not
    /// `field_dim`. The vector is quantized in quantized mode; the raw
    /// vector is retained in exact mode or when `store_raw_vectors` is set.
    pub fn add(&self, vector: Vec<f32>, metadata: CandidateMetadata) -> CoreResult<Uuid> {
        let mut data = self.data.write();
        if vector.len() != data.config.field_dim {
            return Err(CoreError::dimension_mismatch(
                data.config.field_dim,
                vector.len(),
            ));
        }

        let code = match &data.quantizer {
            Some(q) => Some(q.encode(&vector)?),
            None => None,
        };
        let raw = if !data.config.quantized || data.config.store_raw_vectors {
            Some(vector)
        } else {
            None
        };

        let candidate = Candidate::new(metadata);
        let id = candidate.id;
        data.entries.insert(
            id,
            StoredEntry {
                candidate,
                code,
                raw,
            },
        );
        tracing::debug!(%id, total = data.entries.len(), "candidate ingested");
        Ok(id)
    }

    /// Remove a candidate by id. Fails with `NotFound` if absent.
    pub fn remove(&self, id: &Uuid) -> CoreResult<()> {
        let mut data = self.data.write();
        data.entries
            .remove(id)
            .map(|_| ())
            .ok_or(CoreError::NotFound(*id))
    }

    /// Similarity search: up to `k` `(id, distance)` pairs, ascending by
    /// exact distance, ties broken by id.
    ///
    /// Quantized mode runs the two-stage search (approximate scan over
    /// codes, exact re-rank of a `k * shortlist_factor` shortlist), which
    /// bounds quantization error to the shortlist stage. Exact mode scans
    /// raw vectors directly. An empty store returns an empty list.
    pub fn search(&self, query: &[f32], k: usize) -> CoreResult<Vec<(Uuid, f32)>> {
        let data = self.data.read();
        if query.len() != data.config.field_dim {
            return Err(CoreError::dimension_mismatch(
                data.config.field_dim,
                query.len(),
            ));
        }
        if k == 0 || data.entries.is_empty() {
            return Ok(Vec::new());
        }

        let metric = data.config.metric;
        if !data.config.quantized {
            let mut scored: Vec<(Uuid, f32)> = data
                .entries
                .par_iter()
                .map(|(id, entry)| {
                    // Exact mode always retains raw vectors.
                    let v = entry.raw.as_deref().unwrap_or(&[]);
                    (*id, metric.distance_exact(query, v))
                })
                .collect();
            sort_by_distance(&mut scored);
            scored.truncate(k);
            return Ok(scored);
        }

        // Stage (a): approximate distances over all stored codes.
        let mut approx: Vec<(Uuid, f32)> = data
            .entries
            .par_iter()
            .map(|(id, entry)| {
                let d = match &entry.code {
                    Some(code) => metric.distance_code(query, code),
                    None => f32::INFINITY,
                };
                (*id, d)
            })
            .collect();
        sort_by_distance(&mut approx);
        let shortlist_len = k
            .saturating_mul(data.config.shortlist_factor)
            .min(approx.len());
        approx.truncate(shortlist_len);

        // Stage (b): exact re-rank of the shortlist.
        let mut refined: Vec<(Uuid, f32)> = approx
            .iter()
            .map(|(id, _)| {
                let entry = &data.entries[id];
                (*id, metric.distance_exact(query, &entry.exact_vector()))
            })
            .collect();
        sort_by_distance(&mut refined);
        refined.truncate(k);
        Ok(refined)
    }

    /// Fetch a materialized candidate pool for the ranking stage: the
    /// `pool_size` nearest candidates with their exact (or decoded) vectors
    /// and metadata snapshots.
    pub fn candidate_pool(&self, query: &[f32], pool_size: usize) -> CoreResult<Vec<PoolCandidate>> {
        let hits = self.search(query, pool_size)?;
        let data = self.data.read();
        Ok(hits
            .into_iter()
            .filter_map(|(id, distance)| {
                data.entries.get(&id).map(|entry| PoolCandidate {
                    id,
                    vector: entry.exact_vector(),
                    metadata: entry.candidate.metadata.clone(),
                    distance,
                })
            })
            .collect())
    }
}

/// Ascending distance sort with deterministic id tie-break.
fn sort_by_distance(results: &mut [(Uuid, f32)]) {
    results.sort_unstable_by_key(|&(id, d)| (OrderedFloat(d), id));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_embedding(dim: usize, seed: usize) -> Vec<f32> {
        (0..dim)
            .map(|j| ((((seed + 1) * 2654435761 + j * 40503) & 0xFFFF) as f32 / 65535.0) * 2.0 - 1.0)
            .collect()
    }

    fn exact_store(dim: usize) -> FieldVectorStore {
        FieldVectorStore::new(StoreConfig::new(dim).exact()).unwrap()
    }

    // ── Construction ───────────────────────────────────────────────────

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(FieldVectorStore::new(StoreConfig::new(0)).is_err());
    }

    #[test]
    fn test_bad_precision_rejected_at_store_creation() {
        let config = StoreConfig::new(4).with_precision_bits(0);
        assert!(matches!(
            FieldVectorStore::new(config),
            Err(CoreError::InvalidPrecision { bits: 0 })
        ));
    }

    #[test]
    fn test_exact_mode_skips_precision_validation() {
        // Precision is a quantizer concern; exact mode has no quantizer.
        let config = StoreConfig::new(4).with_precision_bits(0).exact();
        assert!(FieldVectorStore::new(config).is_ok());
    }

    // ── Add / remove / get ─────────────────────────────────────────────

    #[test]
    fn test_add_and_get() {
        let store = exact_store(4);
        let id = store
            .add(vec![0.1, 0.2, 0.3, 0.4], CandidateMetadata::default())
            .unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.contains(&id));
        assert_eq!(store.get(&id).unwrap().id, id);
    }

    #[test]
    fn test_add_dimension_mismatch() {
        let store = exact_store(4);
        assert!(matches!(
            store.add(vec![0.1, 0.2], CandidateMetadata::default()),
            Err(CoreError::DimensionMismatch {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_remove() {
        let store = exact_store(4);
        let id = store
            .add(vec![0.0; 4], CandidateMetadata::default())
            .unwrap();
        store.remove(&id).unwrap();
        assert!(store.is_empty());
        assert!(matches!(store.remove(&id), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn test_remove_unknown_id() {
        let store = exact_store(4);
        let unknown = Uuid::new_v4();
        assert!(matches!(
            store.remove(&unknown),
            Err(CoreError::NotFound(id)) if id == unknown
        ));
    }

    // ── Search: exact mode ─────────────────────────────────────────────

    #[test]
    fn test_search_empty_store() {
        let store = exact_store(4);
        assert!(store.search(&[0.0; 4], 5).unwrap().is_empty());
    }

    #[test]
    fn test_search_query_dimension_mismatch() {
        let store = exact_store(4);
        assert!(store.search(&[0.0; 3], 5).is_err());
    }

    #[test]
    fn test_exact_search_orders_by_true_distance() {
        let store = exact_store(4);
        let near = store
            .add(vec![1.0, 0.0, 0.0, 0.0], CandidateMetadata::default())
            .unwrap();
        let mid = store
            .add(vec![0.5, 0.5, 0.0, 0.0], CandidateMetadata::default())
            .unwrap();
        let far = store
            .add(vec![-1.0, 0.0, 0.0, 0.0], CandidateMetadata::default())
            .unwrap();

        let hits = store.search(&[1.0, 0.0, 0.0, 0.0], 3).unwrap();
        let ids: Vec<Uuid> = hits.iter().map(|&(id, _)| id).collect();
        assert_eq!(ids, vec![near, mid, far]);
        assert!(hits[0].1 <= hits[1].1 && hits[1].1 <= hits[2].1);
    }

    #[test]
    fn test_search_truncates_to_k() {
        let store = exact_store(8);
        for seed in 0..20 {
            store
                .add(make_embedding(8, seed), CandidateMetadata::default())
                .unwrap();
        }
        assert_eq!(store.search(&make_embedding(8, 100), 5).unwrap().len(), 5);
    }

    // ── Search: quantized two-stage ────────────────────────────────────

    #[test]
    fn test_quantized_matches_exact_at_8_bits() {
        // With 8-bit codes the two-stage search matches the exact top-k,
        // allowing at most one positional swap for adjacent-distance ties.
        let exact = exact_store(8);
        let quantized = FieldVectorStore::new(StoreConfig::new(8)).unwrap();

        let vectors: Vec<Vec<f32>> = (0..30).map(|s| make_embedding(8, s)).collect();
        let mut exact_ids = Vec::new();
        let mut quant_ids = Vec::new();
        for v in &vectors {
            exact_ids.push(exact.add(v.clone(), CandidateMetadata::default()).unwrap());
            quant_ids.push(
                quantized
                    .add(v.clone(), CandidateMetadata::default())
                    .unwrap(),
            );
        }

        let query = make_embedding(8, 999);
        let exact_hits = exact.search(&query, 5).unwrap();
        let quant_hits = quantized.search(&query, 5).unwrap();

        // Map both result lists back to vector indices for comparison.
        let to_index = |ids: &[Uuid], hits: &[(Uuid, f32)]| -> Vec<usize> {
            hits.iter()
                .map(|(id, _)| ids.iter().position(|x| x == id).unwrap())
                .collect()
        };
        let e = to_index(&exact_ids, &exact_hits);
        let q = to_index(&quant_ids, &quant_hits);

        for (pos, idx) in q.iter().enumerate() {
            let matches_adjacent = e.get(pos) == Some(idx)
                || (pos > 0 && e.get(pos - 1) == Some(idx))
                || e.get(pos + 1) == Some(idx);
            assert!(
                matches_adjacent,
                "position {pos}: quantized {idx} not within one swap of exact {e:?} vs {q:?}"
            );
        }
    }

    #[test]
    fn test_quantized_search_with_raw_refine() {
        let config = StoreConfig::new(8).with_raw_vectors(true);
        let store = FieldVectorStore::new(config).unwrap();
        for seed in 0..10 {
            store
                .add(make_embedding(8, seed), CandidateMetadata::default())
                .unwrap();
        }
        let query = make_embedding(8, 3);
        let hits = store.search(&query, 3).unwrap();
        assert_eq!(hits.len(), 3);
        // Self-match: vector 3 is in the store, exact refine puts it first
        // with near-zero distance.
        assert!(hits[0].1 < 1e-6, "self distance should be ~0, got {}", hits[0].1);
    }

    // ── Candidate pool ─────────────────────────────────────────────────

    #[test]
    fn test_candidate_pool_materializes_vectors_and_metadata() {
        let store = exact_store(4);
        let meta = CandidateMetadata::default()
            .with_quality(0.9)
            .with_topics(vec!["io".into()]);
        let id = store.add(vec![0.5, 0.0, 0.0, 0.0], meta).unwrap();

        let pool = store.candidate_pool(&[0.5, 0.0, 0.0, 0.0], 4).unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id, id);
        assert_eq!(pool[0].vector, vec![0.5, 0.0, 0.0, 0.0]);
        assert_eq!(pool[0].metadata.quality, Some(0.9));
        assert!(pool[0].distance < 1e-6);
    }

    #[test]
    fn test_candidate_pool_smaller_than_requested() {
        let store = exact_store(4);
        store
            .add(vec![0.0; 4], CandidateMetadata::default())
            .unwrap();
        let pool = store.candidate_pool(&[0.0; 4], 16).unwrap();
        assert_eq!(pool.len(), 1);
    }

    // ── Shared-handle semantics ────────────────────────────────────────

    #[test]
    fn test_clone_shares_data() {
        let store = exact_store(4);
        let handle = store.clone();
        store
            .add(vec![0.0; 4], CandidateMetadata::default())
            .unwrap();
        assert_eq!(handle.len(), 1);
    }
}
