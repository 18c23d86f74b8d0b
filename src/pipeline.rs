//! The retrieval pipeline: candidate pool fetch plus blessing ranking.
//!
//! The pipeline is the top-level query surface. Given an embedded query
//! vector it fetches an oversampled candidate pool from the store, then runs
//! the iterative Pareto ranking loop over it. The pool is a query-local
//! snapshot: concurrent store mutations never disturb a ranking pass in
//! flight.

use crate::blessing::evaluator::{BlessingEvaluator, QueryIntent};
use crate::config;
use crate::error::{CoreError, CoreResult};
use crate::pareto::ranker::{ParetoRanker, RankerConfig, RankingOutcome};
use crate::store::FieldVectorStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pipeline configuration: pool sizing plus the embedded ranker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pool oversampling: the pool holds `k * pool_multiplier` candidates.
    pub pool_multiplier: usize,
    /// Floor on the pool size, so small `k` still ranks over a meaningful
    /// diversity of candidates.
    pub min_pool: usize,
    /// Ranker configuration.
    pub ranker: RankerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pool_multiplier: config::DEFAULT_POOL_MULTIPLIER,
            min_pool: config::DEFAULT_MIN_POOL,
            ranker: RankerConfig::default(),
        }
    }
}

/// End-to-end retrieval: store search, pool materialization, blessing
/// ranking.
#[derive(Debug, Clone)]
pub struct RetrievalPipeline {
    store: FieldVectorStore,
    config: PipelineConfig,
    ranker: ParetoRanker,
}

impl RetrievalPipeline {
    /// Creates a pipeline over the given store.
    ///
    /// The evaluator inherits the store's distance metric, so search order
    /// and the epc axis agree on what "similar" means.
    pub fn new(store: FieldVectorStore, config: PipelineConfig) -> CoreResult<Self> {
        if config.pool_multiplier == 0 {
            return Err(CoreError::invalid_parameter(
                "pool_multiplier must be positive",
            ));
        }
        let evaluator = BlessingEvaluator::new(store.metric());
        let ranker = ParetoRanker::new(config.ranker.clone(), evaluator)?;
        Ok(Self {
            store,
            config,
            ranker,
        })
    }

    /// The underlying store handle.
    pub fn store(&self) -> &FieldVectorStore {
        &self.store
    }

    /// Query without an intent signal; the resonance axis stays neutral.
    pub fn query(&self, vector: &[f32], k: usize) -> CoreResult<RankingOutcome> {
        self.query_with_intent(vector, &QueryIntent::default(), k)
    }

    /// Full query: fetch the candidate pool and rank it.
    ///
    /// An empty store or `k = 0` yields an empty outcome, not an error; a
    /// pool smaller than `k` yields fewer results. Dimension mismatches
    /// propagate from the store.
    pub fn query_with_intent(
        &self,
        vector: &[f32],
        intent: &QueryIntent,
        k: usize,
    ) -> CoreResult<RankingOutcome> {
        if k == 0 {
            return Ok(RankingOutcome::empty());
        }
        let pool_size = k
            .saturating_mul(self.config.pool_multiplier)
            .max(self.config.min_pool);
        let pool = self.store.candidate_pool(vector, pool_size)?;
        if pool.is_empty() {
            return Ok(RankingOutcome::empty());
        }

        let outcome = self.ranker.rank(&pool, vector, intent, k);
        debug!(
            pool = pool.len(),
            requested = k,
            selected = outcome.results.len(),
            iterations = outcome.status.iterations(),
            degraded = outcome.is_degraded(),
            "retrieval query complete"
        );
        Ok(outcome)
    }
}
