//! The Pareto ranker: scalarization and the iterative greedy ranking loop.
//!
//! Per iteration: evaluate the remaining candidates against the current
//! selection context (fan-out, with a fan-in barrier before selection),
//! non-dominated sort over the sign-normalized axes, scalarize everything
//! with the weighted power mean, select the strongest front member not yet
//! selected, and grow the context. Iterations are strictly sequential —
//! each one's input depends on the previous one's context mutation.
//!
//! Termination is an explicit predicate, not an implicit fixpoint: the loop
//! ends when `k` results are selected, when score movement drops to the
//! stability threshold (remaining slots are then finalized from the last
//! scored ordering), or at the iteration safety cap, which is a warning
//! condition rather than an error.

use crate::blessing::context::{SelectedCandidate, SelectionContext};
use crate::blessing::evaluator::{BlessingEvaluator, QueryIntent};
use crate::blessing::vector::{BlessingVector, AXIS_COUNT};
use crate::config;
use crate::error::{CoreError, CoreResult};
use crate::pareto::front::pareto_layers;
use crate::store::PoolCandidate;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

/// Per-axis scalarization weights. Uniform by default; normalized to sum to
/// one before use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AxisWeights {
    /// Weight of the epc axis.
    pub epc: f32,
    /// Weight of the qualia axis.
    pub qualia: f32,
    /// Weight of the (inverted) contradiction axis.
    pub contradiction: f32,
    /// Weight of the presence axis.
    pub presence: f32,
    /// Weight of the resonance axis.
    pub resonance: f32,
}

impl Default for AxisWeights {
    fn default() -> Self {
        Self {
            epc: 1.0,
            qualia: 1.0,
            contradiction: 1.0,
            presence: 1.0,
            resonance: 1.0,
        }
    }
}

impl AxisWeights {
    /// Validate: every weight non-negative, at least one positive.
    pub fn validate(&self) -> CoreResult<()> {
        let w = self.as_array();
        if w.iter().any(|&x| x < 0.0 || !x.is_finite()) {
            return Err(CoreError::invalid_parameter(
                "axis weights must be finite and non-negative",
            ));
        }
        if w.iter().sum::<f32>() <= 0.0 {
            return Err(CoreError::invalid_parameter(
                "at least one axis weight must be positive",
            ));
        }
        Ok(())
    }

    /// Weights in objective order: `[epc, qualia, contradiction, presence, resonance]`.
    pub fn as_array(&self) -> [f32; AXIS_COUNT] {
        [
            self.epc,
            self.qualia,
            self.contradiction,
            self.presence,
            self.resonance,
        ]
    }

    /// Sum-normalized weights. Assumes [`AxisWeights::validate`] passed.
    pub fn normalized(&self) -> [f32; AXIS_COUNT] {
        let mut w = self.as_array();
        let sum: f32 = w.iter().sum();
        for x in &mut w {
            *x /= sum;
        }
        w
    }
}

/// Weighted power-mean scalarization:
/// `score = (Σ_axis w_axis · v_axis^alpha)^(1/alpha)`.
///
/// With normalized weights and objectives in \[0, 1\] the score stays in
/// \[0, 1\]. As `alpha` grows the mean approaches the candidate's best
/// weighted axis (risk-seeking); at `alpha = 1` it is the plain weighted
/// average (risk-neutral).
pub fn scalarize(
    objectives: &[f32; AXIS_COUNT],
    weights: &[f32; AXIS_COUNT],
    alpha: f32,
) -> f32 {
    let mut acc = 0.0f64;
    for i in 0..AXIS_COUNT {
        acc += weights[i] as f64 * (objectives[i] as f64).powf(alpha as f64);
    }
    acc.powf(1.0 / alpha as f64) as f32
}

/// Ranker configuration, immutable for the lifetime of a ranker instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankerConfig {
    /// Risk/preference exponent for scalarization. Must be positive.
    pub pareto_alpha: f32,
    /// Score-movement threshold below which the ranking is stable. In \[0, 1\].
    pub stability_threshold: f32,
    /// Safety cap on ranking iterations.
    pub max_iterations: usize,
    /// Per-axis scalarization weights.
    pub weights: AxisWeights,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            pareto_alpha: config::DEFAULT_PARETO_ALPHA,
            stability_threshold: config::DEFAULT_STABILITY_THRESHOLD,
            max_iterations: config::DEFAULT_MAX_ITERATIONS,
            weights: AxisWeights::default(),
        }
    }
}

impl RankerConfig {
    /// Creates a configuration with the given risk exponent and stability
    /// threshold, validating both.
    pub fn new(pareto_alpha: f32, stability_threshold: f32) -> CoreResult<Self> {
        let cfg = Self {
            pareto_alpha,
            stability_threshold,
            ..Self::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Set the iteration safety cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the axis weights (validated by [`ParetoRanker::new`]).
    pub fn with_weights(mut self, weights: AxisWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Validate all parameters.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.pareto_alpha > 0.0) || !self.pareto_alpha.is_finite() {
            return Err(CoreError::invalid_parameter(format!(
                "pareto_alpha must be a positive real, got {}",
                self.pareto_alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.stability_threshold) {
            return Err(CoreError::invalid_parameter(format!(
                "stability_threshold must be in [0, 1], got {}",
                self.stability_threshold
            )));
        }
        if self.max_iterations == 0 {
            return Err(CoreError::invalid_parameter(
                "max_iterations must be positive",
            ));
        }
        self.weights.validate()
    }
}

/// Blessing tier classification of a scalarized score (Φ+ / Φ~ / Φ−).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlessingTier {
    /// Score ≥ the positive cutoff.
    Positive,
    /// Score ≥ the neutral cutoff but below positive.
    Neutral,
    /// Everything below the neutral cutoff.
    Negative,
}

impl BlessingTier {
    /// Classify a scalarized score against the tier cutoffs.
    pub fn classify(score: f32) -> Self {
        if score >= config::TIER_POSITIVE_CUTOFF {
            Self::Positive
        } else if score >= config::TIER_NEUTRAL_CUTOFF {
            Self::Neutral
        } else {
            Self::Negative
        }
    }
}

impl std::fmt::Display for BlessingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "Φ+"),
            Self::Neutral => write!(f, "Φ~"),
            Self::Negative => write!(f, "Φ−"),
        }
    }
}

/// How a ranking pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvergenceStatus {
    /// All requested results selected through per-iteration refinement.
    Converged {
        /// Iterations consumed.
        iterations: usize,
    },
    /// Score movement dropped to the stability threshold; remaining slots
    /// were finalized from the last scored ordering.
    Stable {
        /// Iterations consumed, including the stable one.
        iterations: usize,
    },
    /// The iteration safety cap was exhausted first. The ranking is partial
    /// and best-effort — a warning, not an error.
    IterationCapReached {
        /// Iterations consumed (equals the cap).
        iterations: usize,
    },
}

impl ConvergenceStatus {
    /// Iterations consumed by the pass.
    pub fn iterations(&self) -> usize {
        match *self {
            Self::Converged { iterations }
            | Self::Stable { iterations }
            | Self::IterationCapReached { iterations } => iterations,
        }
    }

    /// Whether the ranking is a best-effort partial result.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::IterationCapReached { .. })
    }
}

/// One ranked result, recorded at selection time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    /// Candidate id.
    pub id: Uuid,
    /// Blessing vector at selection time.
    pub blessing: BlessingVector,
    /// Scalarized score at selection time.
    pub score: f32,
    /// Non-dominated sorting layer at selection time (0 = Pareto front).
    pub front_rank: usize,
    /// Iteration number at which the result was finalized (1-based).
    pub iteration: usize,
    /// Tier classification of the score.
    pub tier: BlessingTier,
}

/// A completed ranking pass: results in selection order plus how the pass
/// ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingOutcome {
    /// Results in selection order.
    pub results: Vec<RankedResult>,
    /// Terminal status of the pass.
    pub status: ConvergenceStatus,
}

impl RankingOutcome {
    /// An empty outcome (empty pool or `k = 0`).
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            status: ConvergenceStatus::Converged { iterations: 0 },
        }
    }

    /// Whether the ranking is a best-effort partial result.
    pub fn is_degraded(&self) -> bool {
        self.status.is_degraded()
    }
}

/// Drives the iterative greedy ranking loop.
#[derive(Debug, Clone)]
pub struct ParetoRanker {
    config: RankerConfig,
    evaluator: BlessingEvaluator,
}

impl ParetoRanker {
    /// Creates a ranker, validating the configuration.
    pub fn new(config: RankerConfig, evaluator: BlessingEvaluator) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self { config, evaluator })
    }

    /// Rank the pool against the query, selecting up to `k` results.
    ///
    /// A pool smaller than `k` yields fewer results; that is not an error.
    pub fn rank(
        &self,
        pool: &[PoolCandidate],
        query: &[f32],
        intent: &QueryIntent,
        k: usize,
    ) -> RankingOutcome {
        let k_eff = k.min(pool.len());
        if k_eff == 0 {
            return RankingOutcome::empty();
        }

        let weights = self.config.weights.normalized();
        let alpha = self.config.pareto_alpha;
        // Pool statistics are fixed for the whole pass; only the context evolves.
        let stats = self.evaluator.pool_stats(query, pool);

        let mut ctx = SelectionContext::new();
        let mut results: Vec<RankedResult> = Vec::with_capacity(k_eff);
        let mut prev_scores: Option<HashMap<Uuid, f32>> = None;
        let mut iterations = 0usize;

        let status = loop {
            if results.len() == k_eff {
                break ConvergenceStatus::Converged { iterations };
            }
            if iterations >= self.config.max_iterations {
                warn!(
                    iterations,
                    selected = results.len(),
                    requested = k_eff,
                    "iteration cap exhausted; returning best-effort partial ranking"
                );
                break ConvergenceStatus::IterationCapReached { iterations };
            }
            iterations += 1;

            let remaining: Vec<&PoolCandidate> =
                pool.iter().filter(|c| !ctx.contains(&c.id)).collect();

            // Fan-out evaluation; the collect is the fan-in barrier before
            // selection mutates the context.
            let blessings: Vec<BlessingVector> = remaining
                .par_iter()
                .map(|c| self.evaluator.evaluate(c, query, intent, &stats, &ctx))
                .collect();
            let objectives: Vec<[f32; AXIS_COUNT]> =
                blessings.iter().map(BlessingVector::as_objectives).collect();
            let layers = pareto_layers(&objectives);
            let scores: Vec<f32> = objectives
                .iter()
                .map(|o| scalarize(o, &weights, alpha))
                .collect();

            if let Some(prev) = &prev_scores {
                let movement: f32 = remaining
                    .iter()
                    .zip(&scores)
                    .filter_map(|(c, &s)| prev.get(&c.id).map(|p| (p - s).abs()))
                    .sum();
                if movement <= self.config.stability_threshold {
                    debug!(
                        iteration = iterations,
                        movement, "scores stable; finalizing remaining slots"
                    );
                    let mut order: Vec<usize> = (0..remaining.len()).collect();
                    order.sort_unstable_by_key(|&i| {
                        (Reverse(OrderedFloat(scores[i])), remaining[i].id)
                    });
                    for &i in order.iter().take(k_eff - results.len()) {
                        results.push(RankedResult {
                            id: remaining[i].id,
                            blessing: blessings[i],
                            score: scores[i],
                            front_rank: layers[i],
                            iteration: iterations,
                            tier: BlessingTier::classify(scores[i]),
                        });
                    }
                    break ConvergenceStatus::Stable { iterations };
                }
            }
            prev_scores = Some(
                remaining
                    .iter()
                    .zip(&scores)
                    .map(|(c, &s)| (c.id, s))
                    .collect(),
            );

            // Highest-scoring Pareto-front member; exact score ties break by id.
            let best = (0..remaining.len())
                .filter(|&i| layers[i] == 0)
                .min_by_key(|&i| (Reverse(OrderedFloat(scores[i])), remaining[i].id));
            let Some(best) = best else {
                // Unreachable: a non-empty remaining set always has a front.
                break ConvergenceStatus::Converged { iterations };
            };

            let selected = remaining[best];
            results.push(RankedResult {
                id: selected.id,
                blessing: blessings[best],
                score: scores[best],
                front_rank: layers[best],
                iteration: iterations,
                tier: BlessingTier::classify(scores[best]),
            });
            ctx.push(SelectedCandidate::from(selected));
        };

        debug!(selected = results.len(), ?status, "ranking pass complete");
        RankingOutcome { results, status }
    }
}
