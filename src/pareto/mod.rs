//! Pareto ranking: dominance, non-dominated sorting, scalarization, and the
//! iterative greedy refinement loop.
//!
//! Each iteration evaluates the remaining candidates against the current
//! selection context, computes the non-dominated front over the
//! sign-normalized blessing axes, scalarizes with a weighted power mean, and
//! selects the strongest front member. The loop terminates when `k` results
//! are selected, when scores stabilize, or at the iteration safety cap.

/// Dominance test and non-dominated sorting.
pub mod front;
/// Scalarization, configuration, and the ranking loop.
pub mod ranker;

pub use front::{dominates, pareto_front, pareto_layers};
pub use ranker::{
    AxisWeights, BlessingTier, ConvergenceStatus, ParetoRanker, RankedResult, RankerConfig,
    RankingOutcome,
};
