//! Blessing scoring: five-axis candidate evaluation.
//!
//! A blessing vector scores a candidate's fitness relative to a query and
//! the candidates already selected in the current ranking pass. Two of the
//! five axes (contradiction, presence) read the evolving
//! [`SelectionContext`]; the evaluator is pure modulo that one explicit
//! input, so evaluation across candidates within one iteration can be
//! fanned out without coordination.

/// The query-local record of already-selected candidates.
pub mod context;
/// The five-axis evaluator.
pub mod evaluator;
/// The five-axis score value type.
pub mod vector;

pub use context::{SelectedCandidate, SelectionContext};
pub use evaluator::{BlessingEvaluator, PoolStats, QueryIntent};
pub use vector::{BlessingVector, AXIS_COUNT};
