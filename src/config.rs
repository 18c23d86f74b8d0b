//! Global configuration constants for pbjrag-core.
//!
//! All tuning parameters and input validation limits are defined here.
//! Per-instance configuration (dimensions, precision, metric, ranking
//! parameters) lives in the `StoreConfig`, `RankerConfig`, and
//! `PipelineConfig` structs; these are the compile-time defaults they start
//! from.

/// Default quantization precision in bits per dimension.
///
/// 8 bits gives a 4× memory reduction over f32 with reconstruction error
/// below 0.4% of the calibrated range per dimension.
pub const DEFAULT_PRECISION_BITS: u32 = 8;

/// Minimum allowed quantization precision in bits per dimension.
pub const MIN_PRECISION_BITS: u32 = 1;

/// Maximum allowed quantization precision in bits per dimension.
///
/// Codes are stored as `u16`, so 16 bits is the storage ceiling.
pub const MAX_PRECISION_BITS: u32 = 16;

/// Default lower bound for quantization calibration when no sample is available.
pub const DEFAULT_BOUND_MIN: f32 = -1.0;

/// Default upper bound for quantization calibration when no sample is available.
pub const DEFAULT_BOUND_MAX: f32 = 1.0;

/// Maximum allowed field-vector dimension.
pub const MAX_FIELD_DIM: usize = 4096;

/// Shortlist oversampling factor for two-stage search.
///
/// The approximate stage selects `k * DEFAULT_SHORTLIST_FACTOR` candidates
/// for exact re-ranking. Higher values reduce the chance that quantization
/// error evicts a true top-`k` member from the shortlist.
pub const DEFAULT_SHORTLIST_FACTOR: usize = 4;

/// Candidate pool multiplier for the retrieval pipeline.
///
/// A query for `k` results fetches `k * DEFAULT_POOL_MULTIPLIER` candidates
/// from the store so the ranker has diversity headroom.
pub const DEFAULT_POOL_MULTIPLIER: usize = 4;

/// Minimum candidate pool size requested by the pipeline regardless of `k`.
pub const DEFAULT_MIN_POOL: usize = 16;

/// Default Pareto scalarization exponent (risk parameter).
///
/// 1.0 is a plain weighted average (risk-neutral); larger values increasingly
/// reward candidates strong on their best axis (risk-seeking).
pub const DEFAULT_PARETO_ALPHA: f32 = 2.0;

/// Default stability threshold for the ranking loop.
///
/// When the summed absolute change in scalarized scores across remaining
/// candidates between two consecutive iterations drops to this value or
/// below, re-evaluation is idle and the ranker finalizes from the last
/// scored ordering.
pub const DEFAULT_STABILITY_THRESHOLD: f32 = 0.05;

/// Default safety cap on ranking iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 64;

/// Steepness of the sigmoid applied to pool-normalized query similarity
/// when computing the epc axis. The curve is centered at 0.5.
pub const EPC_SIGMOID_STEEPNESS: f32 = 10.0;

/// Neutral score used for blessing axes when the metadata carries no signal.
pub const NEUTRAL_AXIS_SCORE: f32 = 0.5;

/// Scalarized score at or above which a result is classed as tier Φ+.
pub const TIER_POSITIVE_CUTOFF: f32 = 0.7;

/// Scalarized score at or above which a result is classed as tier Φ~
/// (below [`TIER_POSITIVE_CUTOFF`]). Anything lower is Φ−.
pub const TIER_NEUTRAL_CUTOFF: f32 = 0.4;
