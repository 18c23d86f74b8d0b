//! The five-axis blessing score.

use serde::{Deserialize, Serialize};

/// Number of blessing axes.
pub const AXIS_COUNT: usize = 5;

/// A five-axis score describing a candidate's fitness relative to a query
/// and prior selections. Every axis is constrained to \[0, 1\].
///
/// Sign convention: `epc`, `qualia`, `presence`, and `resonance` are
/// higher-is-better; `contradiction` is lower-is-better and is inverted
/// (`1 - contradiction`) before any dominance or scalarization arithmetic —
/// see [`BlessingVector::as_objectives`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlessingVector {
    /// Expected predictive contribution: pool-normalized query similarity.
    pub epc: f32,
    /// Content-derived quality heuristic from metadata.
    pub qualia: f32,
    /// Maximum similarity to any already-selected candidate (redundancy).
    pub contradiction: f32,
    /// Inverse coverage: how under-represented this candidate's topics are
    /// relative to the selection so far.
    pub presence: f32,
    /// Intent alignment between candidate and query.
    pub resonance: f32,
}

impl BlessingVector {
    /// Builds a blessing vector, clamping every axis to \[0, 1\].
    pub fn new(epc: f32, qualia: f32, contradiction: f32, presence: f32, resonance: f32) -> Self {
        Self {
            epc: epc.clamp(0.0, 1.0),
            qualia: qualia.clamp(0.0, 1.0),
            contradiction: contradiction.clamp(0.0, 1.0),
            presence: presence.clamp(0.0, 1.0),
            resonance: resonance.clamp(0.0, 1.0),
        }
    }

    /// Sign-normalized objective values for dominance and scalarization:
    /// `[epc, qualia, 1 - contradiction, presence, resonance]`, all
    /// higher-is-better and in \[0, 1\].
    pub fn as_objectives(&self) -> [f32; AXIS_COUNT] {
        [
            self.epc,
            self.qualia,
            1.0 - self.contradiction,
            self.presence,
            self.resonance,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_clamped() {
        let b = BlessingVector::new(1.5, -0.2, 2.0, 0.5, -1.0);
        assert_eq!(b.epc, 1.0);
        assert_eq!(b.qualia, 0.0);
        assert_eq!(b.contradiction, 1.0);
        assert_eq!(b.presence, 0.5);
        assert_eq!(b.resonance, 0.0);
    }

    #[test]
    fn test_objectives_invert_contradiction() {
        let b = BlessingVector::new(0.8, 0.6, 0.3, 0.9, 0.5);
        let obj = b.as_objectives();
        assert_eq!(obj, [0.8, 0.6, 0.7, 0.9, 0.5]);
        assert!(obj.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
