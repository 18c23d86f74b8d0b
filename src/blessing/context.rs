//! The selection context: candidates already chosen in the current pass.
//!
//! Query-local state, threaded explicitly through evaluator calls — never
//! process-wide. Within one ranking iteration the context is read-only;
//! only the ranker appends to it, between iterations.

use crate::candidate::CandidateMetadata;
use crate::store::PoolCandidate;
use std::collections::HashSet;
use uuid::Uuid;

/// Snapshot of a selected candidate: what contradiction and presence
/// computations need from it.
#[derive(Debug, Clone)]
pub struct SelectedCandidate {
    /// Candidate id.
    pub id: Uuid,
    /// Exact (or decoded) vector at selection time.
    pub vector: Vec<f32>,
    /// Metadata snapshot at selection time.
    pub metadata: CandidateMetadata,
}

impl From<&PoolCandidate> for SelectedCandidate {
    fn from(c: &PoolCandidate) -> Self {
        Self {
            id: c.id,
            vector: c.vector.clone(),
            metadata: c.metadata.clone(),
        }
    }
}

/// Ordered list of candidates already chosen in the current ranking pass.
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    selected: Vec<SelectedCandidate>,
    ids: HashSet<Uuid>,
}

impl SelectionContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a selected candidate. Selection order is preserved.
    pub fn push(&mut self, candidate: SelectedCandidate) {
        self.ids.insert(candidate.id);
        self.selected.push(candidate);
    }

    /// Whether the candidate id has already been selected.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.ids.contains(id)
    }

    /// Selected candidates in selection order.
    pub fn selected(&self) -> &[SelectedCandidate] {
        &self.selected
    }

    /// Number of selected candidates.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing has been selected yet.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
