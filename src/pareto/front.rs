//! Pareto dominance and non-dominated sorting over blessing objectives.
//!
//! Objectives are the sign-normalized axis values (higher is better on every
//! axis). Pairwise comparison is sufficient at expected pool sizes; no
//! incremental front maintenance is attempted.

use crate::blessing::vector::AXIS_COUNT;

/// Whether `a` dominates `b`: `a` is at least as good on every axis and
/// strictly better on at least one. Candidates tied on all axes do not
/// dominate each other (both stay in the front; ordering between them is
/// resolved by candidate id downstream).
pub fn dominates(a: &[f32; AXIS_COUNT], b: &[f32; AXIS_COUNT]) -> bool {
    let mut strictly_better = false;
    for i in 0..AXIS_COUNT {
        if a[i] < b[i] {
            return false;
        }
        if a[i] > b[i] {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Indices of the non-dominated front: candidates dominated by none.
pub fn pareto_front(objectives: &[[f32; AXIS_COUNT]]) -> Vec<usize> {
    (0..objectives.len())
        .filter(|&i| {
            objectives
                .iter()
                .enumerate()
                .all(|(j, other)| j == i || !dominates(other, &objectives[i]))
        })
        .collect()
}

/// Non-dominated sorting: layer 0 is the Pareto front, layer 1 the front of
/// what remains after peeling layer 0, and so on. Returns one layer index
/// per input.
pub fn pareto_layers(objectives: &[[f32; AXIS_COUNT]]) -> Vec<usize> {
    let n = objectives.len();
    let mut layers = vec![usize::MAX; n];
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut layer = 0;

    while !remaining.is_empty() {
        let front: Vec<usize> = remaining
            .iter()
            .copied()
            .filter(|&i| {
                remaining
                    .iter()
                    .all(|&j| j == i || !dominates(&objectives[j], &objectives[i]))
            })
            .collect();
        for &i in &front {
            layers[i] = layer;
        }
        remaining.retain(|i| !front.contains(i));
        layer += 1;
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominates_strict() {
        let a = [0.9, 0.8, 0.7, 0.6, 0.5];
        let b = [0.8, 0.8, 0.7, 0.6, 0.5];
        assert!(dominates(&a, &b));
        assert!(!dominates(&b, &a));
    }

    #[test]
    fn test_ties_do_not_dominate() {
        let a = [0.5; 5];
        assert!(!dominates(&a, &a));
    }

    #[test]
    fn test_incomparable_pair() {
        let a = [0.9, 0.1, 0.5, 0.5, 0.5];
        let b = [0.1, 0.9, 0.5, 0.5, 0.5];
        assert!(!dominates(&a, &b));
        assert!(!dominates(&b, &a));
    }

    #[test]
    fn test_front_non_domination_property() {
        // No pair within a computed front may dominate each other.
        let objectives: Vec<[f32; 5]> = (0..12)
            .map(|i| {
                let x = (((i + 1) * 2654435761usize) & 0xFFFF) as f32 / 65535.0;
                let y = (((i + 7) * 40503usize) & 0xFFFF) as f32 / 65535.0;
                [x, 1.0 - x, y, 1.0 - y, (x + y) / 2.0]
            })
            .collect();
        let front = pareto_front(&objectives);
        assert!(!front.is_empty());
        for &i in &front {
            for &j in &front {
                if i != j {
                    assert!(
                        !dominates(&objectives[i], &objectives[j]),
                        "front member {i} dominates front member {j}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_dominated_candidate_excluded_from_front() {
        let objectives = vec![
            [0.9, 0.9, 0.9, 0.9, 0.9],
            [0.1, 0.1, 0.1, 0.1, 0.1], // dominated
            [0.95, 0.1, 0.5, 0.5, 0.5],
        ];
        let front = pareto_front(&objectives);
        assert!(front.contains(&0));
        assert!(!front.contains(&1));
        assert!(front.contains(&2));
    }

    #[test]
    fn test_layers_peel_in_order() {
        let objectives = vec![
            [0.9, 0.9, 0.9, 0.9, 0.9],
            [0.5, 0.5, 0.5, 0.5, 0.5],
            [0.1, 0.1, 0.1, 0.1, 0.1],
        ];
        assert_eq!(pareto_layers(&objectives), vec![0, 1, 2]);
    }

    #[test]
    fn test_layers_all_tied_share_layer_zero() {
        let objectives = vec![[0.5; 5]; 4];
        assert_eq!(pareto_layers(&objectives), vec![0; 4]);
    }

    #[test]
    fn test_empty_input() {
        assert!(pareto_front(&[]).is_empty());
        assert!(pareto_layers(&[]).is_empty());
    }
}
