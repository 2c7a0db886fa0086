use std::collections::BTreeMap;

use crate::registry::StateId;

/// Weighted undirected multigraph over states.
///
/// Keys are normalized so that `lhs <= rhs`; weights only ever grow.
#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct Graph {
    weights: BTreeMap<(StateId, StateId), u64>,
}

fn normalize(x: StateId, y: StateId) -> (StateId, StateId) {
    if x <= y {
        (x, y)
    } else {
        (y, x)
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more transition between `x` and `y` and returns the new
    /// weight of the pair.
    pub fn record(&mut self, x: StateId, y: StateId) -> u64 {
        let weight = self.weights.entry(normalize(x, y)).or_insert(0);
        *weight += 1;
        *weight
    }

    pub fn weight(&self, x: StateId, y: StateId) -> u64 {
        self.weights.get(&normalize(x, y)).copied().unwrap_or(0)
    }

    /// Number of distinct pairs.
    pub fn edge_count(&self) -> usize {
        self.weights.len()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.weights.values().sum()
    }

    /// Sorted `(lhs, rhs, weight)` triples: the sparse adjacency handed to
    /// the analysis stages.
    pub fn edges(&self) -> impl Iterator<Item = (StateId, StateId, u64)> + '_ {
        self.weights.iter().map(|(&(a, b), &w)| (a, b, w))
    }
}
