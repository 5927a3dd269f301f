//! Generic A* search
//!
//! The same search drives both navmesh polygon groups and the rectangular
//! maze grid; the [`Graph`] trait is the seam between them.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

/// Graph representation consumed by [`a_star_search`].
pub trait Graph {
    type NodeId: Copy + Eq + Hash;

    /// Nodes reachable in one step from `node`
    fn neighbors(&self, node: Self::NodeId) -> Vec<Self::NodeId>;

    /// Exact cost of stepping from `from` to `to`
    fn cost(&self, from: Self::NodeId, to: Self::NodeId) -> f32;

    /// Estimated remaining cost from `a` to `b`; admissible estimates give
    /// shortest paths
    fn heuristic(&self, a: Self::NodeId, b: Self::NodeId) -> f32;
}

/// Open-list entry ordered by total estimated cost (f = g + h)
struct HeapEntry<I> {
    node: I,
    f: f32,
}

impl<I> PartialEq for HeapEntry<I> {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f
    }
}

impl<I> Eq for HeapEntry<I> {}

impl<I> PartialOrd for HeapEntry<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I> Ord for HeapEntry<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for a min-heap; NaN sorts as greatest so a
        // poisoned entry never wins the pop
        match other.f.partial_cmp(&self.f) {
            Some(ordering) => ordering,
            None => {
                if other.f.is_nan() && !self.f.is_nan() {
                    Ordering::Less
                } else if !other.f.is_nan() && self.f.is_nan() {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            }
        }
    }
}

/// Classic A* over `graph` from `start` to `goal`.
///
/// Returns the node sequence inclusive of both endpoints: a single-element
/// path when `start == goal`, and an empty sequence when the goal is
/// unreachable. Callers must treat empty as "unreachable", not as an
/// error. Ties in priority are broken arbitrarily.
pub fn a_star_search<G: Graph>(graph: &G, start: G::NodeId, goal: G::NodeId) -> Vec<G::NodeId> {
    if start == goal {
        return vec![start];
    }

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<G::NodeId, G::NodeId> = HashMap::new();
    let mut cost_so_far: HashMap<G::NodeId, f32> = HashMap::new();

    cost_so_far.insert(start, 0.0);
    open.push(HeapEntry {
        node: start,
        f: graph.heuristic(start, goal),
    });

    while let Some(HeapEntry { node: current, .. }) = open.pop() {
        if current == goal {
            let mut path = vec![goal];
            let mut cursor = goal;
            while let Some(&previous) = came_from.get(&cursor) {
                path.push(previous);
                cursor = previous;
            }
            path.reverse();
            return path;
        }

        let Some(&current_cost) = cost_so_far.get(&current) else {
            continue;
        };

        for next in graph.neighbors(current) {
            let new_cost = current_cost + graph.cost(current, next);
            let improved = match cost_so_far.get(&next) {
                Some(&known) => new_cost < known,
                None => true,
            };

            if improved {
                cost_so_far.insert(next, new_cost);
                came_from.insert(next, current);
                open.push(HeapEntry {
                    node: next,
                    f: new_cost + graph.heuristic(next, goal),
                });
            }
        }
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Weighted line graph with an optional shortcut edge
    struct LineGraph {
        edges: Vec<(usize, usize, f32)>,
    }

    impl Graph for LineGraph {
        type NodeId = usize;

        fn neighbors(&self, node: usize) -> Vec<usize> {
            self.edges
                .iter()
                .filter(|(a, _, _)| *a == node)
                .map(|(_, b, _)| *b)
                .collect()
        }

        fn cost(&self, from: usize, to: usize) -> f32 {
            self.edges
                .iter()
                .find(|(a, b, _)| *a == from && *b == to)
                .map(|(_, _, c)| *c)
                .unwrap_or(f32::INFINITY)
        }

        fn heuristic(&self, _a: usize, _b: usize) -> f32 {
            0.0
        }
    }

    #[test]
    fn test_start_equals_goal() {
        let graph = LineGraph { edges: vec![] };
        assert_eq!(a_star_search(&graph, 7, 7), vec![7]);
    }

    #[test]
    fn test_unreachable_returns_empty() {
        let graph = LineGraph {
            edges: vec![(0, 1, 1.0)],
        };
        assert!(a_star_search(&graph, 0, 5).is_empty());
    }

    #[test]
    fn test_prefers_cheaper_route() {
        // 0 -> 1 -> 3 costs 2, the direct 0 -> 3 edge costs 10
        let graph = LineGraph {
            edges: vec![(0, 3, 10.0), (0, 1, 1.0), (1, 3, 1.0)],
        };
        assert_eq!(a_star_search(&graph, 0, 3), vec![0, 1, 3]);
    }

    #[test]
    fn test_path_includes_both_endpoints() {
        let graph = LineGraph {
            edges: vec![(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)],
        };
        let path = a_star_search(&graph, 0, 3);
        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&3));
        assert_eq!(path.len(), 4);
    }
}
