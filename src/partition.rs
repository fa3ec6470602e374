//! Independent cluster counting over a conflict graph
//!
//! The parallelism at a slot is the number of connected components of its
//! conflict graph: each component must be serialized internally, but distinct
//! components could run side by side.
//!
//! # Algorithm: flood fill over a work set
//!
//! ```text
//! remaining = all active pids
//! while remaining is non-empty:
//!     seed = pop(remaining); count += 1
//!     grow the component from seed, pulling every neighbor still in remaining
//! ```
//!
//! Removal from `remaining` is idempotent, and neighbors that are not active
//! nodes are ignored, so the fill terminates even for asymmetric or dangling
//! adjacency lists. Seeds are popped in ascending pid order. On symmetric
//! graphs the count is independent of that order.

use crate::conflict::ConflictGraph;
use crate::trace::Pid;
use std::collections::BTreeSet;

/// Number of connected components among the graph's active pids
///
/// Returns 0 for an empty graph and at most `graph.node_count()`.
///
/// # Example
///
/// ```
/// use txpar::conflict::ConflictGraph;
/// use txpar::partition::count_components;
///
/// // 0 - 1 conflict, 2 is independent
/// let graph = ConflictGraph::from_adjacency([(0, vec![1]), (1, vec![0]), (2, vec![])]);
/// assert_eq!(count_components(&graph), 2);
/// ```
pub fn count_components(graph: &ConflictGraph) -> usize {
    let mut count = 0;
    flood_fill(graph, |_, starts_component| {
        if starts_component {
            count += 1;
        }
    });
    count
}

/// Members of each component, ascending within and across components
pub fn components(graph: &ConflictGraph) -> Vec<Vec<Pid>> {
    let mut result: Vec<Vec<Pid>> = Vec::new();
    flood_fill(graph, |pid, starts_component| {
        if starts_component {
            result.push(Vec::new());
        }
        if let Some(component) = result.last_mut() {
            component.push(pid);
        }
    });

    for component in &mut result {
        component.sort_unstable();
    }
    result
}

/// Cheap parallelism estimate: active pids minus the longest conflict list
///
/// This is a different metric from [`count_components`] and is not a
/// substitute for it; for example a path `0 - 1 - 2 - 3` has one component but
/// an estimate of 2. Returns 0 for an empty graph.
pub fn approximate_parallelism(graph: &ConflictGraph) -> usize {
    graph.node_count().saturating_sub(graph.max_degree())
}

/// Visit every active pid once, flagging the seed of each new component
fn flood_fill<F>(graph: &ConflictGraph, mut visit: F)
where
    F: FnMut(Pid, bool),
{
    let mut remaining: BTreeSet<Pid> = graph.active_pids().collect();
    let mut frontier = Vec::new();

    while let Some(seed) = remaining.pop_first() {
        visit(seed, true);
        frontier.push(seed);

        while let Some(pid) = frontier.pop() {
            for &next in graph.neighbors(pid) {
                if remaining.remove(&next) {
                    visit(next, false);
                    frontier.push(next);
                }
            }
        }
    }
}
