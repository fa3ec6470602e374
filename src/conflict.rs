//! Conflict graph construction for one time slot
//!
//! For a slot `t`, the graph's nodes are the pids that have an instance at
//! index `t`. Two nodes are adjacent when their instances have a read/write
//! crossover (see [`ProcessInstance::conflicts_with`]). Inactive pids are not
//! nodes and appear in nobody's neighbor list.
//!
//! The graph is rebuilt from scratch for every slot: O(active²) pairwise set
//! tests, each O(min(|rset|, |wset|)) on hashed sets.
//!
//! [`ProcessInstance::conflicts_with`]: crate::trace::ProcessInstance::conflicts_with

use crate::trace::{AttemptTable, Pid};
use std::collections::{BTreeMap, BTreeSet};

/// Adjacency lists of the conflict relation at one slot
///
/// Every active pid is a key, including pids with no conflicts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictGraph {
    adjacency: BTreeMap<Pid, Vec<Pid>>,
}

impl ConflictGraph {
    /// Build the conflict graph of all pids in `table` at `slot`
    pub fn build(table: &AttemptTable, slot: usize) -> Self {
        Self::build_among(table, slot, table.pids())
    }

    /// Build the conflict graph restricted to `pids` at `slot`
    ///
    /// Pids without an instance at `slot`, or unknown to the table, are
    /// skipped. Duplicates are ignored.
    pub fn build_among<I>(table: &AttemptTable, slot: usize, pids: I) -> Self
    where
        I: IntoIterator<Item = Pid>,
    {
        let active: Vec<_> = pids
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|pid| table.instance_at(pid, slot).map(|inst| (pid, inst)))
            .collect();

        let mut adjacency: BTreeMap<Pid, Vec<Pid>> =
            active.iter().map(|&(pid, _)| (pid, Vec::new())).collect();

        // Each unordered pair is tested once; ascending pid order keeps lists sorted.
        for (i, &(pid_a, inst_a)) in active.iter().enumerate() {
            for &(pid_b, inst_b) in &active[i + 1..] {
                if inst_a.conflicts_with(inst_b) {
                    adjacency.entry(pid_a).or_default().push(pid_b);
                    adjacency.entry(pid_b).or_default().push(pid_a);
                }
            }
        }

        Self { adjacency }
    }

    /// Graph from explicit adjacency lists
    ///
    /// The lists are taken as given: they may be asymmetric or name pids that
    /// are not nodes. Consumers must tolerate both.
    pub fn from_adjacency<I>(adjacency: I) -> Self
    where
        I: IntoIterator<Item = (Pid, Vec<Pid>)>,
    {
        Self {
            adjacency: adjacency.into_iter().collect(),
        }
    }

    /// Active pids, ascending
    pub fn active_pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.adjacency.keys().copied()
    }

    /// Number of active pids
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Conflict list of `pid` (empty if `pid` is not active)
    pub fn neighbors(&self, pid: Pid) -> &[Pid] {
        self.adjacency.get(&pid).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.adjacency.contains_key(&pid)
    }

    /// Total number of directed entries across all conflict lists
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Length of the longest conflict list (0 for an empty graph)
    pub fn max_degree(&self) -> usize {
        self.adjacency.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Iterate `(pid, conflict list)` pairs, ascending by pid
    pub fn iter(&self) -> impl Iterator<Item = (Pid, &[Pid])> + '_ {
        self.adjacency
            .iter()
            .map(|(&pid, neighbors)| (pid, neighbors.as_slice()))
    }
}
