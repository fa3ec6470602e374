//! Per-slot parallelism and liveness series
//!
//! For every slot `t` in `0..max_attempts` the assembler builds the conflict
//! graph of the pids active at `t`, counts its components, and records how
//! many pids are alive. Slots are independent of each other and only read the
//! shared [`AttemptTable`], so they may be computed on worker threads and put
//! back in slot order.
//!
//! # Example
//!
//! ```
//! use txpar::series::assemble;
//! use txpar::trace::{AttemptTable, Key, ProcessInstance};
//!
//! let table = AttemptTable::from_instances([
//!     ProcessInstance::new(0, 0, 5, vec![], [Key::from("a")], [Key::from("b")]),
//!     ProcessInstance::new(1, 0, 5, vec![], [Key::from("c")], [Key::from("d")]),
//! ]);
//!
//! let report = assemble(&table);
//! assert_eq!(report.parallelism, vec![2]);
//! assert_eq!(report.liveness, vec![2]);
//! ```

use crate::conflict::ConflictGraph;
use crate::partition::{approximate_parallelism, count_components};
use crate::trace::{AttemptTable, Pid};
use serde::Serialize;
use tracing::{debug, trace};

/// Measurements for a single time slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotMetrics {
    /// Connected components of the conflict graph
    pub parallelism: usize,
    /// Pids with an instance at this slot
    pub liveness: usize,
    /// Active pids minus the longest conflict list
    pub approximate: usize,
}

/// Instance count of one pid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PidInstances {
    pub pid: Pid,
    pub instances: usize,
}

/// Series over all slots, plus the table facts a renderer needs for scaling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParallelismReport {
    /// Number of slots (`max_attempts`)
    pub slots: usize,
    /// Number of distinct pids in the trace
    pub pid_count: usize,
    pub parallelism: Vec<usize>,
    pub liveness: Vec<usize>,
    pub approximate: Vec<usize>,
    pub instances_per_pid: Vec<PidInstances>,
}

impl ParallelismReport {
    fn from_metrics(table: &AttemptTable, metrics: Vec<SlotMetrics>) -> Self {
        let instances_per_pid = table
            .instance_counts()
            .into_iter()
            .map(|(pid, instances)| PidInstances { pid, instances })
            .collect();

        Self {
            slots: metrics.len(),
            pid_count: table.pid_count(),
            parallelism: metrics.iter().map(|m| m.parallelism).collect(),
            liveness: metrics.iter().map(|m| m.liveness).collect(),
            approximate: metrics.iter().map(|m| m.approximate).collect(),
            instances_per_pid,
        }
    }

    /// Metrics of one slot, if it exists
    pub fn slot(&self, slot: usize) -> Option<SlotMetrics> {
        Some(SlotMetrics {
            parallelism: *self.parallelism.get(slot)?,
            liveness: *self.liveness.get(slot)?,
            approximate: *self.approximate.get(slot)?,
        })
    }

    /// Highest parallelism over all slots (0 for an empty trace)
    pub fn peak_parallelism(&self) -> usize {
        self.parallelism.iter().copied().max().unwrap_or(0)
    }

    /// Mean parallelism over all slots (0.0 for an empty trace)
    pub fn mean_parallelism(&self) -> f64 {
        if self.parallelism.is_empty() {
            return 0.0;
        }
        self.parallelism.iter().sum::<usize>() as f64 / self.parallelism.len() as f64
    }
}

/// Measure one slot
pub fn compute_slot(table: &AttemptTable, slot: usize) -> SlotMetrics {
    let graph = ConflictGraph::build(table, slot);
    let metrics = SlotMetrics {
        parallelism: count_components(&graph),
        liveness: graph.node_count(),
        approximate: approximate_parallelism(&graph),
    };
    trace!(
        slot,
        parallelism = metrics.parallelism,
        liveness = metrics.liveness,
        edges = graph.edge_count(),
        "Slot measured"
    );
    metrics
}

/// Compute all slots sequentially
pub fn assemble(table: &AttemptTable) -> ParallelismReport {
    let metrics: Vec<SlotMetrics> = (0..table.max_attempts())
        .map(|slot| compute_slot(table, slot))
        .collect();

    debug!(slots = metrics.len(), pids = table.pid_count(), "Series assembled");
    ParallelismReport::from_metrics(table, metrics)
}

/// Compute all slots on up to `workers` scoped threads
///
/// Slots are split into contiguous chunks, one per worker, and concatenated
/// in chunk order. The result equals [`assemble`] for any worker count.
pub fn assemble_with_workers(table: &AttemptTable, workers: usize) -> ParallelismReport {
    let slots = table.max_attempts();
    let workers = workers.clamp(1, slots.max(1));
    if workers == 1 {
        return assemble(table);
    }

    let chunk_len = slots.div_ceil(workers);
    let chunks: Vec<(usize, usize)> = (0..slots)
        .step_by(chunk_len)
        .map(|start| (start, (start + chunk_len).min(slots)))
        .collect();

    let result = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .iter()
            .map(|&(start, end)| {
                scope.spawn(move |_| {
                    (start..end)
                        .map(|slot| compute_slot(table, slot))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut metrics = Vec::with_capacity(slots);
        for handle in handles {
            match handle.join() {
                Ok(chunk) => metrics.extend(chunk),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        metrics
    });

    let metrics = match result {
        Ok(metrics) => metrics,
        Err(panic) => std::panic::resume_unwind(panic),
    };

    debug!(
        slots = metrics.len(),
        pids = table.pid_count(),
        workers,
        "Series assembled"
    );
    ParallelismReport::from_metrics(table, metrics)
}
