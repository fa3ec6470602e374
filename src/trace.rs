//! Transaction trace data model
//!
//! A trace is a sequence of process instances. Each instance carries the
//! ordered attempts (lock, commit, abort, ...) a logical process made, plus the
//! read and write key sets it declared. Instances are grouped per pid into an
//! [`AttemptTable`], which is the read-only input to the parallelism analysis.
//!
//! # Example
//!
//! ```
//! use txpar::trace::{AttemptTable, Key, ProcessInstance};
//!
//! let reader = ProcessInstance::new(0, 0, 10, vec![], [Key::from("x")], []);
//! let writer = ProcessInstance::new(1, 0, 10, vec![], [], [Key::from("x")]);
//!
//! assert!(reader.conflicts_with(&writer));
//!
//! let table = AttemptTable::from_instances([reader, writer]);
//! assert_eq!(table.pid_count(), 2);
//! assert_eq!(table.max_attempts(), 1);
//! ```

use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Logical process identifier as reported by the trace
pub type Pid = i64;

/// Set of keys read or written by an instance
pub type KeySet = FnvHashSet<Key>;

/// Opaque key identifier from a read or write set
///
/// Any JSON scalar is a key. Keys of different variants never compare equal:
/// `1`, `1.0`, `"1"` and `true` are four distinct keys. Within floats, `0.0`
/// and `-0.0` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(FloatKey),
    Str(String),
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Key::Float(FloatKey::from(value))
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

/// Non-integer numeric key, compared by bit pattern
///
/// Negative zero is folded into positive zero on construction. JSON cannot
/// carry NaN, so bitwise equality matches numeric equality for loaded keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct FloatKey(u64);

impl FloatKey {
    pub fn value(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl From<f64> for FloatKey {
    fn from(value: f64) -> Self {
        let value = if value == 0.0 { 0.0 } else { value };
        FloatKey(value.to_bits())
    }
}

impl From<FloatKey> for f64 {
    fn from(key: FloatKey) -> Self {
        key.value()
    }
}

/// Kind of an attempt, as named by the trace's `type` field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttemptKind {
    Commit,
    Abort,
    Lock,
    /// Waiting in a lock queue (`lockQ`)
    LockQueued,
    /// Any other attempt type
    Other(String),
}

impl AttemptKind {
    /// Wire name of this kind
    pub fn as_str(&self) -> &str {
        match self {
            AttemptKind::Commit => "commit",
            AttemptKind::Abort => "abort",
            AttemptKind::Lock => "lock",
            AttemptKind::LockQueued => "lockQ",
            AttemptKind::Other(name) => name,
        }
    }
}

impl From<String> for AttemptKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "commit" => AttemptKind::Commit,
            "abort" => AttemptKind::Abort,
            "lock" => AttemptKind::Lock,
            "lockQ" => AttemptKind::LockQueued,
            _ => AttemptKind::Other(name),
        }
    }
}

impl From<AttemptKind> for String {
    fn from(kind: AttemptKind) -> Self {
        match kind {
            AttemptKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AttemptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One execution try by a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    #[serde(rename = "type")]
    pub kind: AttemptKind,
    pub start_at: u64,
    pub end_at: u64,
}

impl Attempt {
    pub fn new(kind: AttemptKind, start_at: u64, end_at: u64) -> Self {
        Self {
            kind,
            start_at,
            end_at,
        }
    }
}

/// One logged execution record of a process
///
/// Read and write sets apply to the whole instance, not to individual attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInstance {
    pid: Pid,
    start_at: u64,
    end_at: u64,
    attempts: Vec<Attempt>,
    rset: KeySet,
    wset: KeySet,
}

impl ProcessInstance {
    /// Create an instance; duplicate keys collapse
    pub fn new<R, W>(
        pid: Pid,
        start_at: u64,
        end_at: u64,
        attempts: Vec<Attempt>,
        rset: R,
        wset: W,
    ) -> Self
    where
        R: IntoIterator<Item = Key>,
        W: IntoIterator<Item = Key>,
    {
        Self {
            pid,
            start_at,
            end_at,
            attempts,
            rset: rset.into_iter().collect(),
            wset: wset.into_iter().collect(),
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn start_at(&self) -> u64 {
        self.start_at
    }

    pub fn end_at(&self) -> u64 {
        self.end_at
    }

    /// Attempts in chronological order
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn rset(&self) -> &KeySet {
        &self.rset
    }

    pub fn wset(&self) -> &KeySet {
        &self.wset
    }

    /// Whether two instances have a read/write crossover
    ///
    /// True iff this instance reads a key the other writes, or writes a key the
    /// other reads. Write/write-only overlap is deliberately not a conflict.
    pub fn conflicts_with(&self, other: &ProcessInstance) -> bool {
        !(self.rset.is_disjoint(&other.wset) && self.wset.is_disjoint(&other.rset))
    }
}

/// Per-pid instance sequences, in the order they were encountered
///
/// Built once and never mutated. Pids iterate in ascending order so every
/// consumer sees the same deterministic ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptTable {
    entries: BTreeMap<Pid, Vec<ProcessInstance>>,
    max_attempts: usize,
}

impl AttemptTable {
    /// Group instances by pid, preserving per-pid arrival order
    pub fn from_instances<I>(instances: I) -> Self
    where
        I: IntoIterator<Item = ProcessInstance>,
    {
        let mut entries: BTreeMap<Pid, Vec<ProcessInstance>> = BTreeMap::new();
        for instance in instances {
            entries.entry(instance.pid).or_default().push(instance);
        }

        let max_attempts = entries.values().map(Vec::len).max().unwrap_or(0);

        Self {
            entries,
            max_attempts,
        }
    }

    /// True when the trace contained no instances
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct pids
    pub fn pid_count(&self) -> usize {
        self.entries.len()
    }

    /// Longest instance sequence over all pids (the number of time slots)
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// All pids in ascending order
    pub fn pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.entries.keys().copied()
    }

    /// Instance sequence of a pid (empty if the pid is unknown)
    pub fn instances(&self, pid: Pid) -> &[ProcessInstance] {
        self.entries.get(&pid).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Instance of `pid` at time slot `slot`, if the pid is active there
    pub fn instance_at(&self, pid: Pid, slot: usize) -> Option<&ProcessInstance> {
        self.instances(pid).get(slot)
    }

    /// Whether `pid` has an instance at `slot`
    pub fn is_active(&self, pid: Pid, slot: usize) -> bool {
        slot < self.instances(pid).len()
    }

    /// Pids active at `slot`, ascending, paired with their instance
    pub fn active_at(&self, slot: usize) -> impl Iterator<Item = (Pid, &ProcessInstance)> + '_ {
        self.entries
            .iter()
            .filter_map(move |(&pid, seq)| seq.get(slot).map(|inst| (pid, inst)))
    }

    /// Number of pids active at `slot`
    pub fn live_count(&self, slot: usize) -> usize {
        self.entries.values().filter(|seq| slot < seq.len()).count()
    }

    /// Instance count per pid, ascending by pid
    pub fn instance_counts(&self) -> Vec<(Pid, usize)> {
        self.entries
            .iter()
            .map(|(&pid, seq)| (pid, seq.len()))
            .collect()
    }

    /// Every instance, grouped by ascending pid
    pub fn iter(&self) -> impl Iterator<Item = &ProcessInstance> + '_ {
        self.entries.values().flatten()
    }
}
