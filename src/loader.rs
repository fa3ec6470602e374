//! Trace loader for newline-delimited JSON transaction logs
//!
//! Each line is one JSON object. Only objects whose `type` is `"instances"`
//! describe process instances; any other `type` value, string or not, is
//! skipped. A line that is not valid JSON, has no `type` key at all, or is an
//! instances record with missing or mistyped fields aborts the whole load: no
//! partially built table is ever returned.
//!
//! # Example
//!
//! ```
//! use txpar::loader::parse_trace;
//!
//! # fn main() -> txpar::error::Result<()> {
//! let input = r#"{"type":"header","version":1}
//! {"type":"instances","pid":0,"start_at":0,"end_at":9,"attempts":[{"type":"commit","start_at":0,"end_at":9}],"rset":["x"],"wset":[]}
//! "#;
//!
//! let trace = parse_trace(input.as_bytes())?;
//! assert_eq!(trace.table.pid_count(), 1);
//! assert_eq!(trace.stats.ignored_records, 1);
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, TraceError};
use crate::trace::{AttemptTable, ProcessInstance};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing::{debug, info};

/// Record type carrying process instances
pub const INSTANCES_RECORD: &str = "instances";

/// Where to read a trace from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceSource {
    File(PathBuf),
    Stdin,
}

impl TraceSource {
    /// File source if a path was given, stdin otherwise
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => TraceSource::File(path),
            None => TraceSource::Stdin,
        }
    }
}

/// Counters collected while loading
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Non-blank lines read
    pub lines: usize,
    /// Records of type "instances"
    pub instance_records: usize,
    /// Records of any other type
    pub ignored_records: usize,
}

/// A fully validated trace
#[derive(Debug, Clone)]
pub struct LoadedTrace {
    pub table: AttemptTable,
    pub stats: LoadStats,
}

/// Load a trace from a file or stdin
pub fn load_trace(source: &TraceSource) -> Result<LoadedTrace> {
    match source {
        TraceSource::File(path) => {
            info!("Loading trace from {}", path.display());
            let file = File::open(path).map_err(|source| TraceError::Open {
                path: path.clone(),
                source,
            })?;
            parse_trace(BufReader::new(file))
        }
        TraceSource::Stdin => {
            info!("Loading trace from stdin");
            parse_trace(io::stdin().lock())
        }
    }
}

/// Parse newline-delimited JSON records into an attempt table
pub fn parse_trace<R: BufRead>(reader: R) -> Result<LoadedTrace> {
    let mut stats = LoadStats::default();
    let mut instances = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| TraceError::Read {
            line: line_no,
            source,
        })?;

        if line.trim().is_empty() {
            continue;
        }
        stats.lines += 1;

        match parse_line(&line, line_no)? {
            Some(instance) => {
                stats.instance_records += 1;
                instances.push(instance);
            }
            None => stats.ignored_records += 1,
        }
    }

    let table = AttemptTable::from_instances(instances);
    debug!(
        lines = stats.lines,
        instances = stats.instance_records,
        ignored = stats.ignored_records,
        pids = table.pid_count(),
        max_attempts = table.max_attempts(),
        "Trace loaded"
    );

    Ok(LoadedTrace { table, stats })
}

/// Parse one record; `None` for records that are not instances
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<ProcessInstance>> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|source| TraceError::InvalidJson {
            line: line_no,
            source,
        })?;

    let record_type = value
        .get("type")
        .ok_or(TraceError::MissingType { line: line_no })?;

    if record_type.as_str() != Some(INSTANCES_RECORD) {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|source| TraceError::MalformedRecord {
            line: line_no,
            source,
        })
}
