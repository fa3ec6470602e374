//! Integration tests for the parallelism series on hand-built traces
//!
//! Each scenario is written as raw trace lines and goes through the loader, so
//! the whole path from JSON to series is exercised.

use txpar::conflict::ConflictGraph;
use txpar::distribution::Distribution;
use txpar::loader::{load_trace, parse_trace, TraceSource};
use txpar::partition::{components, count_components};
use txpar::series::{assemble, assemble_with_workers};

fn instance_line(pid: i64, rset: &str, wset: &str) -> String {
    format!(
        r#"{{"type":"instances","pid":{},"start_at":0,"end_at":10,"attempts":[{{"type":"commit","start_at":0,"end_at":10}}],"rset":{},"wset":{}}}"#,
        pid, rset, wset
    )
}

fn trace_of(lines: &[String]) -> txpar::trace::AttemptTable {
    let input = lines.join("\n");
    parse_trace(input.as_bytes()).unwrap().table
}

#[test]
fn test_reader_writer_pair_is_serialized() {
    let table = trace_of(&[
        instance_line(0, r#"["x"]"#, "[]"),
        instance_line(1, "[]", r#"["x"]"#),
    ]);

    let report = assemble(&table);
    assert_eq!(report.parallelism, vec![1]);
    assert_eq!(report.liveness, vec![2]);
}

#[test]
fn test_disjoint_key_spaces_run_in_parallel() {
    let table = trace_of(&[
        instance_line(0, r#"["a"]"#, r#"["b"]"#),
        instance_line(1, r#"["c"]"#, r#"["d"]"#),
    ]);

    assert_eq!(assemble(&table).parallelism, vec![2]);
}

#[test]
fn test_one_conflicting_pair_and_one_independent() {
    let table = trace_of(&[
        instance_line(0, r#"["x"]"#, "[]"),
        instance_line(1, "[]", r#"["x"]"#),
        instance_line(2, r#"["y"]"#, r#"["z"]"#),
    ]);

    let report = assemble(&table);
    assert_eq!(report.parallelism, vec![2]);
    assert_eq!(report.liveness, vec![3]);
    assert_eq!(
        components(&ConflictGraph::build(&table, 0)),
        vec![vec![0, 1], vec![2]]
    );
}

#[test]
fn test_lone_survivor_slot() {
    // pid 0 has two instances, pid 1 only one; at slot 1 only pid 0 is alive.
    let table = trace_of(&[
        instance_line(0, r#"["x"]"#, r#"["x"]"#),
        instance_line(1, r#"["x"]"#, r#"["x"]"#),
        instance_line(0, r#"["x"]"#, r#"["x"]"#),
    ]);

    let report = assemble(&table);
    assert_eq!(report.slots, 2);
    assert_eq!(report.liveness[1], 1);
    assert_eq!(report.parallelism[1], 1);
}

#[test]
fn test_trace_without_instances_is_empty() {
    let input = r#"{"type":"header","threads":4}
{"type":"stats","commits":0}
"#;
    let trace = parse_trace(input.as_bytes()).unwrap();
    let report = assemble(&trace.table);

    assert!(report.parallelism.is_empty());
    assert!(report.liveness.is_empty());
    assert_eq!(trace.stats.ignored_records, 2);
}

#[test]
fn test_write_write_only_overlap_stays_parallel() {
    let table = trace_of(&[
        instance_line(0, r#"["r0"]"#, r#"["w"]"#),
        instance_line(1, r#"["r1"]"#, r#"["w"]"#),
    ]);

    assert_eq!(assemble(&table).parallelism, vec![2]);
}

#[test]
fn test_conflicts_chain_through_intermediary() {
    // 0 -> 1 -> 2 chain: 0 and 2 do not conflict directly but share a component.
    let table = trace_of(&[
        instance_line(0, "[]", "[1]"),
        instance_line(1, "[1]", "[2]"),
        instance_line(2, "[2]", "[]"),
    ]);

    let graph = ConflictGraph::build(&table, 0);
    assert!(graph.neighbors(0).iter().all(|&pid| pid != 2));
    assert_eq!(count_components(&graph), 1);
}

#[test]
fn test_fixture_series() {
    let trace = load_trace(&TraceSource::File(
        "tests/fixtures/bank_transfer.jsonl".into(),
    ))
    .unwrap();

    assert_eq!(trace.stats.lines, 8);
    assert_eq!(trace.stats.instance_records, 6);
    assert_eq!(trace.stats.ignored_records, 2);

    let report = assemble(&trace.table);
    assert_eq!(report.slots, 3);
    assert_eq!(report.pid_count, 3);
    assert_eq!(report.parallelism, vec![2, 1, 1]);
    assert_eq!(report.liveness, vec![3, 2, 1]);
    assert_eq!(report.approximate, vec![2, 1, 1]);

    assert_eq!(assemble_with_workers(&trace.table, 3), report);

    let dist = Distribution::from_series(&report.parallelism);
    assert_eq!(dist.max_parallelism, 2);
    assert_eq!(dist.histogram[0].slots, 2);
}
