#![no_main]

use libfuzzer_sys::fuzz_target;
use txpar::loader::parse_trace;
use txpar::series::assemble;
use txpar::timeline::{Scale, Timeline, Window};

fuzz_target!(|data: &[u8]| {
    // Parsing must reject bad input with an error, never a panic, and any
    // table it accepts must be analyzable and drawable.
    if let Ok(trace) = parse_trace(data) {
        let report = assemble(&trace.table);
        assert_eq!(report.parallelism.len(), trace.table.max_attempts());

        let attempts: usize = trace.table.iter().map(|inst| inst.attempts().len()).sum();
        let everything = Timeline::select(
            &trace.table,
            Window::Ordinal {
                first: 1,
                last: Some(usize::MAX),
            },
            Scale::default(),
        );
        assert_eq!(everything.segments.len(), attempts);

        Timeline::select(
            &trace.table,
            Window::Time {
                min_x: 0.0,
                max_x: 1000.0,
            },
            Scale::default(),
        );
    }
});
