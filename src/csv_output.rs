//! CSV output format for analysis results
//!
//! One table per subcommand, each with a header row.

use crate::distribution::Distribution;
use crate::series::ParallelismReport;
use crate::timeline::Timeline;

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Per-slot series: `slot,parallelism,liveness[,approximate]`
pub fn series_to_csv(report: &ParallelismReport, include_approximate: bool) -> String {
    let mut output = String::from("slot,parallelism,liveness");
    if include_approximate {
        output.push_str(",approximate");
    }
    output.push('\n');

    for slot in 0..report.slots {
        let Some(metrics) = report.slot(slot) else {
            break;
        };
        output.push_str(&format!(
            "{},{},{}",
            slot, metrics.parallelism, metrics.liveness
        ));
        if include_approximate {
            output.push_str(&format!(",{}", metrics.approximate));
        }
        output.push('\n');
    }

    output
}

/// Histogram with cumulative fraction: `parallelism,slots,cumulative`
pub fn distribution_to_csv(distribution: &Distribution) -> String {
    let mut output = String::from("parallelism,slots,cumulative\n");
    for (bucket, point) in distribution.histogram.iter().zip(&distribution.cdf) {
        output.push_str(&format!(
            "{},{},{:.6}\n",
            bucket.parallelism, bucket.slots, point.cumulative
        ));
    }
    output
}

/// Selected segments: `pid,lane,type,start_x,end_x,color,width`
pub fn timeline_to_csv(timeline: &Timeline) -> String {
    let mut output = String::from("pid,lane,type,start_x,end_x,color,width\n");
    for seg in &timeline.segments {
        output.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            seg.pid,
            seg.lane,
            escape_field(seg.kind.as_str()),
            seg.start_x,
            seg.end_x,
            seg.style.color,
            seg.style.width
        ));
    }
    output
}
