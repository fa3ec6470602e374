use anyhow::{Context, Result};
use clap::Parser;
use txpar::cli::{Cli, Command, OutputFormat};
use txpar::config::AnalysisConfig;
use txpar::distribution::Distribution;
use txpar::json_output::JsonOutput;
use txpar::loader::{self, LoadedTrace, TraceSource};
use txpar::series::{self, ParallelismReport};
use txpar::timeline::{Timeline, Window};
use txpar::{csv_output, trace::AttemptTable};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load the config file if given, then apply global CLI overrides
fn resolve_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(title) = &cli.title {
        config.title = title.clone();
    }
    Ok(config)
}

fn compute_report(table: &AttemptTable, workers: usize) -> ParallelismReport {
    info!(workers, slots = table.max_attempts(), "Computing parallelism series");
    if workers > 1 {
        series::assemble_with_workers(table, workers)
    } else {
        series::assemble(table)
    }
}

fn print_parallelism_text(title: &str, report: &ParallelismReport, approximate: bool) {
    println!("=== {} ===", title);
    for entry in &report.instances_per_pid {
        println!("{} {}", entry.pid, entry.instances);
    }
    println!();

    print!("{:>8} {:>12} {:>14}", "slot", "parallelism", "threads alive");
    if approximate {
        print!(" {:>12}", "approximate");
    }
    println!();
    println!("─────────────────────────────────────────────────");
    for slot in 0..report.slots {
        let Some(m) = report.slot(slot) else { break };
        print!("{:>8} {:>12} {:>14}", slot, m.parallelism, m.liveness);
        if approximate {
            print!(" {:>12}", m.approximate);
        }
        println!();
    }
    println!("─────────────────────────────────────────────────");
    println!(
        "slots: {}  processes: {}  peak: {}  mean: {:.2}",
        report.slots,
        report.pid_count,
        report.peak_parallelism(),
        report.mean_parallelism()
    );
}

fn print_distribution_text(title: &str, distribution: &Distribution) {
    println!("=== {} ===", title);
    println!("{:>12} {:>8} {:>12}", "parallelism", "slots", "cumulative");
    println!("─────────────────────────────────────");
    for (bucket, point) in distribution.histogram.iter().zip(&distribution.cdf) {
        println!(
            "{:>12} {:>8} {:>12.4}",
            bucket.parallelism, bucket.slots, point.cumulative
        );
    }
    println!("─────────────────────────────────────");
    println!(
        "slots: {}  max parallelism: {}",
        distribution.total_slots, distribution.max_parallelism
    );
}

fn print_timeline_text(title: &str, timeline: &Timeline, max_y: i64) {
    println!("=== {} ===", title);
    println!(
        "x range: [{}, {}]  lanes: {} of {}",
        timeline.min_x,
        timeline.max_x,
        timeline.lane_count(),
        max_y
    );
    for seg in &timeline.segments {
        println!(
            "lane {:>4}  {:<8} {:>12} -> {:<12} {} ({})",
            seg.lane,
            seg.kind,
            seg.start_x,
            seg.end_x,
            seg.style.color,
            seg.style.width
        );
    }
}

fn emit_json(output: JsonOutput) -> Result<()> {
    let json = output.to_json().context("Failed to serialize JSON output")?;
    println!("{}", json);
    Ok(())
}

fn run_parallelism(
    trace: LoadedTrace,
    config: &AnalysisConfig,
    format: OutputFormat,
    approximate: bool,
) -> Result<()> {
    let report = compute_report(&trace.table, config.workers);
    match format {
        OutputFormat::Text => print_parallelism_text(&config.title, &report, approximate),
        OutputFormat::Json => {
            emit_json(JsonOutput::new(&config.title, trace.stats).with_parallelism(report))?
        }
        OutputFormat::Csv => print!("{}", csv_output::series_to_csv(&report, approximate)),
    }
    Ok(())
}

fn run_distribution(
    trace: LoadedTrace,
    config: &AnalysisConfig,
    format: OutputFormat,
) -> Result<()> {
    let report = compute_report(&trace.table, config.workers);
    let distribution = Distribution::from_series(&report.parallelism);
    match format {
        OutputFormat::Text => print_distribution_text(&config.title, &distribution),
        OutputFormat::Json => emit_json(
            JsonOutput::new(&config.title, trace.stats).with_distribution(distribution),
        )?,
        OutputFormat::Csv => print!("{}", csv_output::distribution_to_csv(&distribution)),
    }
    Ok(())
}

fn run_timeline(
    trace: LoadedTrace,
    config: &AnalysisConfig,
    format: OutputFormat,
    window: Window,
) -> Result<()> {
    let timeline = Timeline::select(&trace.table, window, config.timeline.scale());
    info!(segments = timeline.segments.len(), "Timeline selected");
    match format {
        OutputFormat::Text => {
            print_timeline_text(&config.title, &timeline, config.timeline.max_y)
        }
        OutputFormat::Json => emit_json(
            JsonOutput::new(&config.title, trace.stats)
                .with_timeline(timeline, config.timeline.max_y),
        )?,
        OutputFormat::Csv => print!("{}", csv_output::timeline_to_csv(&timeline)),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(cli.debug);

    let mut config = resolve_config(&cli)?;

    let input = cli.command.input();
    let source = TraceSource::from_option(input.infile.clone());
    let format = input.format;
    let trace = loader::load_trace(&source).context("Failed to load trace")?;

    match cli.command {
        Command::Parallelism {
            workers,
            approximate,
            ..
        } => {
            if let Some(workers) = workers {
                config.workers = workers;
            }
            config.validate()?;
            run_parallelism(trace, &config, format, approximate)
        }
        Command::Distribution { workers, .. } => {
            if let Some(workers) = workers {
                config.workers = workers;
            }
            config.validate()?;
            run_distribution(trace, &config, format)
        }
        Command::Timeline {
            min_x,
            max_x,
            shift_x,
            first_count,
            last_count,
            max_y,
            ..
        } => {
            let timeline = &mut config.timeline;
            if let Some(v) = min_x {
                timeline.min_x = v;
            }
            if let Some(v) = max_x {
                timeline.max_x = v;
            }
            if let Some(v) = shift_x {
                timeline.shift_x = v;
            }
            if let Some(v) = max_y {
                timeline.max_y = v;
            }
            config.validate()?;

            // An ordinal count of 0 means no ordinal window.
            let window = match first_count.filter(|&first| first > 0) {
                Some(first) => Window::Ordinal {
                    first,
                    last: last_count,
                },
                None => Window::Time {
                    min_x: config.timeline.min_x as f64,
                    max_x: config.timeline.max_x as f64,
                },
            };
            run_timeline(trace, &config, format, window)
        }
    }
}
