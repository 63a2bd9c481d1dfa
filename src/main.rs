use abundancy_median::{Precision, Sweep, SweepConfig, ViolationPolicy};
use anyhow::{Context, Result};
use clap::Parser;
use log::info;

/// Exact running median of the alternating abundancy index, checked at every power of ten
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Last index to process; checkpoints fall on powers of ten up to this
    #[arg(long, short, default_value_t = 1_000_000)]
    limit: u32,

    /// Fractional digits to print for each median
    #[arg(long, short, default_value_t = 50)]
    digits: usize,

    /// Stop at the first failed split check instead of reporting it and carrying on
    #[arg(long)]
    strict: bool,

    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let precision = Precision::new(cli.digits);
    let config = SweepConfig {
        limit: cli.limit,
        policy: if cli.strict {
            ViolationPolicy::Strict
        } else {
            ViolationPolicy::Lenient
        },
        precision,
    };
    info!("Sweeping up to N = {} ({:?})", config.limit, config.policy);

    let mut sweep = Sweep::new(config).context("Invalid configuration")?;
    while !sweep.is_finished() {
        let checkpoint = sweep
            .advance()
            .with_context(|| format!("Sweep aborted after {} values", sweep.processed()))?;

        if let Some(c) = checkpoint {
            if c.verified {
                println!(
                    "Results verified. N = {} Median candidate = {}",
                    c.n,
                    c.median.to_decimal_string(precision)
                );
            } else {
                println!(
                    "Unexpected error at N = {}: {} of {} values above the median",
                    c.n, c.greater, c.n
                );
            }
        }
    }

    let report = sweep.report().context("Failed to summarize sweep")?;
    println!();
    println!();
    println!(
        "Final median: {} after taking limit N = {}",
        report.final_median.to_decimal_string(precision),
        report.processed
    );
    println!("Exact value: {}", report.final_median);
    if report.violations > 0 {
        println!("Split check failed at {} checkpoint(s)", report.violations);
    }
    println!("Execution time: {:.2} seconds", report.elapsed.as_secs_f64());

    Ok(())
}
