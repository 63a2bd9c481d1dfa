//! A more fully-fledged example, showcasing custom configuration and stepping a sweep by hand

use abundancy_median::{Precision, Sweep, SweepConfig, ViolationPolicy};

fn main() {
    // Strict sweeps stop at the first failed split check, instead of logging it and carrying on
    let config = SweepConfig {
        limit: 100_000,
        policy: ViolationPolicy::Strict,
        precision: Precision::new(30),
    };
    let mut sweep = Sweep::new(config).expect("100000 is a valid limit");

    // Step through the sweep one index at a time
    while !sweep.is_finished() {
        match sweep.advance() {
            Ok(Some(checkpoint)) => println!(
                "N = {}: median {} ({} values above it)",
                checkpoint.n,
                checkpoint.median.to_decimal_string(config.precision),
                checkpoint.greater
            ),
            Ok(None) => {}
            Err(e) => {
                println!("Stopped: {e}");
                break;
            }
        }

        // We can stop early whenever we like; everything so far stays queryable
        if sweep.processed() == 50_000 {
            println!(
                "Halfway there: median of the first {} values is {}",
                sweep.tracker().len(),
                sweep.tracker().median_or_default()
            );
        }
    }

    let report = sweep.report().expect("at least one value was processed");
    println!(
        "Final median: {} after {} values, {} failed checks, {:.2}s",
        report.final_median.to_decimal_string(config.precision),
        report.processed,
        report.violations,
        report.elapsed.as_secs_f64()
    );
}
