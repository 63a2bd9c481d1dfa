//! A basic example showing minimal usage
//!
//! We run a sweep up to 1000, and then read out the exact median

use abundancy_median::{Precision, Sweep, SweepConfig};

fn main() {
    // Precomputes the divisors of everything up to 1000
    let sweep = Sweep::new(SweepConfig::new(1000)).expect("1000 is a valid limit");

    // Feed every value into the tracker, checking the split at 1, 10, 100 and 1000
    let report = sweep.run().expect("lenient sweeps only fail when empty");

    println!(
        "Median after {} values: {} = {}",
        report.processed,
        report.final_median,
        report.final_median.to_decimal_string(Precision::new(20))
    );
}
