//! Single forward pass over `1..=limit` with power-of-ten self-checks
//!
//! At every checkpoint (1, 10, 100, ...) the running median is reported,
//! and the tracker's bookkeeping is checked: exactly half of the values seen
//! must sit above the median (none, for the single value at N = 1).

use std::time::{Duration, Instant};

use crate::{
    error::SweepError,
    ratio::{Precision, Ratio},
    source::{AbundancySource, ValueSource},
    tracker::MedianTracker,
};

/// What to do when a checkpoint's split check fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationPolicy {
    /// Log the failure, count it, and keep going
    #[default]
    Lenient,
    /// Stop the sweep with [`SweepError::InvariantViolation`]
    Strict,
}

/// Settings for a [`Sweep`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    /// Last index to process
    ///
    /// Checkpoints only fall on powers of ten, so this should usually be one.
    pub limit: u32,
    /// Reaction to a failed split check
    pub policy: ViolationPolicy,
    /// Fractional digits used when medians are logged
    pub precision: Precision,
}

impl Default for SweepConfig {
    /// Sweeps up to one million, leniently, logging 50 digits
    fn default() -> Self {
        Self {
            limit: 1_000_000,
            policy: ViolationPolicy::default(),
            precision: Precision::default(),
        }
    }
}

impl SweepConfig {
    /// Constructs a lenient config with the default precision
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Checks that the config can be swept
    ///
    /// A limit that isn't a power of ten is allowed, but it means the last values
    /// processed never reach a checkpoint, so a warning is logged.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.limit == 0 {
            return Err(SweepError::InvalidLimit(self.limit));
        }

        if !is_power_of_ten(self.limit) {
            #[cfg(feature = "log")]
            log::warn!(
                "Limit {} is not a power of ten. Values past the last checkpoint are not checked.",
                self.limit
            );

            #[cfg(not(feature = "log"))]
            eprintln!(
                "Limit {} is not a power of ten. Values past the last checkpoint are not checked.",
                self.limit
            );
        }

        Ok(())
    }
}

/// Whether `n` is 1, 10, 100, ...
pub fn is_power_of_ten(n: u32) -> bool {
    let mut p = 1u32;
    while p < n {
        match p.checked_mul(10) {
            Some(next) => p = next,
            None => return false,
        }
    }
    p == n
}

/// Every power of ten up to and including `limit`
pub fn checkpoints(limit: u32) -> Vec<u32> {
    let mut out = Vec::new();
    let mut c = 1u64;
    while c <= u64::from(limit) {
        out.push(c as u32);
        c *= 10;
    }
    out
}

/// Whether `greater` out of `n` values above the median is an exact 50/50 split
///
/// For `n == 1` the only value is the median itself, so nothing can be above it.
/// The check is done in integers, so no rounding can produce a false failure.
pub fn split_is_balanced(n: u32, greater: u64) -> bool {
    if n == 1 {
        greater == 0
    } else {
        2 * greater == u64::from(n)
    }
}

/// Snapshot taken at a checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// Number of values processed
    pub n: u32,
    /// Exact running median after `n` values
    pub median: Ratio,
    /// Values reported above the median
    pub greater: u64,
    /// Whether the split check passed
    pub verified: bool,
}

/// Final summary of a sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Number of values processed
    pub processed: u32,
    /// Every checkpoint reached, in order
    pub checkpoints: Vec<Checkpoint>,
    /// Median after the last value processed
    pub final_median: Ratio,
    /// Number of checkpoints whose split check failed
    pub violations: usize,
    /// Wall-clock time since the sweep was created, including the divisor sieve
    pub elapsed: Duration,
}

/// One forward pass over `1..=limit`, feeding every value into a [`MedianTracker`]
///
/// Call [`Self::advance`] to process one index at a time, or [`Self::run`] to go to the end.
/// Stopping early is fine: everything processed so far stays queryable through [`Self::tracker`] and [`Self::report`].
#[derive(Debug)]
pub struct Sweep<S = AbundancySource> {
    config: SweepConfig,
    source: S,
    tracker: MedianTracker<Ratio>,
    processed: u32,
    /// Checkpoints not reached yet, next one last
    upcoming: Vec<u32>,
    checkpoints: Vec<Checkpoint>,
    violations: usize,
    started: Instant,
}

impl Sweep<AbundancySource> {
    /// Validates the config and precomputes the divisors up to its limit
    ///
    /// The sweep's clock starts before the sieve, so [`SweepReport::elapsed`] covers it.
    pub fn new(config: SweepConfig) -> Result<Self, SweepError> {
        let started = Instant::now();
        Self::with_source_started(config, AbundancySource::new(config.limit), started)
    }
}

impl<S: ValueSource> Sweep<S> {
    /// Sweeps over the values of an arbitrary source
    pub fn with_source(config: SweepConfig, source: S) -> Result<Self, SweepError> {
        Self::with_source_started(config, source, Instant::now())
    }

    /// Like [`Self::with_source`], timing the sweep from `started`
    fn with_source_started(
        config: SweepConfig,
        source: S,
        started: Instant,
    ) -> Result<Self, SweepError> {
        config.validate()?;
        if source.limit() < config.limit {
            return Err(SweepError::SourceTooShort {
                limit: config.limit,
                available: source.limit(),
            });
        }

        let mut upcoming = checkpoints(config.limit);
        upcoming.reverse();

        Ok(Self {
            config,
            source,
            tracker: MedianTracker::with_capacity(config.limit as usize),
            processed: 0,
            upcoming,
            checkpoints: Vec::new(),
            violations: 0,
            started,
        })
    }

    /// Settings this sweep runs with
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Number of indices processed so far
    pub fn processed(&self) -> u32 {
        self.processed
    }

    /// Whether every index up to the limit has been processed
    pub fn is_finished(&self) -> bool {
        self.processed >= self.config.limit
    }

    /// Tracker holding every value processed so far
    pub fn tracker(&self) -> &MedianTracker<Ratio> {
        &self.tracker
    }

    /// Checkpoints reached so far
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Processes the next index
    ///
    /// Returns the snapshot if the index was a checkpoint, and `None` otherwise
    /// (including once the sweep is finished).
    pub fn advance(&mut self) -> Result<Option<Checkpoint>, SweepError> {
        if self.is_finished() {
            return Ok(None);
        }

        self.processed += 1;
        let n = self.processed;
        let value = self.source.value(n);
        self.tracker.insert(value);

        #[cfg(feature = "log")]
        log::trace!("I({}) = {}", n, value);

        if self.upcoming.last() != Some(&n) {
            return Ok(None);
        }
        self.upcoming.pop();

        let median = self.tracker.median()?;
        let greater = self.tracker.count_strictly_greater_than_median();
        self.check(n, median, greater).map(Some)
    }

    /// Processes every remaining index and summarizes the sweep
    pub fn run(mut self) -> Result<SweepReport, SweepError> {
        while !self.is_finished() {
            self.advance()?;
        }
        self.report()
    }

    /// Summarizes everything processed so far
    ///
    /// Fails with [`crate::MedianError::Empty`] if nothing has been processed yet.
    pub fn report(&self) -> Result<SweepReport, SweepError> {
        Ok(SweepReport {
            processed: self.processed,
            checkpoints: self.checkpoints.clone(),
            final_median: self.tracker.median()?,
            violations: self.violations,
            elapsed: self.started.elapsed(),
        })
    }

    /// Records a checkpoint, applying the violation policy if its split is off
    fn check(&mut self, n: u32, median: Ratio, greater: u64) -> Result<Checkpoint, SweepError> {
        let checkpoint = Checkpoint {
            n,
            median,
            greater,
            verified: split_is_balanced(n, greater),
        };
        self.checkpoints.push(checkpoint);

        if checkpoint.verified {
            #[cfg(feature = "log")]
            log::debug!(
                "Checkpoint N = {} verified, median {}",
                n,
                median.to_decimal_string(self.config.precision)
            );
            return Ok(checkpoint);
        }

        self.violations += 1;
        match self.config.policy {
            ViolationPolicy::Strict => {
                #[cfg(feature = "log")]
                log::error!("Split check failed at N = {}: {} values above the median. Stopping.", n, greater);

                #[cfg(not(feature = "log"))]
                eprintln!("Split check failed at N = {}: {} values above the median. Stopping.", n, greater);

                Err(SweepError::InvariantViolation { n, greater })
            }
            ViolationPolicy::Lenient => {
                #[cfg(feature = "log")]
                log::warn!(
                    "Split check failed at N = {}: {} values above the median. Later medians may be unreliable.",
                    n,
                    greater
                );

                #[cfg(not(feature = "log"))]
                eprintln!(
                    "Split check failed at N = {}: {} values above the median. Later medians may be unreliable.",
                    n, greater
                );

                Ok(checkpoint)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MedianError;

    fn r(n: u64, d: u64) -> Ratio {
        Ratio::new(n, d).unwrap()
    }

    /// Source that gives the same value at every index, so every value ties
    struct Constant {
        limit: u32,
        value: Ratio,
    }

    impl ValueSource for Constant {
        fn limit(&self) -> u32 {
            self.limit
        }

        fn value(&self, _n: u32) -> Ratio {
            self.value
        }
    }

    #[test]
    fn powers_of_ten() {
        assert!(is_power_of_ten(1));
        assert!(is_power_of_ten(10));
        assert!(is_power_of_ten(1_000_000_000));
        assert!(!is_power_of_ten(0));
        assert!(!is_power_of_ten(20));
        assert!(!is_power_of_ten(999));
        assert!(!is_power_of_ten(u32::MAX));
    }

    #[test]
    fn checkpoint_indices() {
        assert_eq!(checkpoints(0), Vec::<u32>::new());
        assert_eq!(checkpoints(1), vec![1]);
        assert_eq!(checkpoints(10), vec![1, 10]);
        assert_eq!(checkpoints(999), vec![1, 10, 100]);
        assert_eq!(checkpoints(u32::MAX).last(), Some(&1_000_000_000));
    }

    #[test]
    fn split_check() {
        assert!(split_is_balanced(1, 0));
        assert!(!split_is_balanced(1, 1));
        assert!(split_is_balanced(10, 5));
        assert!(!split_is_balanced(10, 4));
        assert!(!split_is_balanced(10, 6));
        assert!(split_is_balanced(1_000_000, 500_000));
    }

    #[test]
    fn zero_limit_rejected() {
        assert_eq!(Sweep::new(SweepConfig::new(0)).err(), Some(SweepError::InvalidLimit(0)));
    }

    #[test]
    fn short_source_rejected() {
        let source = AbundancySource::new(5);
        assert_eq!(
            Sweep::with_source(SweepConfig::new(10), source).err(),
            Some(SweepError::SourceTooShort {
                limit: 10,
                available: 5
            })
        );
    }

    #[test]
    fn limit_ten() {
        let report = Sweep::new(SweepConfig::new(10)).unwrap().run().unwrap();

        assert_eq!(report.processed, 10);
        assert_eq!(report.violations, 0);
        assert_eq!(
            report.checkpoints,
            vec![
                Checkpoint {
                    n: 1,
                    median: Ratio::ONE,
                    greater: 0,
                    verified: true,
                },
                Checkpoint {
                    n: 10,
                    median: r(17, 24),
                    greater: 5,
                    verified: true,
                },
            ]
        );
        assert_eq!(report.final_median, r(17, 24));
    }

    #[test]
    fn regression_medians() {
        let report = Sweep::new(SweepConfig::new(1000)).unwrap().run().unwrap();

        let medians: Vec<_> = report.checkpoints.iter().map(|c| (c.n, c.median)).collect();
        assert_eq!(
            medians,
            vec![
                (1, Ratio::ONE),
                (10, r(17, 24)),
                (100, r(28, 39)),
                (1000, r(28346, 38709)),
            ]
        );
        assert!(report.checkpoints.iter().all(|c| c.verified));
    }

    #[test]
    fn median_matches_sorting_all_values() {
        let limit = 2000;
        let source = AbundancySource::new(limit);
        let mut values: Vec<Ratio> = source.values().map(|(_, v)| v).collect();
        values.sort();
        let expected = values[999].checked_midpoint(&values[1000]).unwrap();

        let report = Sweep::with_source(SweepConfig::new(limit), source)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(report.final_median, expected);
        assert_eq!(report.checkpoints.len(), 4);
    }

    #[test]
    fn ties_still_split_evenly() {
        let source = Constant {
            limit: 100,
            value: r(2, 3),
        };
        let config = SweepConfig {
            policy: ViolationPolicy::Strict,
            ..SweepConfig::new(100)
        };

        let report = Sweep::with_source(config, source).unwrap().run().unwrap();
        assert_eq!(report.violations, 0);
        assert_eq!(report.final_median, r(2, 3));
    }

    #[test]
    fn stop_early() {
        let mut sweep = Sweep::new(SweepConfig::new(100)).unwrap();
        assert_eq!(sweep.report().err(), Some(SweepError::Median(MedianError::Empty)));

        let first = sweep.advance().unwrap();
        assert_eq!(first.map(|c| c.n), Some(1));

        for _ in 0..14 {
            sweep.advance().unwrap();
        }

        assert_eq!(sweep.processed(), 15);
        assert!(!sweep.is_finished());
        assert_eq!(sweep.checkpoints().len(), 2);
        assert_eq!(sweep.tracker().len(), 15);

        let report = sweep.report().unwrap();
        assert_eq!(report.processed, 15);
        assert_eq!(report.final_median, sweep.tracker().median().unwrap());
    }

    #[test]
    fn advance_past_the_end() {
        let mut sweep = Sweep::new(SweepConfig::new(1)).unwrap();
        assert!(sweep.advance().unwrap().is_some());
        assert!(sweep.is_finished());
        assert_eq!(sweep.advance(), Ok(None));
        assert_eq!(sweep.processed(), 1);
    }

    #[test]
    fn checkpoints_follow_the_schedule() {
        let mut sweep = Sweep::new(SweepConfig::new(250)).unwrap();
        let mut reached = Vec::new();
        while !sweep.is_finished() {
            if let Some(c) = sweep.advance().unwrap() {
                reached.push(c.n);
            }
        }

        assert_eq!(reached, checkpoints(250));
        assert!(sweep.upcoming.is_empty());
    }

    #[test]
    fn elapsed_counts_from_the_start_time() {
        let started = Instant::now();
        std::thread::sleep(Duration::from_millis(20));

        let mut sweep =
            Sweep::with_source_started(SweepConfig::new(10), AbundancySource::new(10), started)
                .unwrap();
        sweep.advance().unwrap();

        assert!(sweep.report().unwrap().elapsed >= Duration::from_millis(20));
    }

    #[test]
    fn elapsed_includes_the_sieve() {
        let before = Instant::now();
        let mut sweep = Sweep::new(SweepConfig::new(300_000)).unwrap();
        let built = before.elapsed();
        sweep.advance().unwrap();

        assert!(sweep.report().unwrap().elapsed >= built / 2);
    }

    #[test]
    fn lenient_violation_continues() {
        let mut sweep = Sweep::new(SweepConfig::new(10)).unwrap();
        let checkpoint = sweep.check(10, r(1, 2), 4).unwrap();

        assert!(!checkpoint.verified);
        assert_eq!(sweep.violations, 1);
        assert_eq!(sweep.checkpoints().len(), 1);
    }

    #[test]
    fn strict_violation_stops() {
        let config = SweepConfig {
            policy: ViolationPolicy::Strict,
            ..SweepConfig::new(10)
        };
        let mut sweep = Sweep::new(config).unwrap();

        assert_eq!(
            sweep.check(10, r(1, 2), 4),
            Err(SweepError::InvariantViolation { n: 10, greater: 4 })
        );
        assert_eq!(sweep.violations, 1);
    }
}
