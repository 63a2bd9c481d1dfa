#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod error;
mod ratio;
mod source;
mod sweep;
mod tracker;

pub use error::{MedianError, SweepError};
pub use ratio::{Midpoint, Precision, Ratio};
pub use source::{AbundancySource, DivisorTable, ValueSource};
pub use sweep::{
    checkpoints, is_power_of_ten, split_is_balanced, Checkpoint, Sweep, SweepConfig, SweepReport,
    ViolationPolicy,
};
pub use tracker::{MedianTracker, TrackerState};
