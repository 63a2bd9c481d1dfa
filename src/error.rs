//! Error types for the tracker and the checkpoint sweep

/// Errors returned by [`crate::MedianTracker`] queries
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MedianError {
    /// The median was requested before any value was inserted
    #[error("median requested before any value was inserted")]
    Empty,

    /// The average of the two middle values can't be represented
    #[error("midpoint of the two middle values is not representable")]
    MidpointOverflow,
}

/// Errors returned while running a [`crate::Sweep`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SweepError {
    /// The configured limit can't be swept
    #[error("invalid limit {0}: must be at least 1")]
    InvalidLimit(u32),

    /// The value source can't produce values all the way to the configured limit
    #[error("value source stops at {available}, short of the limit {limit}")]
    SourceTooShort {
        /// Configured limit
        limit: u32,
        /// Largest index the source covers
        available: u32,
    },

    /// The values above the median don't make up exactly half of the values seen
    #[error("split check failed at N = {n}: {greater} values above the median")]
    InvariantViolation {
        /// Checkpoint index at which the check failed
        n: u32,
        /// Number of values reported above the median
        greater: u64,
    },

    /// Tracker query failed
    #[error(transparent)]
    Median(#[from] MedianError),
}
