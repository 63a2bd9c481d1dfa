//! Exact running median over an append-only stream

use std::{cmp::Reverse, collections::BinaryHeap};

use crate::{error::MedianError, ratio::Midpoint};

/// Lifecycle state of a [`MedianTracker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No values inserted yet; the median is undefined
    Empty,
    /// At least one value inserted; every query is valid
    Populated,
}

/// Running median of a stream of values, updated one insertion at a time
///
/// The values are split into two halves around the median:
/// a max-ordered heap holding the lower (or equal) half,
/// and a min-ordered heap holding the upper half.
/// After every [`Self::insert`] the lower half holds either as many values as the upper half, or one more,
/// and no value in the lower half is greater than any value in the upper half.
/// The median is then read off the tops of the two heaps.
///
/// Insertion is O(log n), and median queries are O(1).
/// Memory grows linearly with the number of values inserted: nothing is ever discarded.
#[derive(Debug, Clone)]
pub struct MedianTracker<T: Ord> {
    /// Lower half of the values seen so far, largest on top
    lower: BinaryHeap<T>,
    /// Upper half of the values seen so far, smallest on top
    upper: BinaryHeap<Reverse<T>>,
}

impl<T: Ord> Default for MedianTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> MedianTracker<T> {
    /// Constructs an empty tracker
    pub fn new() -> Self {
        Self {
            lower: BinaryHeap::new(),
            upper: BinaryHeap::new(),
        }
    }

    /// Constructs an empty tracker with room for `capacity` values before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lower: BinaryHeap::with_capacity(capacity / 2 + 1),
            upper: BinaryHeap::with_capacity(capacity / 2),
        }
    }

    /// Total number of values inserted so far
    pub fn len(&self) -> usize {
        self.lower.len() + self.upper.len()
    }

    /// Whether no values have been inserted yet
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Current lifecycle state
    pub fn state(&self) -> TrackerState {
        if self.is_empty() {
            TrackerState::Empty
        } else {
            TrackerState::Populated
        }
    }

    /// Number of values in the lower half
    pub fn lower_len(&self) -> usize {
        self.lower.len()
    }

    /// Number of values in the upper half
    pub fn upper_len(&self) -> usize {
        self.upper.len()
    }

    /// Adds a value to the stream, updating the running median
    pub fn insert(&mut self, value: T) {
        let above_boundary = matches!(self.lower.peek(), Some(top) if value > *top);
        if above_boundary {
            self.upper.push(Reverse(value));
        } else {
            self.lower.push(value);
        }

        // Move at most one value across the boundary to restore the size balance
        if self.lower.len() > self.upper.len() + 1 {
            if let Some(top) = self.lower.pop() {
                self.upper.push(Reverse(top));
            }
        } else if self.upper.len() > self.lower.len() {
            if let Some(Reverse(bottom)) = self.upper.pop() {
                self.lower.push(bottom);
            }
        }

        debug_assert!(self.lower.len() - self.upper.len() <= 1);
    }

    /// Number of values on the strictly-greater side of the median
    ///
    /// This is the size of the upper half, so it is always `len() / 2` (rounded down).
    /// Comparing it against the expected half is how callers verify the tracker's bookkeeping.
    pub fn count_strictly_greater_than_median(&self) -> u64 {
        self.upper.len() as u64
    }

    /// The one or two middle values
    ///
    /// For an odd count this is `(middle, None)`,
    /// and for an even count it is `(lower middle, Some(upper middle))`.
    /// Returns `None` if no values have been inserted.
    ///
    /// This works for any ordered type, including ones that have no sensible average.
    pub fn median_pair(&self) -> Option<(&T, Option<&T>)> {
        let low = self.lower.peek()?;
        if self.lower.len() == self.upper.len() {
            Some((low, self.upper.peek().map(|Reverse(high)| high)))
        } else {
            Some((low, None))
        }
    }
}

impl<T: Ord + Clone + Midpoint> MedianTracker<T> {
    /// Gets the exact median of the values inserted so far
    ///
    /// For an even count this is the average of the two middle values.
    pub fn median(&self) -> Result<T, MedianError> {
        match self.median_pair() {
            None => Err(MedianError::Empty),
            Some((low, None)) => Ok(low.clone()),
            Some((low, Some(high))) => low.midpoint(high).ok_or(MedianError::MidpointOverflow),
        }
    }

    /// Gets the exact median, or `T::default()` if it is unavailable
    pub fn median_or_default(&self) -> T
    where
        T: Default,
    {
        self.median().unwrap_or_default()
    }
}

impl<T: Ord> Extend<T> for MedianTracker<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for MedianTracker<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tracker = Self::new();
        tracker.extend(iter);
        tracker
    }
}
