//! Divisor sieve and the alternating abundancy index built on top of it

use crate::ratio::Ratio;

/// Tables larger than this get a warning when built
const LARGE_TABLE_BYTES: usize = 256 * 1024 * 1024;

/// Ascending divisor lists for every integer in `1..=limit`
///
/// All lists live in one flat array, indexed by an offsets array,
/// so building the table costs two allocations no matter how large `limit` is.
/// The table holds one entry per divisor, which is roughly `limit * ln(limit)` entries in total.
/// At a limit of one million, that comes to about 14 million `u32`s plus the offsets.
#[derive(Debug, Clone)]
pub struct DivisorTable {
    limit: u32,
    /// `offsets[n]..offsets[n + 1]` is the range of `divisors` holding the divisors of `n`
    offsets: Vec<usize>,
    divisors: Vec<u32>,
}

impl DivisorTable {
    /// Sieves the divisors of every integer in `1..=limit`
    ///
    /// Every `d` in `1..=limit` is written into the list of each of its multiples,
    /// so the lists come out in ascending order and the whole build is O(limit * log(limit)).
    pub fn build(limit: u32) -> Self {
        let n = limit as usize;

        // First pass counts, second pass fills
        let mut offsets = vec![0usize; n + 2];
        for d in 1..=n {
            for m in (d..=n).step_by(d) {
                offsets[m + 1] += 1;
            }
        }
        for i in 1..offsets.len() {
            offsets[i] += offsets[i - 1];
        }

        let mut divisors = vec![0u32; offsets[n + 1]];
        let mut cursor = offsets[..=n].to_vec();
        for d in 1..=n {
            for m in (d..=n).step_by(d) {
                divisors[cursor[m]] = d as u32;
                cursor[m] += 1;
            }
        }

        let table = Self {
            limit,
            offsets,
            divisors,
        };

        let bytes = table.memory_bytes();
        if bytes > LARGE_TABLE_BYTES {
            #[cfg(feature = "log")]
            log::warn!(
                "Divisor table for limit {} holds {} entries ({} MiB). Memory use grows with the limit.",
                limit,
                table.total_divisors(),
                bytes / (1024 * 1024)
            );

            #[cfg(not(feature = "log"))]
            eprintln!(
                "Divisor table for limit {} holds {} entries ({} MiB). Memory use grows with the limit.",
                limit,
                table.total_divisors(),
                bytes / (1024 * 1024)
            );
        } else {
            #[cfg(feature = "log")]
            log::debug!(
                "Built divisor table for limit {}: {} entries, {} bytes",
                limit,
                table.total_divisors(),
                bytes
            );
        }

        table
    }

    /// Largest integer the table covers
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Divisors of `n` in ascending order
    ///
    /// Empty for `n == 0`, and for any `n` beyond [`Self::limit`].
    pub fn divisors(&self, n: u32) -> &[u32] {
        if n > self.limit {
            return &[];
        }

        let n = n as usize;
        &self.divisors[self.offsets[n]..self.offsets[n + 1]]
    }

    /// Total number of divisor entries across every list
    pub fn total_divisors(&self) -> usize {
        self.divisors.len()
    }

    /// Approximate heap memory held by the table, in bytes
    pub fn memory_bytes(&self) -> usize {
        self.offsets.len() * std::mem::size_of::<usize>()
            + self.divisors.len() * std::mem::size_of::<u32>()
    }
}

/// Supplies the value for each index of a sweep
///
/// Implementations must be deterministic: the same `n` always gives the same value.
pub trait ValueSource {
    /// Largest index a value can be produced for
    fn limit(&self) -> u32;

    /// Value at index `n`, for `n` in `1..=limit()`
    fn value(&self, n: u32) -> Ratio;
}

/// Produces the alternating abundancy index I(n) for every `n` up to a fixed limit
///
/// I(n) is the absolute value of the alternating sum of the divisors of `n`
/// (taken in ascending order, starting with `+`), divided by `n`.
/// For example, 6 has divisors 1, 2, 3, 6, so I(6) = |1 - 2 + 3 - 6| / 6 = 2/3.
#[derive(Debug, Clone)]
pub struct AbundancySource {
    table: DivisorTable,
}

impl AbundancySource {
    /// Precomputes the divisors of everything up to `limit`
    pub fn new(limit: u32) -> Self {
        Self::from_table(DivisorTable::build(limit))
    }

    /// Wraps an already built divisor table
    pub fn from_table(table: DivisorTable) -> Self {
        Self { table }
    }

    /// Largest `n` this source can produce a value for
    pub fn limit(&self) -> u32 {
        self.table.limit()
    }

    /// Underlying divisor table
    pub fn table(&self) -> &DivisorTable {
        &self.table
    }

    /// |d1 - d2 + d3 - ...| over the ascending divisors of `n`
    pub fn alternating_divisor_sum(&self, n: u32) -> u64 {
        let sum = self
            .table
            .divisors(n)
            .iter()
            .enumerate()
            .fold(0i64, |acc, (i, &d)| {
                if i % 2 == 0 {
                    acc + i64::from(d)
                } else {
                    acc - i64::from(d)
                }
            });
        sum.unsigned_abs()
    }

    /// The alternating abundancy index I(n), exactly
    ///
    /// `n` must not exceed [`Self::limit`]. I(0) is zero.
    pub fn value(&self, n: u32) -> Ratio {
        debug_assert!(n <= self.limit(), "{n} is past the sieve limit");

        // 0 / 0 is rejected by `Ratio::new`, which gives the zero for I(0)
        Ratio::new(self.alternating_divisor_sum(n), u64::from(n)).unwrap_or_default()
    }

    /// `(n, I(n))` for every `n` in `1..=limit`, in order
    pub fn values(&self) -> impl Iterator<Item = (u32, Ratio)> + '_ {
        (1..=self.limit()).map(move |n| (n, self.value(n)))
    }
}

impl ValueSource for AbundancySource {
    fn limit(&self) -> u32 {
        AbundancySource::limit(self)
    }

    fn value(&self, n: u32) -> Ratio {
        AbundancySource::value(self, n)
    }
}
