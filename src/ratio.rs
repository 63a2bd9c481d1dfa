//! Exact non-negative rationals
//!
//! Every value the tracker sees is a quotient of two small integers,
//! so keeping them as reduced fractions avoids any rounding at all.
//! Decimals only appear when a [`Ratio`] is rendered for output.

use std::{cmp::Ordering, fmt};

/// Number of fractional digits to render when printing a [`Ratio`] as a decimal
///
/// This is passed explicitly to every call that produces decimal text;
/// nothing about it is stored globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Precision(usize);

impl Precision {
    /// Constructs a precision of `digits` fractional digits
    pub const fn new(digits: usize) -> Self {
        Self(digits)
    }

    /// Number of fractional digits
    pub const fn digits(&self) -> usize {
        self.0
    }
}

impl Default for Precision {
    /// Fifty fractional digits
    fn default() -> Self {
        Self(50)
    }
}

/// Values that have an exact midpoint
///
/// The tracker needs this to report the median of an even number of values.
pub trait Midpoint: Sized {
    /// Returns `(self + other) / 2`, or `None` if it can't be represented
    fn midpoint(&self, other: &Self) -> Option<Self>;
}

/// Exact non-negative rational number, always stored in lowest terms
///
/// Because the representation is canonical, the derived equality is value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ratio {
    numer: u64,
    denom: u64,
}

impl Ratio {
    /// Zero
    pub const ZERO: Self = Self { numer: 0, denom: 1 };

    /// One
    pub const ONE: Self = Self { numer: 1, denom: 1 };

    /// Constructs `numer / denom` in lowest terms
    ///
    /// Returns `None` if `denom` is zero.
    pub fn new(numer: u64, denom: u64) -> Option<Self> {
        if denom == 0 {
            return None;
        }

        let g = gcd(numer as u128, denom as u128) as u64;
        Some(Self {
            numer: numer / g,
            denom: denom / g,
        })
    }

    /// Constructs the whole number `n`
    pub const fn from_integer(n: u64) -> Self {
        Self { numer: n, denom: 1 }
    }

    /// Numerator, in lowest terms
    pub fn numer(&self) -> u64 {
        self.numer
    }

    /// Denominator, in lowest terms (never zero)
    pub fn denom(&self) -> u64 {
        self.denom
    }

    /// Exact `(self + other) / 2`
    ///
    /// Returns `None` if the reduced result needs more than 64 bits in either part.
    pub fn checked_midpoint(&self, other: &Self) -> Option<Self> {
        let (a, b) = (self.numer as u128, self.denom as u128);
        let (c, d) = (other.numer as u128, other.denom as u128);

        let g = gcd(b, d);
        let numer = a.checked_mul(d / g)?.checked_add(c.checked_mul(b / g)?)?;
        let denom = (b / g).checked_mul(d)?.checked_mul(2)?;

        let g = gcd(numer, denom);
        Some(Self {
            numer: u64::try_from(numer / g).ok()?,
            denom: u64::try_from(denom / g).ok()?,
        })
    }

    /// Renders the value as a fixed-point decimal with exactly `precision` fractional digits
    ///
    /// The last digit is rounded half-to-even.
    pub fn to_decimal_string(&self, precision: Precision) -> String {
        let denom = self.denom as u128;
        let mut whole = self.numer / self.denom;
        let mut rem = (self.numer % self.denom) as u128;

        let mut digits = Vec::with_capacity(precision.digits());
        for _ in 0..precision.digits() {
            rem *= 10;
            digits.push((rem / denom) as u8);
            rem %= denom;
        }

        let last_is_odd = match digits.last() {
            Some(d) => d % 2 == 1,
            None => whole % 2 == 1,
        };
        let round_up = match (rem * 2).cmp(&denom) {
            Ordering::Greater => true,
            Ordering::Equal => last_is_odd,
            Ordering::Less => false,
        };

        if round_up {
            let mut carry = true;
            for d in digits.iter_mut().rev() {
                if *d == 9 {
                    *d = 0;
                } else {
                    *d += 1;
                    carry = false;
                    break;
                }
            }
            if carry {
                whole += 1;
            }
        }

        let mut out = whole.to_string();
        if !digits.is_empty() {
            out.push('.');
            out.extend(digits.iter().map(|d| char::from(b'0' + d)));
        }
        out
    }
}

impl Midpoint for Ratio {
    fn midpoint(&self, other: &Self) -> Option<Self> {
        self.checked_midpoint(other)
    }
}

impl From<u64> for Ratio {
    fn from(n: u64) -> Self {
        Self::from_integer(n)
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.denom == other.denom {
            return self.numer.cmp(&other.numer);
        }

        // 64x64 products always fit in 128 bits
        let lhs = self.numer as u128 * other.denom as u128;
        let rhs = other.numer as u128 * self.denom as u128;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    // gcd(0, 0) would be 0; only reachable for 0/0, which `new` rejects
    a.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: u64, d: u64) -> Ratio {
        Ratio::new(n, d).unwrap()
    }

    #[test]
    fn reduces_to_lowest_terms() {
        let v = r(4, 6);
        assert_eq!(v.numer(), 2);
        assert_eq!(v.denom(), 3);
        assert_eq!(v, r(2, 3));
    }

    #[test]
    fn zero_denominator() {
        assert_eq!(Ratio::new(1, 0), None);
    }

    #[test]
    fn zero_numerator_is_canonical() {
        assert_eq!(r(0, 17), Ratio::ZERO);
        assert_eq!(r(0, 17).denom(), 1);
    }

    #[test]
    fn ordering() {
        assert!(r(1, 2) < r(3, 5));
        assert!(r(5, 8) < r(2, 3));
        assert!(r(6, 7) > r(4, 5));
        assert_eq!(r(2, 4).cmp(&r(3, 6)), Ordering::Equal);
        assert!(Ratio::ZERO < r(1, u64::MAX));
    }

    #[test]
    fn ordering_near_the_top_of_the_range() {
        let a = r(u64::MAX - 1, u64::MAX);
        let b = r(u64::MAX - 2, u64::MAX - 1);
        assert!(a > b);
    }

    #[test]
    fn midpoint() {
        assert_eq!(r(2, 3).checked_midpoint(&r(3, 4)), Some(r(17, 24)));
        assert_eq!(Ratio::ONE.checked_midpoint(&Ratio::ONE), Some(Ratio::ONE));
        assert_eq!(Ratio::ZERO.checked_midpoint(&Ratio::ONE), Some(r(1, 2)));
    }

    #[test]
    fn midpoint_overflow() {
        // Coprime denominators near the top of the range
        let a = r(1, u64::MAX);
        let b = r(1, u64::MAX - 1);
        assert_eq!(a.checked_midpoint(&b), None);
    }

    #[test]
    fn display() {
        assert_eq!(r(17, 24).to_string(), "17/24");
        assert_eq!(Ratio::from_integer(3).to_string(), "3");
    }

    #[test]
    fn decimal_rendering() {
        assert_eq!(r(1, 2).to_decimal_string(Precision::new(3)), "0.500");
        assert_eq!(r(17, 24).to_decimal_string(Precision::new(6)), "0.708333");
        assert_eq!(r(2, 3).to_decimal_string(Precision::new(4)), "0.6667");
        assert_eq!(Ratio::ONE.to_decimal_string(Precision::new(0)), "1");
    }

    #[test]
    fn decimal_rendering_carries_into_whole_part() {
        assert_eq!(r(999, 1000).to_decimal_string(Precision::new(2)), "1.00");
    }

    #[test]
    fn decimal_rendering_rounds_half_to_even() {
        assert_eq!(r(1, 8).to_decimal_string(Precision::new(2)), "0.12");
        assert_eq!(r(3, 8).to_decimal_string(Precision::new(2)), "0.38");
        assert_eq!(r(1, 2).to_decimal_string(Precision::new(0)), "0");
        assert_eq!(r(3, 2).to_decimal_string(Precision::new(0)), "2");
    }

    #[test]
    fn decimal_rendering_default_precision() {
        let s = r(1, 3).to_decimal_string(Precision::default());
        assert_eq!(s.len(), 52);
        assert!(s.starts_with("0.3333"));
    }
}
