//! Closed integer intervals and interval arithmetic.
//!
//! An [`Interval`] `[lower, upper]` stands for every integer in between, both ends included.
//! The operators follow the textbook rules for independent operands:
//!
//! - `[a, b] + [c, d] = [a + c, b + d]`
//! - `[a, b] - [c, d] = [a - d, b - c]`
//! - `[a, b] * [c, d] = [min(P), max(P)]`, where `P = {ac, ad, bc, bd}`
//! - `[a, b] / [c, d] = [a, b] * (1 / [c, d])`
//!
//! Operands are treated as uncorrelated, so `x - x` over `x ∈ [0, 10]` yields `[-10, 10]`,
//! not `[0, 0]`. Every result is a sound enclosure of the concrete results, possibly wider.
//!
//! # Division
//!
//! The reciprocal `1 / [c, d]` depends on where zero sits relative to the divisor, see
//! [`DivCase`]. Reciprocal ends are kept exact: [`Recip::Inverse(d)`][Recip::Inverse] is the
//! rational `1/d`, and scaling it by an integer `a` gives `a / d` truncated toward zero.
//! Truncation toward zero is monotone, so the min/max over the truncated corner products is the
//! truncation of the exact min/max, which is also how concrete integer division rounds.
//!
//! Results that leave the range of [`Int`] saturate to `Int::MIN` / `Int::MAX`.

use std::cmp::{max, min};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use log::trace;

use crate::types::Int;

/// Error type for interval construction.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IntervalError {
    /// The lower end exceeds the upper end.
    Inverted { lower: Int, upper: Int },
}

impl fmt::Display for IntervalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalError::Inverted { lower, upper } => {
                write!(f, "inverted interval: lower bound {} exceeds upper bound {}", lower, upper)
            }
        }
    }
}

impl std::error::Error for IntervalError {}

/// Extended integer: -∞, finite value, or +∞.
///
/// Used for intermediate corner products before they are saturated back into [`Int`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    NegInf,
    Finite(i64),
    PosInf,
}

impl Bound {
    /// Clamps the bound into the range of [`Int`].
    pub fn saturate(self) -> Int {
        match self {
            Bound::NegInf => Int::MIN,
            Bound::Finite(n) => n.clamp(Int::MIN as i64, Int::MAX as i64) as Int,
            Bound::PosInf => Int::MAX,
        }
    }
}

/// One end of a reciprocal interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recip {
    NegInf,
    /// Exactly `1 / d`, with `d != 0`.
    Inverse(Int),
    PosInf,
}

impl Recip {
    /// Multiplies `a` by this reciprocal end, truncating toward zero.
    pub fn scale(self, a: Int) -> Bound {
        match self {
            Recip::Inverse(d) => Bound::Finite(a as i64 / d as i64),
            Recip::NegInf => match a.signum() {
                1 => Bound::NegInf,
                -1 => Bound::PosInf,
                _ => Bound::Finite(0),
            },
            Recip::PosInf => match a.signum() {
                1 => Bound::PosInf,
                -1 => Bound::NegInf,
                _ => Bound::Finite(0),
            },
        }
    }
}

impl fmt::Display for Recip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recip::NegInf => write!(f, "-∞"),
            Recip::Inverse(d) => write!(f, "1/{}", d),
            Recip::PosInf => write!(f, "+∞"),
        }
    }
}

/// Position of zero relative to a divisor interval `[c, d]`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DivCase {
    /// `c > 0` or `d < 0`: reciprocal is `[1/d, 1/c]`.
    ExcludesZero,
    /// `d == 0` and `c != 0`: reciprocal is `[-∞, 1/c]`.
    EndsAtZero,
    /// `c == 0` and `d != 0`: reciprocal is `[1/d, +∞]`.
    StartsAtZero,
    /// `c < 0 < d`, or `c == d == 0`: reciprocal is `[-∞, +∞]`.
    Unbounded,
}

impl DivCase {
    pub fn classify(divisor: &Interval) -> Self {
        let (c, d) = (divisor.lower, divisor.upper);
        if c > 0 || d < 0 {
            DivCase::ExcludesZero
        } else if d == 0 && c != 0 {
            DivCase::EndsAtZero
        } else if c == 0 && d != 0 {
            DivCase::StartsAtZero
        } else {
            DivCase::Unbounded
        }
    }
}

/// The reciprocal `1 / [c, d]` of a divisor interval.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Reciprocal {
    pub lower: Recip,
    pub upper: Recip,
}

impl fmt::Display for Reciprocal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Closed interval `[lower, upper]` with `lower <= upper`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Interval {
    lower: Int,
    upper: Int,
}

impl Interval {
    /// Creates the interval `[lower, upper]`.
    ///
    /// # Panics
    ///
    /// Panics if `lower > upper`. Use [`Interval::try_new`] for the fallible form.
    pub fn new(lower: Int, upper: Int) -> Self {
        assert!(lower <= upper, "interval lower bound must not exceed upper bound");
        Self { lower, upper }
    }

    pub fn try_new(lower: Int, upper: Int) -> Result<Self, IntervalError> {
        if lower > upper {
            return Err(IntervalError::Inverted { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn singleton(value: Int) -> Self {
        Self {
            lower: value,
            upper: value,
        }
    }

    /// The interval covering every representable [`Int`].
    pub fn full() -> Self {
        Self {
            lower: Int::MIN,
            upper: Int::MAX,
        }
    }

    pub fn lower(&self) -> Int {
        self.lower
    }

    pub fn upper(&self) -> Int {
        self.upper
    }

    pub fn contains(&self, value: Int) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn is_singleton(&self) -> bool {
        self.lower == self.upper
    }

    /// Number of integers in the interval, minus one.
    pub fn width(&self) -> u64 {
        (self.upper as i64 - self.lower as i64) as u64
    }

    /// Smallest interval containing both `self` and `other`.
    pub fn hull(&self, other: &Interval) -> Interval {
        Interval {
            lower: min(self.lower, other.lower),
            upper: max(self.upper, other.upper),
        }
    }

    /// Computes `1 / self` according to its [`DivCase`].
    pub fn reciprocal(&self) -> Reciprocal {
        let (lower, upper) = match DivCase::classify(self) {
            DivCase::ExcludesZero => (Recip::Inverse(self.upper), Recip::Inverse(self.lower)),
            DivCase::EndsAtZero => (Recip::NegInf, Recip::Inverse(self.lower)),
            DivCase::StartsAtZero => (Recip::Inverse(self.upper), Recip::PosInf),
            DivCase::Unbounded => (Recip::NegInf, Recip::PosInf),
        };
        Reciprocal { lower, upper }
    }

    /// Saturating conversion from the min/max of four extended corners.
    fn enclose(corners: [Bound; 4]) -> Interval {
        let lo = corners.iter().copied().fold(Bound::PosInf, min);
        let hi = corners.iter().copied().fold(Bound::NegInf, max);
        Interval {
            lower: lo.saturate(),
            upper: hi.saturate(),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

impl From<Interval> for (Int, Int) {
    fn from(interval: Interval) -> Self {
        (interval.lower, interval.upper)
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Self) -> Self::Output {
        Interval {
            lower: self.lower.saturating_add(rhs.lower),
            upper: self.upper.saturating_add(rhs.upper),
        }
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Self) -> Self::Output {
        Interval {
            lower: self.lower.saturating_sub(rhs.upper),
            upper: self.upper.saturating_sub(rhs.lower),
        }
    }
}

impl Mul for Interval {
    type Output = Interval;

    fn mul(self, rhs: Self) -> Self::Output {
        let product = |a: Int, b: Int| Bound::Finite(a as i64 * b as i64);
        Interval::enclose([
            product(self.lower, rhs.lower),
            product(self.lower, rhs.upper),
            product(self.upper, rhs.lower),
            product(self.upper, rhs.upper),
        ])
    }
}

impl Div for Interval {
    type Output = Interval;

    fn div(self, rhs: Self) -> Self::Output {
        let recip = rhs.reciprocal();
        trace!("div({} / {}): 1/{} = {}", self, rhs, rhs, recip);
        Interval::enclose([
            recip.lower.scale(self.lower),
            recip.upper.scale(self.lower),
            recip.lower.scale(self.upper),
            recip.upper.scale(self.upper),
        ])
    }
}
