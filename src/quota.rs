//! Exact rational shares of an estate.
//!
//! Every share handled by the crate is a [`Quota`]: a reduced, non-negative
//! fraction backed by [`Rational64`]. There is no floating point anywhere;
//! sums, scaling and proportional splits stay exact.
//!
//! The named constants ([`HALF`], [`SIXTH`], …) are the fractions the
//! inheritance rules are written in.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul};
use std::str::FromStr;

use num_integer::Integer;
use num_rational::Rational64;
use num_traits::{One, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FaraidError;

/// An exact fraction of the estate.
///
/// Values are always kept in lowest terms with a positive denominator.
/// Intermediate sums may exceed one (before excess normalisation); a final
/// share never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quota(Rational64);

/// Zero: a blocked or absent entitlement.
pub const NOTHING: Quota = Quota(Rational64::new_raw(0, 1));
/// One eighth.
pub const EIGHTH: Quota = Quota(Rational64::new_raw(1, 8));
/// One sixth.
pub const SIXTH: Quota = Quota(Rational64::new_raw(1, 6));
/// One quarter.
pub const QUARTER: Quota = Quota(Rational64::new_raw(1, 4));
/// One third.
pub const THIRD: Quota = Quota(Rational64::new_raw(1, 3));
/// One half.
pub const HALF: Quota = Quota(Rational64::new_raw(1, 2));
/// Two thirds.
pub const TWO_THIRDS: Quota = Quota(Rational64::new_raw(2, 3));
/// The whole estate.
pub const WHOLE: Quota = Quota(Rational64::new_raw(1, 1));

impl Quota {
    /// Build a quota from a numerator and denominator, reducing it.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    pub fn new(numer: u32, denom: u32) -> Self {
        Self(Rational64::new(i64::from(numer), i64::from(denom)))
    }

    /// Numerator in lowest terms.
    pub fn numer(&self) -> i64 {
        *self.0.numer()
    }

    /// Denominator in lowest terms (always positive).
    pub fn denom(&self) -> i64 {
        *self.0.denom()
    }

    /// `true` for exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `true` for exactly one.
    pub fn is_whole(&self) -> bool {
        self.0.is_one()
    }

    /// `self - other`, clamped at zero.
    pub fn saturating_sub(self, other: Quota) -> Quota {
        if other >= self {
            NOTHING
        } else {
            Quota(self.0 - other.0)
        }
    }

    /// Divide the quota evenly among `count` individuals.
    ///
    /// A count of zero yields [`NOTHING`].
    pub fn divide_among(self, count: u32) -> Quota {
        if count == 0 {
            return NOTHING;
        }
        Quota(self.0 / i64::from(count))
    }
}

impl Default for Quota {
    fn default() -> Self {
        NOTHING
    }
}

impl Add for Quota {
    type Output = Quota;

    fn add(self, rhs: Quota) -> Quota {
        Quota(self.0 + rhs.0)
    }
}

impl Mul for Quota {
    type Output = Quota;

    fn mul(self, rhs: Quota) -> Quota {
        Quota(self.0 * rhs.0)
    }
}

/// Exact division. Callers must not divide by [`NOTHING`].
impl Div for Quota {
    type Output = Quota;

    fn div(self, rhs: Quota) -> Quota {
        Quota(self.0 / rhs.0)
    }
}

impl Sum for Quota {
    fn sum<I: Iterator<Item = Quota>>(iter: I) -> Quota {
        iter.fold(NOTHING, Add::add)
    }
}

impl<'a> Sum<&'a Quota> for Quota {
    fn sum<I: Iterator<Item = &'a Quota>>(iter: I) -> Quota {
        iter.copied().sum()
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Quota {
    type Err = FaraidError;

    /// Parse `"n/d"` or a bare integer `"n"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FaraidError::InvalidQuota(s.to_string());
        let (numer, denom) = match s.trim().split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s.trim(), "1"),
        };
        let numer: u32 = numer.parse().map_err(|_| invalid())?;
        let denom: u32 = denom.parse().map_err(|_| invalid())?;
        if denom == 0 {
            return Err(invalid());
        }
        Ok(Quota::new(numer, denom))
    }
}

impl Serialize for Quota {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quota {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Split `total` in proportion to integer `weights`.
///
/// The returned quotas line up with `weights` and sum to exactly `total`,
/// unless every weight is zero, in which case every part is [`NOTHING`].
pub fn apportion(total: Quota, weights: &[u64]) -> Vec<Quota> {
    let sum: u64 = weights.iter().sum();
    if sum == 0 {
        return vec![NOTHING; weights.len()];
    }
    let sum = to_i64(sum);
    weights
        .iter()
        .map(|&w| Quota(total.0 * Rational64::new(to_i64(w), sum)))
        .collect()
}

/// Express a set of quotas as integer weights over their common denominator.
///
/// The common base is the lcm of the denominators, folded pairwise through
/// gcd. `[1/2, 1/6]` becomes `[3, 1]`.
pub fn integer_weights(shares: &[Quota]) -> Vec<u64> {
    let base = shares.iter().fold(1i64, |acc, q| acc.lcm(&q.denom()));
    shares
        .iter()
        .map(|q| (q.numer() * (base / q.denom())).unsigned_abs())
        .collect()
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_reduced() {
        assert_eq!(SIXTH, Quota::new(2, 12));
        assert_eq!(TWO_THIRDS, Quota::new(4, 6));
        assert_eq!(WHOLE, Quota::new(7, 7));
        assert_eq!(NOTHING, Quota::new(0, 5));
    }

    #[test]
    fn test_add_and_sum() {
        assert_eq!(HALF + SIXTH, TWO_THIRDS);
        let total: Quota = [EIGHTH, TWO_THIRDS, Quota::new(5, 24)].iter().sum();
        assert_eq!(total, WHOLE);
    }

    #[test]
    fn test_saturating_sub_clamps_at_zero() {
        assert_eq!(WHOLE.saturating_sub(QUARTER), Quota::new(3, 4));
        assert_eq!(HALF.saturating_sub(TWO_THIRDS), NOTHING);
        assert_eq!(HALF.saturating_sub(HALF), NOTHING);
    }

    #[test]
    fn test_divide_among() {
        assert_eq!(EIGHTH.divide_among(2), Quota::new(1, 16));
        assert_eq!(HALF.divide_among(0), NOTHING);
        assert_eq!(HALF.divide_among(3), SIXTH);
    }

    #[test]
    fn test_ordering_is_exact() {
        assert!(SIXTH < QUARTER);
        assert!(THIRD < HALF);
        assert!(HALF + TWO_THIRDS > WHOLE);
        assert!(NOTHING.is_zero());
        assert!(WHOLE.is_whole());
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(EIGHTH.to_string(), "1/8");
        assert_eq!(WHOLE.to_string(), "1");
        assert_eq!(NOTHING.to_string(), "0");
        assert_eq!("3/7".parse::<Quota>().unwrap(), Quota::new(3, 7));
        assert_eq!(" 2 / 4 ".parse::<Quota>().unwrap(), HALF);
        assert_eq!("1".parse::<Quota>().unwrap(), WHOLE);
        assert!("1/0".parse::<Quota>().is_err());
        assert!("half".parse::<Quota>().is_err());
        assert!("-1/2".parse::<Quota>().is_err());
    }

    #[test]
    fn test_serde_uses_fraction_strings() {
        let json = serde_json::to_string(&Quota::new(5, 24)).unwrap();
        assert_eq!(json, "\"5/24\"");
        let back: Quota = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Quota::new(5, 24));
    }

    #[test]
    fn test_apportion_two_to_one() {
        let parts = apportion(Quota::new(3, 4), &[2, 1]);
        assert_eq!(parts, vec![HALF, QUARTER]);
    }

    #[test]
    fn test_apportion_is_exact_for_awkward_weights() {
        let total = Quota::new(5, 24);
        let parts = apportion(total, &[2, 2, 1, 1, 1]);
        let sum: Quota = parts.iter().sum();
        assert_eq!(sum, total);
        assert_eq!(parts[0], Quota::new(10, 168));
    }

    #[test]
    fn test_apportion_zero_weights() {
        assert_eq!(apportion(HALF, &[0, 0]), vec![NOTHING, NOTHING]);
        assert!(apportion(HALF, &[]).is_empty());
    }

    #[test]
    fn test_integer_weights_over_common_denominator() {
        assert_eq!(integer_weights(&[HALF, SIXTH]), vec![3, 1]);
        assert_eq!(integer_weights(&[QUARTER, NOTHING, TWO_THIRDS]), vec![3, 0, 8]);
        assert_eq!(integer_weights(&[]), Vec::<u64>::new());
    }
}
