//! The numeric-value abstraction shared by every engine component, plus the
//! small number-theory helpers the generators and classifier both need.
//!
//! Sequences are either `i64` (the default quiz domain) or `f64` (fractional
//! geometric questions). Everything downstream is written once against
//! [`SeqValue`].

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

/// Largest magnitude any produced or accepted sequence value may have.
pub const ABS_CAP: i64 = 1_000_000_000;

/// Tolerance used for "equal" on real-valued sequences.
pub const REAL_TOLERANCE: f64 = 1e-9;

/// A value a sequence can be made of.
pub trait SeqValue:
    Copy + PartialEq + PartialOrd + fmt::Debug + fmt::Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    fn from_i64(v: i64) -> Self;

    /// Lossy conversion; integers round to nearest.
    fn from_f64(v: f64) -> Self;

    fn to_f64(self) -> f64;

    /// `Some` only when the value is integral and representable as `i64`.
    fn to_exact_i64(self) -> Option<i64>;

    fn checked_add(self, rhs: Self) -> Option<Self>;
    fn checked_sub(self, rhs: Self) -> Option<Self>;
    fn checked_mul(self, rhs: Self) -> Option<Self>;

    /// Exact for integers, within [`REAL_TOLERANCE`] for reals.
    fn approx_eq(self, other: Self) -> bool;

    /// Text shown to the learner. Distinct values render to distinct text
    /// under [`crate::normalize_answer`].
    fn render(self) -> String;

    fn within_cap(self) -> bool {
        self.to_f64().abs() <= ABS_CAP as f64
    }
}

impl SeqValue for i64 {
    fn from_i64(v: i64) -> Self {
        v
    }

    fn from_f64(v: f64) -> Self {
        v.round() as i64
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn to_exact_i64(self) -> Option<i64> {
        Some(self)
    }

    fn checked_add(self, rhs: Self) -> Option<Self> {
        i64::checked_add(self, rhs)
    }

    fn checked_sub(self, rhs: Self) -> Option<Self> {
        i64::checked_sub(self, rhs)
    }

    fn checked_mul(self, rhs: Self) -> Option<Self> {
        i64::checked_mul(self, rhs)
    }

    fn approx_eq(self, other: Self) -> bool {
        self == other
    }

    fn render(self) -> String {
        self.to_string()
    }
}

impl SeqValue for f64 {
    fn from_i64(v: i64) -> Self {
        v as f64
    }

    fn from_f64(v: f64) -> Self {
        v
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn to_exact_i64(self) -> Option<i64> {
        // 2^53: beyond this not every integer is representable.
        if self.is_finite() && self.fract() == 0.0 && self.abs() <= 9_007_199_254_740_992.0 {
            Some(self as i64)
        } else {
            None
        }
    }

    fn checked_add(self, rhs: Self) -> Option<Self> {
        finite(self + rhs)
    }

    fn checked_sub(self, rhs: Self) -> Option<Self> {
        finite(self - rhs)
    }

    fn checked_mul(self, rhs: Self) -> Option<Self> {
        finite(self * rhs)
    }

    fn approx_eq(self, other: Self) -> bool {
        (self - other).abs() <= REAL_TOLERANCE
    }

    fn render(self) -> String {
        if let Some(i) = self.to_exact_i64() {
            return i.to_string();
        }
        let fixed = format!("{:.8}", self);
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Convert a whole sequence to integers, or `None` if any value is not integral.
pub fn exact_integers<T: SeqValue>(seq: &[T]) -> Option<Vec<i64>> {
    seq.iter().map(|v| v.to_exact_i64()).collect()
}

/// `base^exp` without wrapping; `None` on i64 overflow.
pub fn checked_pow(base: i64, exp: u32) -> Option<i64> {
    base.checked_pow(exp)
}

/// Trial division up to `sqrt(n)`.
pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut f = 3i64;
    while f <= n / f {
        if n % f == 0 {
            return false;
        }
        f += 2;
    }
    true
}

/// Smallest prime strictly greater than `n`.
pub fn next_prime(n: i64) -> Option<i64> {
    let mut candidate = n.max(1).checked_add(1)?;
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}

/// Product of the decimal digits of `|n|` (0 for 0).
pub fn digit_product(n: i64) -> i64 {
    let mut n = n.unsigned_abs();
    if n == 0 {
        return 0;
    }
    let mut product = 1i64;
    while n > 0 {
        product *= (n % 10) as i64;
        n /= 10;
    }
    product
}

/// Decimal digits of `|n|`, most significant first.
pub fn digits(n: i64) -> Vec<i64> {
    n.unsigned_abs()
        .to_string()
        .bytes()
        .map(|b| (b - b'0') as i64)
        .collect()
}

/// "2*3*4" for 234.
pub fn digits_text(n: i64) -> String {
    digits(n)
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primes_by_trial_division() {
        let small: Vec<i64> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(small, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(!is_prime(-7));
        assert!(is_prime(999_999_937));
        assert_eq!(next_prime(13), Some(17));
        assert_eq!(next_prime(-4), Some(2));
    }

    #[test]
    fn digit_product_ignores_sign() {
        assert_eq!(digit_product(3456), 360);
        assert_eq!(digit_product(-25), 10);
        assert_eq!(digit_product(0), 0);
        assert_eq!(digits_text(234), "2*3*4");
    }

    #[test]
    fn real_rendering_is_trimmed() {
        assert_eq!(13.5f64.render(), "13.5");
        assert_eq!(36.0f64.render(), "36");
        assert_eq!(0.125f64.render(), "0.125");
        assert_eq!((-1e-12f64).render(), "0");
        assert_eq!((-2.25f64).render(), "-2.25");
    }

    #[test]
    fn checked_ops_reject_overflow() {
        assert_eq!(SeqValue::checked_add(i64::MAX, 1), None);
        assert_eq!(SeqValue::checked_mul(f64::MAX, 2.0), None);
        assert_eq!(checked_pow(11, 12), Some(3_138_428_376_721));
        assert!(!SeqValue::within_cap(1_000_000_001i64));
        assert!(SeqValue::within_cap(-1_000_000_000i64));
    }
}
