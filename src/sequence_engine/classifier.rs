//! Pattern recognition over an arbitrary sequence.
//!
//! Detectors run in a fixed order and the first match wins, so the order
//! is also the tie-break between families that overlap (every arithmetic
//! sequence is a degree-1 polynomial, a period-2 difference cycle is an
//! alternating `+a/-b` pattern, and so on). Each detector reports a fixed
//! confidence and, when it can, the next value.
//!
//! | #  | detector               | confidence |
//! |----|------------------------|------------|
//! | 1  | arithmetic             | 0.95       |
//! | 2  | geometric (int / frac) | 0.90 / 0.82|
//! | 3  | pure power `(n+b)^k+c` | 0.88       |
//! | 4  | polynomial, degree ≥ 3 | 0.82       |
//! | 5  | polygonal / quadratic  | 0.90 / 0.80|
//! | 6  | alternating `+a, -b`   | 0.75       |
//! | 7  | alternating doubling   | 0.80       |
//! | 8  | two interleaved APs    | 0.70       |
//! | 9  | interleaved mixed poly | 0.78       |
//! | 10 | Fibonacci-like         | 0.85       |
//! | 11 | primes                 | 0.70       |
//! | 12 | digit product          | 0.85       |
//! | 13 | repeating differences  | 0.65       |
//! | 14 | power steps            | 0.70       |
//! | -  | unknown                | 0.30       |

use tracing::trace;

use crate::sequence_engine::{
    difference::{all_equal, build_table, differences, is_constant},
    helpers::{evidence_text, recognition_hint, with_answer},
    models::{AskMode, ClassificationResult, EvenMode, PatternKey, PolygonShape, StepKind},
    numeric::{checked_pow, digit_product, exact_integers, is_prime, next_prime, SeqValue, REAL_TOLERANCE},
};

pub const CONFIDENCE_ARITHMETIC: f64 = 0.95;
pub const CONFIDENCE_GEOMETRIC: f64 = 0.90;
pub const CONFIDENCE_GEOMETRIC_FRACTIONAL: f64 = 0.82;
pub const CONFIDENCE_PURE_POWER: f64 = 0.88;
pub const CONFIDENCE_POLYNOMIAL: f64 = 0.82;
pub const CONFIDENCE_POLYGONAL: f64 = 0.90;
pub const CONFIDENCE_QUADRATIC: f64 = 0.80;
pub const CONFIDENCE_ALT_ADD_SUB: f64 = 0.75;
pub const CONFIDENCE_ALT_DOUBLING: f64 = 0.80;
pub const CONFIDENCE_INTERLEAVED_APS: f64 = 0.70;
pub const CONFIDENCE_INTERLEAVED_MIXED: f64 = 0.78;
pub const CONFIDENCE_FIBONACCI: f64 = 0.85;
pub const CONFIDENCE_PRIMES: f64 = 0.70;
pub const CONFIDENCE_DIGIT_PRODUCT: f64 = 0.85;
pub const CONFIDENCE_REPEATING_DIFF: f64 = 0.65;
pub const CONFIDENCE_POWER_STEPS: f64 = 0.70;
pub const CONFIDENCE_UNKNOWN: f64 = 0.30;

/// Exponents tried by the pure-power fit.
const POWER_DEGREES: std::ops::RangeInclusive<u32> = 3..=12;
/// Index offsets tried by the pure-power fit.
const POWER_OFFSETS: std::ops::RangeInclusive<i64> = 0..=2;
/// Candidate periods for repeating differences.
const PERIODS: std::ops::RangeInclusive<usize> = 2..=6;

struct Detection<T> {
    key: PatternKey<T>,
    next: Option<T>,
    confidence: f64,
}

impl<T> Detection<T> {
    fn new(key: PatternKey<T>, next: Option<T>, confidence: f64) -> Self {
        Detection { key, next, confidence }
    }
}

/// The input plus what every detector needs from it.
struct Input<'a, T> {
    seq: &'a [T],
    diffs: Vec<T>,
    /// `Some` when every value is integral.
    ints: Option<Vec<i64>>,
}

impl<T: SeqValue> Input<'_, T> {
    fn last(&self) -> T {
        self.seq[self.seq.len() - 1]
    }

    fn last_diff(&self) -> T {
        self.diffs[self.diffs.len() - 1]
    }
}

/// Classify `seq` by running the detector cascade.
///
/// Fewer than 3 values, or any value beyond the magnitude cap, gives
/// `unknown` with confidence 0.0. No match gives `unknown` with 0.30.
pub fn classify_sequence<T: SeqValue>(seq: &[T]) -> ClassificationResult<T> {
    if seq.len() < 3 {
        trace!(len = seq.len(), "sequence too short to classify");
        return ClassificationResult::unknown(0.0);
    }
    if !seq.iter().all(|v| v.within_cap()) {
        trace!("sequence exceeds the magnitude cap");
        return ClassificationResult::unknown(0.0);
    }
    let Some(diffs) = differences(seq) else {
        return ClassificationResult::unknown(0.0);
    };
    let input = Input { seq, diffs, ints: exact_integers(seq) };

    let detection = detect_arithmetic(&input)
        .or_else(|| detect_geometric(&input))
        .or_else(|| detect_pure_power(&input))
        .or_else(|| detect_polynomial(&input))
        .or_else(|| detect_quadratic(&input))
        .or_else(|| detect_alt_add_sub(&input))
        .or_else(|| detect_alt_doubling(&input))
        .or_else(|| detect_interleaved_aps(&input))
        .or_else(|| detect_interleaved_mixed(&input))
        .or_else(|| detect_fibonacci(&input))
        .or_else(|| detect_primes(&input))
        .or_else(|| detect_digit_product(&input))
        .or_else(|| detect_repeating_diff(&input))
        .or_else(|| detect_power_steps(&input));

    let Some(Detection { key, next, confidence }) = detection else {
        trace!(len = seq.len(), "no pattern matched");
        return ClassificationResult::unknown(CONFIDENCE_UNKNOWN);
    };

    let evidence = evidence_text(seq, &key);
    let evidence_text = match next {
        Some(v) => with_answer(&evidence, v, AskMode::Next, None),
        None => evidence,
    };
    trace!(kind = %key.kind(), confidence, "classified sequence");
    ClassificationResult {
        label: key.label(),
        recognition_hint: recognition_hint(&key).to_string(),
        evidence_text,
        predicted_value: next,
        confidence,
        pattern_key: key,
    }
}

// ── 1. arithmetic ────────────────────────────────────────────────────────────

fn detect_arithmetic<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    if !all_equal(&input.diffs) {
        return None;
    }
    let difference = *input.diffs.first()?;
    Some(Detection::new(
        PatternKey::Arithmetic { difference },
        input.last().checked_add(difference),
        CONFIDENCE_ARITHMETIC,
    ))
}

// ── 2. geometric ─────────────────────────────────────────────────────────────

enum Ratio {
    Integer(i64),
    Fraction(f64),
}

fn constant_ratio<T: SeqValue>(input: &Input<'_, T>) -> Option<Ratio> {
    let n = input.seq.len();
    if let Some(ints) = &input.ints {
        if ints[..n - 1].iter().any(|&v| v == 0) {
            return None;
        }
        let proportional = ints
            .windows(3)
            .all(|w| w[0] as i128 * w[2] as i128 == w[1] as i128 * w[1] as i128);
        if !proportional {
            return None;
        }
        return Some(if ints[1] % ints[0] == 0 {
            Ratio::Integer(ints[1] / ints[0])
        } else {
            Ratio::Fraction(ints[1] as f64 / ints[0] as f64)
        });
    }

    let values: Vec<f64> = input.seq.iter().map(|v| v.to_f64()).collect();
    if values[..n - 1].iter().any(|&v| v == 0.0) {
        return None;
    }
    let ratios: Vec<f64> = values.windows(2).map(|w| w[1] / w[0]).collect();
    if !all_equal(&ratios) {
        return None;
    }
    let r = ratios[0];
    Some(if (r - r.round()).abs() <= REAL_TOLERANCE {
        Ratio::Integer(r.round() as i64)
    } else {
        Ratio::Fraction(r)
    })
}

fn detect_geometric<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    let last = input.last();
    match constant_ratio(input)? {
        Ratio::Integer(ratio) => Some(Detection::new(
            PatternKey::Geometric { ratio },
            last.checked_mul(T::from_i64(ratio)),
            CONFIDENCE_GEOMETRIC,
        )),
        Ratio::Fraction(ratio) => Some(Detection::new(
            PatternKey::GeometricFractional { ratio },
            Some(T::from_f64(last.to_f64() * ratio)),
            CONFIDENCE_GEOMETRIC_FRACTIONAL,
        )),
    }
}

// ── 3. pure power ────────────────────────────────────────────────────────────

/// `a(n) = (n + offset)^degree + constant`, `n` counted from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PowerFit {
    pub degree: u32,
    pub offset: i64,
    pub constant: i64,
}

impl PowerFit {
    pub fn value_at(&self, position: usize) -> Option<i64> {
        let base = i64::try_from(position).ok()?.checked_add(self.offset)?;
        checked_pow(base, self.degree)?.checked_add(self.constant)
    }
}

/// First `(offset, degree)` in search order that reproduces every value.
pub(crate) fn pure_power_fit(ints: &[i64]) -> Option<PowerFit> {
    let first = *ints.first()?;
    for offset in POWER_OFFSETS {
        for degree in POWER_DEGREES {
            let Some(head) = checked_pow(1 + offset, degree) else { continue };
            let Some(constant) = first.checked_sub(head) else { continue };
            let fit = PowerFit { degree, offset, constant };
            let matches = ints
                .iter()
                .enumerate()
                .all(|(i, &v)| fit.value_at(i + 1) == Some(v));
            if matches {
                return Some(fit);
            }
        }
    }
    None
}

fn detect_pure_power<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    let ints = input.ints.as_ref()?;
    let fit = pure_power_fit(ints)?;
    Some(Detection::new(
        PatternKey::PolyK {
            degree: fit.degree,
            offset: Some(fit.offset),
            constant: Some(T::from_i64(fit.constant)),
        },
        fit.value_at(ints.len() + 1).map(T::from_i64),
        CONFIDENCE_PURE_POWER,
    ))
}

// ── 4. general polynomial ────────────────────────────────────────────────────

fn detect_polynomial<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    let table = build_table(input.seq);
    let degree = table.degree();
    if degree < 3 {
        return None;
    }
    Some(Detection::new(
        PatternKey::PolyK { degree: u32::try_from(degree).ok()?, offset: None, constant: None },
        table.extrapolate_next(),
        CONFIDENCE_POLYNOMIAL,
    ))
}

// ── 5. quadratic / polygonal ─────────────────────────────────────────────────

fn isqrt(x: i64) -> Option<i64> {
    if x < 0 {
        return None;
    }
    let mut r = (x as f64).sqrt() as i64;
    while r > 0 && r.checked_mul(r)? > x {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1)? <= x {
        r += 1;
    }
    Some(r)
}

/// `m` with `m^2 == x`.
fn square_index(x: i64) -> Option<i64> {
    isqrt(x).filter(|&m| m * m == x)
}

/// Triangular when the differences are consecutive positive integers.
/// Square when the differences are consecutive odd numbers, or when the
/// first five terms are perfect squares. The index is the `n` of the first
/// term, read off the first difference when the terms step through `n` one
/// at a time.
fn polygonal_shape(ints: &[i64]) -> Option<(PolygonShape, i64)> {
    let d: Vec<i64> = ints.windows(2).map(|w| w[1] - w[0]).collect();
    if d.len() < 3 {
        return None;
    }
    let d0 = d[0];
    let steps_by = |inc: i64| d.windows(2).all(|w| w[1] - w[0] == inc);

    if steps_by(1) && d0 > 0 {
        return Some((PolygonShape::Triangular, d0 - 1));
    }
    if steps_by(2) && d0 % 2 != 0 {
        return Some((PolygonShape::Square, (d0 - 1) / 2));
    }
    let head = &ints[..ints.len().min(5)];
    if head.iter().all(|&v| square_index(v).is_some()) {
        return Some((PolygonShape::Square, square_index(ints[0])?));
    }
    None
}

fn detect_quadratic<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    let dd = differences(&input.diffs)?;
    if !is_constant(&dd) {
        return None;
    }
    let second_diff = dd[dd.len() - 1];
    let next = input.last_diff().checked_add(second_diff).and_then(|d| input.last().checked_add(d));

    if let Some((shape, index)) = input.ints.as_deref().and_then(polygonal_shape) {
        return Some(Detection::new(PatternKey::Polygonal { shape, index }, next, CONFIDENCE_POLYGONAL));
    }
    Some(Detection::new(
        PatternKey::Quadratic { first_diff: input.diffs[0], second_diff },
        next,
        CONFIDENCE_QUADRATIC,
    ))
}

// ── 6-7. alternating ─────────────────────────────────────────────────────────

fn negate<T: SeqValue>(v: T) -> Option<T> {
    T::from_i64(0).checked_sub(v)
}

fn detect_alt_add_sub<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    let d = &input.diffs;
    if d.len() < 2 || !d.iter().enumerate().all(|(i, v)| v.approx_eq(d[i % 2])) {
        return None;
    }
    Some(Detection::new(
        PatternKey::AltAddSub { add: d[0], sub: negate(d[1])? },
        input.last().checked_add(d[d.len() % 2]),
        CONFIDENCE_ALT_ADD_SUB,
    ))
}

/// `d[i+1] == factor * d[i]` for every consecutive pair.
fn scales_by<T: SeqValue>(d: &[T], factor: i64) -> bool {
    let factor = T::from_i64(factor);
    d.windows(2)
        .all(|w| w[0].checked_mul(factor).is_some_and(|scaled| w[1].approx_eq(scaled)))
}

fn detect_alt_doubling<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    let d = &input.diffs;
    if d.len() < 2 || !scales_by(d, -2) {
        return None;
    }
    let next = input
        .last_diff()
        .checked_mul(T::from_i64(-2))
        .and_then(|step| input.last().checked_add(step));
    Some(Detection::new(PatternKey::AltDoubling { first_delta: d[0] }, next, CONFIDENCE_ALT_DOUBLING))
}

// ── 8-9. interleaved ─────────────────────────────────────────────────────────

/// Values at indices `first`, `first + 2`, ...
fn every_other<T: Copy>(seq: &[T], first: usize) -> Vec<T> {
    seq.iter().skip(first).step_by(2).copied().collect()
}

fn detect_interleaved_aps<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    let odd = every_other(input.seq, 0);
    let even = every_other(input.seq, 1);
    if odd.len() < 2 || even.is_empty() {
        return None;
    }
    let odd_diffs = differences(&odd)?;
    let even_diffs = differences(&even)?;
    if !all_equal(&odd_diffs) || !all_equal(&even_diffs) {
        return None;
    }
    let zero = T::from_i64(0);
    let odd_delta = odd_diffs.last().copied().unwrap_or(zero);
    let even_delta = even_diffs.last().copied().unwrap_or(zero);
    let next = if input.seq.len() % 2 == 0 {
        odd[odd.len() - 1].checked_add(odd_delta)
    } else {
        even[even.len() - 1].checked_add(even_delta)
    };
    Some(Detection::new(
        PatternKey::InterleavedTwoAps { odd_delta, even_delta },
        next,
        CONFIDENCE_INTERLEAVED_APS,
    ))
}

fn detect_interleaved_mixed<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    let odd = every_other(input.seq, 0);
    let even = every_other(input.seq, 1);
    if odd.len() < 3 || even.len() < 2 {
        return None;
    }

    let fit = exact_integers(&odd).and_then(|ints| pure_power_fit(&ints));
    let odd_table = build_table(&odd);
    let odd_degree = match fit {
        Some(fit) => fit.degree as usize,
        None => odd_table.degree(),
    };
    if odd_degree < 3 {
        return None;
    }

    let even_diffs = differences(&even)?;
    let even_mode = if all_equal(&even_diffs) {
        EvenMode::Arithmetic
    } else if even_diffs.len() >= 2 && scales_by(&even_diffs, 2) {
        EvenMode::Doubling
    } else {
        return None;
    };

    let next = if input.seq.len() % 2 == 1 {
        let step = even_diffs[even_diffs.len() - 1];
        let step = match even_mode {
            EvenMode::Arithmetic => Some(step),
            EvenMode::Doubling => step.checked_mul(T::from_i64(2)),
        };
        step.and_then(|s| even[even.len() - 1].checked_add(s))
    } else {
        match fit {
            Some(fit) => fit.value_at(odd.len() + 1).map(T::from_i64),
            None => odd_table.extrapolate_next(),
        }
    };
    Some(Detection::new(
        PatternKey::InterleavedMixedPoly { odd_degree: u32::try_from(odd_degree).ok()?, even_mode },
        next,
        CONFIDENCE_INTERLEAVED_MIXED,
    ))
}

// ── 10-12. recursive rules ───────────────────────────────────────────────────

fn detect_fibonacci<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    let s = input.seq;
    let sums = s
        .windows(3)
        .all(|w| w[0].checked_add(w[1]).is_some_and(|sum| w[2].approx_eq(sum)));
    if !sums {
        return None;
    }
    Some(Detection::new(
        PatternKey::FibonacciLike { seeds: [s[0], s[1]] },
        s[s.len() - 2].checked_add(input.last()),
        CONFIDENCE_FIBONACCI,
    ))
}

fn detect_primes<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    let ints = input.ints.as_ref()?;
    if !ints.iter().all(|&v| is_prime(v)) {
        return None;
    }
    let next = next_prime(ints[ints.len() - 1]).map(T::from_i64);
    Some(Detection::new(PatternKey::Primes, next, CONFIDENCE_PRIMES))
}

fn detect_digit_product<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    let ints = input.ints.as_ref()?;
    if !ints.windows(2).all(|w| w[1] == digit_product(w[0])) {
        return None;
    }
    let next = T::from_i64(digit_product(ints[ints.len() - 1]));
    Some(Detection::new(PatternKey::DigitProduct, Some(next), CONFIDENCE_DIGIT_PRODUCT))
}

// ── 13-14. difference patterns ───────────────────────────────────────────────

/// Smallest period with at least one and a half visible cycles.
pub(crate) fn repeating_period<T: SeqValue>(d: &[T]) -> Option<usize> {
    PERIODS.into_iter().find(|&p| {
        2 * d.len() >= 3 * p && (0..d.len() - p).all(|i| d[i].approx_eq(d[i + p]))
    })
}

fn detect_repeating_diff<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    let d = &input.diffs;
    let period = repeating_period(d)?;
    Some(Detection::new(
        PatternKey::RepeatingDiff { pattern: d[..period].to_vec(), period },
        input.last().checked_add(d[d.len() % period]),
        CONFIDENCE_REPEATING_DIFF,
    ))
}

fn detect_power_steps<T: SeqValue>(input: &Input<'_, T>) -> Option<Detection<T>> {
    let d = &input.diffs;
    if d.len() >= 2 && scales_by(d, 2) {
        let next = input
            .last_diff()
            .checked_mul(T::from_i64(2))
            .and_then(|step| input.last().checked_add(step));
        return Some(Detection::new(
            PatternKey::PowerSteps { steps: StepKind::Doubling },
            next,
            CONFIDENCE_POWER_STEPS,
        ));
    }
    let squares = d.len() >= 3
        && d.iter().enumerate().all(|(i, v)| {
            let k = i as i64 + 1;
            v.approx_eq(T::from_i64(k * k))
        });
    if squares {
        let k = d.len() as i64 + 1;
        return Some(Detection::new(
            PatternKey::PowerSteps { steps: StepKind::Squares },
            input.last().checked_add(T::from_i64(k * k)),
            CONFIDENCE_POWER_STEPS,
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence_engine::models::PatternKind;

    // ── degenerate input ─────────────────────────────────────────────────────

    #[test]
    fn short_or_oversized_input_is_unknown_with_zero_confidence() {
        let r = classify_sequence(&[1i64, 2]);
        assert_eq!(r.kind(), PatternKind::Unknown);
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.predicted_value, None);

        let r = classify_sequence(&[1i64, 2_000_000_000, 3]);
        assert_eq!(r.kind(), PatternKind::Unknown);
        assert_eq!(r.confidence, 0.0);

        let r = classify_sequence(&[1.0f64, f64::NAN, 3.0]);
        assert_eq!(r.confidence, 0.0);
    }

    #[test]
    fn unmatched_input_is_unknown_with_low_confidence() {
        let r = classify_sequence(&[4i64, 9, 1, 7, 2, 8]);
        assert_eq!(r.kind(), PatternKind::Unknown);
        assert_eq!(r.confidence, CONFIDENCE_UNKNOWN);
        assert!(r.evidence_text.is_empty());
    }

    // ── concrete sequences ───────────────────────────────────────────────────

    #[test]
    fn arithmetic_wins_first() {
        let r = classify_sequence(&[3i64, 8, 13, 18, 23, 28]);
        assert_eq!(r.pattern_key, PatternKey::Arithmetic { difference: 5 });
        assert_eq!(r.predicted_value, Some(33));
        assert_eq!(r.confidence, CONFIDENCE_ARITHMETIC);
        assert!(r.evidence_text.ends_with("-> next = 33"));
    }

    #[test]
    fn geometric_integer_ratio() {
        let r = classify_sequence(&[2i64, 6, 18, 54, 162]);
        assert_eq!(r.pattern_key, PatternKey::Geometric { ratio: 3 });
        assert_eq!(r.predicted_value, Some(486));
        assert_eq!(r.confidence, CONFIDENCE_GEOMETRIC);
    }

    #[test]
    fn geometric_negative_ratio() {
        let r = classify_sequence(&[3i64, -6, 12, -24, 48]);
        assert_eq!(r.pattern_key, PatternKey::Geometric { ratio: -2 });
        assert_eq!(r.predicted_value, Some(-96));
    }

    #[test]
    fn geometric_fractional_on_both_domains() {
        let r = classify_sequence(&[2.0f64, 5.0, 12.5, 31.25]);
        assert_eq!(r.kind(), PatternKind::GeometricFractional);
        assert_eq!(r.confidence, CONFIDENCE_GEOMETRIC_FRACTIONAL);
        assert!((r.predicted_value.unwrap_or(f64::NAN) - 78.125).abs() < 1e-9);

        let r = classify_sequence(&[8i64, 12, 18, 27]);
        assert_eq!(r.pattern_key, PatternKey::GeometricFractional { ratio: 1.5 });
        assert_eq!(r.predicted_value, Some(41));
    }

    #[test]
    fn pure_power_with_offset_and_constant() {
        let seq: Vec<i64> = (1..=6).map(|n: i64| (n + 1).pow(3) - 4).collect();
        let r = classify_sequence(&seq);
        assert_eq!(
            r.pattern_key,
            PatternKey::PolyK { degree: 3, offset: Some(1), constant: Some(-4) }
        );
        assert_eq!(r.predicted_value, Some(8i64.pow(3) - 4));
        assert_eq!(r.confidence, CONFIDENCE_PURE_POWER);
    }

    #[test]
    fn general_cubic_uses_difference_table() {
        let seq: Vec<i64> = (1..=6).map(|n: i64| 2 * n.pow(3) + n).collect();
        let r = classify_sequence(&seq);
        assert_eq!(r.pattern_key, PatternKey::PolyK { degree: 3, offset: None, constant: None });
        assert_eq!(r.predicted_value, Some(2 * 343 + 7));
        assert_eq!(r.confidence, CONFIDENCE_POLYNOMIAL);
    }

    #[test]
    fn squares_are_polygonal() {
        let r = classify_sequence(&[1i64, 4, 9, 16, 25]);
        assert_eq!(r.pattern_key, PatternKey::Polygonal { shape: PolygonShape::Square, index: 1 });
        assert_eq!(r.predicted_value, Some(36));
        assert_eq!(r.confidence, CONFIDENCE_POLYGONAL);
    }

    #[test]
    fn triangular_numbers_are_polygonal() {
        let r = classify_sequence(&[6i64, 10, 15, 21, 28]);
        assert_eq!(r.pattern_key, PatternKey::Polygonal { shape: PolygonShape::Triangular, index: 3 });
        assert_eq!(r.predicted_value, Some(36));
    }

    #[test]
    fn odd_step_differences_are_squares() {
        let r = classify_sequence(&[2i64, 5, 10, 17, 26]);
        assert_eq!(r.pattern_key, PatternKey::Polygonal { shape: PolygonShape::Square, index: 1 });
        assert_eq!(r.predicted_value, Some(37));
        assert_eq!(r.confidence, CONFIDENCE_POLYGONAL);
    }

    #[test]
    fn unit_step_differences_are_triangular() {
        let r = classify_sequence(&[3i64, 5, 8, 12, 17]);
        assert_eq!(r.pattern_key, PatternKey::Polygonal { shape: PolygonShape::Triangular, index: 1 });
        assert_eq!(r.predicted_value, Some(23));
        assert_eq!(r.confidence, CONFIDENCE_POLYGONAL);
    }

    #[test]
    fn spaced_squares_are_polygonal() {
        let r = classify_sequence(&[1i64, 9, 25, 49, 81]);
        assert_eq!(r.pattern_key, PatternKey::Polygonal { shape: PolygonShape::Square, index: 1 });
        assert_eq!(r.predicted_value, Some(121));
    }

    #[test]
    fn even_step_quadratic_stays_quadratic() {
        let r = classify_sequence(&[1i64, 3, 7, 13, 21]);
        assert_eq!(r.pattern_key, PatternKey::Quadratic { first_diff: 2, second_diff: 2 });
        assert_eq!(r.confidence, CONFIDENCE_QUADRATIC);
    }

    #[test]
    fn alternating_add_and_subtract() {
        let r = classify_sequence(&[10i64, 15, 12, 17, 14, 19]);
        assert_eq!(r.pattern_key, PatternKey::AltAddSub { add: 5, sub: 3 });
        assert_eq!(r.predicted_value, Some(16));
    }

    #[test]
    fn alternating_doubling_steps() {
        let r = classify_sequence(&[20i64, 23, 17, 29, 5, 53]);
        assert_eq!(r.pattern_key, PatternKey::AltDoubling { first_delta: 3 });
        assert_eq!(r.predicted_value, Some(53 - 96));
    }

    #[test]
    fn two_interleaved_progressions() {
        let r = classify_sequence(&[1i64, 20, 3, 17, 5, 14, 7]);
        assert_eq!(r.pattern_key, PatternKey::InterleavedTwoAps { odd_delta: 2, even_delta: -3 });
        assert_eq!(r.predicted_value, Some(11));
    }

    #[test]
    fn interleaved_cubes_and_progression() {
        // odd: 1, 8, 27, 64 ; even: 10, 15, 20
        let r = classify_sequence(&[1i64, 10, 8, 15, 27, 20, 64]);
        assert_eq!(
            r.pattern_key,
            PatternKey::InterleavedMixedPoly { odd_degree: 3, even_mode: EvenMode::Arithmetic }
        );
        assert_eq!(r.predicted_value, Some(25));
        assert_eq!(r.confidence, CONFIDENCE_INTERLEAVED_MIXED);
    }

    #[test]
    fn fibonacci_like() {
        let r = classify_sequence(&[1i64, 1, 2, 3, 5, 8]);
        assert_eq!(r.pattern_key, PatternKey::FibonacciLike { seeds: [1, 1] });
        assert_eq!(r.predicted_value, Some(13));
        assert_eq!(r.confidence, CONFIDENCE_FIBONACCI);
    }

    #[test]
    fn consecutive_primes() {
        let r = classify_sequence(&[2i64, 3, 5, 7, 11, 13]);
        assert_eq!(r.pattern_key, PatternKey::Primes);
        assert_eq!(r.predicted_value, Some(17));

        // Differences 4, 2, 4, 2 are caught earlier as alternating.
        let r = classify_sequence(&[7i64, 11, 13, 17, 19]);
        assert_eq!(r.kind(), PatternKind::AltAddSub);
    }

    #[test]
    fn digit_products() {
        let r = classify_sequence(&[99i64, 81, 8, 8, 8]);
        assert_eq!(r.pattern_key, PatternKey::DigitProduct);
        assert_eq!(r.predicted_value, Some(8));
        assert_eq!(r.confidence, CONFIDENCE_DIGIT_PRODUCT);

        let r = classify_sequence(&[3456i64, 360, 0, 0, 0]);
        assert_eq!(r.pattern_key, PatternKey::DigitProduct);
    }

    #[test]
    fn period_three_differences() {
        // diffs 2, 3, 7, 2, 3
        let r = classify_sequence(&[5i64, 7, 10, 17, 19, 22]);
        assert_eq!(r.pattern_key, PatternKey::RepeatingDiff { pattern: vec![2, 3, 7], period: 3 });
        assert_eq!(r.predicted_value, Some(29));
        assert_eq!(r.confidence, CONFIDENCE_REPEATING_DIFF);
    }

    #[test]
    fn period_needs_one_and_a_half_cycles() {
        assert_eq!(repeating_period(&[2i64, 3, 7, 2, 3]), Some(3));
        assert_eq!(repeating_period(&[2i64, 3, 7, 2]), None);
    }

    #[test]
    fn doubling_steps() {
        let r = classify_sequence(&[3i64, 4, 6, 10, 18]);
        assert_eq!(r.pattern_key, PatternKey::PowerSteps { steps: StepKind::Doubling });
        assert_eq!(r.predicted_value, Some(34));
    }

    #[test]
    fn square_steps_are_a_cubic() {
        let r = classify_sequence(&[2i64, 3, 7, 16, 32]);
        assert_eq!(r.pattern_key, PatternKey::PolyK { degree: 3, offset: None, constant: None });
        assert_eq!(r.predicted_value, Some(57));

        let seq = [2i64, 3, 7, 16];
        let input = Input { seq: &seq, diffs: vec![1, 4, 9], ints: Some(seq.to_vec()) };
        let d = detect_power_steps(&input).map(|d| (d.key, d.next));
        assert_eq!(d, Some((PatternKey::PowerSteps { steps: StepKind::Squares }, Some(32))));
    }

    #[test]
    fn integral_reals_classify_like_integers() {
        let r = classify_sequence(&[1.0f64, 4.0, 9.0, 16.0, 25.0]);
        assert_eq!(r.kind(), PatternKind::Polygonal);
        assert_eq!(r.predicted_value, Some(36.0));
    }

    #[test]
    fn pure_power_fit_search_order() {
        let fit = pure_power_fit(&[1, 8, 27]);
        assert_eq!(fit, Some(PowerFit { degree: 3, offset: 0, constant: 0 }));
        assert_eq!(fit.and_then(|f| f.value_at(4)), Some(64));
        assert_eq!(pure_power_fit(&[1, 4, 9]), None);
    }
}
