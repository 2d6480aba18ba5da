//! Multiple-choice options: the correct value plus plausible wrong values.
//!
//! Wrong values come from three sources, in this order: fixed offsets scaled
//! to the size of the answer, mistakes typical for the pattern (continuing
//! with the wrong factor, adding the wrong pair of Fibonacci terms, ...),
//! and random offsets as a top-up. Options are kept distinct under
//! [`normalize_answer`], so no two of them read the same to the learner.

use rand::{seq::SliceRandom, Rng};

use crate::sequence_engine::{
    models::{GenerationResult, PatternKind},
    numeric::{digits, SeqValue},
};

pub const DEFAULT_CHOICES: usize = 4;

/// Multiples of the base step tried on both sides of the answer.
const OFFSET_MULTIPLES: [i64; 5] = [1, 2, 3, 5, 8];
/// Multiples of the unrounded base step for answers with a fractional factor.
const FRACTIONAL_OFFSET_MULTIPLES: [f64; 5] = [1.0, 1.5, 2.0, 2.5, 5.0];
/// Initial half-width of the random top-up window.
const TOP_UP_SPREAD: i64 = 15;
/// Random draws per window size before the window is doubled.
const DRAWS_PER_SPREAD: usize = 32;

/// Lowercase, trim, collapse internal whitespace and read `,` as `.`.
pub fn normalize_answer(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(',', ".")
        .to_lowercase()
}

pub fn answers_match(submitted: &str, expected: &str) -> bool {
    normalize_answer(submitted) == normalize_answer(expected)
}

/// Option texts in display form.
pub fn choice_labels<T: SeqValue>(choices: &[T]) -> Vec<String> {
    choices.iter().map(|v| v.render()).collect()
}

/// Wrong values in insertion order, unique by normalised text.
struct Candidates<T> {
    correct_text: String,
    seen: Vec<String>,
    values: Vec<T>,
}

impl<T: SeqValue> Candidates<T> {
    fn new(correct: T) -> Self {
        Candidates { correct_text: normalize_answer(&correct.render()), seen: Vec::new(), values: Vec::new() }
    }

    fn push(&mut self, candidate: Option<T>) {
        let Some(v) = candidate else { return };
        if !v.within_cap() {
            return;
        }
        let text = normalize_answer(&v.render());
        if text == self.correct_text || self.seen.contains(&text) {
            return;
        }
        self.seen.push(text);
        self.values.push(v);
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}

fn offset<T: SeqValue>(base: T, by: i64) -> Option<T> {
    base.checked_add(T::from_i64(by))
}

/// `k` distinct options for `result`, drawn from `rng`.
pub fn make_choices_with_rng<T: SeqValue, R: Rng>(result: &GenerationResult<T>, k: usize, rng: &mut R) -> Vec<T> {
    choices_for(result.pattern_key.kind(), &result.sequence, result.answer, k, rng)
}

/// Core of the option builder; usable without a full result.
pub fn choices_for<T: SeqValue, R: Rng>(kind: PatternKind, seq: &[T], correct: T, k: usize, rng: &mut R) -> Vec<T> {
    let k = k.max(1);
    let mut candidates = Candidates::new(correct);

    if kind == PatternKind::GeometricFractional {
        let c = correct.to_f64();
        let step = (c.abs() / 20.0).max(1.0);
        for m in FRACTIONAL_OFFSET_MULTIPLES {
            candidates.push(Some(T::from_f64(c + m * step)));
            candidates.push(Some(T::from_f64(c - m * step)));
        }
    } else {
        let step = T::from_f64((correct.to_f64().abs() / 20.0).floor().max(1.0));
        for m in OFFSET_MULTIPLES {
            let delta = step.checked_mul(T::from_i64(m));
            candidates.push(delta.and_then(|d| correct.checked_add(d)));
            candidates.push(delta.and_then(|d| correct.checked_sub(d)));
        }
    }

    pattern_mistakes(kind, seq, correct, &mut candidates);

    let wanted = k - 1;
    let mut spread = TOP_UP_SPREAD;
    let mut draws = 0;
    while candidates.len() < wanted {
        let by = rng.gen_range(-spread..=spread);
        if by != 0 {
            candidates.push(offset(correct, by));
        }
        draws += 1;
        if draws % DRAWS_PER_SPREAD == 0 {
            spread = spread.saturating_mul(2);
        }
    }

    let mut wrong = candidates.values;
    wrong.shuffle(rng);
    wrong.truncate(wanted);
    wrong.push(correct);
    wrong.shuffle(rng);
    wrong
}

fn pattern_mistakes<T: SeqValue>(kind: PatternKind, seq: &[T], correct: T, out: &mut Candidates<T>) {
    let n = seq.len();
    let Some(&last) = seq.last() else { return };
    let before = if n >= 2 { Some(seq[n - 2]) } else { None };

    match kind {
        PatternKind::Arithmetic | PatternKind::Quadratic | PatternKind::AltAddSub | PatternKind::RepeatingDiff => {
            if let Some(diff) = before.and_then(|b| last.checked_sub(b)) {
                out.push(last.checked_add(diff));
                out.push(last.checked_sub(diff));
            }
        }
        PatternKind::Geometric => {
            let ratio = before.filter(|b| b.to_f64() != 0.0).map(|b| (last.to_f64() / b.to_f64()).round());
            if let Some(r) = ratio.filter(|r| r.is_finite()) {
                let r = r as i64;
                for factor in [r, r.saturating_add(1), r.saturating_sub(1).max(1)] {
                    out.push(last.checked_mul(T::from_i64(factor)));
                }
            }
        }
        PatternKind::GeometricFractional => {
            let ratio = before.filter(|b| b.to_f64() != 0.0).map(|b| last.to_f64() / b.to_f64());
            if let Some(r) = ratio.filter(|r| r.is_finite()) {
                let last = last.to_f64();
                // Factor slightly off, half a unit too high, half a unit too low.
                for factor in [r * 0.9, r + 0.5, (r - 0.5).max(0.1)] {
                    out.push(Some(T::from_f64(last * factor)));
                }
            }
        }
        PatternKind::FibonacciLike => {
            out.push(last.checked_add(last));
            let third_last = if n >= 3 { seq[n - 3] } else { before.unwrap_or(last) };
            out.push(last.checked_add(third_last));
        }
        PatternKind::Polygonal | PatternKind::PowerSteps => {
            out.push(offset(correct, 2));
            out.push(offset(correct, -2));
        }
        PatternKind::Primes => {
            out.push(offset(correct, 1));
            out.push(offset(correct, 2));
        }
        PatternKind::DigitProduct => {
            if let Some(value) = last.to_exact_i64() {
                let ds = digits(value);
                // Forgot the leading digit.
                if ds.len() >= 2 {
                    out.push(Some(T::from_i64(ds[1..].iter().product())));
                }
                // Misread the leading digit as one higher.
                let bumped: i64 = ds
                    .iter()
                    .enumerate()
                    .map(|(i, &d)| if i == 0 && d < 9 { d + 1 } else { d })
                    .product();
                out.push(Some(T::from_i64(bumped)));
            }
        }
        _ => {}
    }
}
