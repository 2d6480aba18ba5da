use rand::Rng;

use crate::sequence_engine::{
    error::GenerationError,
    helpers::{apply_delta_text, signed},
    models::{Difficulty, PatternKey, StepKind},
    numeric::{digit_product, digits_text, is_prime, next_prime},
    patterns::{add, capped, pow, shortest_length, unfold, RawSequence},
    ranges::RangeProfile,
};

/// Largest step `repeating_diff` shrinks an overflowing step to.
const SHRUNK_STEP: i64 = 3;

// ── Fibonacci-like ───────────────────────────────────────────────────────────

pub(crate) fn fibonacci_terms(s0: i64, s1: i64, len: usize) -> Result<RawSequence<i64>, GenerationError> {
    let mut before = s0;
    let mut current = s1;
    let mut terms = vec![s0];
    for _ in 1..len {
        terms.push(current);
        let sum = add(before, current)?;
        before = current;
        current = sum;
    }
    let next = current;
    let explanation = format!(
        "Fibonacci-like: every term is the sum of the two before it. Next = {} + {before} = {next}.",
        next - before
    );
    Ok(RawSequence::new(PatternKey::FibonacciLike { seeds: [s0, s1] }, terms, next, explanation))
}

pub(crate) fn draw_fibonacci<R: Rng>(rng: &mut R, difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let len = RangeProfile::for_difficulty(difficulty).pick_length(rng);
    let s0 = rng.gen_range(1..=10);
    let s1 = rng.gen_range(1..=10);
    fibonacci_terms(s0, s1, len)
}

pub(crate) fn fibonacci_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    fibonacci_terms(1, 1, shortest_length(difficulty))
}

// ── primes ───────────────────────────────────────────────────────────────────

fn prime_after(n: i64) -> Result<i64, GenerationError> {
    let p = next_prime(n).ok_or(GenerationError::Overflow { value: n as f64 })?;
    capped(Some(p), p as f64)
}

/// Consecutive primes, starting at the first prime `>= start`.
pub(crate) fn primes_terms(start: i64, len: usize) -> Result<RawSequence<i64>, GenerationError> {
    let first = if is_prime(start) { start } else { prime_after(start)? };
    let (terms, next) = unfold(first, len, |_, prev| prime_after(prev))?;
    let explanation = format!(
        "Consecutive prime numbers starting at {first}. The first prime after {} is {next}.",
        terms.last().copied().unwrap_or(first)
    );
    Ok(RawSequence::new(PatternKey::Primes, terms, next, explanation))
}

pub(crate) fn draw_primes<R: Rng>(rng: &mut R, difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let len = RangeProfile::for_difficulty(difficulty).pick_length(rng);
    primes_terms(rng.gen_range(2..=40), len)
}

pub(crate) fn primes_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    primes_terms(2, shortest_length(difficulty))
}

// ── digit product ────────────────────────────────────────────────────────────

pub(crate) fn digit_product_terms(seed: i64, len: usize) -> Result<RawSequence<i64>, GenerationError> {
    let (terms, next) = unfold(seed, len, |_, prev| Ok(digit_product(prev)))?;
    let chain: Vec<String> = terms
        .windows(2)
        .take(3)
        .map(|w| format!("{} -> {} = {}", w[0], digits_text(w[0]), w[1]))
        .collect();
    let last = terms.last().copied().unwrap_or(seed);
    let explanation = format!(
        "Digit product: each term is the product of the digits of the previous term ({}). Next = {} = {next}.",
        chain.join("; "),
        digits_text(last)
    );
    Ok(RawSequence::new(PatternKey::DigitProduct, terms, next, explanation))
}

pub(crate) fn draw_digit_product<R: Rng>(rng: &mut R, difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let len = RangeProfile::for_difficulty(difficulty).pick_length(rng);
    digit_product_terms(rng.gen_range(1000..=999_999), len)
}

pub(crate) fn digit_product_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    digit_product_terms(3456, shortest_length(difficulty))
}

// ── repeating differences ────────────────────────────────────────────────────

/// Apply `pattern` cyclically from `a0`. A step that would leave the cap is
/// shrunk to at most 3 in the same direction instead.
pub(crate) fn repeating_diff_terms(pattern: &[i64], a0: i64, len: usize) -> Result<RawSequence<i64>, GenerationError> {
    let period = pattern.len();
    if period == 0 {
        return Err(GenerationError::Overflow { value: f64::NAN });
    }
    let step = |i: usize| pattern[(i - 1) % period];
    let (terms, next) = unfold(a0, len, |i, prev| {
        let d = step(i);
        add(prev, d).or_else(|_| add(prev, d.signum() * d.abs().min(SHRUNK_STEP)))
    })?;
    let next_step = step(len);
    let explanation = format!(
        "Repeating differences with period p = {period}: [{}]. Next step = {}, so next = {} = {next}.",
        pattern.iter().map(|&d| signed(d)).collect::<Vec<_>>().join(", "),
        signed(next_step),
        apply_delta_text(terms.last().copied().unwrap_or(a0), next_step)
    );
    let key = PatternKey::RepeatingDiff { pattern: pattern.to_vec(), period };
    Ok(RawSequence::new(key, terms, next, explanation))
}

/// Length that shows at least one and a half cycles of period `p`, capped at 8.
fn repeating_length(difficulty: Difficulty, p: usize) -> usize {
    let mut len = if difficulty == Difficulty::Hard { 7 } else { 6 };
    while 2 * (len - 1) < 3 * p && len < 8 {
        len += 1;
    }
    len
}

pub(crate) fn draw_repeating_diff<R: Rng>(rng: &mut R, difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    let hard = difficulty == Difficulty::Hard;
    let p = if hard { rng.gen_range(2..=4) } else { rng.gen_range(2..=3) };
    let len = repeating_length(difficulty, p);

    let base = match difficulty {
        Difficulty::Easy   => rng.gen_range(2..=5),
        Difficulty::Medium => rng.gen_range(3..=7),
        Difficulty::Hard   => rng.gen_range(4..=9),
    };
    let mut pattern: Vec<i64> = (0..p)
        .map(|i| {
            let jitter = if i > 0 { rng.gen_range(0..=1) } else { 0 };
            let v = base + jitter;
            let v = if hard && rng.gen_range(0..10) == 0 { -v } else { v };
            if v == 0 { 1 } else { v }
        })
        .collect();
    if pattern.iter().all(|&d| d <= 0) {
        pattern[0] = pattern[0].abs();
    }

    let a0 = profile.pick_start(rng).max(5);
    repeating_diff_terms(&pattern, a0, len)
}

pub(crate) fn repeating_diff_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    repeating_diff_terms(&[2, 3, 7], 5, repeating_length(difficulty, 3))
}

// ── power steps ──────────────────────────────────────────────────────────────

/// Step `i` (from 1) is `i^2` or `2^(i-1)`.
fn power_step(steps: StepKind, i: usize) -> Result<i64, GenerationError> {
    let exp = u32::try_from(i).map_err(|_| GenerationError::Overflow { value: f64::INFINITY })?;
    match steps {
        StepKind::Squares  => pow(i as i64, 2),
        StepKind::Doubling => pow(2, exp.saturating_sub(1)),
    }
}

pub(crate) fn power_steps_terms(steps: StepKind, a0: i64, len: usize) -> Result<RawSequence<i64>, GenerationError> {
    let (terms, next) = unfold(a0, len, |i, prev| add(prev, power_step(steps, i)?))?;
    let next_step = power_step(steps, len)?;
    let shape = match steps {
        StepKind::Squares  => "1, 4, 9, 16, ...",
        StepKind::Doubling => "1, 2, 4, 8, ...",
    };
    let explanation = format!("The steps are {shape}. Next step = {next_step}, so the next term is {next}.");
    Ok(RawSequence::new(PatternKey::PowerSteps { steps }, terms, next, explanation))
}

pub(crate) fn draw_power_steps<R: Rng>(rng: &mut R, difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    let len = profile.pick_length(rng);
    let steps = if rng.gen_bool(0.5) { StepKind::Squares } else { StepKind::Doubling };
    power_steps_terms(steps, profile.pick_start(rng), len)
}

pub(crate) fn power_steps_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    power_steps_terms(StepKind::Squares, *profile.start.start(), shortest_length(difficulty))
}
