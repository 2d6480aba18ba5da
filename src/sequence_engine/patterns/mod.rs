//! Sequence generators, grouped by family.
//!
//! Every generator is split in two: a pure builder (`*_terms`) that turns
//! parameters into the visible terms plus the ground-truth next value, and a
//! `draw_*` function that picks parameters for a difficulty. [`generate`]
//! runs the draw inside a bounded retry loop and only accepts a sequence the
//! classifier recognises as the generator's own pattern, with the same next
//! value. When the budget runs out, fixed small parameters are used instead.
//!
//! All builders share the signature style
//!
//! ```ignore
//! pub(crate) fn draw_<name><R: Rng>(
//!     rng: &mut R,
//!     difficulty: Difficulty,
//! ) -> Result<RawSequence<i64>, GenerationError>
//! ```

/// arithmetic, geometric, geometric_fractional
pub mod linear;
/// increasing_diffs, quadratic, polygonal, poly_k
pub mod polynomial;
/// alt_add_sub, alt_doubling, interleaved_two_aps, interleaved_mixed_poly
pub mod alternating;
/// fibonacci_like, primes, digit_product, repeating_diff, power_steps
pub mod recursive;

use rand::Rng;
use tracing::{debug, error, warn};

use crate::sequence_engine::{
    classifier::classify_sequence,
    error::GenerationError,
    models::{Difficulty, GeneratorKind, PatternKey},
    numeric::{checked_pow, SeqValue},
    ranges::RangeProfile,
};

/// Draws per question before the fallback parameters are used.
pub(crate) const MAX_ATTEMPTS: usize = 48;

/// A generated sequence before an ask mode is applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSequence<T> {
    pub key: PatternKey<T>,
    pub label: String,
    pub terms: Vec<T>,
    /// The value that follows `terms` under the generating rule.
    pub next: T,
    /// How the rule works and how the next value follows from it.
    pub explanation: String,
}

impl<T: Copy> RawSequence<T> {
    pub(crate) fn new(key: PatternKey<T>, terms: Vec<T>, next: T, explanation: String) -> Self {
        RawSequence { label: key.label(), key, terms, next, explanation }
    }

    pub(crate) fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Re-express every value in another numeric type.
    pub fn convert<U: Copy>(self, f: impl Fn(T) -> U) -> RawSequence<U> {
        RawSequence {
            key: self.key.map(&f),
            label: self.label,
            terms: self.terms.into_iter().map(&f).collect(),
            next: f(self.next),
            explanation: self.explanation,
        }
    }
}

// ── capped arithmetic ────────────────────────────────────────────────────────

/// Accept a freshly computed value only if it exists and lies within the cap.
pub(crate) fn capped(exact: Option<i64>, approx: f64) -> Result<i64, GenerationError> {
    match exact {
        Some(v) if v.within_cap() => Ok(v),
        _ => Err(GenerationError::Overflow { value: approx }),
    }
}

pub(crate) fn add(a: i64, b: i64) -> Result<i64, GenerationError> {
    capped(a.checked_add(b), a as f64 + b as f64)
}

pub(crate) fn mul(a: i64, b: i64) -> Result<i64, GenerationError> {
    capped(a.checked_mul(b), a as f64 * b as f64)
}

pub(crate) fn pow(base: i64, exp: u32) -> Result<i64, GenerationError> {
    capped(checked_pow(base, exp), (base as f64).powi(exp as i32))
}

pub(crate) fn real_capped(v: f64) -> Result<f64, GenerationError> {
    if v.within_cap() {
        Ok(v)
    } else {
        Err(GenerationError::Overflow { value: v })
    }
}

/// `len` terms starting at `first`, each computed from its index and its
/// predecessor, plus the value the same rule gives at index `len`.
pub(crate) fn unfold(
    first: i64,
    len: usize,
    mut step: impl FnMut(usize, i64) -> Result<i64, GenerationError>,
) -> Result<(Vec<i64>, i64), GenerationError> {
    let mut terms = Vec::with_capacity(len);
    let mut current = capped(Some(first), first as f64)?;
    for i in 1..=len {
        terms.push(current);
        current = step(i, current)?;
    }
    Ok((terms, current))
}

/// Interleaved generators need an odd length so the next value belongs to
/// the even positions.
pub(crate) fn odd_length(len: usize) -> usize {
    let len = if len % 2 == 0 { len.saturating_sub(1) } else { len };
    len.max(5)
}

pub(crate) fn shortest_length(difficulty: Difficulty) -> usize {
    *RangeProfile::for_difficulty(difficulty).length.start()
}

// ── dispatch ─────────────────────────────────────────────────────────────────

/// Produce a sequence for `kind` that round-trips through the classifier.
pub(crate) fn generate<T: SeqValue, R: Rng>(
    rng: &mut R,
    kind: GeneratorKind,
    difficulty: Difficulty,
) -> RawSequence<T> {
    generate_within(rng, kind, difficulty, MAX_ATTEMPTS)
}

/// [`generate`] with an explicit attempt budget.
fn generate_within<T: SeqValue, R: Rng>(
    rng: &mut R,
    kind: GeneratorKind,
    difficulty: Difficulty,
    attempts: usize,
) -> RawSequence<T> {
    for attempt in 1..=attempts {
        match draw::<T, R>(rng, kind, difficulty).and_then(|raw| verify(kind, raw)) {
            Ok(raw) => return raw,
            Err(reason) => debug!(generator = %kind, attempt, %reason, "rejected draw"),
        }
    }
    warn!(generator = %kind, attempts, %difficulty, "retry budget exhausted, using fallback parameters");
    fallback::<T>(kind, difficulty).unwrap_or_else(|reason| {
        error!(generator = %kind, %reason, "fallback parameters failed");
        ramp(shortest_length(difficulty)).convert(T::from_i64)
    })
}

fn verify<T: SeqValue>(kind: GeneratorKind, raw: RawSequence<T>) -> Result<RawSequence<T>, GenerationError> {
    if let Some(v) = raw.terms.iter().chain(std::iter::once(&raw.next)).find(|v| !v.within_cap()) {
        return Err(GenerationError::Overflow { value: v.to_f64() });
    }
    let result = classify_sequence(&raw.terms);
    let found = result.kind();
    if !kind.accepts(found) {
        return Err(GenerationError::Mismatch { expected: kind.pattern_kind(), found });
    }
    match result.predicted_value {
        Some(p) if p.approx_eq(raw.next) => Ok(raw),
        predicted => Err(GenerationError::Prediction {
            expected: raw.next.to_f64(),
            predicted: predicted.map(|p| p.to_f64()),
        }),
    }
}

fn draw<T: SeqValue, R: Rng>(
    rng: &mut R,
    kind: GeneratorKind,
    difficulty: Difficulty,
) -> Result<RawSequence<T>, GenerationError> {
    let raw = match kind {
        GeneratorKind::GeometricFractional => {
            return linear::draw_geometric_fractional(rng, difficulty).map(|raw| raw.convert(T::from_f64));
        }
        GeneratorKind::Arithmetic           => linear::draw_arithmetic(rng, difficulty),
        GeneratorKind::Geometric            => linear::draw_geometric(rng, difficulty),
        GeneratorKind::IncreasingDiffs      => polynomial::draw_increasing_diffs(rng, difficulty),
        GeneratorKind::Quadratic            => polynomial::draw_quadratic(rng, difficulty),
        GeneratorKind::Polygonal            => polynomial::draw_polygonal(rng, difficulty),
        GeneratorKind::PolyK                => polynomial::draw_poly_k(rng, difficulty),
        GeneratorKind::AltAddSub            => alternating::draw_alt_add_sub(rng, difficulty),
        GeneratorKind::AltDoubling          => alternating::draw_alt_doubling(rng, difficulty),
        GeneratorKind::InterleavedTwoAps    => alternating::draw_interleaved_two_aps(rng, difficulty),
        GeneratorKind::InterleavedMixedPoly => alternating::draw_interleaved_mixed_poly(rng, difficulty),
        GeneratorKind::FibonacciLike        => recursive::draw_fibonacci(rng, difficulty),
        GeneratorKind::Primes               => recursive::draw_primes(rng, difficulty),
        GeneratorKind::DigitProduct         => recursive::draw_digit_product(rng, difficulty),
        GeneratorKind::RepeatingDiff        => recursive::draw_repeating_diff(rng, difficulty),
        GeneratorKind::PowerSteps           => recursive::draw_power_steps(rng, difficulty),
    }?;
    Ok(raw.convert(T::from_i64))
}

/// Fixed small parameters per generator; each is known to round-trip at
/// every difficulty.
pub(crate) fn fallback<T: SeqValue>(
    kind: GeneratorKind,
    difficulty: Difficulty,
) -> Result<RawSequence<T>, GenerationError> {
    let raw = match kind {
        GeneratorKind::GeometricFractional => {
            return linear::geometric_fractional_fallback(difficulty).map(|raw| raw.convert(T::from_f64));
        }
        GeneratorKind::Arithmetic           => linear::arithmetic_fallback(difficulty),
        GeneratorKind::Geometric            => linear::geometric_fallback(difficulty),
        GeneratorKind::IncreasingDiffs      => polynomial::increasing_diffs_fallback(difficulty),
        GeneratorKind::Quadratic            => polynomial::quadratic_fallback(difficulty),
        GeneratorKind::Polygonal            => polynomial::polygonal_fallback(difficulty),
        GeneratorKind::PolyK                => polynomial::poly_k_fallback(difficulty),
        GeneratorKind::AltAddSub            => alternating::alt_add_sub_fallback(difficulty),
        GeneratorKind::AltDoubling          => alternating::alt_doubling_fallback(difficulty),
        GeneratorKind::InterleavedTwoAps    => alternating::interleaved_two_aps_fallback(difficulty),
        GeneratorKind::InterleavedMixedPoly => alternating::interleaved_mixed_poly_fallback(difficulty),
        GeneratorKind::FibonacciLike        => recursive::fibonacci_fallback(difficulty),
        GeneratorKind::Primes               => recursive::primes_fallback(difficulty),
        GeneratorKind::DigitProduct         => recursive::digit_product_fallback(difficulty),
        GeneratorKind::RepeatingDiff        => recursive::repeating_diff_fallback(difficulty),
        GeneratorKind::PowerSteps           => recursive::power_steps_fallback(difficulty),
    }?;
    Ok(raw.convert(T::from_i64))
}

/// 1, 2, 3, ... Used only if a fallback itself cannot be built.
fn ramp(len: usize) -> RawSequence<i64> {
    let last = len as i64;
    RawSequence::new(
        PatternKey::Arithmetic { difference: 1 },
        (1..=last).collect(),
        last + 1,
        format!("Counting up by one. Next = {}.", last + 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const ALL_DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[test]
    fn every_fallback_round_trips() {
        for difficulty in ALL_DIFFICULTIES {
            for kind in GeneratorKind::INTEGER {
                let raw: RawSequence<i64> = match fallback(kind, difficulty) {
                    Ok(raw) => raw,
                    Err(e) => panic!("{kind} fallback failed at {difficulty}: {e}"),
                };
                assert!(verify(kind, raw).is_ok(), "{kind} fallback at {difficulty}");
            }
            let raw: RawSequence<f64> = match fallback(GeneratorKind::GeometricFractional, difficulty) {
                Ok(raw) => raw,
                Err(e) => panic!("fractional fallback failed at {difficulty}: {e}"),
            };
            assert!(verify(GeneratorKind::GeometricFractional, raw).is_ok());
        }
    }

    #[test]
    fn exhausted_budget_uses_the_fallback() {
        let mut rng = StdRng::seed_from_u64(3);
        for difficulty in ALL_DIFFICULTIES {
            for kind in GeneratorKind::INTEGER {
                let raw: RawSequence<i64> = generate_within(&mut rng, kind, difficulty, 0);
                assert_eq!(Ok(raw), fallback::<i64>(kind, difficulty), "{kind} at {difficulty}");
            }
            let raw: RawSequence<f64> = generate_within(&mut rng, GeneratorKind::GeometricFractional, difficulty, 0);
            assert_eq!(Ok(raw), fallback::<f64>(GeneratorKind::GeometricFractional, difficulty));
        }
    }

    #[test]
    fn generated_sequences_verify() {
        for seed in 0..20u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for difficulty in ALL_DIFFICULTIES {
                for kind in GeneratorKind::INTEGER {
                    let raw: RawSequence<i64> = generate(&mut rng, kind, difficulty);
                    let found = classify_sequence(&raw.terms).kind();
                    assert!(kind.accepts(found), "{kind} classified as {found} (seed {seed})");
                }
            }
        }
    }

    #[test]
    fn capped_arithmetic_rejects_out_of_range() {
        assert_eq!(add(999_999_999, 1), Ok(1_000_000_000));
        assert!(add(999_999_999, 2).is_err());
        assert!(mul(i64::MAX, 2).is_err());
        assert!(pow(10, 10).is_err());
        assert_eq!(pow(-3, 3), Ok(-27));
    }

    #[test]
    fn interleaved_lengths_are_odd() {
        assert_eq!(odd_length(5), 5);
        assert_eq!(odd_length(6), 5);
        assert_eq!(odd_length(8), 7);
        assert_eq!(odd_length(4), 5);
    }

    #[test]
    fn conversion_keeps_structure() {
        let raw = ramp(5).convert(|v| v as f64);
        assert_eq!(raw.terms, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(raw.next, 6.0);
        assert_eq!(raw.key, PatternKey::Arithmetic { difference: 1.0 });
    }
}
