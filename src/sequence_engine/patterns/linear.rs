use rand::Rng;

use crate::sequence_engine::{
    error::GenerationError,
    helpers::apply_delta_text,
    models::{Difficulty, PatternKey},
    numeric::SeqValue,
    patterns::{add, mul, real_capped, shortest_length, unfold, RawSequence},
    ranges::{random_sign, RangeProfile},
};

/// Non-integer ratios as `(numerator, denominator)`. The denominators are
/// powers of two, so every term is exact in binary floating point.
pub(crate) const FRACTIONS: [(i64, i64); 6] = [(3, 2), (5, 2), (7, 2), (5, 4), (9, 4), (7, 4)];

fn factor_text(r: i64) -> String {
    if r < 0 { format!("({r})") } else { r.to_string() }
}

// ── arithmetic ───────────────────────────────────────────────────────────────

pub(crate) fn arithmetic_terms(a0: i64, d: i64, len: usize) -> Result<RawSequence<i64>, GenerationError> {
    let (terms, next) = unfold(a0, len, |_, prev| add(prev, d))?;
    let last = terms.last().copied().unwrap_or(a0);
    let explanation = format!(
        "Arithmetic: every step changes the value by the same difference d = {d}. Next = {} = {next}.",
        apply_delta_text(last, d)
    );
    Ok(RawSequence::new(PatternKey::Arithmetic { difference: d }, terms, next, explanation))
}

pub(crate) fn draw_arithmetic<R: Rng>(rng: &mut R, difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    let len = profile.pick_length(rng);
    let a0 = profile.pick_start(rng);
    let d = random_sign(rng) * profile.pick_step(rng);
    arithmetic_terms(a0, d, len)
}

pub(crate) fn arithmetic_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    arithmetic_terms(*profile.start.start(), *profile.step.start(), shortest_length(difficulty))
}

// ── geometric ────────────────────────────────────────────────────────────────

pub(crate) fn geometric_terms(a0: i64, r: i64, len: usize) -> Result<RawSequence<i64>, GenerationError> {
    let (terms, next) = unfold(a0, len, |_, prev| mul(prev, r))?;
    let last = terms.last().copied().unwrap_or(a0);
    let explanation = format!(
        "Geometric (integer factor): every term is the previous one times r = {r}. Next = {last} * {} = {next}.",
        factor_text(r)
    );
    Ok(RawSequence::new(PatternKey::Geometric { ratio: r }, terms, next, explanation))
}

pub(crate) fn draw_geometric<R: Rng>(rng: &mut R, difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    let len = profile.pick_length(rng);
    let a0 = rng.gen_range(1..=(*profile.start.end() / 2).max(2));
    let r = random_sign(rng) * profile.pick_ratio(rng);
    geometric_terms(a0, r, len)
}

pub(crate) fn geometric_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    geometric_terms(1, 2, shortest_length(difficulty))
}

// ── geometric, fractional factor ─────────────────────────────────────────────

pub(crate) fn geometric_fractional_terms(
    a0: i64,
    (num, den): (i64, i64),
    len: usize,
) -> Result<RawSequence<f64>, GenerationError> {
    let ratio = num as f64 / den as f64;
    let first = real_capped(a0 as f64)?;
    let mut terms = Vec::with_capacity(len);
    let mut current = first;
    for _ in 0..len {
        terms.push(current);
        current = real_capped(current * ratio)?;
    }
    let last = terms.last().copied().unwrap_or(first);
    let explanation = format!(
        "Geometric (fractional factor): every term is the previous one times r = {num}/{den} = {}. Next = {} * {} = {}.",
        ratio.render(),
        last.render(),
        ratio.render(),
        current.render()
    );
    Ok(RawSequence::new(PatternKey::GeometricFractional { ratio }, terms, current, explanation))
}

pub(crate) fn draw_geometric_fractional<R: Rng>(
    rng: &mut R,
    difficulty: Difficulty,
) -> Result<RawSequence<f64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    let len = profile.pick_length(rng);
    let a0 = rng.gen_range(2..=20);
    let (num, den) = FRACTIONS[rng.gen_range(0..FRACTIONS.len())];
    let num = if rng.gen_range(0..6) == 0 { -num } else { num };
    geometric_fractional_terms(a0, (num, den), len)
}

pub(crate) fn geometric_fractional_fallback(difficulty: Difficulty) -> Result<RawSequence<f64>, GenerationError> {
    geometric_fractional_terms(2, (3, 2), shortest_length(difficulty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn arithmetic_from_parameters() {
        let raw = arithmetic_terms(3, 5, 6).expect("small values");
        assert_eq!(raw.terms, vec![3, 8, 13, 18, 23, 28]);
        assert_eq!(raw.next, 33);
        assert!(raw.explanation.ends_with("Next = 28 + 5 = 33."));

        let raw = arithmetic_terms(20, -4, 5).expect("small values");
        assert_eq!(raw.terms, vec![20, 16, 12, 8, 4]);
        assert!(raw.explanation.ends_with("Next = 4 - 4 = 0."));
    }

    #[test]
    fn geometric_from_parameters() {
        let raw = geometric_terms(2, 3, 5).expect("small values");
        assert_eq!(raw.terms, vec![2, 6, 18, 54, 162]);
        assert_eq!(raw.next, 486);
        assert_eq!(raw.key, PatternKey::Geometric { ratio: 3 });
    }

    #[test]
    fn geometric_overflow_is_reported() {
        assert!(geometric_terms(1000, 1000, 5).is_err());
    }

    #[test]
    fn fractional_terms_are_exact() {
        let raw = geometric_fractional_terms(4, (5, 2), 4).expect("small values");
        assert_eq!(raw.terms, vec![4.0, 10.0, 25.0, 62.5]);
        assert_eq!(raw.next, 156.25);
        assert!(raw.explanation.contains("r = 5/2 = 2.5"));
    }

    #[test]
    fn draws_respect_the_profile() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let raw = draw_arithmetic(&mut rng, Difficulty::Easy).expect("easy values are small");
            assert!((5..=6).contains(&raw.terms.len()));
            assert!((1..=15).contains(&raw.terms[0]));
            let d = raw.terms[1] - raw.terms[0];
            assert!((1..=7).contains(&d.abs()));

            let raw = draw_geometric_fractional(&mut rng, Difficulty::Hard).expect("hard values fit");
            assert!((7..=8).contains(&raw.terms.len()));
        }
    }
}
