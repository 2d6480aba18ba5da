use rand::Rng;

use crate::sequence_engine::{
    error::GenerationError,
    models::{Difficulty, PatternKey, PolygonShape},
    patterns::{add, mul, pow, shortest_length, unfold, RawSequence},
    ranges::RangeProfile,
};

/// Leading coefficients for the general quadratic; 1 is twice as likely.
const QUADRATIC_LEADS: [i64; 4] = [1, 1, 2, -1];

/// "+ 4" or "- 4".
fn plus_minus(v: i64) -> String {
    if v < 0 { format!("- {}", v.unsigned_abs()) } else { format!("+ {v}") }
}

fn position(n: usize) -> i64 {
    n as i64
}

// ── increasing differences ───────────────────────────────────────────────────

pub(crate) fn increasing_diffs_terms(
    a0: i64,
    step0: i64,
    inc: i64,
    len: usize,
) -> Result<RawSequence<i64>, GenerationError> {
    let diff = |i: usize| -> Result<i64, GenerationError> { add(step0, mul(position(i), inc)?) };
    let (terms, next) = unfold(a0, len, |i, prev| add(prev, diff(i - 1)?))?;
    let next_diff = diff(len.saturating_sub(1))?;
    let explanation = format!(
        "Increasing differences: the step starts at {step0} and grows by {inc} every time. \
         Next step = {next_diff}, so the next term is {next}."
    );
    Ok(RawSequence::new(PatternKey::Quadratic { first_diff: step0, second_diff: inc }, terms, next, explanation)
        .with_label("increasing differences"))
}

pub(crate) fn draw_increasing_diffs<R: Rng>(
    rng: &mut R,
    difficulty: Difficulty,
) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    let len = profile.pick_length(rng);
    let a0 = profile.pick_start(rng);
    let step0 = rng.gen_range(1..=(profile.max_step() / 2).max(1));
    let inc = rng.gen_range(1..=(profile.max_step() / 3).max(2));
    increasing_diffs_terms(a0, step0, inc, len)
}

pub(crate) fn increasing_diffs_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    increasing_diffs_terms(*profile.start.start(), 1, 2, shortest_length(difficulty))
}

// ── general quadratic ────────────────────────────────────────────────────────

pub(crate) fn quadratic_terms(a: i64, b: i64, c: i64, len: usize) -> Result<RawSequence<i64>, GenerationError> {
    let value = |n: usize| -> Result<i64, GenerationError> {
        let n = position(n);
        add(add(mul(a, mul(n, n)?)?, mul(b, n)?)?, c)
    };
    let terms = (1..=len).map(value).collect::<Result<Vec<_>, _>>()?;
    let next = value(len + 1)?;
    let first_diff = add(value(2)?, -value(1)?)?;
    let next_diff = add(next, -terms.last().copied().unwrap_or(next))?;
    let explanation = format!(
        "Quadratic: a(n) = {a}n^2 {}n {}, so the second differences are constant ({}). \
         Next step = {next_diff}, so the next term is {next}.",
        plus_minus(b),
        plus_minus(c),
        2 * a
    );
    Ok(RawSequence::new(PatternKey::Quadratic { first_diff, second_diff: 2 * a }, terms, next, explanation))
}

pub(crate) fn draw_quadratic<R: Rng>(rng: &mut R, difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    let len = profile.pick_length(rng);
    let a = QUADRATIC_LEADS[rng.gen_range(0..QUADRATIC_LEADS.len())];
    let b = rng.gen_range(-4..=4);
    let c = rng.gen_range(-9..=12);
    quadratic_terms(a, b, c, len)
}

pub(crate) fn quadratic_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    quadratic_terms(2, 1, 0, shortest_length(difficulty))
}

// ── polygonal numbers ────────────────────────────────────────────────────────

pub(crate) fn polygonal_terms(shape: PolygonShape, len: usize) -> Result<RawSequence<i64>, GenerationError> {
    let value = |n: usize| -> Result<i64, GenerationError> {
        let n = position(n);
        match shape {
            PolygonShape::Triangular => Ok(mul(n, n + 1)? / 2),
            PolygonShape::Square     => mul(n, n),
        }
    };
    let terms = (1..=len).map(value).collect::<Result<Vec<_>, _>>()?;
    let next = value(len + 1)?;
    let last = terms.last().copied().unwrap_or(next);
    let explanation = match shape {
        PolygonShape::Triangular => format!(
            "Triangular numbers: T(n) = n(n+1)/2. T({len}) = {last}, T({}) = {next}.",
            len + 1
        ),
        PolygonShape::Square => format!("Squares: S(n) = n^2. S({len}) = {last}, S({}) = {next}.", len + 1),
    };
    Ok(RawSequence::new(PatternKey::Polygonal { shape, index: 1 }, terms, next, explanation))
}

pub(crate) fn draw_polygonal<R: Rng>(rng: &mut R, difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let len = RangeProfile::for_difficulty(difficulty).pick_length(rng);
    let shape = if rng.gen_bool(0.5) { PolygonShape::Triangular } else { PolygonShape::Square };
    polygonal_terms(shape, len)
}

pub(crate) fn polygonal_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    polygonal_terms(PolygonShape::Triangular, shortest_length(difficulty))
}

// ── pure powers ──────────────────────────────────────────────────────────────

/// `(n + b)^k + c` at 1-based position `n`.
pub(crate) fn power_value(k: u32, b: i64, c: i64, n: usize) -> Result<i64, GenerationError> {
    add(pow(add(position(n), b)?, k)?, c)
}

pub(crate) fn poly_k_terms(k: u32, b: i64, c: i64, len: usize) -> Result<RawSequence<i64>, GenerationError> {
    let terms = (1..=len).map(|n| power_value(k, b, c, n)).collect::<Result<Vec<_>, _>>()?;
    let next = power_value(k, b, c, len + 1)?;
    let explanation = format!(
        "Polynomial of degree {k}: a(n) = (n + {b})^{k} {}. Next = ({} + {b})^{k} {} = {next}.",
        plus_minus(c),
        len + 1,
        plus_minus(c)
    );
    let key = PatternKey::PolyK { degree: k, offset: Some(b), constant: Some(c) };
    Ok(RawSequence::new(key, terms, next, explanation))
}

pub(crate) fn draw_poly_k<R: Rng>(rng: &mut R, difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let len = RangeProfile::for_difficulty(difficulty).pick_length(rng);
    let k = rng.gen_range(3..=9);
    let b = rng.gen_range(0..=2);
    let c = rng.gen_range(-20..=20);
    poly_k_terms(k, b, c, len)
}

pub(crate) fn poly_k_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    poly_k_terms(3, 0, 0, shortest_length(difficulty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increasing_differences() {
        let raw = increasing_diffs_terms(1, 1, 2, 5).expect("small values");
        assert_eq!(raw.terms, vec![1, 2, 5, 10, 17]);
        assert_eq!(raw.next, 26);
        assert_eq!(raw.label, "increasing differences");
        assert_eq!(raw.key, PatternKey::Quadratic { first_diff: 1, second_diff: 2 });
    }

    #[test]
    fn quadratic_from_coefficients() {
        let raw = quadratic_terms(2, 1, 0, 5).expect("small values");
        assert_eq!(raw.terms, vec![3, 10, 21, 36, 55]);
        assert_eq!(raw.next, 78);
        assert_eq!(raw.key, PatternKey::Quadratic { first_diff: 7, second_diff: 4 });
        assert!(raw.explanation.starts_with("Quadratic: a(n) = 2n^2 + 1n + 0"));
    }

    #[test]
    fn polygonal_shapes() {
        let raw = polygonal_terms(PolygonShape::Square, 5).expect("small values");
        assert_eq!(raw.terms, vec![1, 4, 9, 16, 25]);
        assert_eq!(raw.next, 36);

        let raw = polygonal_terms(PolygonShape::Triangular, 6).expect("small values");
        assert_eq!(raw.terms, vec![1, 3, 6, 10, 15, 21]);
        assert_eq!(raw.next, 28);
        assert!(raw.explanation.ends_with("T(6) = 21, T(7) = 28."));
    }

    #[test]
    fn pure_power_terms() {
        let raw = poly_k_terms(3, 1, -4, 5).expect("small values");
        assert_eq!(raw.terms, vec![4, 23, 60, 121, 212]);
        assert_eq!(raw.next, 339);
        assert!(raw.explanation.contains("(n + 1)^3 - 4"));
    }

    #[test]
    fn pure_power_beyond_cap_fails() {
        // 11^9 is past the cap.
        assert!(poly_k_terms(9, 2, 0, 8).is_err());
    }
}
