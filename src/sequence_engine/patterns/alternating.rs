use rand::Rng;

use crate::sequence_engine::{
    error::GenerationError,
    helpers::{apply_delta_text, join_values, signed},
    models::{Difficulty, EvenMode, PatternKey},
    patterns::{add, mul, odd_length, polynomial::power_value, pow, shortest_length, unfold, RawSequence},
    ranges::{random_sign, RangeProfile},
};

// ── alternating +a, -b ───────────────────────────────────────────────────────

pub(crate) fn alt_add_sub_terms(
    a0: i64,
    add_by: i64,
    sub_by: i64,
    len: usize,
) -> Result<RawSequence<i64>, GenerationError> {
    // Step i produces term i; the odd steps add.
    let delta = |i: usize| if i % 2 == 1 { add_by } else { -sub_by };
    let (terms, next) = unfold(a0, len, |i, prev| add(prev, delta(i)))?;
    let last = terms.last().copied().unwrap_or(a0);
    let explanation = format!(
        "Alternating: add {add_by}, then subtract {sub_by}, and repeat. Next = {} = {next}.",
        apply_delta_text(last, delta(len))
    );
    Ok(RawSequence::new(PatternKey::AltAddSub { add: add_by, sub: sub_by }, terms, next, explanation))
}

pub(crate) fn draw_alt_add_sub<R: Rng>(rng: &mut R, difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    let len = profile.pick_length(rng);
    let a0 = profile.pick_start(rng);
    let add_by = rng.gen_range(2..=profile.max_step().max(2));
    let sub_by = rng.gen_range(1..=(profile.max_step() / 2).max(1));
    alt_add_sub_terms(a0, add_by, sub_by, len)
}

pub(crate) fn alt_add_sub_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    alt_add_sub_terms(*profile.start.start(), 3, 1, shortest_length(difficulty))
}

// ── alternating doubling ─────────────────────────────────────────────────────

/// Steps `sign * 2^p`, then each step is `-2` times the one before.
pub(crate) fn alt_doubling_terms(a0: i64, p: u32, sign: i64, len: usize) -> Result<RawSequence<i64>, GenerationError> {
    let first_delta = mul(sign, pow(2, p)?)?;
    let mut delta = first_delta;
    let mut last_delta = first_delta;
    let (terms, next) = unfold(a0, len, |_, prev| {
        let value = add(prev, delta)?;
        last_delta = delta;
        delta = mul(delta, -2)?;
        Ok(value)
    })?;
    let steps: Vec<i64> = terms.windows(2).map(|w| w[1] - w[0]).collect();
    let explanation = format!(
        "The steps are {}: each one is -2 times the previous, so the size doubles and the sign flips. \
         Next step = {}, so the next term is {next}.",
        steps.iter().map(|&s| signed(s)).collect::<Vec<_>>().join(", "),
        signed(last_delta)
    );
    Ok(RawSequence::new(PatternKey::AltDoubling { first_delta }, terms, next, explanation))
}

pub(crate) fn draw_alt_doubling<R: Rng>(rng: &mut R, difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    let len = profile.pick_length(rng);
    let a0 = profile.pick_start(rng);
    let p = rng.gen_range(3..=5);
    alt_doubling_terms(a0, p, random_sign(rng), len)
}

pub(crate) fn alt_doubling_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    alt_doubling_terms(*profile.start.start(), 3, 1, shortest_length(difficulty))
}

// ── two interleaved progressions ─────────────────────────────────────────────

/// Odd positions run `a0, a0 + d1, ...`, even positions `b0, b0 + d2, ...`.
pub(crate) fn interleaved_two_aps_terms(
    a0: i64,
    d1: i64,
    b0: i64,
    d2: i64,
    len: usize,
) -> Result<RawSequence<i64>, GenerationError> {
    let value = |i: usize| -> Result<i64, GenerationError> {
        let m = (i / 2) as i64;
        if i % 2 == 0 { add(a0, mul(m, d1)?) } else { add(b0, mul(m, d2)?) }
    };
    let terms = (0..len).map(value).collect::<Result<Vec<_>, _>>()?;
    let next = value(len)?;
    let explanation = format!(
        "Two sequences woven together. Odd positions: start {a0}, step {}. Even positions: start {b0}, step {}. \
         The next term belongs to the {} positions: {next}.",
        signed(d1),
        signed(d2),
        if len % 2 == 0 { "odd" } else { "even" }
    );
    let key = PatternKey::InterleavedTwoAps { odd_delta: d1, even_delta: d2 };
    Ok(RawSequence::new(key, terms, next, explanation))
}

pub(crate) fn draw_interleaved_two_aps<R: Rng>(
    rng: &mut R,
    difficulty: Difficulty,
) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    let len = odd_length(profile.pick_length(rng));
    let half = (profile.max_step() / 2).max(1);
    let a0 = profile.pick_start(rng);
    let b0 = profile.pick_start(rng);
    let d1 = random_sign(rng) * rng.gen_range(0..=half);
    let d2 = random_sign(rng) * rng.gen_range(0..=half);
    interleaved_two_aps_terms(a0, d1, b0, d2, len)
}

pub(crate) fn interleaved_two_aps_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    interleaved_two_aps_terms(1, 2, 20, -3, odd_length(shortest_length(difficulty)))
}

// ── odd powers, even progression ─────────────────────────────────────────────

/// `(j + b)^k + c` on the odd positions (`j` counts from 1); the even
/// positions start at `even0` and either add `step` or add steps
/// `step, 2*step, 4*step, ...`.
pub(crate) fn interleaved_mixed_poly_terms(
    k: u32,
    b: i64,
    c: i64,
    even_mode: EvenMode,
    even0: i64,
    step: i64,
    len: usize,
) -> Result<RawSequence<i64>, GenerationError> {
    let even_value = |m: usize| -> Result<i64, GenerationError> {
        match even_mode {
            EvenMode::Arithmetic => add(even0, mul(m as i64, step)?),
            EvenMode::Doubling => {
                let exp = u32::try_from(m).map_err(|_| GenerationError::Overflow { value: f64::INFINITY })?;
                add(even0, mul(step, add(pow(2, exp)?, -1)?)?)
            }
        }
    };
    let value = |i: usize| -> Result<i64, GenerationError> {
        if i % 2 == 0 { power_value(k, b, c, i / 2 + 1) } else { even_value(i / 2) }
    };
    let terms = (0..len).map(value).collect::<Result<Vec<_>, _>>()?;
    let next = value(len)?;

    let odd: Vec<i64> = terms.iter().step_by(2).copied().collect();
    let even: Vec<i64> = terms.iter().skip(1).step_by(2).copied().collect();
    let even_rule = match even_mode {
        EvenMode::Arithmetic => format!("add {step} every time"),
        EvenMode::Doubling   => format!("the steps double, starting at {step}"),
    };
    let explanation = format!(
        "Odd positions ({}) follow (n + {b})^{k} + {c}; even positions ({}) {even_rule}. Next = {next}.",
        join_values(&odd),
        join_values(&even)
    );
    let key = PatternKey::InterleavedMixedPoly { odd_degree: k, even_mode };
    Ok(RawSequence::new(key, terms, next, explanation))
}

pub(crate) fn draw_interleaved_mixed_poly<R: Rng>(
    rng: &mut R,
    difficulty: Difficulty,
) -> Result<RawSequence<i64>, GenerationError> {
    let profile = RangeProfile::for_difficulty(difficulty);
    let len = odd_length(profile.pick_length(rng));
    let k = rng.gen_range(3..=9);
    let b = rng.gen_range(0..=2);
    let c = rng.gen_range(-10..=10);
    let even0 = rng.gen_range(10..=50);
    // Doubling needs three visible even terms to be recognisable.
    let doubling = len / 2 >= 3 && rng.gen_bool(0.5);
    if doubling {
        let step = rng.gen_range(5..=10) * 5;
        interleaved_mixed_poly_terms(k, b, c, EvenMode::Doubling, even0, step, len)
    } else {
        let step = random_sign(rng) * rng.gen_range(5..=20);
        interleaved_mixed_poly_terms(k, b, c, EvenMode::Arithmetic, even0, step, len)
    }
}

pub(crate) fn interleaved_mixed_poly_fallback(difficulty: Difficulty) -> Result<RawSequence<i64>, GenerationError> {
    let len = odd_length(shortest_length(difficulty));
    interleaved_mixed_poly_terms(3, 0, 0, EvenMode::Arithmetic, 10, 5, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence_engine::classifier::classify_sequence;
    use crate::sequence_engine::models::PatternKind;

    #[test]
    fn add_then_subtract() {
        let raw = alt_add_sub_terms(10, 5, 3, 6).expect("small values");
        assert_eq!(raw.terms, vec![10, 15, 12, 17, 14, 19]);
        assert_eq!(raw.next, 16);
        assert!(raw.explanation.ends_with("Next = 19 - 3 = 16."));

        let raw = alt_add_sub_terms(10, 5, 3, 5).expect("small values");
        assert_eq!(raw.next, 19);
    }

    #[test]
    fn doubling_steps_flip_sign() {
        let raw = alt_doubling_terms(20, 3, 1, 6).expect("small values");
        assert_eq!(raw.terms, vec![20, 28, 12, 44, -20, 108]);
        assert_eq!(raw.next, -148);
        assert_eq!(raw.key, PatternKey::AltDoubling { first_delta: 8 });
        assert!(raw.explanation.contains("Next step = -256"));
    }

    #[test]
    fn two_progressions() {
        let raw = interleaved_two_aps_terms(1, 2, 20, -3, 7).expect("small values");
        assert_eq!(raw.terms, vec![1, 20, 3, 17, 5, 14, 7]);
        assert_eq!(raw.next, 11);
        assert!(raw.explanation.contains("belongs to the even positions"));
    }

    #[test]
    fn cubes_and_progression() {
        let raw = interleaved_mixed_poly_terms(3, 0, 0, EvenMode::Arithmetic, 10, 5, 7).expect("small values");
        assert_eq!(raw.terms, vec![1, 10, 8, 15, 27, 20, 64]);
        assert_eq!(raw.next, 25);

        let raw = interleaved_mixed_poly_terms(3, 1, -1, EvenMode::Doubling, 10, 25, 7).expect("small values");
        assert_eq!(raw.terms, vec![7, 10, 26, 35, 63, 85, 124]);
        assert_eq!(raw.next, 185);
    }

    #[test]
    fn doubling_even_positions_classify() {
        let raw = interleaved_mixed_poly_terms(3, 1, -1, EvenMode::Doubling, 10, 25, 7).expect("small values");
        let r = classify_sequence(&raw.terms);
        assert_eq!(r.kind(), PatternKind::InterleavedMixedPoly);
        assert_eq!(r.predicted_value, Some(raw.next));
    }

    #[test]
    fn mixed_draws_keep_odd_length() {
        use rand::{rngs::StdRng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(4);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            for _ in 0..20 {
                if let Ok(raw) = draw_interleaved_mixed_poly(&mut rng, difficulty) {
                    assert_eq!(raw.terms.len() % 2, 1);
                }
            }
        }
    }
}
