use std::ops::RangeInclusive;

use rand::Rng;

use crate::sequence_engine::models::Difficulty;

/// Numeric envelope a generator draws its parameters from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeProfile {
    pub start: RangeInclusive<i64>,
    pub step: RangeInclusive<i64>,
    pub length: RangeInclusive<usize>,
    pub ratio: RangeInclusive<i64>,
}

impl RangeProfile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => RangeProfile {
                start: 1..=15,
                step: 1..=7,
                length: 5..=6,
                ratio: 2..=4,
            },
            Difficulty::Medium => RangeProfile {
                start: 1..=35,
                step: 2..=12,
                length: 6..=7,
                ratio: 2..=5,
            },
            Difficulty::Hard => RangeProfile {
                start: 5..=80,
                step: 3..=25,
                length: 7..=8,
                ratio: 2..=6,
            },
        }
    }

    pub fn pick_length<R: Rng>(&self, rng: &mut R) -> usize {
        rng.gen_range(self.length.clone())
    }

    pub fn pick_start<R: Rng>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.start.clone())
    }

    pub fn pick_step<R: Rng>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.step.clone())
    }

    pub fn pick_ratio<R: Rng>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.ratio.clone())
    }

    pub fn max_step(&self) -> i64 {
        *self.step.end()
    }
}

/// +1 or -1 with equal probability.
pub fn random_sign<R: Rng>(rng: &mut R) -> i64 {
    if rng.gen_bool(0.5) { 1 } else { -1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_stay_within_question_bounds() {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let p = RangeProfile::for_difficulty(d);
            assert!(*p.length.start() >= 5 && *p.length.end() <= 8, "{d}");
            assert!(*p.ratio.start() >= 2, "ratio must never be 0 or 1 for {d}");
        }
    }

    #[test]
    fn unknown_names_fall_back_to_medium() {
        let p = RangeProfile::for_difficulty(Difficulty::from_name_or_default("nightmare"));
        assert_eq!(p, RangeProfile::for_difficulty(Difficulty::Medium));
        let p = RangeProfile::for_difficulty(Difficulty::from_name_or_default(" HARD "));
        assert_eq!(p.length, 7..=8);
    }
}
