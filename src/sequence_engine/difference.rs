//! Iterated finite differences.
//!
//! Level 0 is the input, level `k` holds the consecutive differences of level
//! `k - 1`. A polynomial sequence of degree `k` has a constant level `k`, and
//! summing the last element of every level extends the sequence by one term
//! (Newton's forward-difference formula).

use crate::sequence_engine::numeric::SeqValue;

/// Deepest level built by default.
pub const MAX_ORDER: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceTable<T> {
    levels: Vec<Vec<T>>,
}

impl<T: SeqValue> DifferenceTable<T> {
    /// Stops once a level has fewer than 2 elements, after `max_order`
    /// levels, or if a difference overflows.
    pub fn build(seq: &[T], max_order: usize) -> Self {
        let mut levels = vec![seq.to_vec()];
        for _ in 0..max_order {
            let Some(prev) = levels.last() else { break };
            if prev.len() < 2 {
                break;
            }
            match differences(prev) {
                Some(next) => levels.push(next),
                None => break,
            }
        }
        DifferenceTable { levels }
    }

    pub fn levels(&self) -> &[Vec<T>] {
        &self.levels
    }

    /// Smallest `k >= 1` whose level is constant (at least two equal
    /// values), or 0 when no level is.
    pub fn degree(&self) -> usize {
        self.levels
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, level)| is_constant(level))
            .map_or(0, |(k, _)| k)
    }

    /// Sum of the last element of every level.
    pub fn extrapolate_next(&self) -> Option<T> {
        let mut levels = self.levels.iter();
        let mut next = *levels.next()?.last()?;
        for level in levels {
            if let Some(&last) = level.last() {
                next = next.checked_add(last)?;
            }
        }
        Some(next)
    }
}

/// Consecutive differences; `None` on overflow.
pub fn differences<T: SeqValue>(seq: &[T]) -> Option<Vec<T>> {
    seq.windows(2).map(|w| w[1].checked_sub(w[0])).collect()
}

/// At least two values, all equal to the first.
pub fn is_constant<T: SeqValue>(values: &[T]) -> bool {
    values.len() >= 2 && all_equal(values)
}

/// Vacuously true for fewer than two values.
pub fn all_equal<T: SeqValue>(values: &[T]) -> bool {
    match values.first() {
        Some(&first) => values.iter().all(|v| v.approx_eq(first)),
        None => true,
    }
}

pub fn build_table<T: SeqValue>(seq: &[T]) -> DifferenceTable<T> {
    DifferenceTable::build(seq, MAX_ORDER)
}

pub fn detect_polynomial_degree<T: SeqValue>(seq: &[T]) -> usize {
    build_table(seq).degree()
}

pub fn extrapolate_next<T: SeqValue>(table: &DifferenceTable<T>) -> Option<T> {
    table.extrapolate_next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubes_have_constant_third_level() {
        let cubes: Vec<i64> = (1..=6).map(|n| n * n * n).collect();
        let table = build_table(&cubes);
        assert_eq!(table.levels()[3], vec![6, 6, 6]);
        assert_eq!(table.degree(), 3);
        assert_eq!(table.extrapolate_next(), Some(343));
    }

    #[test]
    fn construction_stops_at_single_element_level() {
        let table = build_table(&[4i64, 9, 1]);
        assert_eq!(table.levels().len(), 3);
        assert_eq!(table.levels()[2], vec![-13]);
        assert_eq!(table.degree(), 0);
    }

    #[test]
    fn max_order_limits_depth() {
        let seq: Vec<i64> = (0..20).map(|n| n * n * n * n).collect();
        let table = DifferenceTable::build(&seq, 2);
        assert_eq!(table.levels().len(), 3);
        assert_eq!(table.degree(), 0);
    }

    #[test]
    fn extrapolation_matches_newton_on_non_polynomials() {
        // The unique quartic through these points continues with 31.
        let table = build_table(&[1i64, 2, 4, 8, 16]);
        assert_eq!(table.degree(), 0);
        assert_eq!(table.extrapolate_next(), Some(31));
    }

    #[test]
    fn real_values_use_tolerance() {
        let seq: Vec<f64> = (0..6).map(|n| 0.1 * (n * n) as f64).collect();
        assert_eq!(detect_polynomial_degree(&seq), 2);
        let next = build_table(&seq).extrapolate_next().unwrap_or(f64::NAN);
        assert!((next - 3.6).abs() < 1e-9);
    }

    #[test]
    fn linear_sequence_has_degree_one() {
        assert_eq!(detect_polynomial_degree(&[3i64, 8, 13, 18]), 1);
        assert!(all_equal::<i64>(&[]));
        assert!(!is_constant(&[7i64]));
    }
}
