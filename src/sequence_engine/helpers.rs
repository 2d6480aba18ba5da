//! Shared text builders used by both the classifier and the generators.
//!
//! The recognition hint is static text keyed by the pattern. The evidence
//! string is always computed from the sequence itself (its differences,
//! ratios, sub-sequences) so it reads the same whether the sequence was
//! generated here or typed in by a user.

use crate::sequence_engine::{
    difference::{build_table, differences},
    models::{AskMode, EvenMode, PatternKey, PolygonShape},
    numeric::{digit_product, digits_text, SeqValue},
};

/// Only the first few terms are quoted as evidence.
const EVIDENCE_TERMS: usize = 6;
/// Lists longer than this are cut off with "...".
const LIST_ITEMS: usize = 4;

pub fn recognition_hint<T: Copy>(key: &PatternKey<T>) -> &'static str {
    match key {
        PatternKey::Arithmetic { .. } =>
            "The same amount is added or subtracted every step. Formula: a(n) = a(1) + (n-1)*d and a(n+1) = a(n) + d.",
        PatternKey::Geometric { .. } =>
            "Every term is multiplied by the same factor r (which may be negative). Formula: a(n) = a(1)*r^(n-1) and a(n+1) = a(n)*r.",
        PatternKey::GeometricFractional { .. } =>
            "Geometric with a non-integer factor r. The ratios are equal (e.g. x2.5). a(n+1) = a(n)*r.",
        PatternKey::PolyK { .. } =>
            "The k-th differences are constant (polynomial).",
        PatternKey::Quadratic { .. } =>
            "The second differences are constant. a(n) = a*n^2 + b*n + c.",
        PatternKey::Polygonal { shape: PolygonShape::Triangular, .. } =>
            "Triangular numbers: T(n) = n(n+1)/2.",
        PatternKey::Polygonal { shape: PolygonShape::Square, .. } =>
            "Squares: n^2.",
        PatternKey::AltAddSub { .. } =>
            "Alternately add a and subtract b.",
        PatternKey::AltDoubling { .. } =>
            "The steps double in size and flip sign every time: d(n+1) = -2*d(n).",
        PatternKey::InterleavedTwoAps { .. } =>
            "Two sequences woven together: the odd and the even positions are separate arithmetic sequences.",
        PatternKey::InterleavedMixedPoly { .. } =>
            "Interleaved: the odd positions follow n^k, the even positions an arithmetic sequence or doubling steps.",
        PatternKey::FibonacciLike { .. } =>
            "Every term is the sum of the two terms before it.",
        PatternKey::Primes =>
            "All terms are prime numbers.",
        PatternKey::DigitProduct =>
            "The next term is the product of the digits of the previous term.",
        PatternKey::RepeatingDiff { .. } =>
            "The differences repeat with a fixed period p.",
        PatternKey::PowerSteps { .. } =>
            "The steps are n^2 or 2^n.",
        PatternKey::Unknown => "",
    }
}

/// "5, 5, 5, 5...": at most four items.
pub fn format_list<T: SeqValue>(values: &[T]) -> String {
    let shown: Vec<String> = values.iter().take(LIST_ITEMS).map(|v| v.render()).collect();
    let more = if values.len() > LIST_ITEMS { "..." } else { "" };
    format!("{}{more}", shown.join(", "))
}

/// "+3" or "-2".
pub fn signed<T: SeqValue>(v: T) -> String {
    if v.to_f64() >= 0.0 {
        format!("+{}", v.render())
    } else {
        v.render()
    }
}

/// "28 + 5" or "28 - 5".
pub fn apply_delta_text<T: SeqValue>(base: T, delta: T) -> String {
    if delta.to_f64() >= 0.0 {
        format!("{} + {}", base.render(), delta.render())
    } else {
        let magnitude = T::from_i64(0).checked_sub(delta).unwrap_or(delta);
        format!("{} - {}", base.render(), magnitude.render())
    }
}

pub fn join_values<T: SeqValue>(values: &[T]) -> String {
    values.iter().map(|v| v.render()).collect::<Vec<_>>().join(", ")
}

fn format_ratios<T: SeqValue>(seq: &[T], decimals: i32) -> String {
    let scale = 10f64.powi(decimals);
    let ratios: Vec<String> = seq
        .windows(2)
        .map(|w| {
            let a = w[0].to_f64();
            if a == 0.0 {
                "inf".to_string()
            } else {
                ((w[1].to_f64() / a * scale).round() / scale).render()
            }
        })
        .collect();
    let more = if ratios.len() > LIST_ITEMS { "..." } else { "" };
    let shown: Vec<String> = ratios.into_iter().take(LIST_ITEMS).collect();
    format!("{}{more}", shown.join(", "))
}

fn positions<T: SeqValue>(seq: &[T], first: usize) -> Vec<T> {
    seq.iter().skip(first).step_by(2).copied().collect()
}

/// Evidence for `key`, read off the sequence itself.
pub fn evidence_text<T: SeqValue>(seq: &[T], key: &PatternKey<T>) -> String {
    let s = &seq[..seq.len().min(EVIDENCE_TERMS)];
    let d = differences(s).unwrap_or_default();
    let dd = differences(&d).unwrap_or_default();

    match key {
        PatternKey::Arithmetic { .. } => format!("Differences: {} -> all equal.", format_list(&d)),
        PatternKey::Geometric { .. } => format!("Ratios: {} -> equal.", format_ratios(s, 2)),
        PatternKey::GeometricFractional { .. } => {
            format!("Ratios: {} -> equal, non-integer factor.", format_ratios(s, 4))
        }
        PatternKey::Quadratic { .. } | PatternKey::Polygonal { .. } => format!(
            "Differences: {} | second differences: {} -> second differences equal.",
            format_list(&d),
            format_list(&dd)
        ),
        PatternKey::AltAddSub { .. } => format!("Differences: {} -> alternating.", format_list(&d)),
        PatternKey::AltDoubling { .. } => {
            format!("Differences: {} -> the sign flips and the size doubles.", format_list(&d))
        }
        PatternKey::InterleavedTwoAps { .. } => {
            let odd = differences(&positions(s, 0)).unwrap_or_default();
            let even = differences(&positions(s, 1)).unwrap_or_default();
            format!(
                "Odd-position differences: {} | even-position differences: {} -> both constant.",
                format_list(&odd),
                format_list(&even)
            )
        }
        PatternKey::InterleavedMixedPoly { odd_degree, even_mode } => {
            let even = differences(&positions(seq, 1)).unwrap_or_default();
            let shape = match even_mode {
                EvenMode::Arithmetic => "constant",
                EvenMode::Doubling   => "doubling",
            };
            format!(
                "Odd positions: {} (degree {odd_degree}) | even-position differences: {} -> {shape}.",
                format_list(&positions(seq, 0)),
                format_list(&even)
            )
        }
        PatternKey::FibonacciLike { .. } => {
            let checks: Vec<String> = s
                .windows(3)
                .take(3)
                .map(|w| format!("{} + {} = {}", w[0].render(), w[1].render(), w[2].render()))
                .collect();
            format!("Check: {}", checks.join("; "))
        }
        PatternKey::Primes => format!("Terms: {} -> all prime.", format_list(s)),
        PatternKey::DigitProduct => {
            let checks: Vec<String> = s
                .windows(2)
                .take(3)
                .filter_map(|w| {
                    let from = w[0].to_exact_i64()?;
                    Some(format!("{from} -> {} = {}", digits_text(from), digit_product(from)))
                })
                .collect();
            format!("Check: {}", checks.join("; "))
        }
        PatternKey::RepeatingDiff { period, .. } => {
            format!("Differences: {} -> repeating pattern (p={period}).", format_list(&d))
        }
        PatternKey::PowerSteps { .. } => format!("Differences: {} -> n^2 or 2^n.", format_list(&d)),
        PatternKey::PolyK { .. } => {
            let table = build_table(s);
            let layers: Vec<String> = table
                .levels()
                .iter()
                .take(4)
                .enumerate()
                .map(|(k, level)| format!("Δ^{k}: {}", format_list(level)))
                .collect();
            format!("{} -> higher-order differences constant.", layers.join(" | "))
        }
        PatternKey::Unknown => String::new(),
    }
}

/// Append the value the learner is asked for to an evidence string.
pub fn with_answer<T: SeqValue>(evidence: &str, answer: T, ask_mode: AskMode, hidden_index: Option<usize>) -> String {
    match (ask_mode, hidden_index) {
        (AskMode::Missing, Some(idx)) => {
            format!("{evidence} -> missing (position {}) = {}", idx + 1, answer.render())
        }
        _ => format!("{evidence} -> next = {}", answer.render()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_is_cut_after_four_items() {
        assert_eq!(format_list(&[5i64, 5, 5, 5, 5]), "5, 5, 5, 5...");
        assert_eq!(format_list(&[1i64, 2]), "1, 2");
        assert_eq!(signed(3i64), "+3");
        assert_eq!(signed(-2i64), "-2");
    }

    #[test]
    fn arithmetic_evidence_uses_input_differences() {
        let key = PatternKey::Arithmetic { difference: 5i64 };
        let text = evidence_text(&[3i64, 8, 13, 18, 23, 28], &key);
        assert_eq!(text, "Differences: 5, 5, 5, 5... -> all equal.");
        assert_eq!(
            with_answer(&text, 33i64, AskMode::Next, None),
            "Differences: 5, 5, 5, 5... -> all equal. -> next = 33"
        );
    }

    #[test]
    fn geometric_evidence_shows_ratios() {
        let key: PatternKey<f64> = PatternKey::GeometricFractional { ratio: 2.5 };
        let text = evidence_text(&[2.0f64, 5.0, 12.5], &key);
        assert_eq!(text, "Ratios: 2.5, 2.5 -> equal, non-integer factor.");
    }

    #[test]
    fn digit_product_evidence_spells_out_products() {
        let text = evidence_text(&[3456i64, 360, 0], &PatternKey::DigitProduct);
        assert_eq!(text, "Check: 3456 -> 3*4*5*6 = 360; 360 -> 3*6*0 = 0");
        let missing = with_answer(&text, 360i64, AskMode::Missing, Some(1));
        assert!(missing.ends_with("missing (position 2) = 360"));
    }

    #[test]
    fn every_known_pattern_has_a_hint() {
        let key: PatternKey<i64> = PatternKey::Primes;
        assert!(!recognition_hint(&key).is_empty());
        assert!(recognition_hint(&PatternKey::<i64>::Unknown).is_empty());
    }
}
