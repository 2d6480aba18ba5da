//! Turns a generated sequence into a question: either "what comes next" or
//! "which value is missing" with one interior position blanked out.

use rand::Rng;

use crate::sequence_engine::{
    helpers::{apply_delta_text, evidence_text, join_values, recognition_hint, with_answer},
    models::{AskMode, AskModeRequest, Difficulty, GenerationResult, GeneratorKind, QuestionMeta},
    numeric::SeqValue,
    patterns::RawSequence,
};

/// Placeholder shown in place of the hidden value.
pub const PLACEHOLDER: &str = "?";

/// `Both` is a fair coin per question.
pub fn resolve_ask_mode<R: Rng>(request: AskModeRequest, rng: &mut R) -> AskMode {
    match request {
        AskModeRequest::Next    => AskMode::Next,
        AskModeRequest::Missing => AskMode::Missing,
        AskModeRequest::Both    => if rng.gen_bool(0.5) { AskMode::Next } else { AskMode::Missing },
    }
}

/// Uniform interior index in `[1, len - 2]`; `None` below four values,
/// where hiding one leaves too little to read the rule from.
pub fn choose_hidden_index<R: Rng>(len: usize, rng: &mut R) -> Option<usize> {
    if len < 4 {
        return None;
    }
    Some(rng.gen_range(1..=len - 2))
}

pub fn question_text<T: SeqValue>(terms: &[T], hidden_index: Option<usize>) -> String {
    match hidden_index {
        Some(hidden) => {
            let shown: Vec<String> = terms
                .iter()
                .enumerate()
                .map(|(i, v)| if i == hidden { PLACEHOLDER.to_string() } else { v.render() })
                .collect();
            format!("Which value is missing?\n\nSequence: {}", shown.join(", "))
        }
        None => format!("What value comes next?\n\nSequence: {}, ...", join_values(terms)),
    }
}

/// Apply the requested ask mode to `raw` and assemble the full result.
pub fn pose_question<T: SeqValue, R: Rng>(
    raw: RawSequence<T>,
    generator: GeneratorKind,
    difficulty: Difficulty,
    request: AskModeRequest,
    rng: &mut R,
) -> GenerationResult<T> {
    let mode = resolve_ask_mode(request, rng);
    let hidden_index = match mode {
        AskMode::Missing => choose_hidden_index(raw.terms.len(), rng),
        AskMode::Next => None,
    };
    // Too short for a missing value: ask for the next one instead.
    let mode = if hidden_index.is_some() { mode } else { AskMode::Next };

    let (answer, asked_position, explanation) = match hidden_index {
        Some(hidden) => {
            let value = raw.terms[hidden];
            let left = raw.terms[hidden - 1];
            let position = hidden + 1;
            let step = match value.checked_sub(left) {
                Some(step) => format!(" The step into position {position} is {}.", apply_delta_text(left, step)),
                None => String::new(),
            };
            let explanation = format!(
                "{}{step} (Asked: missing value at position {position} = {}.)",
                raw.explanation,
                value.render()
            );
            (value, position, explanation)
        }
        None => (raw.next, raw.terms.len() + 1, format!("{} (Asked: next value.)", raw.explanation)),
    };

    let evidence = with_answer(&evidence_text(&raw.terms, &raw.key), answer, mode, hidden_index);
    GenerationResult {
        question_text: question_text(&raw.terms, hidden_index),
        recognition_hint: recognition_hint(&raw.key).to_string(),
        evidence_text: evidence,
        answer,
        explanation,
        metadata: QuestionMeta {
            generator,
            label: raw.label,
            difficulty,
            ask_mode: mode,
            hidden_index,
            asked_position,
        },
        sequence: raw.terms,
        pattern_key: raw.key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence_engine::patterns::linear::arithmetic_terms;
    use rand::{rngs::StdRng, SeedableRng};

    fn scenario() -> RawSequence<i64> {
        arithmetic_terms(3, 5, 6).expect("small values")
    }

    #[test]
    fn next_mode_asks_for_the_successor() {
        let mut rng = StdRng::seed_from_u64(1);
        let r = pose_question(scenario(), GeneratorKind::Arithmetic, Difficulty::Easy, AskModeRequest::Next, &mut rng);
        assert_eq!(r.answer, 33);
        assert_eq!(r.question_text, "What value comes next?\n\nSequence: 3, 8, 13, 18, 23, 28, ...");
        assert_eq!(r.metadata.ask_mode, AskMode::Next);
        assert_eq!(r.metadata.hidden_index, None);
        assert_eq!(r.metadata.asked_position, 7);
        assert!(r.explanation.ends_with("(Asked: next value.)"));
        assert!(r.evidence_text.ends_with("-> next = 33"));
    }

    #[test]
    fn missing_mode_hides_an_interior_value() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let r = pose_question(
                scenario(),
                GeneratorKind::Arithmetic,
                Difficulty::Easy,
                AskModeRequest::Missing,
                &mut rng,
            );
            let hidden = r.metadata.hidden_index.expect("missing mode hides a value");
            assert!((1..=4).contains(&hidden));
            assert_eq!(r.answer, r.sequence[hidden]);
            assert_eq!(r.metadata.asked_position, hidden + 1);
            assert!(r.question_text.starts_with("Which value is missing?"));
            let shown = r.question_text.split("Sequence: ").nth(1).unwrap_or_default();
            assert_eq!(shown.matches(PLACEHOLDER).count(), 1);
            assert!(r.evidence_text.contains(&format!("missing (position {})", hidden + 1)));
        }
    }

    #[test]
    fn both_picks_each_mode_sometimes() {
        let mut rng = StdRng::seed_from_u64(3);
        let modes: Vec<AskMode> = (0..64).map(|_| resolve_ask_mode(AskModeRequest::Both, &mut rng)).collect();
        assert!(modes.contains(&AskMode::Next));
        assert!(modes.contains(&AskMode::Missing));
    }

    #[test]
    fn short_sequences_fall_back_to_next() {
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(choose_hidden_index(2, &mut rng), None);
        assert_eq!(choose_hidden_index(3, &mut rng), None);
        for _ in 0..16 {
            let hidden = choose_hidden_index(4, &mut rng);
            assert!(matches!(hidden, Some(1 | 2)), "{hidden:?}");
        }
    }
}
