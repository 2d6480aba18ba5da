use serde_json::{json, Value};

use crate::sequence_engine::{
    ask_mode::PLACEHOLDER,
    distractors::choice_labels,
    models::GenerationResult,
    numeric::SeqValue,
};

/// Visible terms as strings, with the hidden one replaced by the placeholder.
fn shown_terms<T: SeqValue>(result: &GenerationResult<T>) -> Vec<String> {
    result
        .sequence
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if Some(i) == result.metadata.hidden_index {
                PLACEHOLDER.to_string()
            } else {
                v.render()
            }
        })
        .collect()
}

/// Index of the correct value within `choices`, if present.
fn correct_option<T: SeqValue>(result: &GenerationResult<T>, choices: &[T]) -> Option<usize> {
    choices.iter().position(|c| c.approx_eq(result.answer))
}

/// Build the JSON object the quiz UI renders: the question, the visible
/// sequence, the options as display strings and everything shown after
/// answering.
pub fn to_quiz_payload<T: SeqValue>(result: &GenerationResult<T>, choices: &[T]) -> Value {
    json!({
        "pattern": result.pattern_key.kind(),
        "label": result.metadata.label,
        "generator": result.metadata.generator,
        "difficulty": result.metadata.difficulty,
        "ask_mode": result.metadata.ask_mode,
        "question": result.question_text,
        "sequence": shown_terms(result),
        "hidden_index": result.metadata.hidden_index,
        "asked_position": result.metadata.asked_position,
        "answer": result.answer.render(),
        "options": choice_labels(choices),
        "correct_option": correct_option(result, choices),
        "explanation": result.explanation,
        "hint": result.recognition_hint,
        "evidence": result.evidence_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence_engine::{
        generate_question, make_choices, AskModeRequest, Difficulty, GeneratorKind, SequenceRequest,
    };

    #[test]
    fn payload_carries_question_and_options() {
        let req = SequenceRequest::new(Difficulty::Easy)
            .with_seed(5)
            .with_patterns([GeneratorKind::Arithmetic])
            .with_ask_mode(AskModeRequest::Missing);
        let result = generate_question(&req);
        let choices = make_choices(&result, 4, Some(5));
        let payload = to_quiz_payload(&result, &choices);

        assert_eq!(payload["pattern"], "arithmetic");
        assert_eq!(payload["ask_mode"], "missing");
        assert_eq!(payload["options"].as_array().map(Vec::len), Some(4));

        let hidden = result.metadata.hidden_index.expect("missing mode");
        assert_eq!(payload["hidden_index"], hidden);
        assert_eq!(payload["sequence"][hidden], PLACEHOLDER);

        let correct = payload["correct_option"].as_u64().expect("answer is among the options") as usize;
        assert_eq!(payload["options"][correct], result.answer.to_string());
    }

    #[test]
    fn next_mode_shows_every_term() {
        let req = SequenceRequest::new(Difficulty::Medium)
            .with_seed(8)
            .with_ask_mode(AskModeRequest::Next);
        let result = generate_question(&req);
        let payload = to_quiz_payload(&result, &[]);
        assert!(payload["hidden_index"].is_null());
        assert!(payload["correct_option"].is_null());
        let shown = payload["sequence"].as_array().map(Vec::len);
        assert_eq!(shown, Some(result.sequence.len()));
    }
}
