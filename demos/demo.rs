//! Full demo of all 16 sequence generators.
//!
//! Run with: `cargo run --example demo`
//! Rejected draws are logged at debug level: `RUST_LOG=sequence_drill_gen=debug`.
//!
//! This example shows how `sequence_drill_gen` works end to end:
//!
//! 1. **All 16 generators**: one question per generator with fixed seeds, so
//!    the output is deterministic and reproducible. Each question is printed
//!    with its options, the correct one marked.
//!
//! 2. **Classifier**: a few hand-written sequences are recognised, with the
//!    hint and the evidence the classifier reads off them.
//!
//! 3. **Quiz payload**: the JSON object the quiz UI consumes.

use sequence_drill_gen::{
    classify_sequence, generate_question, generate_real_question, make_choices, to_quiz_payload,
    AskModeRequest, Difficulty, GenerationResult, GeneratorKind, SeqValue, SequenceRequest, DEFAULT_CHOICES,
};
use tracing_subscriber::EnvFilter;

/// Pretty-print one question and its options.
fn print_question<T: SeqValue>(q: &GenerationResult<T>, options: &[T]) {
    println!("────────────────────────────────────────────────────────────");
    println!("  [{} | {}]  {}", q.metadata.generator, q.metadata.difficulty, q.metadata.label);
    println!("────────────────────────────────────────────────────────────");
    println!("  {}", q.question_text.replace('\n', "\n  "));
    println!();
    for option in options {
        let marker = if option.approx_eq(q.answer) { "✓" } else { " " };
        println!("  [{marker}] {}", option.render());
    }
    println!();
    println!("  Explanation: {}", q.explanation);
    println!("  Hint:        {}", q.recognition_hint);
    println!("  Evidence:    {}", q.evidence_text);
    println!();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== One question per generator ===\n");
    let difficulties = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
    for (i, kind) in GeneratorKind::INTEGER.into_iter().enumerate() {
        let seed = 100 + i as u64;
        let req = SequenceRequest::new(difficulties[i % 3]).with_seed(seed).with_patterns([kind]);
        let q = generate_question(&req);
        print_question(&q, &make_choices(&q, DEFAULT_CHOICES, Some(seed)));
    }
    let req = SequenceRequest::new(Difficulty::Medium).with_seed(7).with_ask_mode(AskModeRequest::Next);
    let q = generate_real_question(&req);
    print_question(&q, &make_choices(&q, DEFAULT_CHOICES, Some(7)));

    println!("=== Classifier ===\n");
    let samples: [&[i64]; 5] = [
        &[3, 8, 13, 18, 23, 28],
        &[1, 1, 2, 3, 5, 8],
        &[1, 4, 9, 16, 25],
        &[5, 8, 13, 16, 21, 24],
        &[3, 1, 4, 1, 5, 9, 2, 6],
    ];
    for seq in samples {
        let r = classify_sequence(seq);
        let predicted = r.predicted_value.map_or_else(|| "-".to_string(), |v| v.to_string());
        println!("  {seq:?}");
        println!("    -> {} (confidence {:.2}), next: {predicted}", r.label, r.confidence);
        if !r.evidence_text.is_empty() {
            println!("       {}", r.evidence_text);
        }
    }
    println!();

    println!("=== Quiz payload ===\n");
    let req = SequenceRequest::new(Difficulty::Easy)
        .with_seed(2024)
        .with_ask_mode(AskModeRequest::Missing);
    let q = generate_question(&req);
    let choices = make_choices(&q, DEFAULT_CHOICES, Some(2024));
    match serde_json::to_string_pretty(&to_quiz_payload(&q, &choices)) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("could not render payload: {e}"),
    }
}
