//! # sequence_drill_gen
//!
//! A fully offline, deterministic number-sequence quiz generator.
//!
//! The library builds "what comes next?" and "which value is missing?"
//! questions from sixteen sequence rules (arithmetic, geometric, polynomial,
//! interleaved, Fibonacci-like, primes, digit products, ...), recognises the
//! rule behind any sequence it is given, and produces multiple-choice options
//! with plausible wrong answers.
//!
//! ## How it works
//!
//! 1. Create a [`SequenceRequest`] with a difficulty, an optional pool of
//!    generators, an optional RNG seed and an ask mode.
//! 2. Call [`generate_question`]. The engine picks a generator, draws its
//!    parameters from the difficulty's numeric envelope, and keeps the
//!    sequence only if [`classify_sequence`] recognises the same rule and
//!    predicts the same next value.
//! 3. The returned [`GenerationResult`] holds the question text, the full
//!    sequence, the answer, an explanation, a recognition hint and evidence
//!    read off the sequence itself.
//! 4. [`make_choices`] turns a result into `k` distinct options.
//!
//! ## Key features
//!
//! - **Deterministic**: `with_seed(u64)` reproduces the exact same question,
//!   ask mode and options every time.
//! - **Two value domains**: integer questions by default, real-valued ones
//!   (fractional factors such as 5/2) through [`generate_real_question`].
//! - **Standalone classifier**: [`classify_sequence`] works on sequences from
//!   anywhere, not just generated ones.
//!
//! ## Quick start
//!
//! ```rust
//! use sequence_drill_gen::{
//!     classify_sequence, generate_question, make_choices, AskModeRequest, Difficulty,
//!     GeneratorKind, PatternKind, SequenceRequest,
//! };
//!
//! // Minimal: medium difficulty, full pool, fresh entropy, either ask mode.
//! let q = generate_question(&SequenceRequest::default());
//! println!("{}", q.question_text);
//!
//! // Full control:
//! let req = SequenceRequest::new(Difficulty::Hard)
//!     .with_seed(42)
//!     .with_patterns([GeneratorKind::FibonacciLike, GeneratorKind::Primes])
//!     .with_ask_mode(AskModeRequest::Next);
//! let q = generate_question(&req);
//! for option in make_choices(&q, 4, Some(42)) {
//!     let mark = if option == q.answer { "+" } else { " " };
//!     println!("[{mark}] {option}");
//! }
//!
//! // Recognise a sequence typed in by a user:
//! let r = classify_sequence(&[1i64, 1, 2, 3, 5, 8]);
//! assert_eq!(r.pattern_key.kind(), PatternKind::FibonacciLike);
//! assert_eq!(r.predicted_value, Some(13));
//! ```

pub mod payload;
pub mod sequence_engine;

// Convenience re-exports so callers can use `sequence_drill_gen::generate_question`
// directly without reaching into `sequence_engine::`.
pub use payload::to_quiz_payload;
pub use sequence_engine::{
    answers_match, choice_labels, classify_sequence, generate_batch, generate_question,
    generate_question_with_rng, generate_real_batch, generate_real_question,
    generate_real_question_with_rng, make_choices, normalize_answer, AskMode, AskModeRequest,
    ClassificationResult, Difficulty, GenerationResult, GeneratorKind, PatternKey, PatternKind,
    QuestionMeta, SeqValue, SequenceError, SequenceRequest, DEFAULT_CHOICES,
};
