//! Core sequence engine: generation, recognition, question formatting and
//! answer options.
//!
//! ## Module overview
//!
//! | Module        | Purpose |
//! |---------------|---------|
//! | `models`      | Shared types: difficulty, pattern keys, requests and results |
//! | `numeric`     | `SeqValue` over `i64`/`f64`, magnitude cap, prime and digit helpers |
//! | `ranges`      | Numeric envelope per difficulty |
//! | `difference`  | Difference tables, polynomial degree, Newton extrapolation |
//! | `patterns`    | 16 generators in four families, with a verify-and-retry loop |
//! | `classifier`  | Fixed-order detector cascade `classify_sequence()` |
//! | `helpers`     | Recognition hints and evidence strings |
//! | `ask_mode`    | "Next" vs "missing" questions |
//! | `distractors` | Multiple-choice options and answer normalisation |
//! | `generator`   | Entry points `generate_question()`, `generate_batch()`, `make_choices()` |

pub mod ask_mode;
pub mod classifier;
pub mod difference;
pub mod distractors;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod models;
pub mod numeric;
pub mod patterns;
pub mod ranges;

pub use classifier::classify_sequence;
pub use distractors::{answers_match, choice_labels, normalize_answer, DEFAULT_CHOICES};
pub use error::SequenceError;
pub use generator::{
    generate_batch, generate_question, generate_question_with_rng, generate_real_batch,
    generate_real_question, generate_real_question_with_rng, make_choices,
};
pub use models::{
    AskMode, AskModeRequest, ClassificationResult, Difficulty, EvenMode, GenerationResult,
    GeneratorKind, PatternKey, PatternKind, PolygonShape, QuestionMeta, SequenceRequest, StepKind,
};
pub use numeric::SeqValue;
