use thiserror::Error;

use crate::sequence_engine::models::PatternKind;

/// Errors returned by the strict string parsers of the public types.
///
/// Generation and classification never fail; only parsing a name that is not
/// part of a closed set does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("unknown pattern key '{0}'")]
    UnknownPattern(String),

    #[error("unknown generator '{0}'")]
    UnknownGenerator(String),

    #[error("unknown ask mode '{0}' (expected next, missing or both)")]
    UnknownAskMode(String),

    #[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
    UnknownDifficulty(String),
}

/// Why a single generation attempt was rejected.
///
/// Only ever seen by the bounded retry loop in `patterns::generate`, which
/// logs it and draws fresh parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum GenerationError {
    #[error("value {value} exceeds the magnitude cap")]
    Overflow { value: f64 },

    #[error("classified as {found} instead of {expected}")]
    Mismatch { expected: PatternKind, found: PatternKind },

    #[error("classifier predicts {predicted:?} but the rule gives {expected}")]
    Prediction { expected: f64, predicted: Option<f64> },
}
