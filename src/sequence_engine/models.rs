use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sequence_engine::error::SequenceError;

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Lenient parse used by the quiz settings: anything unrecognised is medium.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl FromStr for Difficulty {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy"   => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard"   => Ok(Difficulty::Hard),
            _        => Err(SequenceError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy   => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard   => write!(f, "hard"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pattern tags
// ---------------------------------------------------------------------------

/// Closed set of pattern tags, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Arithmetic,
    Geometric,
    GeometricFractional,
    PolyK,
    Quadratic,
    Polygonal,
    AltAddSub,
    AltDoubling,
    InterleavedTwoAps,
    InterleavedMixedPoly,
    FibonacciLike,
    Primes,
    DigitProduct,
    RepeatingDiff,
    PowerSteps,
    Unknown,
}

impl PatternKind {
    pub const ALL: [PatternKind; 16] = [
        PatternKind::Arithmetic,
        PatternKind::Geometric,
        PatternKind::GeometricFractional,
        PatternKind::PolyK,
        PatternKind::Quadratic,
        PatternKind::Polygonal,
        PatternKind::AltAddSub,
        PatternKind::AltDoubling,
        PatternKind::InterleavedTwoAps,
        PatternKind::InterleavedMixedPoly,
        PatternKind::FibonacciLike,
        PatternKind::Primes,
        PatternKind::DigitProduct,
        PatternKind::RepeatingDiff,
        PatternKind::PowerSteps,
        PatternKind::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PatternKind::Arithmetic           => "arithmetic",
            PatternKind::Geometric            => "geometric",
            PatternKind::GeometricFractional  => "geometric_fractional",
            PatternKind::PolyK                => "poly_k",
            PatternKind::Quadratic            => "quadratic",
            PatternKind::Polygonal            => "polygonal",
            PatternKind::AltAddSub            => "alt_add_sub",
            PatternKind::AltDoubling          => "alt_doubling",
            PatternKind::InterleavedTwoAps    => "interleaved_two_aps",
            PatternKind::InterleavedMixedPoly => "interleaved_mixed_poly",
            PatternKind::FibonacciLike        => "fibonacci_like",
            PatternKind::Primes               => "primes",
            PatternKind::DigitProduct         => "digit_product",
            PatternKind::RepeatingDiff        => "repeating_diff",
            PatternKind::PowerSteps           => "power_steps",
            PatternKind::Unknown              => "unknown",
        }
    }
}

impl FromStr for PatternKind {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        PatternKind::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| SequenceError::UnknownPattern(s.to_string()))
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolygonShape {
    Triangular,
    Square,
}

/// Which kind of step growth a `power_steps` sequence uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Steps 1, 4, 9, 16, ...
    Squares,
    /// Steps 1, 2, 4, 8, ...
    Doubling,
}

/// How the even positions of an `interleaved_mixed_poly` sequence move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvenMode {
    Arithmetic,
    Doubling,
}

/// A pattern tag together with the parameters that pin it down.
///
/// "Odd" and "even" positions are counted from 1, so the odd positions are
/// indices 0, 2, 4, ... of the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternKey<T> {
    Arithmetic { difference: T },
    Geometric { ratio: i64 },
    GeometricFractional { ratio: f64 },
    /// `offset`/`constant` are known for pure powers `(n + offset)^degree + constant`.
    PolyK { degree: u32, offset: Option<i64>, constant: Option<T> },
    Quadratic { first_diff: T, second_diff: T },
    /// `index` is the `n` the first term stands for, read off the first step.
    Polygonal { shape: PolygonShape, index: i64 },
    AltAddSub { add: T, sub: T },
    AltDoubling { first_delta: T },
    InterleavedTwoAps { odd_delta: T, even_delta: T },
    InterleavedMixedPoly { odd_degree: u32, even_mode: EvenMode },
    FibonacciLike { seeds: [T; 2] },
    Primes,
    DigitProduct,
    RepeatingDiff { pattern: Vec<T>, period: usize },
    PowerSteps { steps: StepKind },
    Unknown,
}

impl<T: Copy> PatternKey<T> {
    pub fn kind(&self) -> PatternKind {
        match self {
            PatternKey::Arithmetic { .. }           => PatternKind::Arithmetic,
            PatternKey::Geometric { .. }            => PatternKind::Geometric,
            PatternKey::GeometricFractional { .. }  => PatternKind::GeometricFractional,
            PatternKey::PolyK { .. }                => PatternKind::PolyK,
            PatternKey::Quadratic { .. }            => PatternKind::Quadratic,
            PatternKey::Polygonal { .. }            => PatternKind::Polygonal,
            PatternKey::AltAddSub { .. }            => PatternKind::AltAddSub,
            PatternKey::AltDoubling { .. }          => PatternKind::AltDoubling,
            PatternKey::InterleavedTwoAps { .. }    => PatternKind::InterleavedTwoAps,
            PatternKey::InterleavedMixedPoly { .. } => PatternKind::InterleavedMixedPoly,
            PatternKey::FibonacciLike { .. }        => PatternKind::FibonacciLike,
            PatternKey::Primes                      => PatternKind::Primes,
            PatternKey::DigitProduct                => PatternKind::DigitProduct,
            PatternKey::RepeatingDiff { .. }        => PatternKind::RepeatingDiff,
            PatternKey::PowerSteps { .. }           => PatternKind::PowerSteps,
            PatternKey::Unknown                     => PatternKind::Unknown,
        }
    }

    /// Human-readable name of the pattern, e.g. "triangular numbers".
    pub fn label(&self) -> String {
        match self {
            PatternKey::Arithmetic { .. }          => "arithmetic (constant difference)".into(),
            PatternKey::Geometric { .. }           => "geometric (constant factor)".into(),
            PatternKey::GeometricFractional { .. } => "geometric (fractional factor)".into(),
            PatternKey::PolyK { degree, offset: Some(_), .. } => {
                format!("polynomial of degree {degree} (pure power)")
            }
            PatternKey::PolyK { degree, .. }       => format!("polynomial of degree {degree}"),
            PatternKey::Quadratic { .. }           => "quadratic (constant second difference)".into(),
            PatternKey::Polygonal { shape: PolygonShape::Triangular, .. } => "triangular numbers".into(),
            PatternKey::Polygonal { shape: PolygonShape::Square, .. }     => "square numbers (n^2)".into(),
            PatternKey::AltAddSub { .. }           => "alternating +a, -b".into(),
            PatternKey::AltDoubling { .. }         => "step sizes 2^n with alternating sign".into(),
            PatternKey::InterleavedTwoAps { .. }   => "interleaved (two sequences)".into(),
            PatternKey::InterleavedMixedPoly { .. } => {
                "interleaved (odd n^k, even arithmetic or doubling steps)".into()
            }
            PatternKey::FibonacciLike { .. }       => "Fibonacci-like".into(),
            PatternKey::Primes                     => "prime numbers".into(),
            PatternKey::DigitProduct               => "digit product".into(),
            PatternKey::RepeatingDiff { .. }       => "repeating difference pattern".into(),
            PatternKey::PowerSteps { steps: StepKind::Squares }  => "step sizes n^2".into(),
            PatternKey::PowerSteps { steps: StepKind::Doubling } => "step sizes 2^n".into(),
            PatternKey::Unknown                    => "unknown".into(),
        }
    }

    /// Re-express the parameters in another value type.
    pub fn map<U, F: Fn(T) -> U>(&self, f: F) -> PatternKey<U> {
        match self {
            PatternKey::Arithmetic { difference } => PatternKey::Arithmetic { difference: f(*difference) },
            PatternKey::Geometric { ratio } => PatternKey::Geometric { ratio: *ratio },
            PatternKey::GeometricFractional { ratio } => PatternKey::GeometricFractional { ratio: *ratio },
            PatternKey::PolyK { degree, offset, constant } => PatternKey::PolyK {
                degree: *degree,
                offset: *offset,
                constant: constant.map(&f),
            },
            PatternKey::Quadratic { first_diff, second_diff } => PatternKey::Quadratic {
                first_diff: f(*first_diff),
                second_diff: f(*second_diff),
            },
            PatternKey::Polygonal { shape, index } => PatternKey::Polygonal { shape: *shape, index: *index },
            PatternKey::AltAddSub { add, sub } => PatternKey::AltAddSub { add: f(*add), sub: f(*sub) },
            PatternKey::AltDoubling { first_delta } => PatternKey::AltDoubling { first_delta: f(*first_delta) },
            PatternKey::InterleavedTwoAps { odd_delta, even_delta } => PatternKey::InterleavedTwoAps {
                odd_delta: f(*odd_delta),
                even_delta: f(*even_delta),
            },
            PatternKey::InterleavedMixedPoly { odd_degree, even_mode } => PatternKey::InterleavedMixedPoly {
                odd_degree: *odd_degree,
                even_mode: *even_mode,
            },
            PatternKey::FibonacciLike { seeds } => PatternKey::FibonacciLike { seeds: [f(seeds[0]), f(seeds[1])] },
            PatternKey::Primes => PatternKey::Primes,
            PatternKey::DigitProduct => PatternKey::DigitProduct,
            PatternKey::RepeatingDiff { pattern, period } => PatternKey::RepeatingDiff {
                pattern: pattern.iter().map(|v| f(*v)).collect(),
                period: *period,
            },
            PatternKey::PowerSteps { steps } => PatternKey::PowerSteps { steps: *steps },
            PatternKey::Unknown => PatternKey::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// One generating rule the facade can draw a question from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    Arithmetic,
    Geometric,
    GeometricFractional,
    IncreasingDiffs,
    AltAddSub,
    AltDoubling,
    InterleavedTwoAps,
    InterleavedMixedPoly,
    FibonacciLike,
    Primes,
    Polygonal,
    Quadratic,
    RepeatingDiff,
    PowerSteps,
    DigitProduct,
    PolyK,
}

impl GeneratorKind {
    /// Integer-valued generators, in registry order.
    pub const INTEGER: [GeneratorKind; 15] = [
        GeneratorKind::Arithmetic,
        GeneratorKind::Geometric,
        GeneratorKind::IncreasingDiffs,
        GeneratorKind::AltAddSub,
        GeneratorKind::AltDoubling,
        GeneratorKind::InterleavedTwoAps,
        GeneratorKind::InterleavedMixedPoly,
        GeneratorKind::FibonacciLike,
        GeneratorKind::Primes,
        GeneratorKind::Polygonal,
        GeneratorKind::Quadratic,
        GeneratorKind::RepeatingDiff,
        GeneratorKind::PowerSteps,
        GeneratorKind::DigitProduct,
        GeneratorKind::PolyK,
    ];

    /// Real-valued generators.
    pub const REAL: [GeneratorKind; 1] = [GeneratorKind::GeometricFractional];

    pub fn as_str(self) -> &'static str {
        match self {
            GeneratorKind::Arithmetic           => "arithmetic",
            GeneratorKind::Geometric            => "geometric",
            GeneratorKind::GeometricFractional  => "geometric_fractional",
            GeneratorKind::IncreasingDiffs      => "increasing_diffs",
            GeneratorKind::AltAddSub            => "alt_add_sub",
            GeneratorKind::AltDoubling          => "alt_doubling",
            GeneratorKind::InterleavedTwoAps    => "interleaved_two_aps",
            GeneratorKind::InterleavedMixedPoly => "interleaved_mixed_poly",
            GeneratorKind::FibonacciLike        => "fibonacci_like",
            GeneratorKind::Primes               => "primes",
            GeneratorKind::Polygonal            => "polygonal",
            GeneratorKind::Quadratic            => "quadratic",
            GeneratorKind::RepeatingDiff        => "repeating_diff",
            GeneratorKind::PowerSteps           => "power_steps",
            GeneratorKind::DigitProduct         => "digit_product",
            GeneratorKind::PolyK                => "poly_k",
        }
    }

    /// The pattern tag this generator declares on its output.
    pub fn pattern_kind(self) -> PatternKind {
        match self {
            GeneratorKind::Arithmetic           => PatternKind::Arithmetic,
            GeneratorKind::Geometric            => PatternKind::Geometric,
            GeneratorKind::GeometricFractional  => PatternKind::GeometricFractional,
            GeneratorKind::IncreasingDiffs      => PatternKind::Quadratic,
            GeneratorKind::AltAddSub            => PatternKind::AltAddSub,
            GeneratorKind::AltDoubling          => PatternKind::AltDoubling,
            GeneratorKind::InterleavedTwoAps    => PatternKind::InterleavedTwoAps,
            GeneratorKind::InterleavedMixedPoly => PatternKind::InterleavedMixedPoly,
            GeneratorKind::FibonacciLike        => PatternKind::FibonacciLike,
            GeneratorKind::Primes               => PatternKind::Primes,
            GeneratorKind::Polygonal            => PatternKind::Polygonal,
            GeneratorKind::Quadratic            => PatternKind::Quadratic,
            GeneratorKind::RepeatingDiff        => PatternKind::RepeatingDiff,
            GeneratorKind::PowerSteps           => PatternKind::PowerSteps,
            GeneratorKind::DigitProduct         => PatternKind::DigitProduct,
            GeneratorKind::PolyK                => PatternKind::PolyK,
        }
    }

    /// Whether a classification of this generator's output as `found` is
    /// acceptable: either the declared tag or a more general one that
    /// describes the same sequences.
    pub fn accepts(self, found: PatternKind) -> bool {
        if found == self.pattern_kind() {
            return true;
        }
        match self {
            // A quadratic may happen to be consecutive triangular numbers or squares.
            GeneratorKind::IncreasingDiffs | GeneratorKind::Quadratic => found == PatternKind::Polygonal,
            // A period-2 cycle is exactly an alternating two-step pattern.
            GeneratorKind::RepeatingDiff => found == PatternKind::AltAddSub,
            // Cumulative squares are a cubic polynomial.
            GeneratorKind::PowerSteps => found == PatternKind::PolyK,
            _ => false,
        }
    }
}

impl FromStr for GeneratorKind {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        GeneratorKind::INTEGER
            .into_iter()
            .chain(GeneratorKind::REAL)
            .find(|k| k.as_str() == key)
            .ok_or_else(|| SequenceError::UnknownGenerator(s.to_string()))
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Ask mode
// ---------------------------------------------------------------------------

/// Which position of the sequence the learner must supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AskMode {
    Next,
    Missing,
}

/// Requested ask mode; `Both` picks one per question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AskModeRequest {
    Next,
    Missing,
    #[default]
    Both,
}

impl FromStr for AskModeRequest {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next"    => Ok(AskModeRequest::Next),
            "missing" => Ok(AskModeRequest::Missing),
            "both"    => Ok(AskModeRequest::Both),
            _         => Err(SequenceError::UnknownAskMode(s.to_string())),
        }
    }
}

impl fmt::Display for AskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AskMode::Next    => write!(f, "next"),
            AskMode::Missing => write!(f, "missing"),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Everything the facade needs to produce a question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceRequest {
    pub difficulty: Difficulty,
    /// Allowed generators; empty means the full pool of the value domain.
    pub patterns: Vec<GeneratorKind>,
    pub rng_seed: Option<u64>,
    pub ask_mode: AskModeRequest,
}

impl SequenceRequest {
    /// Full pool, fresh entropy, ask mode `both`.
    pub fn new(difficulty: Difficulty) -> Self {
        SequenceRequest { difficulty, ..Default::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_patterns(mut self, patterns: impl IntoIterator<Item = GeneratorKind>) -> Self {
        self.patterns = patterns.into_iter().collect();
        self
    }

    pub fn with_ask_mode(mut self, ask_mode: AskModeRequest) -> Self {
        self.ask_mode = ask_mode;
        self
    }
}

/// Strongly typed metadata attached to a generated question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionMeta {
    pub generator: GeneratorKind,
    /// Human-readable name of the rule, e.g. "increasing differences".
    pub label: String,
    pub difficulty: Difficulty,
    pub ask_mode: AskMode,
    /// Index of the hidden value for `AskMode::Missing`.
    pub hidden_index: Option<usize>,
    /// 1-based position of the value the learner must supply.
    pub asked_position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult<T> {
    pub pattern_key: PatternKey<T>,
    pub question_text: String,
    /// The full visible sequence (the hidden value is still present here).
    pub sequence: Vec<T>,
    pub answer: T,
    pub explanation: String,
    pub recognition_hint: String,
    pub evidence_text: String,
    pub metadata: QuestionMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult<T> {
    pub pattern_key: PatternKey<T>,
    pub label: String,
    pub recognition_hint: String,
    pub evidence_text: String,
    pub predicted_value: Option<T>,
    /// Fixed per pattern, in `[0, 1]`.
    pub confidence: f64,
}

impl<T: Copy> ClassificationResult<T> {
    pub fn kind(&self) -> PatternKind {
        self.pattern_key.kind()
    }

    /// The fallback result: no detector matched.
    pub fn unknown(confidence: f64) -> Self {
        ClassificationResult {
            pattern_key: PatternKey::Unknown,
            label: PatternKey::<T>::Unknown.label(),
            recognition_hint: String::new(),
            evidence_text: String::new(),
            predicted_value: None,
            confidence,
        }
    }
}
