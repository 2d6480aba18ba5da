use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use tracing::debug;

use crate::sequence_engine::{
    ask_mode::pose_question,
    distractors::make_choices_with_rng,
    models::{GenerationResult, GeneratorKind, SequenceRequest},
    numeric::SeqValue,
    patterns,
};

/// Seeded when a seed is given, otherwise fresh entropy for this call only.
fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    }
}

/// The requested generators that belong to `domain`, or all of `domain`
/// when none do.
pub fn effective_pool(requested: &[GeneratorKind], domain: &[GeneratorKind]) -> Vec<GeneratorKind> {
    let mut pool: Vec<GeneratorKind> = Vec::new();
    for kind in requested {
        if domain.contains(kind) && !pool.contains(kind) {
            pool.push(*kind);
        }
    }
    if pool.is_empty() {
        if !requested.is_empty() {
            debug!(?requested, "no requested generator fits the value domain, using the full pool");
        }
        return domain.to_vec();
    }
    pool
}

fn question_in<T: SeqValue, R: Rng>(
    request: &SequenceRequest,
    domain: &[GeneratorKind],
    rng: &mut R,
) -> GenerationResult<T> {
    let pool = effective_pool(&request.patterns, domain);
    let kind = pool[rng.gen_range(0..pool.len())];
    let raw = patterns::generate::<T, R>(rng, kind, request.difficulty);
    let result = pose_question(raw, kind, request.difficulty, request.ask_mode, rng);
    debug!(
        generator = %kind,
        difficulty = %request.difficulty,
        ask_mode = %result.metadata.ask_mode,
        len = result.sequence.len(),
        "generated question"
    );
    result
}

/// One integer-valued question. The request's seed, if any, is ignored;
/// all randomness comes from `rng`.
pub fn generate_question_with_rng<R: Rng>(request: &SequenceRequest, rng: &mut R) -> GenerationResult<i64> {
    question_in(request, &GeneratorKind::INTEGER, rng)
}

/// One real-valued question (fractional factors).
pub fn generate_real_question_with_rng<R: Rng>(request: &SequenceRequest, rng: &mut R) -> GenerationResult<f64> {
    question_in(request, &GeneratorKind::REAL, rng)
}

/// One integer-valued question, reproducible when `request.rng_seed` is set.
pub fn generate_question(request: &SequenceRequest) -> GenerationResult<i64> {
    generate_question_with_rng(request, &mut rng_for(request.rng_seed))
}

pub fn generate_real_question(request: &SequenceRequest) -> GenerationResult<f64> {
    generate_real_question_with_rng(request, &mut rng_for(request.rng_seed))
}

/// `n` questions. Each one gets its own seed drawn from the batch RNG, so a
/// seeded batch is reproducible as a whole.
pub fn generate_batch(n: usize, request: &SequenceRequest) -> Vec<GenerationResult<i64>> {
    batch_in(n, request, &GeneratorKind::INTEGER)
}

pub fn generate_real_batch(n: usize, request: &SequenceRequest) -> Vec<GenerationResult<f64>> {
    batch_in(n, request, &GeneratorKind::REAL)
}

fn batch_in<T: SeqValue>(n: usize, request: &SequenceRequest, domain: &[GeneratorKind]) -> Vec<GenerationResult<T>> {
    let mut master = rng_for(request.rng_seed);
    (0..n)
        .map(|_| {
            let mut item = StdRng::seed_from_u64(master.next_u64());
            question_in(request, domain, &mut item)
        })
        .collect()
}

/// `k` distinct answer options for `result`, the correct one among them
/// exactly once.
pub fn make_choices<T: SeqValue>(result: &GenerationResult<T>, k: usize, seed: Option<u64>) -> Vec<T> {
    make_choices_with_rng(result, k, &mut rng_for(seed))
}
