//! Synthetic stage-detail provider.
//!
//! The simulated pipeline needs two pieces of fabricated data per run: the
//! placeholder detail text a completed stage reports, and the failure index
//! for an error-keyword run. Both come through [`StageDetailSource`] so a
//! real system could plug in actual computation results, and so tests can
//! pin either value.

use std::sync::Mutex;

use flowtty_types::flow::StageDefinition;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Charset for detail tokens: lowercase alphanumeric, base36-style.
const DETAIL_TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the random token embedded in success details.
const DETAIL_TOKEN_LENGTH: usize = 6;

/// Supplies the fabricated per-stage data used by the simulated pipeline.
pub trait StageDetailSource: Send + Sync {
    /// Placeholder detail text for a successfully completed stage. Opaque;
    /// callers must not parse it.
    fn success_details(&self, stage: &StageDefinition) -> String;

    /// Failure point for an error-keyword run. Must be in
    /// `1..stage_count`; index 0 never fails.
    fn error_stage_index(&self, stage_count: usize) -> usize;
}

/// Default detail source sampling a seedable RNG.
///
/// `new` seeds from OS entropy for interactive use; `with_seed` produces a
/// reproducible sequence for tests and scripted demos.
#[derive(Debug)]
pub struct SampledDetailSource {
    rng: Mutex<StdRng>,
}

impl SampledDetailSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SampledDetailSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StageDetailSource for SampledDetailSource {
    fn success_details(&self, _stage: &StageDefinition) -> String {
        let mut rng = self.rng.lock().expect("detail source lock poisoned");
        let token: String = (0..DETAIL_TOKEN_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..DETAIL_TOKEN_CHARSET.len());
                DETAIL_TOKEN_CHARSET[idx] as char
            })
            .collect();
        format!("Processed {token}")
    }

    fn error_stage_index(&self, stage_count: usize) -> usize {
        let mut rng = self.rng.lock().expect("detail source lock poisoned");
        rng.gen_range(1..stage_count.max(2))
    }
}
