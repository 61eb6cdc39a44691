//! Process-wide random source for file names and API keys.
//!
//! Seeded once at startup and shared by every generator. Tests pass a fixed
//! seed to get reproducible draws.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Mixed-case letters and digits, 62 symbols, no separators.
pub const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Clone)]
pub struct RandomSource {
    rng: Arc<Mutex<StdRng>>,
}

impl RandomSource {
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Seeded when a seed is configured, otherwise from OS entropy.
    pub fn from_config(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// `len` independent draws from [`ALPHANUMERIC`].
    pub fn alphanumeric(&self, len: usize) -> String {
        let mut rng = self.lock();
        (0..len)
            .map(|_| ALPHANUMERIC[rng.gen_range(0..ALPHANUMERIC.len())] as char)
            .collect()
    }

    /// A random (version 4) UUID drawn from this source.
    pub fn uuid(&self) -> Uuid {
        let bytes: [u8; 16] = self.lock().r#gen();
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    // A panic while holding the lock cannot leave StdRng half-updated in a way
    // that matters for uniform draws.
    fn lock(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
