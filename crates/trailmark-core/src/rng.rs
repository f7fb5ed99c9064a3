//! Random number generator abstraction for determinism.
//!
//! In production this wraps a real RNG. In tests a seeded or recorded
//! implementation is injected, which makes session-token issuance
//! reproducible.

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// Production RNG backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRng;

impl DeterministicRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        use rand::Rng;
        rand::rng().random_range(min..=max)
    }
}
