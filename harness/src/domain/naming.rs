//! Random image names for builds that don't specify one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Length of generated image names.
pub const IMAGE_NAME_LEN: usize = 16;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Generates lowercase image names from an explicitly owned RNG.
///
/// Use [`ImageNamer::seeded`] in tests for a reproducible sequence.
#[derive(Debug)]
pub struct ImageNamer {
    rng: StdRng,
}

impl ImageNamer {
    /// A namer seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Next name: [`IMAGE_NAME_LEN`] letters from `a-z`.
    pub fn next_name(&mut self) -> String {
        (0..IMAGE_NAME_LEN)
            .map(|_| char::from(LETTERS[self.rng.random_range(0..LETTERS.len())]))
            .collect()
    }
}

impl Default for ImageNamer {
    fn default() -> Self {
        Self::from_entropy()
    }
}
