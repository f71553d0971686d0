//! Key sources for values inserted without a caller-supplied key.

use core::fmt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces candidate keys. Candidates need not be unique; the map redraws
/// on collision with a live key.
pub trait KeySource {
    fn next_key(&mut self) -> String;
}

impl<F> KeySource for F
where
    F: FnMut() -> String,
{
    fn next_key(&mut self) -> String {
        self()
    }
}

/// Default source: a random `u64` rendered in base 32 (`0-9a-v`).
/// Not cryptographically secure.
pub struct RandomKeys {
    rng: StdRng,
}

impl RandomKeys {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible key sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RandomKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomKeys").finish_non_exhaustive()
    }
}

impl KeySource for RandomKeys {
    fn next_key(&mut self) -> String {
        encode_base32(self.rng.gen())
    }
}

const DIGITS: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

// 64 bits / 5 bits per digit, rounded up.
const MAX_DIGITS: usize = 13;

fn encode_base32(mut n: u64) -> String {
    let mut buf = [0u8; MAX_DIGITS];
    let mut at = MAX_DIGITS;
    loop {
        at -= 1;
        buf[at] = DIGITS[(n & 0x1f) as usize];
        n >>= 5;
        if n == 0 {
            break;
        }
    }
    buf[at..].iter().copied().map(char::from).collect()
}
