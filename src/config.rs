//! Construction-time settings for `OrderedHashMap`.

/// Generated-key attempts made before an insert gives up.
pub const DEFAULT_MAX_KEY_ATTEMPTS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    max_key_attempts: usize,
    capacity: usize,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            max_key_attempts: DEFAULT_MAX_KEY_ATTEMPTS,
            capacity: 0,
        }
    }

    /// Bound on how many keys are drawn from the `KeySource` for a single
    /// insert without a caller key. Zero is treated as one.
    pub const fn with_max_key_attempts(mut self, attempts: usize) -> Self {
        self.max_key_attempts = if attempts == 0 { 1 } else { attempts };
        self
    }

    /// Preallocate room for `capacity` entries in both the sequence and the index.
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub const fn max_key_attempts(&self) -> usize {
        self.max_key_attempts
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.max_key_attempts(), DEFAULT_MAX_KEY_ATTEMPTS);
        assert_eq!(c.capacity(), 0);
        assert_eq!(c, Config::new());
    }

    /// Invariant: at least one key is always attempted.
    #[test]
    fn zero_attempts_clamped_to_one() {
        let c = Config::new().with_max_key_attempts(0);
        assert_eq!(c.max_key_attempts(), 1);
    }

    #[test]
    fn builder_setters_compose() {
        let c = Config::new().with_capacity(64).with_max_key_attempts(3);
        assert_eq!(c.capacity(), 64);
        assert_eq!(c.max_key_attempts(), 3);
    }
}
