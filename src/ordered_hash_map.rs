//! OrderedHashMap: positional sequence with a hashed key -> position index.

use crate::config::Config;
use crate::keys::{KeySource, RandomKeys};
use core::fmt;
use core::hash::BuildHasher;
use hashbrown::HashTable;
use std::collections::hash_map::RandomState;
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
    hash: u64,
}

/// Effective key and assigned position of a successful insert.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Placement {
    pub key: String,
    pub position: usize,
}

#[non_exhaustive]
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum InsertError {
    /// The caller-supplied key is already present.
    #[error("key already present: {key:?}")]
    DuplicateKey { key: String },

    /// `insert_at` target lies past the end of the sequence.
    #[error("position {position} out of range for length {len}")]
    OutOfRange { position: usize, len: usize },

    /// Every generated key collided with a live key.
    #[error("no free key after {attempts} generated attempts")]
    KeyExhausted { attempts: usize },
}

pub struct OrderedHashMap<V, S = RandomState, G = RandomKeys> {
    hasher: S,
    keys: G,
    max_key_attempts: usize,
    index: HashTable<usize>,
    entries: Vec<Entry<V>>, // position == index in this vec
}

impl<V> OrderedHashMap<V> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_parts(config, RandomState::new(), RandomKeys::new())
    }
}

impl<V> Default for OrderedHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> OrderedHashMap<V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_parts(Config::default(), hasher, RandomKeys::new())
    }
}

impl<V, S, G> OrderedHashMap<V, S, G>
where
    S: BuildHasher,
    G: KeySource,
{
    pub fn with_parts(config: Config, hasher: S, keys: G) -> Self {
        Self {
            hasher,
            keys,
            max_key_attempts: config.max_key_attempts(),
            index: HashTable::with_capacity(config.capacity()),
            entries: Vec::with_capacity(config.capacity()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn make_hash(&self, key: &str) -> u64 {
        self.hasher.hash_one(key)
    }

    fn find(&self, hash: u64, key: &str) -> Option<usize> {
        self.index
            .find(hash, |&p| {
                self.entries
                    .get(p)
                    .map(|e| e.key == key)
                    .unwrap_or(false)
            })
            .copied()
    }

    /// Pick the key for a new entry. Caller keys must be free; generated
    /// keys are redrawn up to `max_key_attempts` times.
    fn resolve_key(&mut self, key: Option<&str>) -> Result<(String, u64), InsertError> {
        if let Some(key) = key {
            let hash = self.make_hash(key);
            if self.find(hash, key).is_some() {
                return Err(InsertError::DuplicateKey {
                    key: key.to_owned(),
                });
            }
            return Ok((key.to_owned(), hash));
        }

        for attempt in 1..=self.max_key_attempts {
            let key = self.keys.next_key();
            let hash = self.make_hash(&key);
            if self.find(hash, &key).is_none() {
                return Ok((key, hash));
            }
            debug!(attempt, key = %key, "generated key collided, redrawing");
        }
        warn!(
            attempts = self.max_key_attempts,
            len = self.entries.len(),
            "generated keys exhausted"
        );
        Err(InsertError::KeyExhausted {
            attempts: self.max_key_attempts,
        })
    }

    /// Insert `value` at position 0; every existing entry moves up by one.
    pub fn prepend(&mut self, key: Option<&str>, value: V) -> Result<Placement, InsertError> {
        self.insert_at(0, value, key)
    }

    /// Insert `value` at position `len()`; no other position changes.
    pub fn append(&mut self, key: Option<&str>, value: V) -> Result<Placement, InsertError> {
        self.insert_at(self.entries.len(), value, key)
    }

    /// Insert `value` so it occupies `position`. Entries at `position` and
    /// after move up by one. `position == len()` appends.
    pub fn insert_at(
        &mut self,
        position: usize,
        value: V,
        key: Option<&str>,
    ) -> Result<Placement, InsertError> {
        let len = self.entries.len();
        if position > len {
            return Err(InsertError::OutOfRange { position, len });
        }
        let (key, hash) = self.resolve_key(key)?;

        self.entries.insert(
            position,
            Entry {
                key: key.clone(),
                value,
                hash,
            },
        );
        if position < len {
            for p in self.index.iter_mut() {
                if *p >= position {
                    *p += 1;
                }
            }
        }
        // Rehash callback reads stored hashes; entries already match the shifted positions.
        self.index.insert_unique(hash, position, |&p| {
            self.entries.get(p).map(|e| e.hash).unwrap_or(0)
        });

        trace!(position, len = self.entries.len(), "inserted entry");
        Ok(Placement { key, position })
    }

    pub fn get_index_by_key(&self, key: &str) -> Option<usize> {
        self.find(self.make_hash(key), key)
    }

    pub fn get_by_key(&self, key: &str) -> Option<&V> {
        let position = self.get_index_by_key(key)?;
        self.get_by_index(position)
    }

    pub fn get_by_key_mut(&mut self, key: &str) -> Option<&mut V> {
        let position = self.get_index_by_key(key)?;
        self.get_by_index_mut(position)
    }

    pub fn get_by_index(&self, position: usize) -> Option<&V> {
        self.entries.get(position).map(|e| &e.value)
    }

    pub fn get_by_index_mut(&mut self, position: usize) -> Option<&mut V> {
        self.entries.get_mut(position).map(|e| &mut e.value)
    }

    /// Remove the entry for `key` and return it. Later entries move down by one.
    pub fn remove_by_key(&mut self, key: &str) -> Option<(String, V)> {
        let hash = self.make_hash(key);
        let (position, _) = self
            .index
            .find_entry(hash, |&p| {
                self.entries
                    .get(p)
                    .map(|e| e.key == key)
                    .unwrap_or(false)
            })
            .ok()?
            .remove();

        let entry = self.entries.remove(position);
        for p in self.index.iter_mut() {
            if *p > position {
                *p -= 1;
            }
        }

        trace!(position, len = self.entries.len(), "removed entry");
        Some((entry.key, entry.value))
    }

    /// Returns `false` without side effects when `key` is absent.
    pub fn delete_by_key(&mut self, key: &str) -> bool {
        self.remove_by_key(key).is_some()
    }
}

impl<V, S, G> fmt::Debug for OrderedHashMap<V, S, G>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (&e.key, &e.value)))
            .finish()
    }
}

#[cfg(test)]
impl<V, S, G> OrderedHashMap<V, S, G>
where
    S: BuildHasher,
    G: KeySource,
{
    /// Check sizes, position density, and key -> position -> entry resolution.
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        if self.index.len() != self.entries.len() {
            return Err(format!(
                "index has {} slots, sequence has {} entries",
                self.index.len(),
                self.entries.len()
            ));
        }
        let mut seen = vec![false; self.entries.len()];
        for &p in self.index.iter() {
            match seen.get_mut(p) {
                None => return Err(format!("position {p} out of bounds")),
                Some(true) => return Err(format!("position {p} stored twice")),
                Some(s) => *s = true,
            }
        }
        for (p, e) in self.entries.iter().enumerate() {
            if e.hash != self.make_hash(&e.key) {
                return Err(format!("stale hash for {:?}", e.key));
            }
            if self.find(e.hash, &e.key) != Some(p) {
                return Err(format!("{:?} does not resolve to {p}", e.key));
            }
        }
        Ok(())
    }

    pub(crate) fn keys_in_order(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }
}
