//! ordered-hashmap: a single-threaded map that keeps values in a
//! caller-controlled order and resolves string keys to positions in O(1)
//! average time.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: offer the positional operations a plain hash map lacks
//!   (prepend, insert at an index, access by index) without giving up
//!   keyed lookup.
//! - Layout:
//!   - `entries: Vec<Entry<V>>`: the sequence. An entry's position is its
//!     index in this vector.
//!   - `index: HashTable<usize>`: key -> position. Slots store positions
//!     only; equality is resolved through the entry the position points at.
//!   - `KeySource`: produces keys for values inserted without one.
//!
//! Invariants (hold whenever no `&mut self` method is running)
//! - `index.len() == entries.len()`.
//! - The positions stored in `index` are exactly `0..entries.len()`, each
//!   once, and each resolves back to the entry holding that key.
//! - Keys are unique; inserting a present key fails with
//!   `InsertError::DuplicateKey`.
//!
//! Failure boundaries
//! - Every insert validates the position and resolves the key before
//!   touching either structure, so an `Err` leaves the map unchanged.
//! - Lookups return `Option`; a stored value is never mistaken for absence.
//!
//! Hasher invariants
//! - Each entry stores its precomputed `u64` hash. Growing or renumbering
//!   the index never rehashes keys.
//!
//! Cost
//! - `append` and all lookups are O(1) average.
//! - `prepend`, `insert_at`, and `delete_by_key` renumber the index in O(n).
//!
//! Notes and non-goals
//! - Single-threaded: mutation takes `&mut self`; share behind a lock.
//! - No iteration, bulk transforms, sorting, or serialization.
//! - Generated keys are checked against live keys and redrawn a bounded
//!   number of times (`Config::with_max_key_attempts`).

mod config;
mod keys;
mod ordered_hash_map;
mod ordered_hash_map_proptest;

// Public surface
pub use config::{Config, DEFAULT_MAX_KEY_ATTEMPTS};
pub use keys::{KeySource, RandomKeys};
pub use ordered_hash_map::{InsertError, OrderedHashMap, Placement};
