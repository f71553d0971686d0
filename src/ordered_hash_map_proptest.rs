#![cfg(test)]

// Property tests for OrderedHashMap kept inside the crate so they can check
// the internal index against the sequence after every step.

use crate::config::Config;
use crate::keys::RandomKeys;
use crate::ordered_hash_map::{InsertError, OrderedHashMap};
use proptest::prelude::*;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length. A `None` key slot asks
// the map to generate one.
#[derive(Clone, Debug)]
enum OpI {
    Append(Option<usize>, i32),
    Prepend(Option<usize>, i32),
    InsertAt(usize, Option<usize>, i32),
    Delete(usize),
    GetByKey(usize),
    GetByIndex(usize),
    Mutate(usize, i32),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let key = {
            let idx = idx.clone();
            move || proptest::option::weighted(0.8, idx.clone())
        };
        let op = prop_oneof![
            (key(), any::<i32>()).prop_map(|(k, v)| OpI::Append(k, v)),
            (key(), any::<i32>()).prop_map(|(k, v)| OpI::Prepend(k, v)),
            (0usize..12, key(), any::<i32>()).prop_map(|(p, k, v)| OpI::InsertAt(p, k, v)),
            idx.clone().prop_map(OpI::Delete),
            idx.clone().prop_map(OpI::GetByKey),
            (0usize..12).prop_map(OpI::GetByIndex),
            (idx, any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn model_position(model: &[(String, i32)], key: &str) -> Option<usize> {
    model.iter().position(|(k, _)| k == key)
}

fn run<S: BuildHasher>(
    mut sut: OrderedHashMap<i32, S, RandomKeys>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: Vec<(String, i32)> = Vec::new();

    for op in ops {
        // Placement ops share one path: (position, key slot, value).
        let insert = match op {
            OpI::Append(k, v) => Some((model.len(), k, v)),
            OpI::Prepend(k, v) => Some((0, k, v)),
            OpI::InsertAt(p, k, v) => Some((p, k, v)),
            _ => None,
        };

        if let Some((position, k, v)) = insert {
            let key = k.map(|i| pool[i].as_str());
            let before: Vec<(String, Option<usize>)> = model
                .iter()
                .map(|(mk, _)| (mk.clone(), sut.get_index_by_key(mk)))
                .collect();
            let res = match op {
                OpI::Append(..) => sut.append(key, v),
                OpI::Prepend(..) => sut.prepend(key, v),
                _ => sut.insert_at(position, v, key),
            };
            match res {
                Ok(placed) => {
                    prop_assert!(position <= model.len());
                    prop_assert_eq!(placed.position, position);
                    if let Some(k) = key {
                        prop_assert_eq!(placed.key.as_str(), k);
                    }
                    prop_assert!(model_position(&model, &placed.key).is_none());
                    prop_assert_eq!(sut.get_by_index(position), Some(&v));
                    // Keys at or after the slot move up by one; earlier ones stay.
                    for (mk, p) in before {
                        let p = p.expect("live key resolves");
                        let expect = if p >= position { p + 1 } else { p };
                        prop_assert_eq!(sut.get_index_by_key(&mk), Some(expect));
                    }
                    model.insert(position, (placed.key, v));
                }
                Err(InsertError::OutOfRange { position: p, len }) => {
                    prop_assert_eq!(p, position);
                    prop_assert_eq!(len, model.len());
                    prop_assert!(position > model.len());
                }
                Err(InsertError::DuplicateKey { key: dup }) => {
                    prop_assert_eq!(Some(dup.as_str()), key);
                    prop_assert!(model_position(&model, &dup).is_some());
                }
                Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
            }
        } else {
            match op {
                OpI::Delete(i) => {
                    let k = &pool[i];
                    let at = model_position(&model, k);
                    let before: Vec<(String, usize)> = model
                        .iter()
                        .enumerate()
                        .map(|(p, (mk, _))| (mk.clone(), p))
                        .collect();
                    prop_assert_eq!(sut.delete_by_key(k), at.is_some());
                    if let Some(at) = at {
                        model.remove(at);
                        for (mk, p) in before {
                            let now = sut.get_index_by_key(&mk);
                            if p < at {
                                prop_assert_eq!(now, Some(p));
                            } else if p > at {
                                prop_assert_eq!(now, Some(p - 1));
                            } else {
                                prop_assert_eq!(now, None);
                            }
                        }
                    }
                }
                OpI::GetByKey(i) => {
                    let k = &pool[i];
                    let at = model_position(&model, k);
                    prop_assert_eq!(sut.get_index_by_key(k), at);
                    prop_assert_eq!(sut.get_by_key(k), at.map(|p| &model[p].1));
                }
                OpI::GetByIndex(p) => {
                    prop_assert_eq!(sut.get_by_index(p), model.get(p).map(|(_, v)| v));
                }
                OpI::Mutate(i, d) => {
                    let k = &pool[i];
                    if let Some(at) = model_position(&model, k) {
                        let vr = sut.get_by_key_mut(k).expect("live key resolves");
                        *vr = vr.saturating_add(d);
                        model[at].1 = model[at].1.saturating_add(d);
                    } else {
                        prop_assert!(sut.get_by_key_mut(k).is_none());
                    }
                }
                _ => unreachable!(),
            }
        }

        // Post-conditions after each op
        // 1) Index and sequence agree structurally
        if let Err(msg) = sut.check_invariants() {
            prop_assert!(false, "{}", msg);
        }
        // 2) Order and size parity with the model
        let order: Vec<&str> = model.iter().map(|(k, _)| k.as_str()).collect();
        prop_assert_eq!(sut.keys_in_order(), order);
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        // 3) Every key round-trips through its position
        for (p, (k, v)) in model.iter().enumerate() {
            prop_assert_eq!(sut.get_index_by_key(k), Some(p));
            prop_assert_eq!(sut.get_by_key(k), Some(v));
        }
    }
    Ok(())
}

// Property: state-machine equivalence against a Vec<(key, value)> model.
// Invariants exercised across random operation sequences:
// - Successful inserts land at the requested position and shift later keys by +1.
// - Out-of-range and duplicate inserts fail without changing anything.
// - Deletes shift later keys by -1 and leave earlier keys alone.
// - Index slots are a dense permutation of positions after every op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut = OrderedHashMap::with_parts(Config::new(), RandomState::new(), RandomKeys::seeded(1));
        run(sut, pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants as above, with every key in one hash bucket.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = OrderedHashMap::with_parts(Config::new(), ConstBuildHasher, RandomKeys::seeded(2));
        run(sut, pool, ops)?;
    }
}
