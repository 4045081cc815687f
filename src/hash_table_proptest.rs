#![cfg(test)]

// Property tests for HashTable, run with the crate's unit tests against a
// std HashMap model.

use crate::error::TableError;
use crate::hash_table::HashTable;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    RemoveWithKey(usize),
    Lookup(usize),
    HasValue(i32),
    Bump(i32),
    Snapshot,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<u32>, Vec<OpI>)> {
    proptest::collection::vec(0u32..2_000, 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::RemoveWithKey),
            2 => idx.clone().prop_map(OpI::Lookup),
            1 => any::<i32>().prop_map(OpI::HasValue),
            1 => (-5i32..5).prop_map(OpI::Bump),
            1 => Just(OpI::Snapshot),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_against_model(
    mut sut: HashTable<u32, i32>,
    hash: fn(&u32) -> i64,
    pool: Vec<u32>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<u32, i32> = HashMap::new();
    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = pool[i];
                match sut.insert(k, v) {
                    Ok(prev) => {
                        prop_assert!(hash(&k) > 0);
                        prop_assert_eq!(prev, model.insert(k, v));
                    }
                    Err(TableError::InvalidKey(h)) => {
                        prop_assert!(h <= 0);
                        prop_assert_eq!(h, hash(&k));
                    }
                    Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                }
            }
            OpI::Remove(i) => {
                let k = pool[i];
                match sut.remove(&k) {
                    Ok(v) => prop_assert_eq!(v, model.remove(&k)),
                    Err(TableError::InvalidKey(_)) => prop_assert!(hash(&k) <= 0),
                    Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                }
            }
            OpI::RemoveWithKey(i) => {
                let k = pool[i];
                if let Ok(res) = sut.remove_with_key(&k) {
                    let expected = model.remove(&k).map(|v| (k, v));
                    prop_assert_eq!(res, expected);
                }
            }
            OpI::Lookup(i) => {
                let k = pool[i];
                match sut.lookup(&k) {
                    Ok(v) => prop_assert_eq!(v, model.get(&k)),
                    Err(_) => prop_assert!(hash(&k) <= 0),
                }
                prop_assert_eq!(sut.has_key(&k), model.contains_key(&k));
            }
            OpI::HasValue(v) => {
                let expected = model.values().any(|mv| *mv == v);
                prop_assert_eq!(sut.has_value(&v), expected);
            }
            OpI::Bump(d) => {
                sut.apply_to_all(|_, v| *v = v.wrapping_add(d));
                for v in model.values_mut() {
                    *v = v.wrapping_add(d);
                }
            }
            OpI::Snapshot => {
                let keys = sut.keys();
                let values = sut.values();
                prop_assert_eq!(keys.len(), sut.len());
                prop_assert_eq!(values.len(), sut.len());
                let paired: BTreeMap<u32, i32> =
                    keys.iter().copied().zip(values.iter().copied()).collect();
                let expected: BTreeMap<u32, i32> =
                    model.iter().map(|(k, v)| (*k, *v)).collect();
                prop_assert_eq!(paired, expected);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.iter().count(), model.len());
        for b in 0..sut.no_buckets() {
            let hashes = chain_hashes(&sut, hash, b);
            prop_assert!(hashes.windows(2).all(|w| w[0] <= w[1]));
        }
    }
    Ok(())
}

fn chain_hashes(t: &HashTable<u32, i32>, hash: fn(&u32) -> i64, bucket: usize) -> Vec<i64> {
    // Iteration walks buckets in order, so one bucket's chain is the run of
    // entries whose hash maps to it.
    t.iter()
        .map(|(k, _)| hash(k))
        .filter(|h| *h > 0 && (*h as usize) % t.no_buckets() == bucket)
        .collect()
}

fn identity_hash(k: &u32) -> i64 {
    i64::from(*k)
}

// Only eight distinct hashes: long equal-hash runs inside each chain.
fn colliding_hash(k: &u32) -> i64 {
    i64::from(*k % 8)
}

fn u32_table(hash: fn(&u32) -> i64, load_factor: f64) -> HashTable<u32, i32> {
    let config = crate::config::TableConfig::default().with_load_factor(load_factor);
    HashTable::with_config(
        config,
        |a: &u32, b: &u32| a == b,
        |a: &i32, b: &i32| a == b,
        hash,
    )
    .expect("valid config")
}

// Property: State-machine equivalence against std::collections::HashMap.
// - insert returns the previous value exactly when the model had one.
// - remove/remove_with_key/lookup agree with the model; misses never mutate.
// - keys()/values() have len() entries and pair up positionally.
// - Chains stay in ascending hash order after every op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_against_model(u32_table(identity_hash, 14.0), identity_hash, pool, ops)?;
    }
}

// Property: Same invariants with a small load factor, so even a handful of
// keys walks the table through several growth steps and full rehashes.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_frequent_growth((pool, ops) in arb_scenario()) {
        run_against_model(u32_table(identity_hash, 0.25), identity_hash, pool, ops)?;
    }
}

// Property: Same invariants under heavy collisions (and key 0 mod 8 being
// an invalid key), stressing equal-hash runs and equality resolution.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_against_model(u32_table(colliding_hash, 14.0), colliding_hash, pool, ops)?;
    }
}
