use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::level_generator::{CoinFlip, HeightPolicy, LevelGenerator};
use crate::{SkipMap, SkipMapError};

#[derive(Debug, Clone)]
enum Op {
    Insert(u16, u32),
    Erase(u16),
    Find(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<u16>(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => any::<u16>().prop_map(Op::Erase),
        1 => any::<u16>().prop_map(Op::Find),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn keys_sorted_and_counted(keys in prop::collection::vec(any::<u32>(), 0..300)) {
        let mut sm = SkipMap::new();
        let mut model = BTreeMap::new();
        for &key in &keys {
            prop_assert_eq!(sm.insert(key, ()).is_some(), model.insert(key, ()).is_none());
        }
        sm.check();
        prop_assert_eq!(sm.len(), model.len());
        prop_assert_eq!(sm.keys_in_order(), model.keys().copied().collect::<Vec<_>>());
    }

    #[test]
    fn failed_insert_changes_nothing(keys in prop::collection::vec(any::<u16>(), 1..200)) {
        let mut sm: SkipMap<u16, usize> = SkipMap::new();
        for (i, &key) in keys.iter().enumerate() {
            sm.insert(key, i);
        }
        let before = sm.debug_structure();
        let len = sm.len();
        for &key in &keys {
            let value = sm.get(&key).copied();
            prop_assert_eq!(sm.try_insert(key, usize::MAX), Err(SkipMapError::AlreadyExists));
            prop_assert_eq!(sm.get(&key).copied(), value);
        }
        prop_assert_eq!(sm.len(), len);
        prop_assert_eq!(sm.debug_structure(), before);
    }

    #[test]
    fn identical_insertions_identical_heights(keys in prop::collection::vec(any::<u32>(), 0..300)) {
        let a: SkipMap<u32, ()> = keys.iter().map(|&k| (k, ())).collect();
        let b: SkipMap<u32, ()> = keys.iter().map(|&k| (k, ())).collect();
        prop_assert_eq!(a.layer_count(), b.layer_count());
        for key in &keys {
            prop_assert_eq!(a.height(key), b.height(key));
        }
        prop_assert_eq!(a.debug_structure(), b.debug_structure());
    }

    #[test]
    fn heights_match_generator(keys in prop::collection::btree_set(any::<u32>(), 1..300)) {
        let generator = CoinFlip::default();
        let sm: SkipMap<u32, ()> = keys.iter().map(|&k| (k, ())).collect();
        for (inserted_before, key) in keys.iter().enumerate() {
            let limit = LevelGenerator::<u32>::limit(&generator, inserted_before + 1);
            let expected = generator.height(key, limit);
            prop_assert_eq!(sm.height(key), Ok(expected));
            prop_assert_eq!(sm.layers_holding(key), expected);
        }
    }

    #[test]
    fn heights_within_limit(keys in prop::collection::btree_set(any::<u32>(), 1..500)) {
        let sm: SkipMap<u32, ()> = keys.iter().map(|&k| (k, ())).collect();
        let limit = HeightPolicy::default().limit(sm.len());
        for key in &keys {
            let height = sm.height(key);
            prop_assert!(
                matches!(height, Ok(h) if (1..=limit).contains(&h)),
                "{height:?} > {limit}"
            );
        }
    }

    #[test]
    fn matches_btreemap(ops in prop::collection::vec(op_strategy(), 0..400)) {
        let mut sm = SkipMap::new();
        let mut model: BTreeMap<u16, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let inserted = sm.insert(k, v).is_some();
                    prop_assert_eq!(inserted, !model.contains_key(&k));
                    model.entry(k).or_insert(v);
                    prop_assert_eq!(sm.find(&k).map(|(v, _)| *v), Ok(model[&k]));
                }
                Op::Erase(k) => {
                    let len = sm.len();
                    match model.remove(&k) {
                        Some(v) => {
                            prop_assert_eq!(sm.erase(&k), Ok(v));
                            prop_assert_eq!(sm.len(), len - 1);
                        }
                        None => {
                            prop_assert_eq!(sm.erase(&k), Err(SkipMapError::NotFound));
                        }
                    }
                    prop_assert_eq!(sm.find(&k).err(), Some(SkipMapError::NotFound));
                }
                Op::Find(k) => {
                    prop_assert_eq!(sm.get(&k), model.get(&k));
                }
            }
        }

        sm.check();
        prop_assert_eq!(sm.len(), model.len());
        prop_assert!(sm.iter().map(|(k, v)| (*k, *v)).eq(model.iter().map(|(k, v)| (*k, *v))));
    }

    #[test]
    fn neighbours_match_btreemap(keys in prop::collection::btree_set(any::<u16>(), 1..200)) {
        let sm: SkipMap<u16, ()> = keys.iter().map(|&k| (k, ())).collect();
        let sorted: Vec<u16> = keys.iter().copied().collect();

        for (i, key) in sorted.iter().enumerate() {
            let next = sorted.get(i + 1).ok_or(SkipMapError::NoSuccessor);
            let previous = i
                .checked_sub(1)
                .and_then(|j| sorted.get(j))
                .ok_or(SkipMapError::NoPredecessor);
            prop_assert_eq!(sm.next_key(key), next);
            prop_assert_eq!(sm.previous_key(key), previous);
            prop_assert_eq!(sm.is_smallest_key(key), Ok(i == 0));
            prop_assert_eq!(sm.is_largest_key(key), Ok(i + 1 == sorted.len()));
        }
    }
}
