use alloc::collections::BTreeMap;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use proptest::prelude::*;

use crate::IntMap;
use crate::IntSet;

#[derive(Clone, Debug)]
enum Op {
    Insert(u64, u32),
    Remove(u64),
    Get(u64),
    Clone,
    Clear,
}

fn key_strategy() -> impl Strategy<Value = u64> + Clone {
    // A narrow key range forces overwrites, removals of present keys and long
    // collision runs; the wide range exercises arbitrary bit patterns.
    prop_oneof![
        3 => 0u64..64,
        1 => any::<u64>(),
    ]
}

fn fill_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.1), Just(0.5), Just(0.75), Just(0.9), Just(0.99)]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        30 => key.clone().prop_map(Op::Remove),
        17 => key.clone().prop_map(Op::Get),
        2 => Just(Op::Clone),
        1 => Just(Op::Clear),
    ];
    prop::collection::vec(op, 0..=2000)
}

fn assert_matches_model(map: &IntMap<u32>, model: &BTreeMap<u64, u32>) {
    assert_eq!(map.len(), model.len());
    for (&key, value) in model {
        assert_eq!(map.get(key), Some(value), "key {key}");
    }

    let mut seen: Vec<(u64, u32)> = map.iter().map(|(k, &v)| (k, v)).collect();
    seen.sort_unstable();
    assert!(seen.iter().copied().eq(model.iter().map(|(&k, &v)| (k, v))));
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btree_map(
        size_hint in 0usize..64,
        fill in fill_strategy(),
        ops in ops_strategy(),
    ) {
        let mut map: IntMap<u32> = IntMap::with_fill_factor(size_hint, fill).unwrap();
        let mut model: BTreeMap<u64, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert_eq!(map.insert(k, v), model.insert(k, v));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(map.remove(k), model.remove(&k));
                    prop_assert_eq!(map.get(k), None);
                }
                Op::Get(k) => {
                    prop_assert_eq!(map.get(k), model.get(&k));
                }
                Op::Clone => {
                    let snapshot = map.clone();
                    snapshot.assert_invariants();
                    assert_matches_model(&snapshot, &model);

                    // Mutating the original must not leak into the snapshot.
                    map.clear();
                    assert_matches_model(&snapshot, &model);
                    model.clear();
                }
                Op::Clear => {
                    let capacity = map.capacity();
                    map.clear();
                    model.clear();
                    prop_assert_eq!(map.capacity(), capacity);
                }
            }

            map.assert_invariants();
            prop_assert!(map.len() <= map.capacity());
        }

        assert_matches_model(&map, &model);
    }

    #[test]
    fn prop_remove_subset(
        keys in prop::collection::btree_set(any::<u64>(), 0..3000),
        fill in fill_strategy(),
        seed in any::<u64>(),
    ) {
        let mut map = IntMap::with_fill_factor(0, fill).unwrap();
        for &key in &keys {
            map.insert(key, !key);
        }
        map.assert_invariants();

        let (removed, kept): (BTreeSet<u64>, BTreeSet<u64>) =
            keys.iter().partition(|&&k| (k ^ seed).count_ones() % 2 == 0);
        for &key in &removed {
            prop_assert_eq!(map.remove(key), Some(!key));
        }
        map.assert_invariants();

        prop_assert_eq!(map.len(), kept.len());
        for &key in &kept {
            prop_assert_eq!(map.get(key).copied(), Some(!key));
        }
        for &key in &removed {
            prop_assert_eq!(map.get(key), None);
        }
    }

    #[test]
    fn prop_set_matches_btree_set(
        ops in prop::collection::vec((any::<bool>(), key_strategy()), 0..1000),
    ) {
        let mut set = IntSet::new();
        let mut model = BTreeSet::new();

        for (insert, key) in ops {
            if insert {
                prop_assert_eq!(set.insert(key), model.insert(key));
            } else {
                prop_assert_eq!(set.remove(key), model.remove(&key));
            }
            prop_assert_eq!(set.len(), model.len());
        }

        for key in &model {
            prop_assert!(set.contains(*key));
        }
        prop_assert_eq!(set.iter().collect::<BTreeSet<_>>(), model);
    }
}

#[test]
fn exhaustive_remove_order_small_set() {
    // Every removal order of a small key set, including 0, must keep the
    // remaining keys reachable.
    let keys: Vec<u64> = (0..6u64).map(|k| k * 32).chain([1, 33]).collect();
    let mut order: Vec<usize> = (0..keys.len()).collect();

    let mut permutations = 0;
    loop {
        let mut map = IntMap::with_fill_factor(4, 0.9).unwrap();
        for &key in &keys {
            map.insert(key, key);
        }

        for (step, &i) in order.iter().enumerate() {
            assert_eq!(map.remove(keys[i]), Some(keys[i]));
            map.assert_invariants();
            for &j in &order[step + 1..] {
                assert_eq!(map.get(keys[j]), Some(&keys[j]));
            }
        }
        assert!(map.is_empty());
        permutations += 1;

        if !next_permutation(&mut order) {
            break;
        }
    }

    assert_eq!(permutations, 40_320);
}

fn next_permutation(order: &mut [usize]) -> bool {
    let Some(pivot) = order.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let successor = order
        .iter()
        .rposition(|&v| v > order[pivot])
        .expect("a larger element follows the pivot");
    order.swap(pivot, successor);
    order[pivot + 1..].reverse();
    true
}
