use super::*;

use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug)]
enum TreeOp {
    Insert(u16),
    Delete(u16),
    Find(u16),
}

fn tree_ops_strategy() -> impl Strategy<Value = Vec<TreeOp>> {
    // A small key space so deletes and duplicates actually hit.
    let key = 0u16..512;
    let op = prop_oneof![
        50 => key.clone().prop_map(TreeOp::Insert),
        30 => key.clone().prop_map(TreeOp::Delete),
        20 => key.prop_map(TreeOp::Find),
    ];
    prop::collection::vec(op, 0..=600)
}

fn hash_key() -> impl Strategy<Value = i32> {
    prop_oneof![
        8 => -64i32..256,
        1 => Just(i32::MIN),
        1 => Just(i32::MAX),
    ]
}

#[derive(Clone, Debug)]
enum HashOp {
    Put(i32, u32),
    Remove(i32),
    Get(i32),
    Update(i32, u32),
}

fn hash_ops_strategy() -> impl Strategy<Value = Vec<HashOp>> {
    let op = prop_oneof![
        5 => (hash_key(), any::<u32>()).prop_map(|(k, v)| HashOp::Put(k, v)),
        3 => hash_key().prop_map(HashOp::Remove),
        2 => hash_key().prop_map(HashOp::Get),
        1 => (hash_key(), any::<u32>()).prop_map(|(k, v)| HashOp::Update(k, v)),
    ];
    prop::collection::vec(op, 0..=1000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_avl_equivalence(ops in tree_ops_strategy()) {
        let mut t = AvlTree::natural();
        let mut m: BTreeSet<u16> = BTreeSet::new();

        for op in ops {
            match op {
                TreeOp::Insert(key) => {
                    let height = t.height();
                    let added = t.insert(key);
                    prop_assert_eq!(added, m.insert(key));
                    if !added {
                        prop_assert_eq!(t.height(), height);
                    }
                }
                TreeOp::Delete(key) => {
                    prop_assert_eq!(t.delete(&key), m.take(&key));
                    prop_assert!(t.find(&key).is_none());
                }
                TreeOp::Find(key) => {
                    prop_assert_eq!(t.find(&key).copied(), m.get(&key).copied());
                }
            }

            t.validate();
            prop_assert_eq!(t.len(), m.len());
        }

        let got: Vec<u16> = t.traverse_ascending().into_iter().copied().collect();
        let expected: Vec<u16> = m.iter().copied().collect();
        prop_assert_eq!(&got, &expected);
        prop_assert_eq!(t.min().copied(), m.first().copied());
        prop_assert_eq!(t.max().copied(), m.last().copied());
        prop_assert_eq!(t.into_sorted_vec(), expected);
    }

    #[test]
    fn prop_avl_height_is_logarithmic(keys in prop::collection::vec(any::<u32>(), 1..=2000)) {
        let mut t = AvlTree::natural();
        t.bulk_load(keys);
        // AVL bound: h < 1.4405 * log2(n + 2).
        let bound = 1.4405 * ((t.len() + 2) as f64).log2();
        prop_assert!(f64::from(t.height()) < bound);
    }

    #[test]
    fn prop_hash_equivalence(
        capacity in 1usize..=32,
        ops in hash_ops_strategy(),
    ) {
        let mut h: HashIndex<i32, u32> = HashIndex::with_capacity(capacity);
        let mut m: HashMap<i32, u32> = HashMap::new();

        for op in ops {
            match op {
                HashOp::Put(key, value) => {
                    let capacity = h.capacity();
                    let old = h.put(key, value);
                    prop_assert_eq!(old, m.insert(key, value));
                    if old.is_some() {
                        prop_assert_eq!(h.capacity(), capacity, "overwrite must not resize");
                    }
                }
                HashOp::Remove(key) => {
                    prop_assert_eq!(h.remove(&key), m.remove(&key));
                }
                HashOp::Get(key) => {
                    prop_assert_eq!(h.get(&key), m.get(&key));
                    prop_assert_eq!(h.contains_key(&key), m.contains_key(&key));
                }
                HashOp::Update(key, value) => {
                    let expected = m.get_mut(&key).map(|slot| std::mem::replace(slot, value));
                    prop_assert_eq!(h.update(&key, value), expected);
                }
            }

            prop_assert_eq!(h.len(), m.len());
            prop_assert!(h.load_factor() <= DEFAULT_LOAD_FACTOR);
        }

        h.validate();
        let mut got: Vec<(i32, u32)> = h.iter().map(|(k, v)| (*k, *v)).collect();
        got.sort_unstable();
        let mut expected: Vec<(i32, u32)> = m.into_iter().collect();
        expected.sort_unstable();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_hash_string_round_trip(keys in prop::collection::hash_set(".{0,12}", 0..200)) {
        let mut h: HashIndex<String, usize> = HashIndex::new();
        for (i, key) in keys.iter().enumerate() {
            prop_assert_eq!(h.put(key.clone(), i), None);
        }
        prop_assert_eq!(h.len(), keys.len());
        for (i, key) in keys.iter().enumerate() {
            prop_assert_eq!(h.get(key.as_str()), Some(&i));
        }
        let key_set = h.key_set();
        prop_assert_eq!(key_set.len(), keys.len());
        prop_assert!(keys.iter().all(|k| key_set.contains(k)));
        h.validate();
    }
}
