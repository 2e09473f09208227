use alloc::vec::Vec;
use std::collections::HashMap as ModelMap;

use proptest::prelude::*;

use crate::HashMap;
use crate::HashTable;

#[derive(Debug, Clone)]
enum Op {
    Set(Vec<u8>, Vec<u8>),
    Get(Vec<u8>),
    Remove(Vec<u8>),
    Reserve(usize),
    Clear,
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    // A narrow alphabet keeps collisions and repeated keys frequent.
    prop::collection::vec(0u8..4, 1..4)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (key_strategy(), prop::collection::vec(any::<u8>(), 0..6))
            .prop_map(|(k, v)| Op::Set(k, v)),
        3 => key_strategy().prop_map(Op::Get),
        4 => key_strategy().prop_map(Op::Remove),
        1 => (0usize..64).prop_map(Op::Reserve),
        1 => Just(Op::Clear),
    ]
}

fn assert_matches_model(table: &HashTable, model: &ModelMap<Vec<u8>, Vec<u8>>) {
    assert_eq!(table.len(), model.len());
    assert!(table.capacity().is_power_of_two());
    assert!((table.len() + table.tombstones()) * 4 <= table.capacity() * 3);
    for (key, value) in model {
        let found = table.get(key).unwrap().unwrap();
        assert_eq!(found.as_bytes(), &value[..]);
    }
    assert_eq!(table.iter().count(), model.len());
}

proptest! {
    #[test]
    fn table_matches_model(ops in prop::collection::vec(op_strategy(), 0..400)) {
        let mut table = HashTable::new().unwrap();
        let mut model: ModelMap<Vec<u8>, Vec<u8>> = ModelMap::new();

        for op in ops {
            match op {
                Op::Set(key, value) => {
                    let inserted = table.set(&key, &value).unwrap();
                    prop_assert_eq!(inserted, model.insert(key, value).is_none());
                }
                Op::Get(key) => {
                    let found = table.get(&key).unwrap().map(|span| span.as_bytes().to_vec());
                    prop_assert_eq!(found, model.get(&key).cloned());
                }
                Op::Remove(key) => {
                    let removed = table.remove(&key).unwrap();
                    let expected = model.remove(&key);
                    prop_assert_eq!(removed.is_some(), expected.is_some());
                }
                Op::Reserve(additional) => {
                    let capacity = table.capacity();
                    table.reserve(additional).unwrap();
                    prop_assert!(table.capacity() >= capacity);
                    if table.capacity() > capacity {
                        prop_assert_eq!(table.tombstones(), 0);
                    }
                }
                Op::Clear => {
                    table.clear();
                    model.clear();
                }
            }
            assert_matches_model(&table, &model);
        }
    }

    #[test]
    fn capacity_never_shrinks(keys in prop::collection::vec(key_strategy(), 1..200)) {
        let mut table = HashTable::new().unwrap();
        let mut capacity = table.capacity();
        for key in &keys {
            table.set(key, key).unwrap();
            prop_assert!(table.capacity() >= capacity);
            capacity = table.capacity();
        }
        for key in &keys {
            table.remove(key).unwrap();
            prop_assert_eq!(table.capacity(), capacity);
        }
        prop_assert!(table.is_empty());
    }

    #[test]
    fn typed_map_round_trip(pairs in prop::collection::vec((any::<u32>(), any::<u64>()), 0..200)) {
        let mut map: HashMap<u32, u64> = HashMap::new().unwrap();
        let mut model = ModelMap::new();
        for (key, value) in pairs {
            prop_assert_eq!(map.insert(&key, &value).unwrap(), model.insert(key, value));
        }
        for (key, value) in &model {
            prop_assert_eq!(map.get(key).unwrap(), Some(*value));
        }
        prop_assert_eq!(map.len(), model.len());
    }
}
