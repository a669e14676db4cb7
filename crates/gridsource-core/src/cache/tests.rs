use crate::cache::OrderedCache;
use proptest::prelude::*;
use std::collections::HashSet;

fn cache_of(keys: &[u32]) -> OrderedCache<u32, String> {
    let mut cache = OrderedCache::new();
    for key in keys {
        cache.put(*key, format!("e{key}"));
    }

    cache
}

fn keys(cache: &OrderedCache<u32, String>) -> Vec<u32> {
    cache.keys().copied().collect()
}

#[test]
fn put_appends_new_keys_and_updates_in_place() {
    let mut cache = cache_of(&[3, 1, 2]);

    let replaced = cache.put(1, "updated".to_string());

    assert_eq!(replaced.as_deref(), Some("e1"));
    assert_eq!(keys(&cache), vec![3, 1, 2]);
    assert_eq!(cache.get(&1).map(String::as_str), Some("updated"));
}

#[test]
fn remove_keeps_relative_order() {
    let mut cache = cache_of(&[1, 2, 3, 4]);

    cache.remove(&2);

    assert_eq!(keys(&cache), vec![1, 3, 4]);
    assert!(cache.remove(&2).is_none(), "second remove is a no-op");
}

#[test]
fn navigation_follows_current_order() {
    let cache = cache_of(&[10, 20, 30]);

    assert_eq!(cache.first_key(), Some(&10));
    assert_eq!(cache.last_key(), Some(&30));
    assert_eq!(cache.next_key(&10), Some(&20));
    assert_eq!(cache.next_key(&30), None);
    assert_eq!(cache.prev_key(&20), Some(&10));
    assert_eq!(cache.prev_key(&10), None);
    assert_eq!(cache.next_key(&99), None);
}

#[test]
fn empty_cache_navigation_is_none() {
    let cache: OrderedCache<u32, String> = OrderedCache::new();

    assert!(cache.first_key().is_none());
    assert!(cache.last_key().is_none());
    assert!(cache.is_empty());
}

#[test]
fn sort_by_is_stable_for_equal_entities() {
    let mut cache = OrderedCache::new();
    cache.put(1, "b");
    cache.put(2, "a");
    cache.put(3, "b");
    cache.put(4, "a");

    cache.sort_by(|left, right| left.cmp(right));

    assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![2, 4, 1, 3]);
}

#[test]
fn replace_all_returns_previous_entities_in_order() {
    let mut cache = cache_of(&[1, 2]);

    let previous = cache.replace_all(vec![(5, "e5".to_string())]);

    assert_eq!(previous, vec!["e1".to_string(), "e2".to_string()]);
    assert_eq!(keys(&cache), vec![5]);
}

///
/// Op
///

#[derive(Clone, Debug)]
enum Op {
    Put(u8),
    Remove(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..16).prop_map(Op::Put),
        (0u8..16).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn order_matches_first_insertion_of_surviving_keys(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut cache = OrderedCache::new();
        let mut model: Vec<u8> = Vec::new();

        for op in &ops {
            match op {
                Op::Put(key) => {
                    cache.put(*key, ());
                    if !model.contains(key) {
                        model.push(*key);
                    }
                }
                Op::Remove(key) => {
                    cache.remove(key);
                    model.retain(|k| k != key);
                }
            }
        }

        let actual: Vec<u8> = cache.keys().copied().collect();
        prop_assert_eq!(cache.len(), model.len());
        prop_assert_eq!(actual, model);

        let unique: HashSet<u8> = cache.keys().copied().collect();
        prop_assert_eq!(unique.len(), cache.len());
    }
}
