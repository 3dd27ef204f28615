use crate::{MapError, PersistentHashMap};

use super::hashed_by;

#[test]
fn empty_map() {
    let map: PersistentHashMap<String, i32> = PersistentHashMap::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.iter().count(), 0);
}

#[test]
fn add_one() {
    let map = PersistentHashMap::new().add("hello", 42).unwrap();
    assert_eq!(map.len(), 1);
    assert!(!map.is_empty());
    assert_eq!(map.get(&"hello"), Some(&42));
}

/// Empty → add(1, "a") → add(2, "b").
#[test]
fn add_two_keys() {
    let map = PersistentHashMap::new()
        .add(1, "a")
        .unwrap()
        .add(2, "b")
        .unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&1), Some(&"a"));
    assert_eq!(map.get(&2), Some(&"b"));
}

/// {1: "a"} → add(1, "b") fails and leaves the map as it was.
#[test]
fn add_duplicate_with_different_value_fails() {
    let map = PersistentHashMap::new().add(1, "a").unwrap();
    assert_eq!(map.add(1, "b"), Err(MapError::DuplicateKey));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&1), Some(&"a"));
}

#[test]
fn add_duplicate_with_equal_value_is_noop() {
    let map = PersistentHashMap::new().add(1, "a").unwrap();
    let again = map.add(1, "a").unwrap();
    assert_eq!(again.len(), 1);
    assert_eq!(again, map);
}

/// {1: "a", 2: "b"} → remove(1).
#[test]
fn remove_existing() {
    let map = PersistentHashMap::new().set(1, "a").set(2, "b");
    let removed = map.remove(&1);
    assert_eq!(removed.len(), 1);
    assert!(!removed.contains_key(&1));
    assert!(removed.contains_key(&2));
}

#[test]
fn remove_missing() {
    let map = PersistentHashMap::new().set("a", 1);
    let same = map.remove(&"z");
    assert_eq!(same.len(), 1);
    assert_eq!(same.get(&"a"), Some(&1));
}

#[test]
fn remove_all() {
    let map = PersistentHashMap::new().set(1, 10).set(2, 20).set(3, 30);
    let empty = map.remove(&1).remove(&2).remove(&3);
    assert!(empty.is_empty());
    assert_eq!(empty.iter().count(), 0);
    assert_eq!(map.len(), 3);
}

#[test]
fn set_overwrites() {
    let map = PersistentHashMap::new().set("k", 1);
    let updated = map.set("k", 2);
    assert_eq!(updated.len(), 1);
    assert_eq!(updated.get(&"k"), Some(&2));
    assert_eq!(map.get(&"k"), Some(&1));
}

#[test]
fn lookup_reports_not_found() {
    let map = PersistentHashMap::new().set(1, "one");
    assert_eq!(map.lookup(&1), Ok(&"one"));
    assert_eq!(map.lookup(&2), Err(MapError::NotFound));
}

#[test]
fn contains_pair_requires_equal_value() {
    let map = PersistentHashMap::new().set(7, "seven");
    assert!(map.contains(&7, &"seven"));
    assert!(!map.contains(&7, &"eight"));
    assert!(!map.contains(&8, &"seven"));
}

#[test]
fn remove_if_checks_value() {
    let map = PersistentHashMap::new().set(1, 10).set(2, 20);
    let kept = map.remove_if(&1, &99);
    assert_eq!(kept.len(), 2);
    let removed = map.remove_if(&1, &10);
    assert_eq!(removed.len(), 1);
    assert!(!removed.contains_key(&1));
}

#[test]
fn add_range_is_all_or_nothing() {
    let map = PersistentHashMap::new().set(1, 'a');
    let err = map.add_range([(2, 'b'), (1, 'z'), (3, 'c')]);
    assert_eq!(err, Err(MapError::DuplicateKey));
    assert_eq!(map.len(), 1);

    let ok = map.add_range([(2, 'b'), (1, 'a'), (3, 'c')]).unwrap();
    assert_eq!(ok.len(), 3);
}

#[test]
fn set_items_later_pairs_win() {
    let map = PersistentHashMap::new().set_items([(1, 1), (2, 2), (1, 3)]);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&1), Some(&3));
}

#[test]
fn remove_range_skips_missing_keys() {
    let map: PersistentHashMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
    let trimmed = map.remove_range(&[0, 2, 4, 100]);
    assert_eq!(trimmed.len(), 7);
    assert!(!trimmed.contains_key(&2));
    assert!(trimmed.contains_key(&3));
}

#[test]
fn clear_returns_natural_empty_map() {
    let map = PersistentHashMap::with_comparers(hashed_by(|k: &i32| k.unsigned_abs())).set(1, 1);
    let cleared = map.clear();
    assert!(cleared.is_empty());
    assert!(cleared.comparers().key().is_natural());
    assert!(cleared.comparers().value().is_natural());
    assert_eq!(map.len(), 1);
}

#[test]
fn copy_to_checks_capacity() {
    let map: PersistentHashMap<i32, i32> = (1..=3).map(|i| (i, i * 10)).collect();

    let mut short = vec![(0, 0); 3];
    assert_eq!(
        map.copy_to(&mut short, 1),
        Err(MapError::InsufficientCapacity {
            required: 3,
            available: 2
        })
    );
    assert_eq!(short, [(0, 0); 3]);

    let mut dest = vec![(0, 0); 4];
    assert_eq!(map.copy_to(&mut dest, 1), Ok(3));
    assert_eq!(dest[0], (0, 0));
    let mut copied = dest[1..].to_vec();
    copied.sort_unstable();
    assert_eq!(copied, [(1, 10), (2, 20), (3, 30)]);
}

#[test]
fn copy_empty_map_past_the_end() {
    let map: PersistentHashMap<i32, i32> = PersistentHashMap::new();
    let mut dest: Vec<(i32, i32)> = Vec::new();
    assert_eq!(map.copy_to(&mut dest, 5), Ok(0));
}
