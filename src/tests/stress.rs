use crate::{PersistentHashMap, PersistentHashMapBuilder};

/// 1000 entries: insert all, verify all, remove all.
#[test]
fn thousand_entries() {
    let mut builder = PersistentHashMapBuilder::new();
    for i in 0_u64..1000 {
        assert!(builder.set(i, i * 3));
    }
    let map = builder.build();
    assert_eq!(map.len(), 1000);

    for i in 0_u64..1000 {
        assert_eq!(map.get(&i), Some(&(i * 3)), "missing key {i}");
    }

    let mut builder = map.to_builder();
    for i in 0_u64..1000 {
        assert!(builder.remove(&i), "failed to remove key {i}");
    }
    assert!(builder.is_empty());
    assert_eq!(map.len(), 1000);
}

/// One persistent write at a time, keeping every version alive.
#[test]
fn version_chain() {
    let mut versions = vec![PersistentHashMap::new()];
    for i in 0_u32..300 {
        let next = versions[versions.len() - 1].set(i, i);
        versions.push(next);
    }
    for (n, version) in versions.iter().enumerate() {
        assert_eq!(version.len(), n);
        assert_eq!(version.iter().count(), n);
    }
    assert_eq!(versions[150].get(&149), Some(&149));
    assert_eq!(versions[150].get(&150), None);
}

#[test]
fn interleaved_operations() {
    let mut builder = PersistentHashMapBuilder::new();
    for i in 0_u64..200 {
        builder.set(i, i);
    }
    let mid = builder.build();
    // Overwrite even keys.
    for i in (0_u64..200).step_by(2) {
        assert!(!builder.set(i, i + 1000));
    }
    // Remove odd keys.
    for i in (1_u64..200).step_by(2) {
        assert!(builder.remove(&i));
    }
    let map = builder.build();
    assert_eq!(map.len(), 100);
    for i in (0_u64..200).step_by(2) {
        assert_eq!(map.get(&i), Some(&(i + 1000)));
    }
    assert_eq!(mid.len(), 200);
    assert_eq!(mid.get(&2), Some(&2));
}

/// Builds between every edit, so each write meets a frozen path.
#[test]
fn build_after_every_write() {
    let mut builder = PersistentHashMapBuilder::new();
    let mut snapshots = Vec::new();
    for i in 0_u32..200 {
        builder.set(i, i);
        snapshots.push(builder.build());
    }
    for i in (0_u32..200).rev() {
        assert!(builder.remove(&i));
        snapshots.push(builder.build());
    }
    for (n, snapshot) in snapshots.iter().take(200).enumerate() {
        assert_eq!(snapshot.len(), n + 1);
    }
    assert!(snapshots[snapshots.len() - 1].is_empty());
    assert_eq!(snapshots[199].iter().count(), 200);
}
