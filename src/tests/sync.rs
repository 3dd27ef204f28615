use std::sync::Arc;
use std::thread;

use crate::{PersistentHashMap, PersistentHashMapBuilder};

#[test]
fn map_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PersistentHashMap<String, i32>>();
}

#[test]
fn builder_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<PersistentHashMapBuilder<String, i32>>();
}

/// A published snapshot is read from many threads while its builder keeps writing.
#[test]
fn snapshot_shared_across_threads() {
    let mut builder = PersistentHashMapBuilder::new();
    builder.extend((0_u64..1000).map(|i| (i, i * 5)));
    let snapshot = Arc::new(builder.build());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let map = Arc::clone(&snapshot);
            thread::spawn(move || (0_u64..1000).all(|i| map.get(&i) == Some(&(i * 5))))
        })
        .collect();

    for i in 0_u64..1000 {
        builder.set(i, 0);
    }

    for reader in readers {
        assert!(reader.join().unwrap());
    }
    assert_eq!(snapshot.get(&10), Some(&50));
    assert_eq!(builder.get(&10), Some(&0));
}

/// Each thread derives its own versions from one shared base.
#[test]
fn threads_derive_independent_versions() {
    let base: PersistentHashMap<u64, u64> = (0..100).map(|i| (i, i)).collect();

    let handles: Vec<_> = (0_u64..4)
        .map(|t| {
            let base = base.clone();
            thread::spawn(move || {
                let mut builder = base.to_builder();
                for i in 0..100 {
                    builder.set(i, i + t * 1000);
                }
                builder.build()
            })
        })
        .collect();

    for (t, handle) in (0_u64..).zip(handles) {
        let map = handle.join().unwrap();
        assert_eq!(map.get(&7), Some(&(7 + t * 1000)));
    }
    assert_eq!(base.get(&7), Some(&7));
}
