//! In-memory identity store behaviour.

use rstest::rstest;
use tasklink::task::{
    adapters::memory::InMemoryIdentityStore,
    domain::{BlockMarker, RemoteTaskId},
    ports::{IdentityLookup, IdentitySnapshot, IdentityStore, IdentityStoreError},
};

fn ids(marker: &str, remote: &str) -> (BlockMarker, RemoteTaskId) {
    (
        BlockMarker::new(marker).expect("valid marker"),
        RemoteTaskId::new(remote).expect("valid remote id"),
    )
}

#[rstest]
fn sequence_increments_before_returning() {
    let store = InMemoryIdentityStore::new();

    let first = store.next_sequence().expect("sequence should advance");
    let second = store.next_sequence().expect("sequence should advance");

    assert_eq!((first, second), (1, 2));
}

#[rstest]
fn seeded_store_resumes_from_its_snapshot() {
    let (marker, remote) = ids("MSTD00041", "R41");
    let mut snapshot = IdentitySnapshot {
        task_id_index: 41,
        ..IdentitySnapshot::default()
    };
    snapshot
        .insert(&marker, &remote)
        .expect("mapping should be inserted");
    let store = InMemoryIdentityStore::from_snapshot(snapshot);

    assert_eq!(store.lookup(&marker).expect("lookup"), Some(remote.clone()));
    assert_eq!(store.find_marker(&remote).expect("reverse lookup"), Some(marker));
    assert_eq!(store.next_sequence().expect("sequence should advance"), 42);
}

#[rstest]
fn mappings_are_append_only() {
    let store = InMemoryIdentityStore::new();
    let (marker, first) = ids("MSTD00001", "R1");
    let (_, second) = ids("MSTD00001", "R2");
    store.record(&marker, &first).expect("first mapping");

    let result = store.record(&marker, &second);

    assert!(matches!(
        result,
        Err(IdentityStoreError::MarkerConflict { .. })
    ));
    assert_eq!(store.lookup(&marker).expect("lookup"), Some(first));
}

#[rstest]
fn snapshot_serialises_with_host_key_names() {
    let (marker, remote) = ids("MSTD00001", "R1");
    let mut snapshot = IdentitySnapshot::default();
    snapshot.insert(&marker, &remote).expect("mapping");
    snapshot.advance();

    let json = serde_json::to_string(&snapshot).expect("snapshot should serialise");

    assert_eq!(json, r#"{"taskIdLookup":{"MSTD00001":"R1"},"taskIdIndex":1}"#);
}
