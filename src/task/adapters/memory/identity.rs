//! In-memory identity store.

use crate::task::{
    domain::{BlockMarker, RemoteTaskId},
    ports::{
        IdentityLookup, IdentitySnapshot, IdentityStore, IdentityStoreError, IdentityStoreResult,
    },
};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory identity store.
///
/// `persist` only counts flushes, so tests can check that minting persisted
/// the table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityStore {
    state: Arc<RwLock<InMemoryIdentityState>>,
}

#[derive(Debug, Default)]
struct InMemoryIdentityState {
    snapshot: IdentitySnapshot,
    persist_count: usize,
}

impl InMemoryIdentityStore {
    /// Creates an empty store with the counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: IdentitySnapshot) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryIdentityState {
                snapshot,
                persist_count: 0,
            })),
        }
    }

    /// Returns a copy of the current table and counter.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Persistence`] when the lock is poisoned.
    pub fn snapshot(&self) -> IdentityStoreResult<IdentitySnapshot> {
        Ok(self.read()?.snapshot.clone())
    }

    /// Returns how many times the store was flushed.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Persistence`] when the lock is poisoned.
    pub fn persist_count(&self) -> IdentityStoreResult<usize> {
        Ok(self.read()?.persist_count)
    }

    fn read(&self) -> IdentityStoreResult<RwLockReadGuard<'_, InMemoryIdentityState>> {
        self.state.read().map_err(|err| {
            IdentityStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> IdentityStoreResult<RwLockWriteGuard<'_, InMemoryIdentityState>> {
        self.state.write().map_err(|err| {
            IdentityStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl IdentityLookup for InMemoryIdentityStore {
    fn lookup(&self, marker: &BlockMarker) -> IdentityStoreResult<Option<RemoteTaskId>> {
        Ok(self.read()?.snapshot.task_id_lookup.get(marker).cloned())
    }

    fn find_marker(&self, remote_id: &RemoteTaskId) -> IdentityStoreResult<Option<BlockMarker>> {
        Ok(self.read()?.snapshot.marker_for(remote_id))
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn record(&self, marker: &BlockMarker, remote_id: &RemoteTaskId) -> IdentityStoreResult<()> {
        self.write()?.snapshot.insert(marker, remote_id)
    }

    fn next_sequence(&self) -> IdentityStoreResult<u64> {
        Ok(self.write()?.snapshot.advance())
    }

    fn persist(&self) -> IdentityStoreResult<()> {
        let mut state = self.write()?;
        state.persist_count = state.persist_count.saturating_add(1);
        Ok(())
    }
}
