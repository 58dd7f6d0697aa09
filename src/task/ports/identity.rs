//! Identity store port mapping block markers to remote task identifiers.

use crate::task::domain::{BlockMarker, RemoteTaskId};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Result type for identity store operations.
pub type IdentityStoreResult<T> = Result<T, IdentityStoreError>;

/// Read side of the identity store, used while parsing task lines.
pub trait IdentityLookup: Send + Sync {
    /// Returns the remote identifier mapped to `marker`.
    ///
    /// Returns `None` when the marker is unknown. Markers are matched
    /// case-sensitively.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Persistence`] when the backing state
    /// cannot be read.
    fn lookup(&self, marker: &BlockMarker) -> IdentityStoreResult<Option<RemoteTaskId>>;

    /// Returns the marker mapped to `remote_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Persistence`] when the backing state
    /// cannot be read.
    fn find_marker(&self, remote_id: &RemoteTaskId) -> IdentityStoreResult<Option<BlockMarker>>;
}

/// Append-only mapping from block markers to remote identifiers, with the
/// sequence counter used to mint new markers.
///
/// Entries are never removed through this contract.
pub trait IdentityStore: IdentityLookup {
    /// Records a new mapping.
    ///
    /// Recording the same mapping twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::MarkerConflict`] when the marker is
    /// already mapped to a different remote identifier.
    fn record(&self, marker: &BlockMarker, remote_id: &RemoteTaskId) -> IdentityStoreResult<()>;

    /// Increments the sequence counter and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Persistence`] when the counter cannot be
    /// updated.
    fn next_sequence(&self) -> IdentityStoreResult<u64>;

    /// Flushes the mapping table and counter to durable storage.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Persistence`] when writing fails.
    fn persist(&self) -> IdentityStoreResult<()>;
}

/// Persisted layout of the identity table, stored inside the host settings.
///
/// Entries whose key is not a valid block marker or whose value is an empty
/// remote identifier are dropped on load, so such markers read as unmapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentitySnapshot {
    /// Block marker to remote identifier table.
    #[serde(deserialize_with = "deserialize_lookup")]
    pub task_id_lookup: BTreeMap<BlockMarker, RemoteTaskId>,
    /// Last sequence number handed out.
    pub task_id_index: u64,
}

impl IdentitySnapshot {
    /// Inserts a mapping, enforcing append-only semantics.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::MarkerConflict`] when the marker already
    /// maps to a different remote identifier.
    pub fn insert(&mut self, marker: &BlockMarker, remote_id: &RemoteTaskId) -> IdentityStoreResult<()> {
        match self.task_id_lookup.get(marker) {
            Some(existing) if existing == remote_id => Ok(()),
            Some(existing) => Err(IdentityStoreError::MarkerConflict {
                marker: marker.clone(),
                existing: existing.clone(),
            }),
            None => {
                self.task_id_lookup.insert(marker.clone(), remote_id.clone());
                Ok(())
            }
        }
    }

    /// Returns the marker mapped to `remote_id`, if any.
    #[must_use]
    pub fn marker_for(&self, remote_id: &RemoteTaskId) -> Option<BlockMarker> {
        self.task_id_lookup
            .iter()
            .find(|(_, mapped)| *mapped == remote_id)
            .map(|(marker, _)| marker.clone())
    }

    /// Advances the sequence counter and returns the new value.
    pub const fn advance(&mut self) -> u64 {
        self.task_id_index = self.task_id_index.saturating_add(1);
        self.task_id_index
    }
}

fn deserialize_lookup<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<BlockMarker, RemoteTaskId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| {
            match (BlockMarker::new(key.as_str()), RemoteTaskId::new(value.as_str())) {
                (Ok(marker), Ok(remote_id)) => Some((marker, remote_id)),
                _ => {
                    warn!(marker = %key, remote_id = %value, "dropped unusable identity mapping");
                    None
                }
            }
        })
        .collect())
}

/// Errors returned by identity store implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityStoreError {
    /// The marker is already mapped to another remote task.
    #[error("block marker {marker} is already mapped to remote task {existing}")]
    MarkerConflict {
        /// Conflicting marker.
        marker: BlockMarker,
        /// Remote identifier already recorded for the marker.
        existing: RemoteTaskId,
    },

    /// Persistence-layer failure.
    #[error("identity store persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
