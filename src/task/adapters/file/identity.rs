//! Identity store persisted as a JSON settings document.
//!
//! The table lives under the `taskIdLookup` and `taskIdIndex` keys. Other
//! keys of the document belong to the host and are written back unchanged.

use crate::task::{
    domain::{BlockMarker, RemoteTaskId},
    ports::{
        IdentityLookup, IdentitySnapshot, IdentityStore, IdentityStoreError, IdentityStoreResult,
    },
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Identity store backed by a JSON file inside a capability directory.
///
/// Mutations stay in memory until [`IdentityStore::persist`] rewrites the
/// file through a temporary sibling and a rename.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    dir: Arc<Dir>,
    file_name: Utf8PathBuf,
    state: Arc<RwLock<FileIdentityState>>,
}

#[derive(Debug)]
struct FileIdentityState {
    snapshot: IdentitySnapshot,
    host_settings: Map<String, Value>,
}

impl FileIdentityStore {
    /// Opens the store at `file_name` inside `dir`.
    ///
    /// A missing file yields an empty table with the counter at zero.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Persistence`] when the file cannot be
    /// read or is not a JSON object with the expected keys.
    pub fn open(dir: Dir, file_name: impl AsRef<Utf8Path>) -> IdentityStoreResult<Self> {
        let name = file_name.as_ref().to_owned();
        let state = match dir.read_to_string(&name) {
            Ok(contents) => parse_document(&contents)?,
            Err(err) if err.kind() == ErrorKind::NotFound => FileIdentityState {
                snapshot: IdentitySnapshot::default(),
                host_settings: Map::new(),
            },
            Err(err) => return Err(IdentityStoreError::persistence(err)),
        };
        debug!(
            file = %name,
            entries = state.snapshot.task_id_lookup.len(),
            index = state.snapshot.task_id_index,
            "opened identity store"
        );
        Ok(Self {
            dir: Arc::new(dir),
            file_name: name,
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Opens the store at an ambient filesystem path.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Persistence`] when the parent directory
    /// cannot be opened or the file cannot be read.
    pub fn open_path(path: &Utf8Path) -> IdentityStoreResult<Self> {
        let file_name = path.file_name().ok_or_else(|| {
            IdentityStoreError::persistence(std::io::Error::other(
                "identity store path must include a file name",
            ))
        })?;
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(IdentityStoreError::persistence)?;
        Self::open(dir, file_name)
    }

    /// Returns a copy of the current table and counter.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Persistence`] when the lock is poisoned.
    pub fn snapshot(&self) -> IdentityStoreResult<IdentitySnapshot> {
        Ok(self.read()?.snapshot.clone())
    }

    fn read(&self) -> IdentityStoreResult<RwLockReadGuard<'_, FileIdentityState>> {
        self.state.read().map_err(|err| {
            IdentityStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> IdentityStoreResult<RwLockWriteGuard<'_, FileIdentityState>> {
        self.state.write().map_err(|err| {
            IdentityStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn temporary_name(&self) -> Utf8PathBuf {
        let mut name = self.file_name.clone().into_string();
        name.push_str(".tmp");
        Utf8PathBuf::from(name)
    }
}

fn parse_document(contents: &str) -> IdentityStoreResult<FileIdentityState> {
    if contents.trim().is_empty() {
        return Ok(FileIdentityState {
            snapshot: IdentitySnapshot::default(),
            host_settings: Map::new(),
        });
    }
    let value: Value = serde_json::from_str(contents).map_err(IdentityStoreError::persistence)?;
    let Value::Object(mut host_settings) = value else {
        return Err(IdentityStoreError::persistence(std::io::Error::new(
            ErrorKind::InvalidData,
            "identity store document must be a JSON object",
        )));
    };
    let mut identity = Map::new();
    for key in ["taskIdLookup", "taskIdIndex"] {
        if let Some(entry) = host_settings.remove(key) {
            identity.insert(key.to_owned(), entry);
        }
    }
    let snapshot: IdentitySnapshot =
        serde_json::from_value(Value::Object(identity)).map_err(IdentityStoreError::persistence)?;
    Ok(FileIdentityState {
        snapshot,
        host_settings,
    })
}

fn render_document(state: &FileIdentityState) -> IdentityStoreResult<String> {
    let mut document = state.host_settings.clone();
    let Value::Object(identity) =
        serde_json::to_value(&state.snapshot).map_err(IdentityStoreError::persistence)?
    else {
        return Err(IdentityStoreError::persistence(std::io::Error::other(
            "identity snapshot did not serialise to an object",
        )));
    };
    document.extend(identity);
    serde_json::to_string_pretty(&Value::Object(document)).map_err(IdentityStoreError::persistence)
}

impl IdentityLookup for FileIdentityStore {
    fn lookup(&self, marker: &BlockMarker) -> IdentityStoreResult<Option<RemoteTaskId>> {
        Ok(self.read()?.snapshot.task_id_lookup.get(marker).cloned())
    }

    fn find_marker(&self, remote_id: &RemoteTaskId) -> IdentityStoreResult<Option<BlockMarker>> {
        Ok(self.read()?.snapshot.marker_for(remote_id))
    }
}

impl IdentityStore for FileIdentityStore {
    fn record(&self, marker: &BlockMarker, remote_id: &RemoteTaskId) -> IdentityStoreResult<()> {
        self.write()?.snapshot.insert(marker, remote_id)
    }

    fn next_sequence(&self) -> IdentityStoreResult<u64> {
        Ok(self.write()?.snapshot.advance())
    }

    fn persist(&self) -> IdentityStoreResult<()> {
        let contents = render_document(&*self.read()?)?;
        let temporary = self.temporary_name();
        self.dir
            .write(&temporary, contents.as_bytes())
            .map_err(IdentityStoreError::persistence)?;
        self.dir
            .rename(&temporary, &self.dir, &self.file_name)
            .map_err(IdentityStoreError::persistence)?;
        debug!(file = %self.file_name, "persisted identity store");
        Ok(())
    }
}
