//! Shared filesystem helpers for integration tests.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

/// Uniquely named directory under the system temporary directory, removed
/// on drop.
pub struct TempWorkspace {
    base: Dir,
    name: String,
    path: Utf8PathBuf,
}

impl TempWorkspace {
    /// Creates a fresh directory whose name starts with `prefix`.
    pub fn new(prefix: &str) -> Result<Self, std::io::Error> {
        let base_path = Utf8PathBuf::try_from(std::env::temp_dir()).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("temp directory path is not valid UTF-8: {e}"),
            )
        })?;
        let name = format!("{prefix}_{}", uuid::Uuid::new_v4());
        let base = Dir::open_ambient_dir(&base_path, ambient_authority())?;
        base.create_dir(&name)?;
        let path = base_path.join(&name);
        Ok(Self { base, name, path })
    }

    /// Opens a capability handle on the workspace directory.
    pub fn dir(&self) -> Result<Dir, std::io::Error> {
        self.base.open_dir(&self.name)
    }

    /// Returns the ambient path of the workspace directory.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Writes `contents` to `file_name` inside the workspace.
    pub fn write(&self, file_name: &str, contents: &str) -> Result<(), std::io::Error> {
        self.dir()?.write(file_name, contents)
    }

    /// Reads `file_name` from the workspace.
    pub fn read(&self, file_name: &str) -> Result<String, std::io::Error> {
        self.dir()?.read_to_string(file_name)
    }
}

impl Drop for TempWorkspace {
    fn drop(&mut self) {
        let _ = self.base.remove_dir_all(&self.name);
    }
}
