use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{DataManagerError, STORE_DIR};

use super::StorageBackend;

/// Keeps each key in its own `<key>.json` file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens the store in the project's data directory, creating it if missing.
    pub fn open_default() -> Result<Self, DataManagerError> {
        let root = project_root::get_project_root()
            .map_err(|err| DataManagerError::Storage(format!("Failed to find project root: {err}")))?;
        Self::open(root.join(STORE_DIR))
    }

    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, DataManagerError> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .map_err(|err| DataManagerError::Storage(format!("Failed to create store directory {:?}: {err}", dir)))?;
        }

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, DataManagerError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(DataManagerError::Storage(format!("Failed to read {:?}: {err}", path))),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), DataManagerError> {
        // Write next to the target and rename, so a failed write leaves the old value intact
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)
            .map_err(|err| DataManagerError::Storage(format!("Failed to write {:?}: {err}", tmp_path)))?;
        fs::rename(&tmp_path, &path)
            .map_err(|err| DataManagerError::Storage(format!("Failed to replace {:?}: {err}", path)))
    }

    fn remove(&mut self, key: &str) -> Result<(), DataManagerError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(DataManagerError::Storage(format!("Failed to remove {:?}: {err}", path))),
        }
    }
}
