use gloo_storage::{LocalStorage, Storage};
use workout_tracker_data_management::{storage::StorageBackend, DataManagerError};

/// The browser's `localStorage`.
pub struct LocalStorageBackend;

impl StorageBackend for LocalStorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, DataManagerError> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|err| DataManagerError::Storage(format!("Failed to read local storage: {err:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), DataManagerError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| DataManagerError::Storage(format!("Failed to write local storage: {err:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), DataManagerError> {
        LocalStorage::delete(key);
        Ok(())
    }
}
