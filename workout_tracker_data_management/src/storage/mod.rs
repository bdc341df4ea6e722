mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::DataManagerError;

/// A flat key/value store of text blobs, shaped after the browser's `localStorage`.
pub trait StorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, DataManagerError>;

    /// Replaces any previous value under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), DataManagerError>;

    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), DataManagerError>;
}
