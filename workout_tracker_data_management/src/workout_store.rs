use workout_tracker_lib::Workout;

use crate::{storage::StorageBackend, DataManagerError, STORAGE_KEY};

/// Persists the whole workout collection as one JSON blob under [`STORAGE_KEY`].
pub struct WorkoutStore<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> WorkoutStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Overwrites the stored collection. Nothing is written if serialization fails.
    pub fn save(&mut self, workouts: &[Workout]) -> Result<(), DataManagerError> {
        let blob = serde_json::to_string(workouts)?;
        self.storage.write(STORAGE_KEY, &blob)?;
        tracing::debug!("Saved {} workouts", workouts.len());
        Ok(())
    }

    /// Restores the stored collection in insertion order, or an empty one if nothing is stored.
    pub fn load(&self) -> Result<Vec<Workout>, DataManagerError> {
        let Some(blob) = self.storage.read(STORAGE_KEY)? else {
            tracing::debug!("No stored workouts");
            return Ok(Vec::new());
        };

        let workouts: Vec<Workout> = serde_json::from_str(&blob)?;
        tracing::debug!("Loaded {} workouts", workouts.len());
        Ok(workouts)
    }

    pub fn clear(&mut self) -> Result<(), DataManagerError> {
        self.storage.remove(STORAGE_KEY)?;
        tracing::info!("Cleared stored workouts");
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
