use chrono::{DateTime, Local, TimeZone, Utc};
use thiserror::Error;
use workout_tracker_lib::{InvalidInput, Position, Workout, WorkoutId, WorkoutIdGenerator, WorkoutInput};

use crate::{storage::StorageBackend, workout_store::WorkoutStore, DataManagerError, MAP_ZOOM_LEVEL};

/// The UI side of the tracker: a map widget, the workout list, the form and user alerts.
pub trait WorkoutView {
    fn show_map(&mut self, center: Position, zoom: f64);
    fn set_view(&mut self, center: Position, zoom: f64);
    fn render_marker(&mut self, workout: &Workout);
    fn render_workout(&mut self, workout: &Workout);
    /// Removes every rendered list item and marker.
    fn clear_workouts(&mut self);
    fn show_form(&mut self);
    fn hide_form(&mut self);
    fn alert(&mut self, message: &str);
    fn reload(&mut self);
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error("No position selected on the map")]
    NoPositionSelected,
    #[error("Could not get your position")]
    GeolocationUnavailable,
    #[error("Stored workouts could not be read, delete them before adding new ones")]
    StoreUnreadable,
    #[error("No workout with id {0}")]
    UnknownWorkout(WorkoutId),
    #[error(transparent)]
    DataManager(#[from] DataManagerError),
}

pub struct WorkoutTracker<V: WorkoutView, S: StorageBackend> {
    view: V,
    store: WorkoutStore<S>,
    workouts: Vec<Workout>,
    ids: WorkoutIdGenerator,
    pending_position: Option<Position>,
    map_loaded: bool,
    store_unreadable: bool,
    zoom_level: f64,
}

impl<V: WorkoutView, S: StorageBackend> WorkoutTracker<V, S> {
    /// An empty tracker. Call [`WorkoutTracker::restore`] to bring back stored workouts.
    pub fn new(view: V, storage: S) -> Self {
        Self {
            view,
            store: WorkoutStore::new(storage),
            workouts: Vec::new(),
            ids: WorkoutIdGenerator::new(),
            pending_position: None,
            map_loaded: false,
            store_unreadable: false,
            zoom_level: MAP_ZOOM_LEVEL,
        }
    }

    pub fn start(view: V, storage: S) -> Result<Self, TrackerError> {
        let mut tracker = Self::new(view, storage);
        tracker.restore()?;
        Ok(tracker)
    }

    /// Replaces the in-memory collection with the stored one and renders it in place of
    /// whatever the view showed. On failure the in-memory collection is left untouched and
    /// saving is refused until the store is reset, so the unreadable blob is kept.
    pub fn restore(&mut self) -> Result<(), TrackerError> {
        let workouts = match self.store.load() {
            Ok(workouts) => workouts,
            Err(err) => {
                self.store_unreadable = true;
                return Err(err.into());
            }
        };
        self.workouts = workouts;
        self.store_unreadable = false;
        self.view.clear_workouts();

        for workout in &self.workouts {
            self.ids.observe(&workout.id);
            self.view.render_workout(workout);
            if self.map_loaded {
                self.view.render_marker(workout);
            }
        }

        tracing::info!("Restored {} workouts", self.workouts.len());
        Ok(())
    }

    pub fn on_position_found(&mut self, position: Position) {
        tracing::debug!("Position found: {:?}", position);
        self.view.show_map(position, self.zoom_level);
        self.map_loaded = true;

        for workout in &self.workouts {
            self.view.render_marker(workout);
        }
    }

    pub fn on_position_unavailable(&mut self) -> TrackerError {
        let err = TrackerError::GeolocationUnavailable;
        tracing::warn!("{err}");
        self.view.alert(&err.to_string());
        err
    }

    pub fn on_map_click(&mut self, position: Position) {
        self.pending_position = Some(position);
        self.view.show_form();
    }

    pub fn submit(&mut self, input: WorkoutInput) -> Result<&Workout, TrackerError> {
        self.submit_at(input, Local::now())
    }

    /// Records a workout at the last clicked position. Either the workout is stored and
    /// rendered, or nothing changes and the error is returned.
    pub fn submit_at<Tz: TimeZone>(&mut self, input: WorkoutInput, now: DateTime<Tz>) -> Result<&Workout, TrackerError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let Some(position) = self.pending_position else {
            return Err(TrackerError::NoPositionSelected);
        };

        if self.store_unreadable {
            let err = TrackerError::StoreUnreadable;
            self.view.alert(&err.to_string());
            return Err(err);
        }

        let validated = match input.validate() {
            Ok(validated) => validated,
            Err(err) => {
                tracing::debug!("Rejected {} input: {err}", input.workout_type);
                self.view.alert(&err.to_string());
                return Err(err.into());
            }
        };

        let id = self.ids.next_id(now.with_timezone(&Utc));
        self.workouts.push(validated.into_workout(id, now, position));

        if let Err(err) = self.store.save(&self.workouts) {
            self.workouts.pop();
            tracing::error!("Failed to save workouts: {err}");
            self.view.alert(&err.to_string());
            return Err(err.into());
        }

        let index = self.workouts.len() - 1;
        let workout = &self.workouts[index];
        tracing::info!("Added workout {} ({})", workout.id, workout.description);

        self.view.render_marker(workout);
        self.view.render_workout(workout);
        self.pending_position = None;
        self.view.hide_form();

        Ok(&self.workouts[index])
    }

    pub fn move_to_workout(&mut self, id: &WorkoutId) -> Result<(), TrackerError> {
        let workout = self
            .workouts
            .iter()
            .find(|workout| &workout.id == id)
            .ok_or_else(|| TrackerError::UnknownWorkout(id.clone()))?;

        self.view.set_view(workout.position, self.zoom_level);
        Ok(())
    }

    /// Deletes every stored workout and asks the view to start over.
    pub fn reset(&mut self) -> Result<(), TrackerError> {
        self.store.clear()?;
        self.store_unreadable = false;
        self.workouts.clear();
        self.pending_position = None;
        self.view.reload();
        Ok(())
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn is_form_visible(&self) -> bool {
        self.pending_position.is_some()
    }

    pub fn is_map_loaded(&self) -> bool {
        self.map_loaded
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

#[cfg(test)]
mod tests {
    use workout_tracker_lib::WorkoutType;

    use super::*;
    use crate::storage::MemoryStorage;

    #[derive(Debug, Clone, PartialEq)]
    enum ViewEvent {
        ShowMap(Position, f64),
        SetView(Position, f64),
        Marker(WorkoutId),
        ListItem(WorkoutId),
        ClearList,
        ShowForm,
        HideForm,
        Alert(String),
        Reload,
    }

    #[derive(Default)]
    struct RecordingView {
        events: Vec<ViewEvent>,
    }

    impl WorkoutView for RecordingView {
        fn show_map(&mut self, center: Position, zoom: f64) {
            self.events.push(ViewEvent::ShowMap(center, zoom));
        }

        fn set_view(&mut self, center: Position, zoom: f64) {
            self.events.push(ViewEvent::SetView(center, zoom));
        }

        fn render_marker(&mut self, workout: &Workout) {
            self.events.push(ViewEvent::Marker(workout.id.clone()));
        }

        fn render_workout(&mut self, workout: &Workout) {
            self.events.push(ViewEvent::ListItem(workout.id.clone()));
        }

        fn clear_workouts(&mut self) {
            self.events.push(ViewEvent::ClearList);
        }

        fn show_form(&mut self) {
            self.events.push(ViewEvent::ShowForm);
        }

        fn hide_form(&mut self) {
            self.events.push(ViewEvent::HideForm);
        }

        fn alert(&mut self, message: &str) {
            self.events.push(ViewEvent::Alert(message.to_owned()));
        }

        fn reload(&mut self) {
            self.events.push(ViewEvent::Reload);
        }
    }

    #[derive(Default)]
    struct CountingStorage {
        inner: MemoryStorage,
        writes: usize,
        fail_writes: bool,
    }

    impl StorageBackend for CountingStorage {
        fn read(&self, key: &str) -> Result<Option<String>, DataManagerError> {
            self.inner.read(key)
        }

        fn write(&mut self, key: &str, value: &str) -> Result<(), DataManagerError> {
            self.writes += 1;
            if self.fail_writes {
                return Err(DataManagerError::Storage("quota exceeded".to_string()));
            }
            self.inner.write(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), DataManagerError> {
            self.inner.remove(key)
        }
    }

    fn tracker() -> WorkoutTracker<RecordingView, CountingStorage> {
        WorkoutTracker::start(RecordingView::default(), CountingStorage::default()).unwrap()
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 9, 30, 0).unwrap() + chrono::Duration::seconds(seconds)
    }

    #[test]
    fn submit_appends_saves_and_renders() {
        let mut tracker = tracker();
        tracker.on_position_found(Position(56.1, 10.2));
        tracker.on_map_click(Position(56.2, 10.3));
        assert!(tracker.is_form_visible());

        let workout = tracker.submit_at(WorkoutInput::running(10.0, 50.0, 178.0), at(0)).unwrap();
        assert_eq!(workout.pace_min_per_km(), Some(5.0));
        assert_eq!(workout.position, Position(56.2, 10.3));
        let id = workout.id.clone();

        assert_eq!(tracker.workouts().len(), 1);
        assert!(!tracker.is_form_visible());
        assert_eq!(tracker.store.storage().writes, 1);
        assert_eq!(
            tracker.view().events,
            vec![
                ViewEvent::ShowMap(Position(56.1, 10.2), MAP_ZOOM_LEVEL),
                ViewEvent::ShowForm,
                ViewEvent::Marker(id.clone()),
                ViewEvent::ListItem(id),
                ViewEvent::HideForm,
            ]
        );
    }

    #[test]
    fn invalid_input_changes_nothing() {
        let mut tracker = tracker();
        tracker.on_map_click(Position(56.2, 10.3));

        let result = tracker.submit_at(WorkoutInput::running(-1.0, 50.0, 178.0), at(0));
        assert!(matches!(result, Err(TrackerError::InvalidInput(InvalidInput::NotPositive("Distance")))));
        assert!(tracker.workouts().is_empty());
        assert_eq!(tracker.store.storage().writes, 0);
        assert!(tracker.is_form_visible());
        assert!(matches!(tracker.view().events.last(), Some(ViewEvent::Alert(_))));
    }

    #[test]
    fn submit_without_map_click_is_rejected() {
        let mut tracker = tracker();
        let result = tracker.submit_at(WorkoutInput::cycling(20.0, 60.0, 400.0), at(0));
        assert!(matches!(result, Err(TrackerError::NoPositionSelected)));
        assert_eq!(tracker.store.storage().writes, 0);
    }

    #[test]
    fn failed_save_rolls_back() {
        let storage = CountingStorage { fail_writes: true, ..Default::default() };
        let mut tracker = WorkoutTracker::new(RecordingView::default(), storage);
        tracker.on_map_click(Position(56.2, 10.3));

        let result = tracker.submit_at(WorkoutInput::cycling(20.0, 60.0, 400.0), at(0));
        assert!(matches!(result, Err(TrackerError::DataManager(DataManagerError::Storage(_)))));
        assert!(tracker.workouts().is_empty());
        assert!(tracker.is_form_visible());
        assert!(!tracker.view().events.iter().any(|event| matches!(event, ViewEvent::Marker(_))));
    }

    #[test]
    fn workouts_get_distinct_ids() {
        let mut tracker = tracker();
        tracker.on_map_click(Position(56.2, 10.3));
        let first = tracker.submit_at(WorkoutInput::running(5.0, 25.0, 170.0), at(0)).unwrap().id.clone();
        tracker.on_map_click(Position(56.3, 10.4));
        let second = tracker.submit_at(WorkoutInput::cycling(20.0, 60.0, 400.0), at(0)).unwrap().id.clone();
        tracker.on_map_click(Position(56.4, 10.5));
        let third = tracker.submit_at(WorkoutInput::running(5.0, 25.0, 170.0), at(1)).unwrap().id.clone();

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
    }

    #[test]
    fn restore_renders_stored_workouts_and_markers_once_map_loads() {
        let mut tracker = tracker();
        tracker.on_map_click(Position(56.2, 10.3));
        tracker.submit_at(WorkoutInput::running(10.0, 50.0, 178.0), at(0)).unwrap();
        tracker.on_map_click(Position(56.3, 10.4));
        tracker.submit_at(WorkoutInput::cycling(20.0, 60.0, 400.0), at(5)).unwrap();
        let saved = tracker.workouts().to_vec();

        let storage = std::mem::take(&mut tracker.store.storage_mut().inner);
        let mut restored = WorkoutTracker::start(RecordingView::default(), CountingStorage { inner: storage, ..Default::default() }).unwrap();
        assert_eq!(restored.workouts(), saved.as_slice());
        assert_eq!(restored.workouts()[1].workout_type(), WorkoutType::Cycling);
        assert_eq!(
            restored.view().events,
            vec![
                ViewEvent::ClearList,
                ViewEvent::ListItem(saved[0].id.clone()),
                ViewEvent::ListItem(saved[1].id.clone()),
            ]
        );

        restored.on_position_found(Position(56.0, 10.0));
        let markers = restored.view().events.iter().filter(|event| matches!(event, ViewEvent::Marker(_))).count();
        assert_eq!(markers, 2);

        // New ids continue after the restored ones even when the clock is behind them
        restored.on_map_click(Position(56.5, 10.6));
        let id = restored.submit_at(WorkoutInput::running(5.0, 25.0, 170.0), at(-3600)).unwrap().id.clone();
        assert!(saved.iter().all(|workout| workout.id != id));
    }

    #[test]
    fn move_to_workout_centers_map() {
        let mut tracker = tracker();
        tracker.on_position_found(Position(56.1, 10.2));
        tracker.on_map_click(Position(56.2, 10.3));
        let id = tracker.submit_at(WorkoutInput::running(10.0, 50.0, 178.0), at(0)).unwrap().id.clone();

        tracker.move_to_workout(&id).unwrap();
        assert_eq!(tracker.view().events.last(), Some(&ViewEvent::SetView(Position(56.2, 10.3), MAP_ZOOM_LEVEL)));
        assert_eq!(tracker.workouts()[0].interaction_count, 0);

        assert!(matches!(
            tracker.move_to_workout(&WorkoutId::from("missing")),
            Err(TrackerError::UnknownWorkout(_))
        ));
    }

    #[test]
    fn reset_clears_storage_and_reloads() {
        let mut tracker = tracker();
        tracker.on_map_click(Position(56.2, 10.3));
        tracker.submit_at(WorkoutInput::running(10.0, 50.0, 178.0), at(0)).unwrap();

        tracker.reset().unwrap();
        assert!(tracker.workouts().is_empty());
        assert!(tracker.store.load().unwrap().is_empty());
        assert_eq!(tracker.view().events.last(), Some(&ViewEvent::Reload));
    }

    #[test]
    fn geolocation_failure_alerts() {
        let mut tracker = tracker();
        let err = tracker.on_position_unavailable();
        assert!(matches!(err, TrackerError::GeolocationUnavailable));
        assert!(!tracker.is_map_loaded());
        assert_eq!(tracker.view().events, vec![ViewEvent::Alert("Could not get your position".to_string())]);
    }

    #[test]
    fn corrupt_storage_fails_restore_without_touching_collection() {
        let mut storage = CountingStorage::default();
        storage.write(crate::STORAGE_KEY, "[{").unwrap();
        let mut tracker = WorkoutTracker::new(RecordingView::default(), storage);

        assert!(matches!(tracker.restore(), Err(TrackerError::DataManager(DataManagerError::Corrupt(_)))));
        assert!(tracker.workouts().is_empty());
    }

    #[test]
    fn unreadable_store_is_not_overwritten_until_reset() {
        let mut storage = CountingStorage::default();
        storage.write(crate::STORAGE_KEY, r#"[{"type":"swimming"}]"#).unwrap();
        let mut tracker = WorkoutTracker::new(RecordingView::default(), storage);
        assert!(tracker.restore().is_err());

        tracker.on_map_click(Position(56.2, 10.3));
        let result = tracker.submit_at(WorkoutInput::running(10.0, 50.0, 178.0), at(0));
        assert!(matches!(result, Err(TrackerError::StoreUnreadable)));
        assert!(tracker.workouts().is_empty());
        assert_eq!(tracker.store.storage().writes, 1);
        assert_eq!(
            tracker.store.storage().read(crate::STORAGE_KEY).unwrap().as_deref(),
            Some(r#"[{"type":"swimming"}]"#)
        );

        tracker.reset().unwrap();
        tracker.on_map_click(Position(56.2, 10.3));
        tracker.submit_at(WorkoutInput::running(10.0, 50.0, 178.0), at(0)).unwrap();
        assert_eq!(tracker.store.load().unwrap().len(), 1);
    }

    #[test]
    fn restoring_twice_does_not_duplicate_the_list() {
        let mut tracker = tracker();
        tracker.on_position_found(Position(56.1, 10.2));
        tracker.on_map_click(Position(56.2, 10.3));
        tracker.submit_at(WorkoutInput::running(10.0, 50.0, 178.0), at(0)).unwrap();
        tracker.view_mut().events.clear();

        tracker.restore().unwrap();
        tracker.restore().unwrap();

        let id = tracker.workouts()[0].id.clone();
        let once = vec![ViewEvent::ClearList, ViewEvent::ListItem(id.clone()), ViewEvent::Marker(id)];
        assert_eq!(tracker.view().events, [once.clone(), once].concat());
        assert_eq!(tracker.workouts().len(), 1);
    }
}
