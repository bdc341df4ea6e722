pub mod position;
pub mod workout;
pub mod workout_id;
pub mod workout_input;

pub use position::Position;
pub use workout::{CyclingMetrics, RunningMetrics, VariantInput, Workout, WorkoutKind, WorkoutType};
pub use workout_id::{WorkoutId, WorkoutIdGenerator};
pub use workout_input::{InvalidInput, ValidatedInput, WorkoutInput};
