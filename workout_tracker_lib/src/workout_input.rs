use chrono::{DateTime, TimeZone};
use thiserror::Error;

use crate::{
    position::Position,
    workout::{VariantInput, Workout, WorkoutType},
    workout_id::WorkoutId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("{0} must be a number")]
    NotFinite(&'static str),
    #[error("{0} must be a positive number")]
    NotPositive(&'static str),
}

/// Raw values submitted through the workout form. Text that does not parse as a
/// number is represented as `NaN` and rejected by [`WorkoutInput::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutInput {
    pub workout_type: WorkoutType,
    pub distance_km: f64,
    pub duration_min: f64,
    pub cadence_spm: f64,
    pub elevation_gain_m: f64,
}

/// Input that passed the sign and finiteness checks for its workout type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedInput {
    distance_km: f64,
    duration_min: f64,
    variant: VariantInput,
}

impl WorkoutInput {
    pub fn running(distance_km: f64, duration_min: f64, cadence_spm: f64) -> Self {
        Self {
            workout_type: WorkoutType::Running,
            distance_km,
            duration_min,
            cadence_spm,
            elevation_gain_m: f64::NAN,
        }
    }

    pub fn cycling(distance_km: f64, duration_min: f64, elevation_gain_m: f64) -> Self {
        Self {
            workout_type: WorkoutType::Cycling,
            distance_km,
            duration_min,
            cadence_spm: f64::NAN,
            elevation_gain_m,
        }
    }

    /// Lenient parse of a form field, empty or malformed text becomes `NaN`.
    pub fn parse_field(text: &str) -> f64 {
        text.trim().parse::<f64>().unwrap_or(f64::NAN)
    }

    pub fn validate(&self) -> Result<ValidatedInput, InvalidInput> {
        let variant = match self.workout_type {
            WorkoutType::Running => {
                let fields = [
                    ("Distance", self.distance_km),
                    ("Duration", self.duration_min),
                    ("Cadence", self.cadence_spm),
                ];
                check_finite(&fields)?;
                check_positive(&fields)?;
                let cadence_spm = self.cadence_spm.round();
                if cadence_spm < 1.0 {
                    return Err(InvalidInput::NotPositive("Cadence"));
                }
                VariantInput::Cadence(cadence_spm as u32)
            }
            WorkoutType::Cycling => {
                check_finite(&[
                    ("Distance", self.distance_km),
                    ("Duration", self.duration_min),
                    ("Elevation gain", self.elevation_gain_m),
                ])?;
                check_positive(&[("Distance", self.distance_km), ("Duration", self.duration_min)])?;
                VariantInput::ElevationGain(self.elevation_gain_m)
            }
        };

        Ok(ValidatedInput {
            distance_km: self.distance_km,
            duration_min: self.duration_min,
            variant,
        })
    }
}

impl ValidatedInput {
    pub fn into_workout<Tz: TimeZone>(self, id: WorkoutId, created_at: DateTime<Tz>, position: Position) -> Workout
    where
        Tz::Offset: std::fmt::Display,
    {
        Workout::new(id, created_at, position, self.distance_km, self.duration_min, self.variant)
    }
}

fn check_finite(fields: &[(&'static str, f64)]) -> Result<(), InvalidInput> {
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, _)) => Err(InvalidInput::NotFinite(*name)),
        None => Ok(()),
    }
}

fn check_positive(fields: &[(&'static str, f64)]) -> Result<(), InvalidInput> {
    match fields.iter().find(|(_, value)| *value <= 0.0) {
        Some((name, _)) => Err(InvalidInput::NotPositive(*name)),
        None => Ok(()),
    }
}
