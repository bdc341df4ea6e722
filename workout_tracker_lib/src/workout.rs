use std::{fmt, str::FromStr};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{position::Position, workout_id::WorkoutId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Running,
    Cycling,
}

impl WorkoutType {
    pub fn name(&self) -> &'static str {
        match self {
            WorkoutType::Running => "running",
            WorkoutType::Cycling => "cycling",
        }
    }

    /// Capitalized name, used as the first word of a description.
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutType::Running => "Running",
            WorkoutType::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutType::Running => "🏃‍♂️",
            WorkoutType::Cycling => "🚴‍♀️",
        }
    }

    pub fn popup_class(&self) -> String {
        format!("{}-popup", self.name())
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WorkoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(WorkoutType::Running),
            "cycling" => Ok(WorkoutType::Cycling),
            other => Err(format!("Unknown workout type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningMetrics {
    #[serde(alias = "cadence", deserialize_with = "cadence_from_number")]
    pub cadence_spm: u32,
    #[serde(alias = "pace")]
    pub pace_min_per_km: f64,
}

/// Older records stored cadence as any number, e.g. `178.5`.
fn cadence_from_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let cadence = f64::deserialize(deserializer)?;
    if !cadence.is_finite() || cadence < 0.0 {
        return Err(serde::de::Error::custom(format!("invalid cadence {cadence}")));
    }
    Ok(cadence.round() as u32)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclingMetrics {
    #[serde(alias = "elevationgain")]
    pub elevation_gain_m: f64,
    #[serde(alias = "speed")]
    pub speed_km_per_h: f64,
}

/// Variant specific fields. The `type` tag is always part of the serialized record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
    Running(RunningMetrics),
    Cycling(CyclingMetrics),
}

impl WorkoutKind {
    pub fn workout_type(&self) -> WorkoutType {
        match self {
            WorkoutKind::Running(_) => WorkoutType::Running,
            WorkoutKind::Cycling(_) => WorkoutType::Cycling,
        }
    }
}

/// The input that only one variant takes: cadence for running, elevation gain for cycling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariantInput {
    Cadence(u32),
    ElevationGain(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: WorkoutId,
    #[serde(alias = "date")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "coords")]
    pub position: Position,
    #[serde(alias = "distance")]
    pub distance_km: f64,
    #[serde(alias = "duration")]
    pub duration_min: f64,
    pub description: String,
    #[serde(alias = "click", default)]
    pub interaction_count: u32,
    #[serde(flatten)]
    kind: WorkoutKind,
}

impl Workout {
    /// Builds a record and derives its description and metric. Inputs are trusted,
    /// callers validate distance and duration beforehand.
    ///
    /// The description uses the month and day of `created_at` in its own time zone.
    pub fn new<Tz: TimeZone>(
        id: WorkoutId,
        created_at: DateTime<Tz>,
        position: Position,
        distance_km: f64,
        duration_min: f64,
        variant: VariantInput,
    ) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let kind = match variant {
            VariantInput::Cadence(cadence_spm) => WorkoutKind::Running(RunningMetrics {
                cadence_spm,
                pace_min_per_km: duration_min / distance_km,
            }),
            VariantInput::ElevationGain(elevation_gain_m) => WorkoutKind::Cycling(CyclingMetrics {
                elevation_gain_m,
                speed_km_per_h: distance_km / (duration_min / 60.0),
            }),
        };

        let description = format!(
            "{} on {}",
            kind.workout_type().label(),
            created_at.format("%B %-d")
        );

        Self {
            id,
            created_at: created_at.with_timezone(&Utc),
            position,
            distance_km,
            duration_min,
            description,
            interaction_count: 0,
            kind,
        }
    }

    pub fn running<Tz: TimeZone>(id: WorkoutId, created_at: DateTime<Tz>, position: Position, distance_km: f64, duration_min: f64, cadence_spm: u32) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self::new(id, created_at, position, distance_km, duration_min, VariantInput::Cadence(cadence_spm))
    }

    pub fn cycling<Tz: TimeZone>(id: WorkoutId, created_at: DateTime<Tz>, position: Position, distance_km: f64, duration_min: f64, elevation_gain_m: f64) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self::new(id, created_at, position, distance_km, duration_min, VariantInput::ElevationGain(elevation_gain_m))
    }

    pub fn kind(&self) -> &WorkoutKind {
        &self.kind
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.kind.workout_type()
    }

    pub fn pace_min_per_km(&self) -> Option<f64> {
        match &self.kind {
            WorkoutKind::Running(metrics) => Some(metrics.pace_min_per_km),
            WorkoutKind::Cycling(_) => None,
        }
    }

    pub fn speed_km_per_h(&self) -> Option<f64> {
        match &self.kind {
            WorkoutKind::Running(_) => None,
            WorkoutKind::Cycling(metrics) => Some(metrics.speed_km_per_h),
        }
    }

    pub fn record_interaction(&mut self) {
        self.interaction_count += 1;
    }

    /// Derived metric rounded to one decimal, with its unit.
    pub fn metric_summary(&self) -> (String, &'static str) {
        match &self.kind {
            WorkoutKind::Running(metrics) => (format!("{:.1}", metrics.pace_min_per_km), "min/km"),
            WorkoutKind::Cycling(metrics) => (format!("{:.1}", metrics.speed_km_per_h), "km/h"),
        }
    }

    /// Variant specific field with its unit.
    pub fn variant_summary(&self) -> (String, &'static str) {
        match &self.kind {
            WorkoutKind::Running(metrics) => (metrics.cadence_spm.to_string(), "spm"),
            WorkoutKind::Cycling(metrics) => (metrics.elevation_gain_m.to_string(), "m"),
        }
    }

    pub fn popup_text(&self) -> String {
        format!("{} {}", self.workout_type().icon(), self.description)
    }
}
