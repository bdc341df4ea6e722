use serde::{Deserialize, Serialize};

/// Latitude and longitude in degrees. Serialized as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position(pub f64, pub f64);

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self(latitude, longitude)
    }

    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

impl From<(f64, f64)> for Position {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self(latitude, longitude)
    }
}
