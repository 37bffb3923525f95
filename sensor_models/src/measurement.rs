//! Measurement record shared by the filter core and the dataset loader.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which sensor produced a measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    Radar,
    Laser,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Radar => write!(f, "radar"),
            SensorKind::Laser => write!(f, "laser"),
        }
    }
}

/// Raw observation value, one variant per sensor kind.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum MeasurementValue {
    /// Polar radar return: range (m), bearing (rad), range rate (m/s)
    Radar {
        range: f64,
        bearing: f64,
        range_rate: f64,
    },
    /// Cartesian laser fix (m)
    Laser { x: f64, y: f64 },
}

impl MeasurementValue {
    /// Dimension of the observation vector.
    pub fn dim(&self) -> usize {
        match self {
            MeasurementValue::Radar { .. } => 3,
            MeasurementValue::Laser { .. } => 2,
        }
    }

    pub fn kind(&self) -> SensorKind {
        match self {
            MeasurementValue::Radar { .. } => SensorKind::Radar,
            MeasurementValue::Laser { .. } => SensorKind::Laser,
        }
    }
}

/// A single timestamped sensor observation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Measurement {
    /// Capture timestamp in microseconds
    pub timestamp_us: i64,
    /// Raw observation value
    pub value: MeasurementValue,
}

impl Measurement {
    pub fn kind(&self) -> SensorKind {
        self.value.kind()
    }
}

/// Convert a polar `[range, bearing]` fix to cartesian `[x, y]`.
pub fn polar_to_cartesian(range: f64, bearing: f64) -> (f64, f64) {
    (range * bearing.cos(), range * bearing.sin())
}
