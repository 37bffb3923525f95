//! Sensor noise parameters and their measurement-noise covariances.

use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Radar measurement noise standard deviations.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RadarNoise {
    /// Range std dev (meters)
    pub std_range: f64,
    /// Bearing std dev (radians)
    pub std_bearing: f64,
    /// Range-rate std dev (m/s)
    pub std_range_rate: f64,
}

impl Default for RadarNoise {
    fn default() -> Self {
        Self {
            std_range: 0.3,        // 0.3 m
            std_bearing: 0.03,     // ~1.7°
            std_range_rate: 0.3,   // 0.3 m/s
        }
    }
}

impl RadarNoise {
    /// Diagonal measurement-noise covariance R (3×3).
    pub fn r_matrix(&self) -> Matrix3<f64> {
        Matrix3::from_diagonal(&Vector3::new(
            self.std_range * self.std_range,
            self.std_bearing * self.std_bearing,
            self.std_range_rate * self.std_range_rate,
        ))
    }
}

/// Laser measurement noise standard deviations.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LaserNoise {
    /// Position std dev in x (meters)
    pub std_x: f64,
    /// Position std dev in y (meters)
    pub std_y: f64,
}

impl Default for LaserNoise {
    fn default() -> Self {
        Self {
            std_x: 0.15,
            std_y: 0.15,
        }
    }
}

impl LaserNoise {
    /// Diagonal measurement-noise covariance R (2×2).
    pub fn r_matrix(&self) -> Matrix2<f64> {
        Matrix2::from_diagonal(&Vector2::new(
            self.std_x * self.std_x,
            self.std_y * self.std_y,
        ))
    }
}
