//! `sensor_models` — Measurement records, sensor kinds, noise parameters.

pub mod measurement;
pub mod noise;

pub use measurement::{polar_to_cartesian, Measurement, MeasurementValue, SensorKind};
pub use noise::{LaserNoise, RadarNoise};
