//! Estimate-log export: per-sample state, NIS, and ground truth as JSON,
//! for offline analysis and plotting.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sensor_models::SensorKind;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use ukf_core::GroundTruth;

/// One recorded estimate: the filter state after absorbing a measurement.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EstimateRecord {
    pub timestamp_us: i64,
    pub sensor: SensorKind,
    /// Estimated [px, py, v, yaw, yaw_rate]
    pub state: [f64; 5],
    /// NIS of the update that produced this state
    pub nis: f64,
    pub ground_truth: GroundTruth,
}

/// A full estimate log for one dataset run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EstimateLog {
    /// Name of the input sensor log
    pub dataset: String,
    pub records: Vec<EstimateRecord>,
    /// Final RMSE over [px, py, vx, vy]
    pub rmse: [f64; 4],
}

/// Save an estimate log to a JSON file.
pub fn save_estimates(log: &EstimateLog, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating estimate log {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, log)?;
    Ok(())
}

/// Load an estimate log from a JSON file.
pub fn load_estimates(path: &Path) -> Result<EstimateLog> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening estimate log {}", path.display()))?;
    let reader = BufReader::new(file);
    let log = serde_json::from_reader(reader)?;
    Ok(log)
}
