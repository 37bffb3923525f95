//! `dataset` — Sensor-log ingestion and estimate-log export.

pub mod parser;
pub mod replay;

pub use parser::{load_log, parse_log, LogRecord};
pub use replay::{load_estimates, save_estimates, EstimateLog, EstimateRecord};
