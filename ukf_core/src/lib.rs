//! `ukf_core` — CTRV Unscented Kalman Filter estimation engine.
//!
//! # Module layout
//! - [`types`]       — Fixed-dimension vectors/matrices, dimension constants
//! - [`angle`]       — Renormalization into (-π, π]
//! - [`error`]       — Fatal divergence conditions
//! - [`sigma`]       — Weights, augmented sigma-point generation, unscented moments
//! - [`motion`]      — CTRV process-model propagation
//! - [`measurement`] — Radar/laser sigma-point projections
//! - [`ukf`]         — The filter: lifecycle, prediction, correction
//! - [`metrics`]     — RMSE accumulation against ground truth

pub mod angle;
pub mod error;
pub mod measurement;
pub mod metrics;
pub mod motion;
pub mod sigma;
pub mod types;
pub mod ukf;

pub use error::FilterError;
pub use metrics::{EstimationMetrics, GroundTruth};
pub use types::{StateCov, StateVec};
pub use ukf::{UkfConfig, UnscentedKalmanFilter};
