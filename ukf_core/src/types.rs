//! Fixed-dimension vector/matrix aliases used across the filter.
//!
//! All dimensions are known at compile time, so every matrix here is a
//! stack-allocated `nalgebra` type and shape mismatches fail to compile.

use nalgebra::{Matrix5, SMatrix, SVector, Vector5};

/// State dimension: [px, py, v, yaw, yaw_rate]
pub const N_X: usize = 5;
/// Augmented dimension: state plus [ν_a, ν_yawdd] process-noise terms
pub const N_AUG: usize = 7;
/// Number of sigma points: 2·N_AUG + 1
pub const N_SIGMA: usize = 2 * N_AUG + 1;

/// CTRV state vector: [px, py, v, yaw, yaw_rate]
pub type StateVec = Vector5<f64>;

/// 5×5 state covariance matrix
pub type StateCov = Matrix5<f64>;

/// Augmented mean vector: state with two zero noise components appended
pub type AugVec = SVector<f64, N_AUG>;

/// 7×7 augmented covariance: block-diagonal [P, diag(σ_a², σ_yawdd²)]
pub type AugCov = SMatrix<f64, N_AUG, N_AUG>;

/// Augmented sigma-point set, one point per column
pub type AugSigmaPoints = SMatrix<f64, N_AUG, N_SIGMA>;

/// State-space sigma-point set (post-propagation), one point per column
pub type SigmaPoints = SMatrix<f64, N_X, N_SIGMA>;

/// Sigma-point weights, fixed once per filter lifetime
pub type Weights = SVector<f64, N_SIGMA>;
