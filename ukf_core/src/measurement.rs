//! Sigma-point projection into the sensor measurement spaces.

use crate::angle::normalize_angle;
use crate::types::{SigmaPoints, Weights, N_SIGMA};
use nalgebra::{Matrix2, Matrix3, SMatrix, SVector, Vector2, Vector3};

/// Ranges are floored here before dividing in the range-rate model.
pub const RANGE_FLOOR: f64 = 1e-3;

/// Measurement dimension for radar: [range, bearing, range_rate]
pub const N_Z_RADAR: usize = 3;
/// Measurement dimension for laser: [px, py]
pub const N_Z_LASER: usize = 2;

/// A predicted measurement: the mean, the innovation covariance, and the
/// sigma points projected into measurement space.
///
/// Produced by [`project_radar`]/[`project_laser`] and consumed, together
/// with the actual observation, by the filter's correction step.
#[derive(Clone, Debug)]
pub struct MeasurementPrediction<const Z: usize> {
    /// Weighted mean of the projected sigma points
    pub z_pred: SVector<f64, Z>,
    /// Innovation covariance S: projection spread plus sensor noise R
    pub s: SMatrix<f64, Z, Z>,
    /// Projected sigma points, one per column
    pub zsig: SMatrix<f64, Z, N_SIGMA>,
}

/// Project predicted sigma points into radar space (range, bearing,
/// range-rate). Bearing residuals are renormalized into (-π, π].
pub fn project_radar(
    xsig_pred: &SigmaPoints,
    weights: &Weights,
    r: &Matrix3<f64>,
) -> MeasurementPrediction<N_Z_RADAR> {
    let mut zsig = SMatrix::<f64, N_Z_RADAR, N_SIGMA>::zeros();
    for i in 0..N_SIGMA {
        let col = xsig_pred.column(i);
        let (px, py, v) = (col[0], col[1], col[2]);
        let yaw = normalize_angle(col[3]);

        let range = (px * px + py * py).sqrt().max(RANGE_FLOOR);
        zsig[(0, i)] = range;
        zsig[(1, i)] = py.atan2(px);
        zsig[(2, i)] = (px * v * yaw.cos() + py * v * yaw.sin()) / range;
    }

    let mut z_pred = Vector3::zeros();
    for i in 0..N_SIGMA {
        z_pred += weights[i] * zsig.column(i);
    }

    let mut s = Matrix3::zeros();
    for i in 0..N_SIGMA {
        let mut dz = zsig.column(i) - z_pred;
        dz[1] = normalize_angle(dz[1]);
        s += weights[i] * dz * dz.transpose();
    }
    s += r;

    MeasurementPrediction { z_pred, s, zsig }
}

/// Project predicted sigma points into laser space: the identity on
/// (px, py). No angular component, so no renormalization.
pub fn project_laser(
    xsig_pred: &SigmaPoints,
    weights: &Weights,
    r: &Matrix2<f64>,
) -> MeasurementPrediction<N_Z_LASER> {
    let mut zsig = SMatrix::<f64, N_Z_LASER, N_SIGMA>::zeros();
    for i in 0..N_SIGMA {
        let col = xsig_pred.column(i);
        zsig[(0, i)] = col[0];
        zsig[(1, i)] = col[1];
    }

    let mut z_pred = Vector2::zeros();
    for i in 0..N_SIGMA {
        z_pred += weights[i] * zsig.column(i);
    }

    let mut s = Matrix2::zeros();
    for i in 0..N_SIGMA {
        let dz = zsig.column(i) - z_pred;
        s += weights[i] * dz * dz.transpose();
    }
    s += r;

    MeasurementPrediction { z_pred, s, zsig }
}
