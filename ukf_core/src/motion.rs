//! CTRV (constant turn-rate and velocity) process model.

use crate::angle::normalize_angle;
use crate::types::{AugSigmaPoints, SigmaPoints, StateVec, N_SIGMA};

/// Yaw rates below this magnitude take the straight-line closed form,
/// which avoids the v/ψ̇ division.
pub const YAW_RATE_FLOOR: f64 = 1e-3;

/// Advance every augmented sigma point through the CTRV model by `dt`
/// seconds.
///
/// The two trailing noise components of each point are consumed here; the
/// result is a plain 5-dimensional state-space set.
pub fn predict_sigma_points(xsig_aug: &AugSigmaPoints, dt: f64) -> SigmaPoints {
    let mut xsig_pred = SigmaPoints::zeros();
    for i in 0..N_SIGMA {
        let col = xsig_aug.column(i);
        let (px, py, v, yawd) = (col[0], col[1], col[2], col[4]);
        let (nu_a, nu_yawdd) = (col[5], col[6]);
        let yaw = normalize_angle(col[3]);

        let (px_p, py_p) = if yawd.abs() > YAW_RATE_FLOOR {
            (
                px + v / yawd * ((yaw + yawd * dt).sin() - yaw.sin()),
                py + v / yawd * (yaw.cos() - (yaw + yawd * dt).cos()),
            )
        } else {
            (px + v * dt * yaw.cos(), py + v * dt * yaw.sin())
        };

        let half_dt2 = 0.5 * dt * dt;
        xsig_pred.set_column(
            i,
            &StateVec::new(
                px_p + half_dt2 * nu_a * yaw.cos(),
                py_p + half_dt2 * nu_a * yaw.sin(),
                v + nu_a * dt,
                yaw + yawd * dt + half_dt2 * nu_yawdd,
                yawd + nu_yawdd * dt,
            ),
        );
    }
    xsig_pred
}
