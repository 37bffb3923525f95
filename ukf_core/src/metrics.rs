//! Estimation accuracy metrics: RMSE against per-sample ground truth.

use crate::types::StateVec;
use serde::{Deserialize, Serialize};

/// Ground-truth Cartesian state supplied alongside a measurement sample.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GroundTruth {
    pub px: f64,
    pub py: f64,
    pub vx: f64,
    pub vy: f64,
}

/// Accumulated RMSE statistics over [px, py, vx, vy].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EstimationMetrics {
    /// Number of samples accumulated
    pub n_samples: u64,
    /// Sum of squared errors per component [px, py, vx, vy]
    pub sum_sq_err: [f64; 4],
}

impl EstimationMetrics {
    /// Accumulate one estimate against its ground truth. The CTRV state's
    /// polar velocity is converted to Cartesian components for comparison.
    pub fn accumulate(&mut self, state: &StateVec, truth: &GroundTruth) {
        let (v, yaw) = (state[2], state[3]);
        let est = [state[0], state[1], v * yaw.cos(), v * yaw.sin()];
        let gt = [truth.px, truth.py, truth.vx, truth.vy];
        for k in 0..4 {
            let d = est[k] - gt[k];
            self.sum_sq_err[k] += d * d;
        }
        self.n_samples += 1;
    }

    /// Per-component RMSE over [px, py, vx, vy].
    pub fn rmse(&self) -> [f64; 4] {
        if self.n_samples == 0 {
            return [0.0; 4];
        }
        let n = self.n_samples as f64;
        self.sum_sq_err.map(|s| (s / n).sqrt())
    }

    /// Combined 2D position RMSE (meters).
    pub fn rmse_position(&self) -> f64 {
        if self.n_samples == 0 {
            return 0.0;
        }
        ((self.sum_sq_err[0] + self.sum_sq_err[1]) / self.n_samples as f64).sqrt()
    }

    /// Combined 2D velocity RMSE (m/s).
    pub fn rmse_velocity(&self) -> f64 {
        if self.n_samples == 0 {
            return 0.0;
        }
        ((self.sum_sq_err[2] + self.sum_sq_err[3]) / self.n_samples as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rmse_of_exact_estimates_is_zero() {
        let mut metrics = EstimationMetrics::default();
        let truth = GroundTruth {
            px: 1.0,
            py: 2.0,
            vx: 3.0,
            vy: 0.0,
        };
        // v = 3 along yaw = 0 gives (vx, vy) = (3, 0)
        metrics.accumulate(&StateVec::new(1.0, 2.0, 3.0, 0.0, 0.0), &truth);
        assert_eq!(metrics.rmse(), [0.0; 4]);
    }

    #[test]
    fn rmse_accumulates_per_component() {
        let mut metrics = EstimationMetrics::default();
        let truth = GroundTruth {
            px: 0.0,
            py: 0.0,
            vx: 0.0,
            vy: 0.0,
        };
        metrics.accumulate(&StateVec::new(3.0, 4.0, 0.0, 0.0, 0.0), &truth);
        metrics.accumulate(&StateVec::new(-3.0, -4.0, 0.0, 0.0, 0.0), &truth);

        let rmse = metrics.rmse();
        assert_abs_diff_eq!(rmse[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rmse[1], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.rmse_position(), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.rmse_velocity(), 0.0, epsilon = 1e-12);
    }
}
