//! The CTRV Unscented Kalman Filter: lifecycle, prediction, correction.
//!
//! One [`UnscentedKalmanFilter`] tracks a single object. Feed it
//! timestamped measurements in order through
//! [`process_measurement`](UnscentedKalmanFilter::process_measurement);
//! read back the state mean, covariance, and per-sensor NIS afterwards.
//! The entry point takes `&mut self`, so callers are serialized by the
//! borrow checker; the sigma-point matrices are scratch state reused each
//! cycle.

use crate::angle::normalize_angle;
use crate::error::FilterError;
use crate::measurement::{project_laser, project_radar, MeasurementPrediction};
use crate::motion::predict_sigma_points;
use crate::sigma::{augmented_sigma_points, sigma_weights, unscented_moments};
use crate::types::{SigmaPoints, StateCov, StateVec, Weights, N_SIGMA, N_X};
use nalgebra::{Const, DimMin, Matrix2, Matrix3, SMatrix, SVector, Vector2, Vector3};
use sensor_models::{polar_to_cartesian, LaserNoise, Measurement, MeasurementValue, RadarNoise, SensorKind};
use serde::{Deserialize, Serialize};

/// Raw measurement components with magnitude below this are floored to it
/// during initialization, so later divisions cannot hit zero.
const COMPONENT_FLOOR: f64 = 1e-3;

/// Elapsed times at or below this (seconds) skip the predict+correct cycle.
const MIN_DT: f64 = 1e-3;

const US_PER_SEC: f64 = 1e6;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Filter configuration, fixed for the lifetime of a filter instance.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct UkfConfig {
    /// Process laser measurements
    pub use_laser: bool,
    /// Process radar measurements
    pub use_radar: bool,
    /// Longitudinal acceleration process noise std (m/s²)
    pub std_a: f64,
    /// Yaw acceleration process noise std (rad/s²)
    pub std_yawdd: f64,
    /// Radar measurement noise
    pub radar_noise: RadarNoise,
    /// Laser measurement noise
    pub laser_noise: LaserNoise,
}

impl Default for UkfConfig {
    fn default() -> Self {
        Self {
            use_laser: true,
            use_radar: true,
            std_a: 2.0,
            std_yawdd: 0.7,
            radar_noise: RadarNoise::default(),
            laser_noise: LaserNoise::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// CTRV Unscented Kalman Filter fusing radar and laser measurements.
#[derive(Clone, Debug)]
pub struct UnscentedKalmanFilter {
    config: UkfConfig,
    r_radar: Matrix3<f64>,
    r_laser: Matrix2<f64>,
    weights: Weights,
    x: StateVec,
    p: StateCov,
    /// Propagated sigma points of the current cycle, shared by the moment
    /// recomposition and the measurement projection
    xsig_pred: SigmaPoints,
    initialized: bool,
    previous_timestamp_us: i64,
    nis_radar: f64,
    nis_laser: f64,
}

impl UnscentedKalmanFilter {
    pub fn new(config: UkfConfig) -> Self {
        Self {
            r_radar: config.radar_noise.r_matrix(),
            r_laser: config.laser_noise.r_matrix(),
            config,
            weights: sigma_weights(),
            x: StateVec::zeros(),
            p: StateCov::zeros(),
            xsig_pred: SigmaPoints::zeros(),
            initialized: false,
            previous_timestamp_us: 0,
            nis_radar: 0.0,
            nis_laser: 0.0,
        }
    }

    /// Current state mean [px, py, v, yaw, yaw_rate].
    pub fn state(&self) -> &StateVec {
        &self.x
    }

    /// Current state covariance.
    pub fn covariance(&self) -> &StateCov {
        &self.p
    }

    /// Most recent NIS for the given sensor kind.
    pub fn nis(&self, kind: SensorKind) -> f64 {
        match kind {
            SensorKind::Radar => self.nis_radar,
            SensorKind::Laser => self.nis_laser,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &UkfConfig {
        &self.config
    }

    /// Whether measurements of this kind are processed at all.
    pub fn accepts(&self, kind: SensorKind) -> bool {
        match kind {
            SensorKind::Radar => self.config.use_radar,
            SensorKind::Laser => self.config.use_laser,
        }
    }

    /// Absorb one measurement: initialize on the first accepted sample,
    /// otherwise predict over the elapsed time and correct with the
    /// observation.
    ///
    /// Disabled-sensor samples are skipped without touching the state or
    /// the timestamp baseline, so the next accepted measurement predicts
    /// over the full elapsed time since the last accepted one. Samples with
    /// a stale/duplicate timestamp skip the cycle but advance the baseline.
    pub fn process_measurement(&mut self, m: &Measurement) -> Result<(), FilterError> {
        if !self.accepts(m.kind()) {
            tracing::debug!(kind = %m.kind(), "sensor disabled, sample skipped");
            return Ok(());
        }

        if !self.initialized {
            self.initialize(m);
            return Ok(());
        }

        let dt = (m.timestamp_us - self.previous_timestamp_us) as f64 / US_PER_SEC;
        self.previous_timestamp_us = m.timestamp_us;
        if dt <= MIN_DT {
            tracing::debug!(dt, "stale timestamp, cycle skipped");
            return Ok(());
        }

        self.predict(dt)?;

        match m.value {
            MeasurementValue::Radar {
                range,
                bearing,
                range_rate,
            } => {
                let pred = project_radar(&self.xsig_pred, &self.weights, &self.r_radar);
                let z = Vector3::new(range, bearing, range_rate);
                self.nis_radar = self.correct(&pred, &z, Some(1))?;
            }
            MeasurementValue::Laser { x, y } => {
                let pred = project_laser(&self.xsig_pred, &self.weights, &self.r_laser);
                let z = Vector2::new(x, y);
                self.nis_laser = self.correct(&pred, &z, None)?;
            }
        }
        Ok(())
    }

    /// Seed the state from a single measurement.
    ///
    /// Radar: position from the polar fix, speed from the range rate,
    /// heading from the bearing, yaw rate zero. Laser: position from the
    /// fix, speed/heading/yaw rate zero. Components with magnitude below
    /// 1e-3 are floored first.
    fn initialize(&mut self, m: &Measurement) {
        self.x = match m.value {
            MeasurementValue::Radar {
                range,
                bearing,
                range_rate,
            } => {
                let range = floor_component(range);
                let bearing = floor_component(bearing);
                let range_rate = floor_component(range_rate);
                let (px, py) = polar_to_cartesian(range, bearing);
                StateVec::new(
                    floor_component(px),
                    floor_component(py),
                    range_rate,
                    bearing,
                    0.0,
                )
            }
            MeasurementValue::Laser { x, y } => {
                StateVec::new(floor_component(x), floor_component(y), 0.0, 0.0, 0.0)
            }
        };
        // large position uncertainty, moderate on the unmeasured components
        self.p = StateCov::from_diagonal(&StateVec::new(50.0, 50.0, 1.0, 0.5, 0.5));
        self.previous_timestamp_us = m.timestamp_us;
        self.initialized = true;
        tracing::debug!(kind = %m.kind(), timestamp_us = m.timestamp_us, "filter initialized");
    }

    /// One prediction cycle: augmented sigma generation, CTRV propagation,
    /// moment recomposition. Leaves the propagated sigma set behind for the
    /// correction step of the same cycle.
    fn predict(&mut self, dt: f64) -> Result<(), FilterError> {
        let xsig_aug =
            augmented_sigma_points(&self.x, &self.p, self.config.std_a, self.config.std_yawdd)?;
        self.xsig_pred = predict_sigma_points(&xsig_aug, dt);
        let (x, p) = unscented_moments(&self.xsig_pred, &self.weights);
        self.x = x;
        self.p = p;
        Ok(())
    }

    /// Kalman correction shared by both sensors. `bearing_row` names the
    /// measurement-space component that needs angle renormalization (radar
    /// bearing); laser has none. Returns the NIS for this update.
    fn correct<const Z: usize>(
        &mut self,
        pred: &MeasurementPrediction<Z>,
        z: &SVector<f64, Z>,
        bearing_row: Option<usize>,
    ) -> Result<f64, FilterError>
    where
        Const<Z>: DimMin<Const<Z>, Output = Const<Z>>,
    {
        // cross-correlation between state and measurement deviations
        let mut tc = SMatrix::<f64, N_X, Z>::zeros();
        for i in 0..N_SIGMA {
            let mut z_diff = pred.zsig.column(i) - pred.z_pred;
            if let Some(row) = bearing_row {
                z_diff[row] = normalize_angle(z_diff[row]);
            }
            let mut x_diff = self.xsig_pred.column(i) - self.x;
            x_diff[3] = normalize_angle(x_diff[3]);
            tc += self.weights[i] * x_diff * z_diff.transpose();
        }

        let s_inv = pred
            .s
            .try_inverse()
            .ok_or(FilterError::SingularInnovationCovariance)?;
        let gain = tc * s_inv;

        let mut innovation = z - pred.z_pred;
        if let Some(row) = bearing_row {
            innovation[row] = normalize_angle(innovation[row]);
        }

        self.x += gain * innovation;
        self.p -= gain * pred.s * gain.transpose();

        Ok((innovation.transpose() * s_inv * innovation)[(0, 0)])
    }
}

fn floor_component(x: f64) -> f64 {
    if x.abs() < COMPONENT_FLOOR {
        COMPONENT_FLOOR
    } else {
        x
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn radar(timestamp_us: i64, range: f64, bearing: f64, range_rate: f64) -> Measurement {
        Measurement {
            timestamp_us,
            value: MeasurementValue::Radar {
                range,
                bearing,
                range_rate,
            },
        }
    }

    fn laser(timestamp_us: i64, x: f64, y: f64) -> Measurement {
        Measurement {
            timestamp_us,
            value: MeasurementValue::Laser { x, y },
        }
    }

    #[test]
    fn initializes_from_radar() {
        let mut filter = UnscentedKalmanFilter::new(UkfConfig::default());
        filter.process_measurement(&radar(1_000, 5.0, 0.3, 1.0)).unwrap();

        assert!(filter.is_initialized());
        let x = filter.state();
        assert_abs_diff_eq!(x[0], 5.0 * 0.3_f64.cos(), epsilon = 1e-9);
        assert_abs_diff_eq!(x[1], 5.0 * 0.3_f64.sin(), epsilon = 1e-9);
        assert_abs_diff_eq!(x[2], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x[3], 0.3, epsilon = 1e-9);
        assert_abs_diff_eq!(x[4], 0.0, epsilon = 1e-9);
        // first call performs no prediction/update
        assert_eq!(filter.nis(SensorKind::Radar), 0.0);
    }

    #[test]
    fn initializes_from_laser() {
        let mut filter = UnscentedKalmanFilter::new(UkfConfig::default());
        filter.process_measurement(&laser(0, 2.0, 3.0)).unwrap();

        assert!(filter.is_initialized());
        let x = filter.state();
        assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x[1], 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x[2], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x[3], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x[4], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn two_laser_fixes_pull_velocity_toward_displacement_rate() {
        let mut filter = UnscentedKalmanFilter::new(UkfConfig::default());
        filter.process_measurement(&laser(0, 2.0, 3.0)).unwrap();
        // 0.6 m along +x in 0.1 s: consistent with ~6 m/s
        filter.process_measurement(&laser(100_000, 2.6, 3.0)).unwrap();

        // one 0.1 s cycle couples v to px only weakly under the wide
        // initial covariance, so the expected nudge is ~1.2e-3 m/s; the
        // bound catches any regression that zeroes the cross-correlation
        let v = filter.state()[2];
        assert!(v > 1e-4, "velocity should move off its zero default, got {v}");
        assert!(v < 6.0, "velocity cannot overshoot the displacement rate, got {v}");

        let nis = filter.nis(SensorKind::Laser);
        assert!(nis.is_finite() && nis >= 0.0, "laser NIS {nis}");
    }

    #[test]
    fn covariance_stays_symmetric_through_a_full_cycle() {
        let mut filter = UnscentedKalmanFilter::new(UkfConfig::default());
        filter.process_measurement(&radar(0, 5.0, 0.3, 1.0)).unwrap();
        filter.process_measurement(&radar(100_000, 5.1, 0.31, 1.0)).unwrap();
        filter.process_measurement(&laser(200_000, 5.0, 1.7)).unwrap();

        let p = filter.covariance();
        let asym = (p - p.transpose()).abs().max();
        assert!(asym < 1e-9, "covariance asymmetry {asym}");
        for i in 0..N_X {
            assert!(p[(i, i)] >= 0.0, "negative variance at {i}: {}", p[(i, i)]);
        }
    }

    #[test]
    fn zero_range_radar_sample_is_absorbed() {
        let mut filter = UnscentedKalmanFilter::new(UkfConfig::default());
        filter.process_measurement(&laser(0, 2.0, 3.0)).unwrap();
        filter.process_measurement(&radar(100_000, 0.0, 0.0, 0.0)).unwrap();

        assert!(filter.state().iter().all(|c| c.is_finite()));
        let nis = filter.nis(SensorKind::Radar);
        assert!(nis.is_finite() && nis >= 0.0);
    }

    #[test]
    fn disabled_kind_neither_initializes_nor_updates() {
        let config = UkfConfig {
            use_radar: false,
            ..Default::default()
        };
        let mut filter = UnscentedKalmanFilter::new(config);

        filter.process_measurement(&radar(0, 5.0, 0.3, 1.0)).unwrap();
        assert!(!filter.is_initialized());

        filter.process_measurement(&laser(50_000, 2.0, 3.0)).unwrap();
        assert!(filter.is_initialized());

        let before = *filter.state();
        filter.process_measurement(&radar(100_000, 4.0, 0.6, 1.0)).unwrap();
        assert_eq!(*filter.state(), before);

        // the skipped radar sample did not advance the baseline: this laser
        // fix still runs a full 0.1 s cycle from t = 50 ms
        filter.process_measurement(&laser(150_000, 2.5, 3.0)).unwrap();
        assert!(*filter.state() != before);
    }

    #[test]
    fn duplicate_timestamp_skips_the_cycle() {
        let mut filter = UnscentedKalmanFilter::new(UkfConfig::default());
        filter.process_measurement(&laser(0, 2.0, 3.0)).unwrap();
        filter.process_measurement(&laser(100_000, 2.2, 3.1)).unwrap();

        let before = *filter.state();
        filter.process_measurement(&laser(100_000, 9.0, 9.0)).unwrap();
        assert_eq!(*filter.state(), before);
    }
}
