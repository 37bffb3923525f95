//! Sigma-point generation and the unscented transform back to moments.

use crate::angle::normalize_angle;
use crate::error::FilterError;
use crate::types::{
    AugCov, AugSigmaPoints, AugVec, SigmaPoints, StateCov, StateVec, Weights, N_AUG, N_SIGMA, N_X,
};

/// Spreading parameter λ = 3 − n for an n-dimensional representation.
pub fn lambda(n: usize) -> f64 {
    3.0 - n as f64
}

/// Fixed sigma-point weights for the augmented dimension.
///
/// w₀ = λ/(λ+n) for the center point, wᵢ = 1/(2(λ+n)) for the 2n symmetric
/// points. The weights sum to 1 (w₀ is negative for n > 3).
pub fn sigma_weights() -> Weights {
    let l = lambda(N_AUG);
    let denom = l + N_AUG as f64;
    let mut w = Weights::repeat(0.5 / denom);
    w[0] = l / denom;
    w
}

/// Build the augmented sigma-point set from the current belief and the
/// process-noise standard deviations.
///
/// Fails when the augmented covariance is no longer positive definite,
/// which indicates filter divergence.
pub fn augmented_sigma_points(
    x: &StateVec,
    p: &StateCov,
    std_a: f64,
    std_yawdd: f64,
) -> Result<AugSigmaPoints, FilterError> {
    let mut x_aug = AugVec::zeros();
    x_aug.fixed_rows_mut::<N_X>(0).copy_from(x);

    let mut p_aug = AugCov::zeros();
    p_aug.fixed_view_mut::<N_X, N_X>(0, 0).copy_from(p);
    p_aug[(5, 5)] = std_a * std_a;
    p_aug[(6, 6)] = std_yawdd * std_yawdd;

    let l = p_aug
        .cholesky()
        .ok_or(FilterError::CovarianceNotPositiveDefinite)?
        .l();
    let scale = (lambda(N_AUG) + N_AUG as f64).sqrt();

    let mut xsig = AugSigmaPoints::zeros();
    xsig.set_column(0, &x_aug);
    for i in 0..N_AUG {
        let spread = l.column(i) * scale;
        xsig.set_column(i + 1, &(x_aug + spread));
        xsig.set_column(i + 1 + N_AUG, &(x_aug - spread));
    }
    Ok(xsig)
}

/// Collapse a state-space sigma set back to a mean and covariance, with the
/// yaw component of each deviation renormalized into (-π, π].
pub fn unscented_moments(xsig: &SigmaPoints, weights: &Weights) -> (StateVec, StateCov) {
    let mut x = StateVec::zeros();
    for i in 0..N_SIGMA {
        x += weights[i] * xsig.column(i);
    }

    let mut p = StateCov::zeros();
    for i in 0..N_SIGMA {
        let mut dx = xsig.column(i) - x;
        dx[3] = normalize_angle(dx[3]);
        p += weights[i] * dx * dx.transpose();
    }

    (x, p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AugCov;
    use approx::assert_relative_eq;

    #[test]
    fn weights_sum_to_one() {
        let w = sigma_weights();
        assert_relative_eq!(w.sum(), 1.0, epsilon = 1e-12);
        // center weight differs from the symmetric ones
        assert!(w[0] < 0.0);
        assert_relative_eq!(w[1], w[N_SIGMA - 1], epsilon = 1e-15);
    }

    #[test]
    fn sigma_round_trip_recovers_moments() {
        let x = StateVec::new(1.0, 2.0, 3.0, 0.5, 0.1);
        let p = StateCov::from_diagonal(&StateVec::new(1.0, 1.0, 0.5, 0.2, 0.1));
        let (std_a, std_yawdd) = (0.8, 0.4);

        let xsig = augmented_sigma_points(&x, &p, std_a, std_yawdd).unwrap();
        let w = sigma_weights();

        let mut mean = AugVec::zeros();
        for i in 0..N_SIGMA {
            mean += w[i] * xsig.column(i);
        }
        let mut cov = AugCov::zeros();
        for i in 0..N_SIGMA {
            let d = xsig.column(i) - mean;
            cov += w[i] * d * d.transpose();
        }

        let mut x_aug = AugVec::zeros();
        x_aug.fixed_rows_mut::<N_X>(0).copy_from(&x);
        let mut p_aug = AugCov::zeros();
        p_aug.fixed_view_mut::<N_X, N_X>(0, 0).copy_from(&p);
        p_aug[(5, 5)] = std_a * std_a;
        p_aug[(6, 6)] = std_yawdd * std_yawdd;

        assert_relative_eq!(mean, x_aug, epsilon = 1e-9);
        assert_relative_eq!(cov, p_aug, epsilon = 1e-9);
    }

    #[test]
    fn singular_covariance_is_surfaced() {
        let x = StateVec::zeros();
        // negative variance makes the augmented covariance indefinite
        let p = StateCov::from_diagonal(&StateVec::new(-1.0, 1.0, 1.0, 1.0, 1.0));
        let err = augmented_sigma_points(&x, &p, 1.0, 1.0).unwrap_err();
        assert_eq!(err, FilterError::CovarianceNotPositiveDefinite);
    }
}
