//! Filter failure conditions.

use thiserror::Error;

/// Fatal numerical failures of the filter.
///
/// Either condition means the covariance has been corrupted; continuing
/// would produce meaningless estimates, so the instance must be discarded
/// and reinitialized by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The (augmented) state covariance lost positive definiteness and the
    /// Cholesky factorization needed for sigma-point generation failed.
    #[error("covariance is not positive definite: filter has diverged")]
    CovarianceNotPositiveDefinite,
    /// The innovation covariance S could not be inverted.
    #[error("innovation covariance is singular: filter has diverged")]
    SingularInnovationCovariance,
}
