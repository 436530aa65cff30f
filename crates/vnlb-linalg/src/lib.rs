#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Empirical covariance of patch groups.
pub mod covariance;

/// Symmetric eigen decomposition and rank reduction.
///
/// See [`eigen::matrix_eigs`] for the dominant eigenpairs of a covariance matrix.
pub mod eigen;

/// Error types for the linear algebra routines.
pub mod error;

pub use covariance::{covariance_matrix, covariance_matrix_into, patch_mean, symmetrize};
pub use eigen::{
    matrix_eigs, matrix_eigs_with_config, symmetric_eigen, EigenDecomposition, EigenSolverConfig,
};
pub use error::LinalgError;

use num_traits::Float;

// NOTE: float to float casts through `NumCast` never fail for f32 and f64
#[inline]
pub(crate) fn to_f64<T: Float>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

#[inline]
pub(crate) fn from_f64<T: Float>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}
