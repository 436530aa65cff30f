//! Empirical covariance of a group of patches.
//!
//! For a group of `n` patches `x_i` of dimension `d` the estimator computes
//!
//! ```text
//! μ = (1/n) Σ x_i
//! C = (1/n) Σ (x_i - μ)(x_i - μ)ᵀ
//! ```
//!
//! The maximum-likelihood normaliser `1/n` is used, not the unbiased `1/(n-1)`.
//! Sums are accumulated in `f64` whatever the scalar type of the group.

use num_traits::Float;
use vnlb_core::{emit, PatchGroup};

use crate::error::LinalgError;
use crate::{from_f64, to_f64};

/// Compute the mean patch of a group.
///
/// # Arguments
///
/// * `group` - The patch group.
///
/// # Returns
///
/// The mean vector of length `d`.
///
/// # Example
///
/// ```
/// use vnlb_core::PatchGroup;
/// use vnlb_linalg::covariance::patch_mean;
///
/// let group = PatchGroup::new(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).unwrap();
/// assert_eq!(patch_mean(&group), vec![3.0, 4.0]);
/// ```
pub fn patch_mean<T: Float>(group: &PatchGroup<T>) -> Vec<T> {
    mean_f64(group).into_iter().map(from_f64).collect()
}

fn mean_f64<T: Float>(group: &PatchGroup<T>) -> Vec<f64> {
    let mut sum = vec![0f64; group.patch_dim()];
    for patch in group.patches() {
        sum.iter_mut()
            .zip(patch.iter())
            .for_each(|(s, &x)| *s += to_f64(x));
    }

    let normalizer = 1.0 / group.num_patches() as f64;
    sum.iter_mut().for_each(|s| *s *= normalizer);
    sum
}

/// Covariance in working precision, row-major `d x d`.
pub(crate) fn covariance_f64<T: Float>(group: &PatchGroup<T>) -> Vec<f64> {
    let dim = group.patch_dim();
    let mut cov = vec![0f64; dim * dim];

    // a single sample has no variance
    if group.num_patches() == 1 {
        return cov;
    }

    let mean = mean_f64(group);
    let mut centered = vec![0f64; dim];

    // rank-one update with the upper triangle only
    for patch in group.patches() {
        centered
            .iter_mut()
            .zip(patch.iter().zip(mean.iter()))
            .for_each(|(c, (&x, &m))| *c = to_f64(x) - m);

        for i in 0..dim {
            let ci = centered[i];
            let row = &mut cov[i * dim..(i + 1) * dim];
            for j in i..dim {
                row[j] += ci * centered[j];
            }
        }
    }

    let normalizer = 1.0 / group.num_patches() as f64;
    for i in 0..dim {
        for j in i..dim {
            let val = cov[i * dim + j] * normalizer;
            cov[i * dim + j] = val;
            cov[j * dim + i] = val;
        }
    }

    symmetrize_f64(&mut cov, dim);

    cov
}

/// Compute the `d x d` covariance matrix of a patch group.
///
/// The result is row-major, exactly symmetric and positive semi-definite up to
/// rounding. A group with a single patch yields the zero matrix. Singular
/// covariances are expected and not reported.
///
/// # Arguments
///
/// * `group` - The patch group with `n >= 1` patches.
///
/// # Returns
///
/// The covariance matrix with `d * d` elements.
///
/// # Example
///
/// ```
/// use vnlb_core::PatchGroup;
/// use vnlb_linalg::covariance::covariance_matrix;
///
/// let group = PatchGroup::new(vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).unwrap();
/// let cov = covariance_matrix(&group);
///
/// assert!((cov[0] - 8.0 / 3.0).abs() < 1e-12);
/// assert_eq!(cov[1], cov[2]);
/// ```
pub fn covariance_matrix<T: Float>(group: &PatchGroup<T>) -> Vec<T> {
    covariance_f64(group).into_iter().map(from_f64).collect()
}

/// Compute the covariance matrix of a patch group into a caller buffer.
///
/// # Arguments
///
/// * `group` - The patch group.
/// * `dst` - The destination buffer with exactly `d * d` elements.
///
/// # Errors
///
/// If `dst` is not sized `d * d`, an error is returned and `dst` is left untouched.
pub fn covariance_matrix_into<T: Float>(
    group: &PatchGroup<T>,
    dst: &mut [T],
) -> Result<(), LinalgError> {
    let cov = covariance_matrix(group);
    emit(&cov, dst)?;
    Ok(())
}

/// Replace a square matrix by its symmetric part `(C + Cᵀ) / 2`.
///
/// # Arguments
///
/// * `mat` - The row-major matrix, modified in place.
/// * `dim` - The dimension of the matrix.
///
/// # Errors
///
/// If `mat` does not hold `dim * dim` elements, an error is returned.
pub fn symmetrize<T: Float>(mat: &mut [T], dim: usize) -> Result<(), LinalgError> {
    if mat.len() != dim * dim {
        return Err(LinalgError::NotSquare {
            len: mat.len(),
            dim,
        });
    }

    let half = from_f64::<T>(0.5);
    for i in 0..dim {
        for j in (i + 1)..dim {
            let val = (mat[i * dim + j] + mat[j * dim + i]) * half;
            mat[i * dim + j] = val;
            mat[j * dim + i] = val;
        }
    }

    Ok(())
}

pub(crate) fn symmetrize_f64(mat: &mut [f64], dim: usize) {
    for i in 0..dim {
        for j in (i + 1)..dim {
            let val = 0.5 * (mat[i * dim + j] + mat[j * dim + i]);
            mat[i * dim + j] = val;
            mat[j * dim + i] = val;
        }
    }
}
