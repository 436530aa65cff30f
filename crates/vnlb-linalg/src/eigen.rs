//! Dominant eigenpairs of symmetric matrices.
//!
//! The decomposition uses cyclic Jacobi rotations on a per-call working copy of
//! the matrix, in `f64`. Each rotation annihilates one off-diagonal pair and the
//! product of the rotations converges to the eigenvector basis.
//!
//! The results are reproducible:
//!
//! * eigenvalues are sorted in descending order, and eigenvalues equal up to
//!   [`EigenSolverConfig::tie_tolerance`] keep the order in which the solver
//!   produced them;
//! * every eigenvector is flipped so that its largest-magnitude component is
//!   positive.
//!
//! # References
//!
//! * Golub and Van Loan, "Matrix Computations", section 8.5 (cyclic Jacobi).

use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::covariance::symmetrize_f64;
use crate::error::LinalgError;
use crate::{from_f64, to_f64};

/// Parameters of the Jacobi eigen solver.
///
/// # Example
///
/// ```
/// use vnlb_linalg::EigenSolverConfig;
///
/// let config = EigenSolverConfig {
///     max_sweeps: 50,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EigenSolverConfig {
    /// Maximum number of full sweeps over the off-diagonal pairs.
    pub max_sweeps: usize,
    /// Convergence threshold on the off-diagonal norm, relative to the matrix norm.
    pub tolerance: f64,
    /// Relative distance under which two eigenvalues are considered tied.
    pub tie_tolerance: f64,
}

impl Default for EigenSolverConfig {
    fn default() -> Self {
        Self {
            max_sweeps: 100,
            tolerance: 1e-12,
            tie_tolerance: 1e-9,
        }
    }
}

impl EigenSolverConfig {
    /// Check that the configuration can be used by the solver.
    pub fn validate(&self) -> Result<(), LinalgError> {
        if self.max_sweeps == 0 {
            return Err(LinalgError::InvalidConfig(
                "max_sweeps must be at least 1".to_string(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(LinalgError::InvalidConfig(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        if !(self.tie_tolerance.is_finite() && self.tie_tolerance >= 0.0) {
            return Err(LinalgError::InvalidConfig(format!(
                "tie_tolerance must be finite and non-negative, got {}",
                self.tie_tolerance
            )));
        }
        Ok(())
    }
}

/// The `r` dominant eigenpairs of a symmetric `d x d` matrix.
///
/// Eigenvalues are stored in descending order. Eigenvectors are stored as `r`
/// contiguous rows of length `d`, row `k` being the eigenvector of eigenvalue `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenDecomposition<T> {
    eigenvalues: Vec<T>,
    eigenvectors: Vec<T>,
    dim: usize,
}

impl<T> EigenDecomposition<T> {
    /// The number of eigenpairs `r`.
    #[inline]
    pub fn rank(&self) -> usize {
        self.eigenvalues.len()
    }

    /// The dimension `d` of the decomposed matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The eigenvalues in descending order.
    #[inline]
    pub fn eigenvalues(&self) -> &[T] {
        &self.eigenvalues
    }

    /// The eigenvectors as `r` rows of length `d`.
    #[inline]
    pub fn eigenvectors(&self) -> &[T] {
        &self.eigenvectors
    }

    /// The eigenvector of the `k`-th largest eigenvalue.
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.rank()`.
    #[inline]
    pub fn eigenvector(&self, k: usize) -> &[T] {
        &self.eigenvectors[k * self.dim..(k + 1) * self.dim]
    }

    /// Iterate over the `(eigenvalue, eigenvector)` pairs in descending order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, &[T])> {
        self.eigenvalues
            .iter()
            .zip(self.eigenvectors.chunks_exact(self.dim))
    }

    /// Consume the decomposition and return the eigenvalues and eigenvectors buffers.
    pub fn into_parts(self) -> (Vec<T>, Vec<T>) {
        (self.eigenvalues, self.eigenvectors)
    }
}

/// Compute the `rank` largest eigenpairs of a symmetric matrix.
///
/// Uses [`EigenSolverConfig::default`]. See [`matrix_eigs_with_config`].
///
/// # Example
///
/// ```
/// use vnlb_linalg::matrix_eigs;
///
/// let c = 8.0f64 / 3.0;
/// let eigs = matrix_eigs(&[c, c, c, c], 2, 1).unwrap();
///
/// assert!((eigs.eigenvalues()[0] - 16.0 / 3.0).abs() < 1e-12);
/// let v = eigs.eigenvector(0);
/// assert!((v[0] - 0.5f64.sqrt()).abs() < 1e-12);
/// assert!((v[1] - 0.5f64.sqrt()).abs() < 1e-12);
/// ```
pub fn matrix_eigs<T: Float>(
    mat: &[T],
    dim: usize,
    rank: usize,
) -> Result<EigenDecomposition<T>, LinalgError> {
    matrix_eigs_with_config(mat, dim, rank, &EigenSolverConfig::default())
}

/// Compute the full eigen decomposition of a symmetric matrix.
pub fn symmetric_eigen<T: Float>(
    mat: &[T],
    dim: usize,
    config: &EigenSolverConfig,
) -> Result<EigenDecomposition<T>, LinalgError> {
    matrix_eigs_with_config(mat, dim, dim, config)
}

/// Compute the `rank` largest eigenpairs of a symmetric matrix.
///
/// The matrix is symmetrized before the decomposition, so only its symmetric
/// part is taken into account. Eigenvalues close to zero are returned as such;
/// rank-deficient matrices are not an error.
///
/// # Arguments
///
/// * `mat` - The row-major symmetric matrix with `dim * dim` elements.
/// * `dim` - The dimension `d` of the matrix.
/// * `rank` - The number of eigenpairs `r` to return, `1 <= r <= d`.
/// * `config` - The solver parameters.
///
/// # Returns
///
/// The `rank` eigenvalues in descending order and their unit eigenvectors.
///
/// # Errors
///
/// * [`LinalgError::NotSquare`] or [`LinalgError::InvalidRank`] if the shape
///   contract is violated. Checked before any computation.
/// * [`LinalgError::NonFiniteInput`] if the matrix holds NaN or infinite values.
/// * [`LinalgError::NumericalFailure`] if the iterations do not converge within
///   `config.max_sweeps`. No partial result is returned.
pub fn matrix_eigs_with_config<T: Float>(
    mat: &[T],
    dim: usize,
    rank: usize,
    config: &EigenSolverConfig,
) -> Result<EigenDecomposition<T>, LinalgError> {
    if dim.checked_mul(dim) != Some(mat.len()) {
        return Err(LinalgError::NotSquare {
            len: mat.len(),
            dim,
        });
    }
    if rank == 0 || rank > dim {
        return Err(LinalgError::InvalidRank { rank, dim });
    }
    config.validate()?;

    let mut work = mat.iter().map(|&x| to_f64(x)).collect::<Vec<_>>();
    if work.iter().any(|x| !x.is_finite()) {
        return Err(LinalgError::NonFiniteInput);
    }
    symmetrize_f64(&mut work, dim);

    let (values, vectors) = jacobi_eigenanalysis(work, dim, config)?;

    let order = descending_order(&values, config.tie_tolerance);

    let mut eigenvalues = Vec::with_capacity(rank);
    let mut eigenvectors = Vec::with_capacity(rank * dim);
    let mut column = vec![0f64; dim];
    for &k in order.iter().take(rank) {
        for (i, c) in column.iter_mut().enumerate() {
            *c = vectors[i * dim + k];
        }
        normalize(&mut column);
        canonical_sign(&mut column);

        eigenvalues.push(from_f64(values[k]));
        eigenvectors.extend(column.iter().map(|&x| from_f64::<T>(x)));
    }

    Ok(EigenDecomposition {
        eigenvalues,
        eigenvectors,
        dim,
    })
}

/// Diagonalize a symmetric matrix in place with cyclic Jacobi sweeps.
///
/// Returns the unsorted eigenvalues and the row-major matrix whose column `k`
/// is the eigenvector of eigenvalue `k`.
fn jacobi_eigenanalysis(
    mut a: Vec<f64>,
    dim: usize,
    config: &EigenSolverConfig,
) -> Result<(Vec<f64>, Vec<f64>), LinalgError> {
    let mut v = vec![0f64; dim * dim];
    for i in 0..dim {
        v[i * dim + i] = 1.0;
    }

    let threshold = config.tolerance * frobenius_norm(&a);
    let mut off = off_diagonal_norm(&a, dim);
    let mut sweeps = 0;

    loop {
        let converged = off <= threshold && threshold.is_finite();
        let diverged = !off.is_finite() || !threshold.is_finite();
        if converged {
            break;
        }
        if sweeps == config.max_sweeps || diverged {
            log::warn!(
                "jacobi did not converge after {} sweeps (dim: {}, off-diagonal: {:e})",
                sweeps,
                dim,
                off
            );
            return Err(LinalgError::NumericalFailure {
                sweeps,
                off_diagonal: off,
            });
        }

        for p in 0..dim {
            for q in (p + 1)..dim {
                jacobi_rotation(&mut a, &mut v, dim, p, q);
            }
        }

        sweeps += 1;
        off = off_diagonal_norm(&a, dim);
    }

    if (0..dim).any(|i| !a[i * dim + i].is_finite()) {
        log::warn!("jacobi produced non-finite eigenvalues (dim: {})", dim);
        return Err(LinalgError::NumericalFailure {
            sweeps,
            off_diagonal: off,
        });
    }

    log::debug!(
        "jacobi converged in {} sweeps (dim: {}, off-diagonal: {:e})",
        sweeps,
        dim,
        off
    );

    let values = (0..dim).map(|i| a[i * dim + i]).collect();

    Ok((values, v))
}

/// Apply the rotation annihilating `a[p][q]`: `A = Jᵀ A J` and `V = V J`.
#[inline]
fn jacobi_rotation(a: &mut [f64], v: &mut [f64], dim: usize, p: usize, q: usize) {
    let a_pq = a[p * dim + q];
    if a_pq == 0.0 {
        return;
    }
    let a_pp = a[p * dim + p];
    let a_qq = a[q * dim + q];

    // smaller root of t² + 2tθ - 1 = 0 keeps the rotation angle below π/4
    let theta = (a_qq - a_pp) / (2.0 * a_pq);
    let t = theta.signum() / (theta.abs() + theta.hypot(1.0));
    let c = 1.0 / t.hypot(1.0);
    let s = t * c;

    // A J
    for k in 0..dim {
        let a_kp = a[k * dim + p];
        let a_kq = a[k * dim + q];
        a[k * dim + p] = c * a_kp - s * a_kq;
        a[k * dim + q] = s * a_kp + c * a_kq;
    }

    // Jᵀ (A J)
    for k in 0..dim {
        let a_pk = a[p * dim + k];
        let a_qk = a[q * dim + k];
        a[p * dim + k] = c * a_pk - s * a_qk;
        a[q * dim + k] = s * a_pk + c * a_qk;
    }

    a[p * dim + q] = 0.0;
    a[q * dim + p] = 0.0;

    for k in 0..dim {
        let v_kp = v[k * dim + p];
        let v_kq = v[k * dim + q];
        v[k * dim + p] = c * v_kp - s * v_kq;
        v[k * dim + q] = s * v_kp + c * v_kq;
    }
}

/// Euclidean norm of `values`, scaled by the largest magnitude so that squaring
/// cannot overflow.
fn scaled_norm<'a>(values: impl Iterator<Item = &'a f64> + Clone) -> f64 {
    let scale = values.clone().fold(0f64, |acc, x| acc.max(x.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let sum = values.map(|x| (x / scale) * (x / scale)).sum::<f64>();
    scale * sum.sqrt()
}

fn frobenius_norm(a: &[f64]) -> f64 {
    scaled_norm(a.iter())
}

fn off_diagonal_norm(a: &[f64], dim: usize) -> f64 {
    let upper = (0..dim).flat_map(|i| a[i * dim + i + 1..(i + 1) * dim].iter());
    std::f64::consts::SQRT_2 * scaled_norm(upper)
}

/// Indices of the eigenvalues sorted in descending order.
///
/// Eigenvalues within `tie_tolerance * max|λ|` of the largest value of their
/// run are ordered by their index in `values`.
fn descending_order(values: &[f64], tie_tolerance: f64) -> Vec<usize> {
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let scale = values.iter().fold(0f64, |acc, v| acc.max(v.abs()));
    let eps = tie_tolerance * scale;

    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[start]] - values[order[end]] <= eps {
            end += 1;
        }
        order[start..end].sort_unstable();
        start = end;
    }

    order
}

fn normalize(v: &mut [f64]) {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Flip the vector so that its largest-magnitude component is positive.
fn canonical_sign(v: &mut [f64]) {
    let mut pivot = 0;
    for (i, x) in v.iter().enumerate() {
        if x.abs() > v[pivot].abs() {
            pivot = i;
        }
    }
    if v[pivot] < 0.0 {
        v.iter_mut().for_each(|x| *x = -*x);
    }
}
