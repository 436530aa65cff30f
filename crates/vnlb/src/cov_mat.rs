use vnlb_core::{check_len, emit, prepare_group, CoreError};
use vnlb_linalg::{covariance_matrix, matrix_eigs, LinalgError};

use crate::error::{status_of, VnlbError};

/// The inputs of a covariance and rank reduction request.
#[derive(Clone, Copy, Debug)]
pub struct CovMatParams<'a> {
    /// The patch group, `n_sim_patches` patches of `patch_dim` samples stored patch by patch.
    pub groups: &'a [f32],
    /// The number of similar patches in the group.
    pub n_sim_patches: usize,
    /// The number of samples of a patch.
    pub patch_dim: usize,
    /// The number of dominant eigenpairs to keep.
    pub rank: usize,
}

impl CovMatParams<'_> {
    /// Check the request against its own declared sizes.
    pub fn validate(&self) -> Result<(), VnlbError> {
        if self.n_sim_patches == 0 || self.patch_dim == 0 {
            return Err(CoreError::EmptyGroup(self.n_sim_patches, self.patch_dim).into());
        }
        let expected = shape_numel(self.n_sim_patches, self.patch_dim)?;
        check_len("groups", self.groups.len(), expected)?;

        if self.rank == 0 || self.rank > self.patch_dim {
            return Err(LinalgError::InvalidRank {
                rank: self.rank,
                dim: self.patch_dim,
            }
            .into());
        }
        Ok(())
    }

    /// The number of elements of the covariance and eigenvector outputs.
    pub fn output_sizes(&self) -> Result<(usize, usize), VnlbError> {
        let cov_len = shape_numel(self.patch_dim, self.patch_dim)?;
        let vecs_len = shape_numel(self.rank, self.patch_dim)?;
        Ok((cov_len, vecs_len))
    }
}

fn shape_numel(rows: usize, cols: usize) -> Result<usize, CoreError> {
    rows.checked_mul(cols).ok_or(CoreError::ShapeOverflow(rows, cols))
}

/// The caller-owned destinations of a covariance and rank reduction request.
#[derive(Debug)]
pub struct CovMatOutputs<'a> {
    /// The `patch_dim x patch_dim` covariance matrix, row major.
    pub cov_mat: &'a mut [f32],
    /// The `rank` largest eigenvalues in descending order.
    pub eig_vals: &'a mut [f32],
    /// The `rank` matching unit eigenvectors, one row of `patch_dim` samples each.
    pub eig_vecs: &'a mut [f32],
}

impl CovMatOutputs<'_> {
    fn validate(&self, params: &CovMatParams) -> Result<(), VnlbError> {
        let (cov_len, vecs_len) = params.output_sizes()?;
        check_len("cov_mat", self.cov_mat.len(), cov_len)?;
        check_len("eig_vals", self.eig_vals.len(), params.rank)?;
        check_len("eig_vecs", self.eig_vecs.len(), vecs_len)?;
        Ok(())
    }
}

/// Owned results of a covariance and rank reduction request.
#[derive(Clone, Debug, PartialEq)]
pub struct CovMatResult {
    /// The `patch_dim x patch_dim` covariance matrix, row major.
    pub cov_mat: Vec<f32>,
    /// The `rank` largest eigenvalues in descending order.
    pub eig_vals: Vec<f32>,
    /// The `rank` matching unit eigenvectors, one row of `patch_dim` samples each.
    pub eig_vecs: Vec<f32>,
}

/// Compute the covariance of a patch group and its dominant eigenpairs.
///
/// All buffer sizes are checked before anything is computed or written. On
/// success `cov_mat` holds the symmetric covariance, `eig_vals` the `rank`
/// largest eigenvalues in descending order and `eig_vecs` the matching unit
/// eigenvectors. On error the outputs are left in an unspecified state.
///
/// # Arguments
///
/// * `params` - The patch group and the requested rank.
/// * `outputs` - The destination buffers.
///
/// # Example
///
/// ```
/// use vnlb::{compute_cov_mat, CovMatOutputs, CovMatParams};
///
/// let groups = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let params = CovMatParams { groups: &groups, n_sim_patches: 3, patch_dim: 2, rank: 1 };
///
/// let mut cov_mat = [0.0; 4];
/// let mut eig_vals = [0.0; 1];
/// let mut eig_vecs = [0.0; 2];
/// let outputs = CovMatOutputs {
///     cov_mat: &mut cov_mat,
///     eig_vals: &mut eig_vals,
///     eig_vecs: &mut eig_vecs,
/// };
///
/// compute_cov_mat(&params, outputs).unwrap();
/// assert!((eig_vals[0] - 16.0 / 3.0).abs() < 1e-5);
/// ```
pub fn compute_cov_mat(params: &CovMatParams, outputs: CovMatOutputs) -> Result<(), VnlbError> {
    params.validate()?;
    outputs.validate(params)?;

    let group = prepare_group(params.groups, params.n_sim_patches, params.patch_dim)?;
    let cov_mat = covariance_matrix(&group);
    let eigs = matrix_eigs(&cov_mat, params.patch_dim, params.rank)?;

    emit(&cov_mat, outputs.cov_mat)?;
    emit(eigs.eigenvalues(), outputs.eig_vals)?;
    emit(eigs.eigenvectors(), outputs.eig_vecs)?;

    log::debug!(
        "compute_cov_mat: n={} d={} r={} top eigenvalue {:?}",
        params.n_sim_patches,
        params.patch_dim,
        params.rank,
        eigs.eigenvalues().first()
    );

    Ok(())
}

/// Same as [`compute_cov_mat`] but returns an integer status code.
///
/// `0` on success, `-1` for an invalid argument and `1` for a numerical failure.
pub fn compute_cov_mat_status(params: &CovMatParams, outputs: CovMatOutputs) -> i32 {
    let result = compute_cov_mat(params, outputs);
    if let Err(e) = &result {
        log::warn!("compute_cov_mat failed: {e}");
    }
    status_of(&result)
}

/// Compute the covariance of a patch group and its dominant eigenpairs into owned buffers.
///
/// # Arguments
///
/// * `groups` - The patch group, `n_sim_patches` patches of `patch_dim` samples.
/// * `n_sim_patches` - The number of similar patches.
/// * `patch_dim` - The number of samples of a patch.
/// * `rank` - The number of dominant eigenpairs to keep.
pub fn compute_cov_mat_owned(
    groups: &[f32],
    n_sim_patches: usize,
    patch_dim: usize,
    rank: usize,
) -> Result<CovMatResult, VnlbError> {
    let params = CovMatParams {
        groups,
        n_sim_patches,
        patch_dim,
        rank,
    };
    params.validate()?;
    let (cov_len, vecs_len) = params.output_sizes()?;

    let mut result = CovMatResult {
        cov_mat: vec![0.0; cov_len],
        eig_vals: vec![0.0; rank],
        eig_vecs: vec![0.0; vecs_len],
    };

    compute_cov_mat(
        &params,
        CovMatOutputs {
            cov_mat: &mut result.cov_mat,
            eig_vals: &mut result.eig_vals,
            eig_vecs: &mut result.eig_vecs,
        },
    )?;

    Ok(result)
}
