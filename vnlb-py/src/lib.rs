use numpy::{PyArray1, PyArray2, PyArray4, PyArrayMethods, PyReadonlyArrayDyn};
use pyo3::prelude::*;
use vnlb::{ReadVideoParams, VideoShape, VnlbError};

pub fn get_version() -> String {
    let version = env!("CARGO_PKG_VERSION").to_string();
    // cargo uses "1.0-alpha1" while python uses "1.0.0a1"
    version.replace("-alpha", "a").replace("-beta", "b")
}

fn to_pyerr(err: VnlbError) -> PyErr {
    match err.status() {
        vnlb::STATUS_NUMERICAL_FAILURE => {
            PyErr::new::<pyo3::exceptions::PyArithmeticError, _>(err.to_string())
        }
        vnlb::STATUS_IO_FAILURE => PyErr::new::<pyo3::exceptions::PyIOError, _>(err.to_string()),
        _ => PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string()),
    }
}

type CovMatArrays<'py> = (
    Bound<'py, PyArray2<f32>>,
    Bound<'py, PyArray1<f32>>,
    Bound<'py, PyArray2<f32>>,
);

/// Covariance of a patch group and its `rank` dominant eigenpairs.
///
/// Returns `(cov (d, d), eigvals (r,), eigvecs (r, d))`.
#[pyfunction]
pub fn compute_cov_mat<'py>(
    py: Python<'py>,
    groups: PyReadonlyArrayDyn<'py, f32>,
    n_sim_patches: usize,
    patch_dim: usize,
    rank: usize,
) -> PyResult<CovMatArrays<'py>> {
    let groups = groups.as_slice()?;
    let res = py
        .allow_threads(|| vnlb::compute_cov_mat_owned(groups, n_sim_patches, patch_dim, rank))
        .map_err(to_pyerr)?;

    let cov_mat = PyArray1::from_vec(py, res.cov_mat).reshape([patch_dim, patch_dim])?;
    let eig_vals = PyArray1::from_vec(py, res.eig_vals);
    let eig_vecs = PyArray1::from_vec(py, res.eig_vecs).reshape([rank, patch_dim])?;
    Ok((cov_mat, eig_vals, eig_vecs))
}

#[allow(clippy::too_many_arguments)]
fn read_video_with<'py>(
    py: Python<'py>,
    shape: VideoShape,
    video_paths: String,
    first_frame: usize,
    last_frame: usize,
    frame_step: usize,
    verbose: bool,
    read: fn(&ReadVideoParams, &mut [f32]) -> Result<(), VnlbError>,
) -> PyResult<Bound<'py, PyArray4<f32>>> {
    let VideoShape { t, c, h, w } = shape;
    let params = ReadVideoParams {
        video_paths,
        first_frame,
        last_frame,
        frame_step,
        shape,
        verbose,
    };

    let video = py
        .allow_threads(|| {
            let mut video = vec![0f32; params.shape.numel()];
            read(&params, &mut video).map(|_| video)
        })
        .map_err(to_pyerr)?;

    Ok(PyArray1::from_vec(py, video).reshape([t, c, h, w])?)
}

/// Load a video clip of shape `(t, c, h, w)` from a frame path pattern.
#[pyfunction]
#[pyo3(signature = (shape, video_paths, first_frame, last_frame, frame_step=1, verbose=false))]
pub fn read_video_for_vnlb<'py>(
    py: Python<'py>,
    shape: (usize, usize, usize, usize),
    video_paths: String,
    first_frame: usize,
    last_frame: usize,
    frame_step: usize,
    verbose: bool,
) -> PyResult<Bound<'py, PyArray4<f32>>> {
    let (t, c, h, w) = shape;
    read_video_with(
        py,
        VideoShape::new(t, c, h, w),
        video_paths,
        first_frame,
        last_frame,
        frame_step,
        verbose,
        vnlb::read_video_for_vnlb,
    )
}

/// Load a grey video clip of shape `(t, 1, h, w)` from a frame path pattern.
///
/// The channel count of `shape` is ignored.
#[pyfunction]
#[pyo3(signature = (shape, video_paths, first_frame, last_frame, frame_step=1, verbose=false))]
pub fn read_video_for_flow<'py>(
    py: Python<'py>,
    shape: (usize, usize, usize, usize),
    video_paths: String,
    first_frame: usize,
    last_frame: usize,
    frame_step: usize,
    verbose: bool,
) -> PyResult<Bound<'py, PyArray4<f32>>> {
    // a colour shape is accepted and loaded as grey
    let (t, c, h, w) = shape;
    read_video_with(
        py,
        VideoShape::new(t, c, h, w).with_single_channel(),
        video_paths,
        first_frame,
        last_frame,
        frame_step,
        verbose,
        vnlb::read_video_for_flow,
    )
}

#[pymodule]
pub fn vnlb_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", get_version())?;
    m.add_function(wrap_pyfunction!(compute_cov_mat, m)?)?;
    m.add_function(wrap_pyfunction!(read_video_for_vnlb, m)?)?;
    m.add_function(wrap_pyfunction!(read_video_for_flow, m)?)?;
    Ok(())
}
