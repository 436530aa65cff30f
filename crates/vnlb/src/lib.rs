#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Covariance and rank reduction of patch groups over caller-owned buffers.
pub mod cov_mat;

/// Error type and status codes of the entry points.
pub mod error;

/// Video loading into caller-owned buffers.
pub mod video;

#[doc(inline)]
pub use vnlb_core as group;

#[doc(inline)]
pub use vnlb_io as io;

#[doc(inline)]
pub use vnlb_linalg as linalg;

pub use cov_mat::{
    compute_cov_mat, compute_cov_mat_owned, compute_cov_mat_status, CovMatOutputs, CovMatParams,
    CovMatResult,
};
pub use error::{
    status_of, VnlbError, STATUS_INVALID_ARGUMENT, STATUS_IO_FAILURE, STATUS_NUMERICAL_FAILURE,
    STATUS_OK,
};
pub use video::{read_video_for_flow, read_video_for_vnlb};
pub use vnlb_io::{ReadVideoParams, VideoShape};
pub use vnlb_linalg::EigenSolverConfig;
