use vnlb_core::CoreError;
use vnlb_io::IoError;
use vnlb_linalg::LinalgError;

/// Status code of a successful call.
pub const STATUS_OK: i32 = 0;

/// Status code of a call rejected for an invalid argument.
pub const STATUS_INVALID_ARGUMENT: i32 = -1;

/// Status code of a call whose numerical routine failed.
pub const STATUS_NUMERICAL_FAILURE: i32 = 1;

/// Status code of a call that failed to read its input files.
pub const STATUS_IO_FAILURE: i32 = 2;

/// An error type for the denoising entry points.
#[derive(thiserror::Error, Debug)]
pub enum VnlbError {
    /// Error from the marshalling layer.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Error from the covariance or eigen routines.
    #[error(transparent)]
    Linalg(#[from] LinalgError),

    /// Error from the video loader.
    #[error(transparent)]
    Io(#[from] IoError),
}

impl VnlbError {
    /// The integer status code of the error.
    ///
    /// `-1` for an invalid argument, `1` for a numerical failure and `2` for a
    /// failure to read or decode the input files.
    pub fn status(&self) -> i32 {
        match self {
            VnlbError::Core(_) => STATUS_INVALID_ARGUMENT,
            VnlbError::Linalg(e) if e.is_numerical_failure() => STATUS_NUMERICAL_FAILURE,
            VnlbError::Linalg(_) => STATUS_INVALID_ARGUMENT,
            VnlbError::Io(
                IoError::Core(_)
                | IoError::InvalidPathPattern(_)
                | IoError::InvalidFrameRange { .. }
                | IoError::FrameCountMismatch { .. }
                | IoError::ShapeMismatch { .. },
            ) => STATUS_INVALID_ARGUMENT,
            VnlbError::Io(_) => STATUS_IO_FAILURE,
        }
    }

    /// Whether the error comes from a violated call contract.
    pub fn is_invalid_argument(&self) -> bool {
        self.status() == STATUS_INVALID_ARGUMENT
    }
}

/// The status code of a call result.
pub fn status_of<T>(result: &Result<T, VnlbError>) -> i32 {
    match result {
        Ok(_) => STATUS_OK,
        Err(e) => e.status(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn status_codes() {
        let err: VnlbError = CoreError::EmptyGroup(0, 3).into();
        assert_eq!(err.status(), -1);

        let err: VnlbError = LinalgError::InvalidRank { rank: 4, dim: 3 }.into();
        assert_eq!(err.status(), -1);
        assert!(err.is_invalid_argument());

        let err: VnlbError = LinalgError::NumericalFailure {
            sweeps: 100,
            off_diagonal: 1.0,
        }
        .into();
        assert_eq!(err.status(), 1);

        let err: VnlbError = LinalgError::NonFiniteInput.into();
        assert_eq!(err.status(), 1);

        let err: VnlbError = IoError::FileDoesNotExist(PathBuf::from("missing.png")).into();
        assert_eq!(err.status(), 2);

        let err: VnlbError = IoError::InvalidPathPattern("frames.png".to_string()).into();
        assert_eq!(err.status(), -1);

        let err: VnlbError = IoError::FrameCountMismatch {
            expected: 3,
            actual: 2,
        }
        .into();
        assert_eq!(err.status(), -1);

        assert_eq!(status_of(&Ok::<(), VnlbError>(())), 0);
    }
}
