use vnlb_core::CoreError;

/// An error type for the covariance and eigen decomposition routines.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// The matrix buffer does not hold `dim * dim` elements.
    #[error("Matrix of {len} elements is not square with dimension {dim}")]
    NotSquare {
        /// The number of elements of the matrix buffer.
        len: usize,
        /// The declared dimension of the matrix.
        dim: usize,
    },

    /// The requested rank is outside `1..=dim`.
    #[error("Invalid rank {rank} for a matrix of dimension {dim}")]
    InvalidRank {
        /// The requested number of eigenpairs.
        rank: usize,
        /// The dimension of the matrix.
        dim: usize,
    },

    /// The solver configuration is not usable.
    #[error("Invalid eigen solver configuration: {0}")]
    InvalidConfig(String),

    /// The matrix contains NaN or infinite entries.
    #[error("Matrix contains non-finite values")]
    NonFiniteInput,

    /// The Jacobi iterations did not converge.
    #[error("Eigen decomposition failed to converge after {sweeps} sweeps (off-diagonal norm {off_diagonal:e})")]
    NumericalFailure {
        /// The number of sweeps performed.
        sweeps: usize,
        /// The off-diagonal Frobenius norm left when giving up.
        off_diagonal: f64,
    },

    /// Error from the marshalling layer.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl LinalgError {
    /// Whether the error comes from the numerical routine rather than from the caller contract.
    pub fn is_numerical_failure(&self) -> bool {
        matches!(
            self,
            LinalgError::NumericalFailure { .. } | LinalgError::NonFiniteInput
        )
    }
}
