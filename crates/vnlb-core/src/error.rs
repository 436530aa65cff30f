/// An error type for the buffer marshalling layer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The group has no patches or the patches have no elements.
    #[error("Empty patch group: {0} patches of dimension {1}")]
    EmptyGroup(usize, usize),

    /// The number of elements of the group does not fit in `usize`.
    #[error("Group shape overflows: {0} patches of dimension {1}")]
    ShapeOverflow(usize, usize),

    /// The source buffer holds fewer elements than the declared shape.
    #[error("Source buffer too short: expected at least {expected} elements, got {actual}")]
    BufferTooShort {
        /// The number of elements required by the declared shape.
        expected: usize,
        /// The number of elements available in the buffer.
        actual: usize,
    },

    /// The owned data does not match the declared shape.
    #[error("Data length ({0}) does not match the group shape ({1})")]
    InvalidShape(usize, usize),

    /// The destination buffer is not sized to the result.
    #[error("Destination size mismatch: expected {expected} elements, got {actual}")]
    DestinationSizeMismatch {
        /// The number of elements of the result.
        expected: usize,
        /// The number of elements of the destination buffer.
        actual: usize,
    },

    /// A named boundary buffer does not have the required length.
    #[error("Invalid length for buffer `{name}`: expected {expected} elements, got {actual}")]
    InvalidBufferLength {
        /// The name of the buffer at the boundary.
        name: &'static str,
        /// The required number of elements.
        expected: usize,
        /// The number of elements supplied by the caller.
        actual: usize,
    },
}
