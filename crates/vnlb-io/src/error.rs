use crate::video::VideoShape;

/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// The path pattern has no single integer placeholder such as `%03d`.
    #[error("Invalid frame path pattern: {0}")]
    InvalidPathPattern(String),

    /// The frame range is empty or the step is zero.
    #[error("Invalid frame range: first {first}, last {last}, step {step}")]
    InvalidFrameRange {
        /// The first frame index.
        first: usize,
        /// The last frame index, inclusive.
        last: usize,
        /// The step between two frames.
        step: usize,
    },

    /// The frame has a number of channels that cannot be loaded.
    #[error("Unsupported number of channels: {0}")]
    UnsupportedChannels(usize),

    /// A frame does not have the size or channels of the first frame.
    #[error("Frame {index} has size {actual:?} (w, h, c), expected {expected:?}")]
    FrameMismatch {
        /// The index of the offending frame.
        index: usize,
        /// The (width, height, channels) of the first frame.
        expected: (usize, usize, usize),
        /// The (width, height, channels) of the offending frame.
        actual: (usize, usize, usize),
    },

    /// The frame range does not select the requested number of frames.
    #[error("Frame range selects {actual} frames, requested {expected}")]
    FrameCountMismatch {
        /// The number of frames of the requested shape.
        expected: usize,
        /// The number of frames selected by the range.
        actual: usize,
    },

    /// The loaded video does not have the requested shape.
    #[error("Video shape mismatch: requested {expected}, loaded {actual}")]
    ShapeMismatch {
        /// The shape requested by the caller.
        expected: VideoShape,
        /// The shape of the loaded video.
        actual: VideoShape,
    },

    /// Error from the marshalling layer.
    #[error(transparent)]
    Core(#[from] vnlb_core::CoreError),
}
