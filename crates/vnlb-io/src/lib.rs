#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the io module.
pub mod error;

/// Frame path patterns and frame ranges.
pub mod pattern;

/// Video clip loading.
///
/// A clip is a sequence of image files named by a printf-style pattern and is
/// loaded as a flat buffer in `(t, c, h, w)` order.
pub mod video;

pub use error::IoError;
pub use pattern::{frame_indices, frame_path};
pub use video::{
    read_video, read_video_for_flow, read_video_into, ReadVideoParams, Video, VideoShape,
};
