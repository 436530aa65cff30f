#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Copies between computed results and caller-owned buffers.
pub mod buffer;

/// Error types for the marshalling layer.
///
/// Defines [`CoreError`] for size and shape contract violations at the boundary.
pub mod error;

/// Owned patch group container.
pub mod group;

pub use buffer::{check_len, emit};
pub use error::CoreError;
pub use group::{prepare_group, PatchGroup};
