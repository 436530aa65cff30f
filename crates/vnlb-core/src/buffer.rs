use crate::error::CoreError;

/// Copy a result into a caller-allocated destination buffer.
///
/// The destination must have exactly as many elements as the result; it is
/// never resized and is overwritten in full.
///
/// # Arguments
///
/// * `src` - The computed result.
/// * `dst` - The caller-owned destination buffer.
///
/// # Errors
///
/// Returns [`CoreError::DestinationSizeMismatch`] if the lengths differ. In that
/// case `dst` is left untouched.
///
/// # Example
///
/// ```
/// use vnlb_core::emit;
///
/// let mut dst = [0.0f32; 3];
/// emit(&[1.0, 2.0, 3.0], &mut dst).unwrap();
/// assert_eq!(dst, [1.0, 2.0, 3.0]);
/// ```
pub fn emit<T: Copy>(src: &[T], dst: &mut [T]) -> Result<(), CoreError> {
    if src.len() != dst.len() {
        return Err(CoreError::DestinationSizeMismatch {
            expected: src.len(),
            actual: dst.len(),
        });
    }
    dst.copy_from_slice(src);
    Ok(())
}

/// Check that a named boundary buffer has exactly the expected length.
///
/// # Arguments
///
/// * `name` - The name of the buffer, reported in the error.
/// * `len` - The length of the buffer supplied by the caller.
/// * `expected` - The length required by the declared shape.
pub fn check_len(name: &'static str, len: usize, expected: usize) -> Result<(), CoreError> {
    if len != expected {
        return Err(CoreError::InvalidBufferLength {
            name,
            expected,
            actual: len,
        });
    }
    Ok(())
}
