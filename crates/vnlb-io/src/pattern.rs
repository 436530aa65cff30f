use std::path::PathBuf;

use crate::error::IoError;

/// Expand the integer placeholder of a frame path pattern.
///
/// The pattern holds exactly one printf-style placeholder: `%d`, `%Nd`
/// (space padded to `N` characters) or `%0Nd` (zero padded).
///
/// # Arguments
///
/// * `pattern` - The path pattern, e.g. `frames/%03d.png`.
/// * `index` - The frame index.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use vnlb_io::pattern::frame_path;
///
/// let path = frame_path("frames/%03d.png", 7).unwrap();
/// assert_eq!(path, PathBuf::from("frames/007.png"));
/// ```
pub fn frame_path(pattern: &str, index: usize) -> Result<PathBuf, IoError> {
    let invalid = || IoError::InvalidPathPattern(pattern.to_string());

    let start = pattern.find('%').ok_or_else(invalid)?;
    let prefix = &pattern[..start];
    let rest = &pattern[start + 1..];

    let conv_len = rest.find('d').ok_or_else(invalid)?;
    let width_flags = &rest[..conv_len];
    let suffix = &rest[conv_len + 1..];

    if !width_flags.chars().all(|c| c.is_ascii_digit()) || suffix.contains('%') {
        return Err(invalid());
    }

    let width = if width_flags.is_empty() {
        0
    } else {
        width_flags.parse::<usize>().map_err(|_| invalid())?
    };

    let number = if width_flags.starts_with('0') {
        format!("{:0width$}", index, width = width)
    } else {
        format!("{:width$}", index, width = width)
    };

    Ok(PathBuf::from(format!("{prefix}{number}{suffix}")))
}

/// The frame indices from `first` to `last` inclusive, every `step` frames.
///
/// # Errors
///
/// If `step` is zero or `last < first`, an error is returned.
pub fn frame_indices(first: usize, last: usize, step: usize) -> Result<Vec<usize>, IoError> {
    if step == 0 || last < first {
        return Err(IoError::InvalidFrameRange { first, last, step });
    }
    Ok((first..=last).step_by(step).collect())
}
