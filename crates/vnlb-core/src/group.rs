use crate::error::CoreError;

/// A group of same-sized patches stored as a row-major `n x d` buffer.
///
/// Each row is one flattened patch. The group owns its data; it is built from
/// a caller buffer with [`prepare_group`] and lives for a single computation.
///
/// # Examples
///
/// ```
/// use vnlb_core::PatchGroup;
///
/// let group = PatchGroup::new(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).unwrap();
///
/// assert_eq!(group.num_patches(), 3);
/// assert_eq!(group.patch_dim(), 2);
/// assert_eq!(group.patch(1), &[3.0, 4.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PatchGroup<T> {
    data: Vec<T>,
    num_patches: usize,
    patch_dim: usize,
}

/// Compute the number of elements of a `n x d` group, rejecting empty shapes.
pub(crate) fn group_numel(num_patches: usize, patch_dim: usize) -> Result<usize, CoreError> {
    if num_patches == 0 || patch_dim == 0 {
        return Err(CoreError::EmptyGroup(num_patches, patch_dim));
    }
    num_patches
        .checked_mul(patch_dim)
        .ok_or(CoreError::ShapeOverflow(num_patches, patch_dim))
}

impl<T> PatchGroup<T> {
    /// Create a new patch group from owned data.
    ///
    /// # Arguments
    ///
    /// * `data` - The flattened patches, one patch after the other.
    /// * `num_patches` - The number of patches `n` in the group.
    /// * `patch_dim` - The number of elements `d` of each patch.
    ///
    /// # Errors
    ///
    /// If the shape is empty or the data length is not exactly `n * d`, an error is returned.
    pub fn new(data: Vec<T>, num_patches: usize, patch_dim: usize) -> Result<Self, CoreError> {
        let numel = group_numel(num_patches, patch_dim)?;
        if data.len() != numel {
            return Err(CoreError::InvalidShape(data.len(), numel));
        }

        Ok(Self {
            data,
            num_patches,
            patch_dim,
        })
    }

    /// The number of patches `n` in the group.
    #[inline]
    pub fn num_patches(&self) -> usize {
        self.num_patches
    }

    /// The number of elements `d` of each patch.
    #[inline]
    pub fn patch_dim(&self) -> usize {
        self.patch_dim
    }

    /// The flattened group data in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The patch at position `index` in the group.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.num_patches()`.
    #[inline]
    pub fn patch(&self, index: usize) -> &[T] {
        let start = index * self.patch_dim;
        &self.data[start..start + self.patch_dim]
    }

    /// Iterate over the patches of the group.
    pub fn patches(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.patch_dim)
    }

    /// Consume the group and return the flattened data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

/// Copy the first `n * d` values of a caller buffer into an owned patch group.
///
/// A buffer longer than `n * d` is accepted and only its prefix is copied.
///
/// # Arguments
///
/// * `raw` - The caller-owned buffer with the flattened patches.
/// * `num_patches` - The number of patches `n`.
/// * `patch_dim` - The number of elements `d` of each patch.
///
/// # Errors
///
/// Returns [`CoreError::BufferTooShort`] if `raw` holds fewer than `n * d` values,
/// and [`CoreError::EmptyGroup`] if `n` or `d` is zero.
///
/// # Example
///
/// ```
/// use vnlb_core::prepare_group;
///
/// let raw = [1.0f32, 2.0, 3.0, 4.0];
/// let group = prepare_group(&raw, 2, 2).unwrap();
/// assert_eq!(group.as_slice(), &raw);
///
/// assert!(prepare_group(&raw, 3, 2).is_err());
/// ```
pub fn prepare_group<T: Copy>(
    raw: &[T],
    num_patches: usize,
    patch_dim: usize,
) -> Result<PatchGroup<T>, CoreError> {
    let numel = group_numel(num_patches, patch_dim)?;
    if raw.len() < numel {
        return Err(CoreError::BufferTooShort {
            expected: numel,
            actual: raw.len(),
        });
    }

    Ok(PatchGroup {
        data: raw[..numel].to_vec(),
        num_patches,
        patch_dim,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_group_exact() -> Result<(), CoreError> {
        let raw = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let group = prepare_group(&raw, 3, 2)?;
        assert_eq!(group.num_patches(), 3);
        assert_eq!(group.patch_dim(), 2);
        assert_eq!(group.patch(0), &[1.0, 2.0]);
        assert_eq!(group.patch(2), &[5.0, 6.0]);
        assert_eq!(group.patches().count(), 3);
        Ok(())
    }

    #[test]
    fn prepare_group_copies_prefix() -> Result<(), CoreError> {
        let raw = [1.0f64, 2.0, 3.0, 4.0, 99.0];
        let group = prepare_group(&raw, 2, 2)?;
        assert_eq!(group.into_vec(), vec![1.0, 2.0, 3.0, 4.0]);
        Ok(())
    }

    #[test]
    fn prepare_group_too_short() {
        let raw = [1.0f32; 5];
        assert_eq!(
            prepare_group(&raw, 3, 2),
            Err(CoreError::BufferTooShort {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn prepare_group_empty() {
        let raw = [1.0f32; 4];
        assert_eq!(prepare_group(&raw, 0, 2), Err(CoreError::EmptyGroup(0, 2)));
        assert_eq!(prepare_group(&raw, 2, 0), Err(CoreError::EmptyGroup(2, 0)));
    }

    #[test]
    fn prepare_group_overflow() {
        let raw = [1.0f32; 4];
        assert_eq!(
            prepare_group(&raw, usize::MAX, 2),
            Err(CoreError::ShapeOverflow(usize::MAX, 2))
        );
    }

    #[test]
    fn new_requires_exact_length() {
        let res = PatchGroup::new(vec![0u8; 7], 3, 2);
        assert_eq!(res, Err(CoreError::InvalidShape(7, 6)));
    }
}
