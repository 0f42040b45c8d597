//! Scatter reductions over indexed buffers.

use std::ops::AddAssign;

use crate::SpatialError;

/// Scatter-add `values[k]` into `buffer[index[k]]`.
///
/// Several values may target the same slot; they accumulate in order. This
/// is how multiple dofs driving one link are combined into that link's
/// entry.
///
/// # Errors
///
/// Returns [`SpatialError::LengthMismatch`] if `index` and `values` differ in
/// length and [`SpatialError::IndexOutOfBounds`] if an index exceeds the
/// buffer. The buffer is left untouched on error.
///
/// # Example
///
/// ```
/// use sim_spatial::index_sum;
///
/// let mut buf = vec![0.0; 3];
/// index_sum(&mut buf, &[0, 2, 2], &[1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(buf, vec![1.0, 0.0, 5.0]);
/// ```
pub fn index_sum<T>(buffer: &mut [T], index: &[usize], values: &[T]) -> crate::Result<()>
where
    T: AddAssign + Copy,
{
    if index.len() != values.len() {
        return Err(SpatialError::LengthMismatch {
            expected: index.len(),
            actual: values.len(),
        });
    }
    if let Some(&bad) = index.iter().find(|&&i| i >= buffer.len()) {
        return Err(SpatialError::IndexOutOfBounds {
            index: bad,
            len: buffer.len(),
        });
    }

    for (&slot, &value) in index.iter().zip(values) {
        buffer[slot] += value;
    }
    Ok(())
}
