//! Symmetric pad/crop to a fixed canvas size.
//!
//! Each axis is handled independently. Growing an axis replicates the edge
//! pixel outward, with the odd pixel going to the trailing side. Shrinking
//! an axis keeps the center, with the odd pixel removed from the leading
//! side.

use ndarray::{Array3, ArrayViewD, Ix3};

use crate::error::CurateError;

/// Smallest width or height a canvas may have.
pub const MIN_CANVAS_SIDE: usize = 32;

/// Splits `target - current` pixels of padding into `(leading, trailing)`.
#[inline]
pub fn pad_split(current: usize, target: usize) -> (usize, usize) {
    let delta = target.saturating_sub(current);
    (delta / 2, delta - delta / 2)
}

/// Splits `current - target` pixels of removal into `(leading, trailing)`.
#[inline]
pub fn crop_split(current: usize, target: usize) -> (usize, usize) {
    let delta = current.saturating_sub(target);
    (delta - delta / 2, delta / 2)
}

/// Maps an output coordinate on one axis to its source coordinate.
#[derive(Clone, Copy, Debug)]
struct AxisMap {
    /// Signed shift from output to source index.
    shift: isize,
    /// Last valid source index.
    last: usize,
}

impl AxisMap {
    fn new(current: usize, target: usize) -> Self {
        let shift = if target > current {
            -(pad_split(current, target).0 as isize)
        } else {
            crop_split(current, target).0 as isize
        };

        Self {
            shift,
            last: current.saturating_sub(1),
        }
    }

    #[inline]
    fn source(self, index: usize) -> usize {
        (index as isize + self.shift).clamp(0, self.last as isize) as usize
    }
}

/// Pads and/or crops a `(1, H, W)` canvas to `(1, height, width)`.
///
/// The output is a fresh array of the same element type.
///
/// # Errors
/// - [`CurateError::Shape`] if the input is not rank 3 with a single
///   channel, or is empty along an axis that has to be padded.
/// - [`CurateError::InvalidValue`] if `width` or `height` is below
///   [`MIN_CANVAS_SIDE`].
pub fn resize_canvas<T: Clone>(
    canvas: ArrayViewD<'_, T>,
    width: usize,
    height: usize,
) -> Result<Array3<T>, CurateError> {
    let canvas = require_single_channel(canvas)?;

    if width < MIN_CANVAS_SIDE || height < MIN_CANVAS_SIDE {
        return Err(CurateError::invalid_value(format!(
            "width and height must be >= {}, got {}x{}",
            MIN_CANVAS_SIDE, width, height
        )));
    }

    resize_checked(canvas, width, height)
}

/// Validates the `(1, H, W)` layout shared by the canvas operations.
pub(crate) fn require_single_channel<T>(
    canvas: ArrayViewD<'_, T>,
) -> Result<ndarray::ArrayView3<'_, T>, CurateError> {
    if canvas.ndim() != 3 {
        return Err(CurateError::shape(format!(
            "canvas must have shape (1, H, W), got rank {}",
            canvas.ndim()
        )));
    }
    if canvas.shape()[0] != 1 {
        return Err(CurateError::shape(format!(
            "canvas must have exactly 1 channel, got {}",
            canvas.shape()[0]
        )));
    }

    canvas
        .into_dimensionality::<Ix3>()
        .map_err(|e| CurateError::shape(e.to_string()))
}

/// Resize without re-checking the target size.
pub(crate) fn resize_checked<T: Clone>(
    canvas: ndarray::ArrayView3<'_, T>,
    width: usize,
    height: usize,
) -> Result<Array3<T>, CurateError> {
    let (_, current_height, current_width) = canvas.dim();

    if (current_height == 0 && height > 0) || (current_width == 0 && width > 0) {
        return Err(CurateError::shape(format!(
            "cannot edge-pad an empty canvas of {}x{}",
            current_width, current_height
        )));
    }

    let rows = AxisMap::new(current_height, height);
    let cols = AxisMap::new(current_width, width);

    Ok(Array3::from_shape_fn((1, height, width), |(_, y, x)| {
        canvas[[0, rows.source(y), cols.source(x)]].clone()
    }))
}
