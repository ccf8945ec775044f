//! Fixed-offset square window extraction.

use ndarray::{s, Array3, ArrayViewD};

use super::canvas::{require_single_channel, resize_checked, MIN_CANVAS_SIDE};
use crate::error::CurateError;

/// Where to cut the square window out of the resized canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subarea {
    /// Left edge, in canvas pixels.
    pub x: usize,
    /// Top edge, in canvas pixels.
    pub y: usize,
    /// Side length.
    pub size: usize,
}

impl Subarea {
    pub fn new(x: usize, y: usize, size: usize) -> Self {
        Self { x, y, size }
    }

    /// Checks the window against a `width` x `height` canvas.
    pub fn check_fits(&self, width: usize, height: usize) -> Result<(), CurateError> {
        if self.size < MIN_CANVAS_SIDE {
            return Err(CurateError::invalid_value(format!(
                "subarea size must be >= {}, got {}",
                MIN_CANVAS_SIDE, self.size
            )));
        }
        if exceeds(self.x, self.size, width) {
            return Err(CurateError::invalid_value(format!(
                "x={} and size={} do not fit into width={}",
                self.x, self.size, width
            )));
        }
        if exceeds(self.y, self.size, height) {
            return Err(CurateError::invalid_value(format!(
                "y={} and size={} do not fit into height={}",
                self.y, self.size, height
            )));
        }
        Ok(())
    }
}

fn exceeds(offset: usize, size: usize, limit: usize) -> bool {
    offset.checked_add(size).map_or(true, |end| end > limit)
}

/// Copies `canvas[:, y..y+size, x..x+size]` into a new `(1, size, size)` array.
///
/// # Errors
/// [`CurateError::Shape`] for a non-`(1, H, W)` canvas and
/// [`CurateError::InvalidValue`] if the window does not fit.
pub fn extract_subarea<T: Clone>(
    canvas: ArrayViewD<'_, T>,
    area: Subarea,
) -> Result<Array3<T>, CurateError> {
    let canvas = require_single_channel(canvas)?;
    let (_, height, width) = canvas.dim();
    area.check_fits(width, height)?;

    Ok(canvas
        .slice(s![.., area.y..area.y + area.size, area.x..area.x + area.size])
        .to_owned())
}

/// Resizes a `(1, H, W)` image to `(1, height, width)` and cuts out `area`.
///
/// Every argument is validated before any pixel is touched, and the window
/// is checked against the target size rather than the input size.
///
/// # Errors
/// - [`CurateError::Shape`] if `image` is not rank 3 with one channel.
/// - [`CurateError::InvalidValue`] if `width`, `height` or `area.size` is
///   below 32, or the window exceeds the target canvas.
pub fn prepare_image<T: Clone>(
    image: ArrayViewD<'_, T>,
    width: usize,
    height: usize,
    area: Subarea,
) -> Result<(Array3<T>, Array3<T>), CurateError> {
    let image = require_single_channel(image)?;

    if width < MIN_CANVAS_SIDE || height < MIN_CANVAS_SIDE {
        return Err(CurateError::invalid_value(format!(
            "width and height must be >= {}, got {}x{}",
            MIN_CANVAS_SIDE, width, height
        )));
    }
    area.check_fits(width, height)?;

    let canvas = resize_checked(image, width, height)?;
    let window = canvas
        .slice(s![.., area.y..area.y + area.size, area.x..area.x + area.size])
        .to_owned();

    Ok((canvas, window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn ramp(height: usize, width: usize) -> Array3<i32> {
        Array3::from_shape_fn((1, height, width), |(_, y, x)| (y * 1000 + x) as i32)
    }

    #[test]
    fn test_window_exceeding_width_fails() {
        let image = ramp(100, 100);
        let err = prepare_image(image.view().into_dyn(), 100, 100, Subarea::new(70, 0, 31))
            .unwrap_err();
        assert!(matches!(err, CurateError::InvalidValue { .. }));
    }

    #[test]
    fn test_window_checked_against_target_not_input() {
        let image = ramp(40, 40);
        let (canvas, window) =
            prepare_image(image.view().into_dyn(), 100, 90, Subarea::new(60, 50, 40))
                .expect("fits the target canvas");

        assert_eq!(canvas.dim(), (1, 90, 100));
        assert_eq!(window.dim(), (1, 40, 40));

        let err = prepare_image(image.view().into_dyn(), 100, 90, Subarea::new(0, 51, 40))
            .unwrap_err();
        assert!(matches!(err, CurateError::InvalidValue { .. }));
    }

    #[test]
    fn test_shape_checked_before_values() {
        let plane = Array2::<i32>::zeros((10, 10));
        let err = prepare_image(plane.view().into_dyn(), 10, 10, Subarea::new(0, 0, 1))
            .unwrap_err();
        assert!(matches!(err, CurateError::Shape { .. }));
    }

    #[test]
    fn test_small_size_fails() {
        let image = ramp(64, 64);
        let err = prepare_image(image.view().into_dyn(), 64, 64, Subarea::new(0, 0, 31))
            .unwrap_err();
        assert!(matches!(err, CurateError::InvalidValue { .. }));
    }

    #[test]
    fn test_window_contents() {
        let image = ramp(64, 64);
        let (canvas, window) =
            prepare_image(image.view().into_dyn(), 64, 64, Subarea::new(3, 5, 32))
                .expect("prepare");

        assert_eq!(canvas, image);
        assert_eq!(window[[0, 0, 0]], 5 * 1000 + 3);
        assert_eq!(window[[0, 31, 31]], 36 * 1000 + 34);
    }

    #[test]
    fn test_window_at_far_corner() {
        let image = ramp(48, 40);
        let window =
            extract_subarea(image.view().into_dyn(), Subarea::new(8, 16, 32)).expect("extract");
        assert_eq!(window[[0, 31, 31]], image[[0, 47, 39]]);
    }

    #[test]
    fn test_extract_rejects_overflow() {
        let image = ramp(48, 40);
        assert!(extract_subarea(image.view().into_dyn(), Subarea::new(9, 0, 32)).is_err());
    }
}
