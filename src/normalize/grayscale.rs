//! Colorimetric RGB to grayscale conversion.

use ndarray::{Array3, ArrayViewD, Axis, Ix2, Ix3};

use super::pixel::{LinearLight, Pixel};
use crate::error::CurateError;

/// Converts an `(H, W)` or `(H, W, 3)` image to a `(1, H, W)` luminance array.
///
/// Grayscale input is only reshaped. RGB input is scaled to [0, 1],
/// linearized with the inverse sRGB curve, reduced to Rec. 709 luminance and
/// re-companded with the forward sRGB curve. The result stays in [0, 1] and
/// keeps the input element type; integer outputs are rounded half-to-even,
/// which leaves them at 0 or 1.
///
/// # Errors
/// [`CurateError::Shape`] for any other rank, or a rank-3 input whose last
/// axis is not 3.
pub fn to_grayscale<T: Pixel>(image: ArrayViewD<'_, T>) -> Result<Array3<T>, CurateError> {
    match image.ndim() {
        2 => {
            let plane = image
                .into_dimensionality::<Ix2>()
                .map_err(|e| CurateError::shape(e.to_string()))?;
            Ok(plane.insert_axis(Axis(0)).to_owned())
        }
        3 => {
            let rgb = image
                .into_dimensionality::<Ix3>()
                .map_err(|e| CurateError::shape(e.to_string()))?;
            let (height, width, channels) = rgb.dim();
            if channels != 3 {
                return Err(CurateError::shape(format!(
                    "expected 3 color channels, got {}",
                    channels
                )));
            }

            Ok(Array3::from_shape_fn((1, height, width), |(_, y, x)| {
                let r = rgb[[y, x, 0]].to_unit().srgb_to_linear();
                let g = rgb[[y, x, 1]].to_unit().srgb_to_linear();
                let b = rgb[[y, x, 2]].to_unit().srgb_to_linear();
                T::from_work(<T::Work as LinearLight>::luminance(r, g, b).linear_to_srgb())
            }))
        }
        rank => Err(CurateError::shape(format!(
            "image must have shape (H, W) or (H, W, 3), got rank {}",
            rank
        ))),
    }
}
