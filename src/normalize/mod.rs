//! Per-sample normalization chain.
//!
//! ```text
//! (H, W) | (H, W, 3) --to_grayscale--> (1, H, W)
//!                    --resize_canvas--> (1, height, width)
//!                    --extract_subarea--> (1, size, size)
//! ```
//!
//! Every step returns a freshly allocated array of the input element type
//! and fails with [`CurateError::Shape`](crate::CurateError::Shape) or
//! [`CurateError::InvalidValue`](crate::CurateError::InvalidValue) instead of
//! producing a partial result.
//!
//! # Example
//!
//! ```
//! use ndarray::Array3;
//! use imgcurate::normalize::{prepare_image, to_grayscale, Subarea};
//!
//! let rgb = Array3::<f64>::from_shape_fn((40, 50, 3), |(y, x, c)| (x + y + c) as f64);
//! let gray = to_grayscale(rgb.view().into_dyn())?;
//! let (canvas, window) = prepare_image(gray.view().into_dyn(), 64, 48, Subarea::new(0, 0, 32))?;
//! assert_eq!(canvas.dim(), (1, 48, 64));
//! assert_eq!(window.dim(), (1, 32, 32));
//! # Ok::<(), imgcurate::CurateError>(())
//! ```

mod canvas;
mod grayscale;
mod pixel;
mod subarea;

pub use canvas::{crop_split, pad_split, resize_canvas, MIN_CANVAS_SIDE};
pub use grayscale::to_grayscale;
pub use pixel::{LinearLight, Pixel};
pub use subarea::{extract_subarea, prepare_image, Subarea};
