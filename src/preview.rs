//! PNG previews of normalized arrays.

use std::path::Path;

use image::GrayImage;
use ndarray::Array3;

use crate::error::CurateError;

/// Writes a `(1, H, W)` array with values in [0, 1] as an 8-bit PNG.
///
/// Values are scaled by 255, rounded and clamped.
pub fn save_unit_gray_png(array: &Array3<f64>, path: &Path) -> Result<(), CurateError> {
    let (channels, height, width) = array.dim();
    if channels != 1 {
        return Err(CurateError::shape(format!(
            "preview needs a single channel, got {}",
            channels
        )));
    }

    let raw: Vec<u8> = array
        .iter()
        .map(|v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect();
    let buffer = GrayImage::from_raw(width as u32, height as u32, raw).ok_or_else(|| {
        CurateError::shape(format!("buffer does not match {}x{}", width, height))
    })?;

    buffer.save(path).map_err(|source| CurateError::ImageWrite {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{ColorMode, ImageCrateDecoder, ImageDecoder};

    #[test]
    fn test_preview_roundtrips_through_decoder() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("canvas.png");
        let array = Array3::from_shape_fn((1, 3, 4), |(_, y, x)| (x + y) as f64 / 10.0);

        save_unit_gray_png(&array, &path).expect("save");
        let decoded = ImageCrateDecoder.decode(&path).expect("decode");

        assert_eq!(decoded.mode, ColorMode::Luma);
        assert_eq!(decoded.pixels.shape(), &[3, 4]);
        assert_eq!(decoded.pixels[[2, 3]], 128);
    }

    #[test]
    fn test_preview_rejects_multichannel() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let array = Array3::<f64>::zeros((2, 3, 3));
        assert!(save_unit_gray_png(&array, &temp.path().join("x.png")).is_err());
    }
}
