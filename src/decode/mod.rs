//! Decoding candidate files into pixel arrays.
//!
//! The rest of the crate only sees [`DecodedImage`]: a row-major `u8` array
//! shaped `(H, W)` for grayscale or `(H, W, 3)` for RGB, tagged with the
//! color mode the file declared. The [`ImageDecoder`] trait is the seam
//! where a different backend can be plugged in; [`ImageCrateDecoder`] is the
//! default and is backed by the `image` crate.

mod hash;

pub use hash::ContentHash;

use std::fmt;
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

use image::{
    DynamicImage, ExtendedColorType, ImageDecoder as _, ImageError, ImageFormat, ImageReader,
};
use ndarray::{ArrayD, IxDyn};
use png::BitDepth;
use zune_core::bytestream::ZCursor;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;

use crate::error::{CurateError, DecodeFailure};

/// Color mode declared by a decoded file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColorMode {
    /// Three channels in R, G, B order.
    Rgb,
    /// A single luminance channel.
    Luma,
    /// Anything else (alpha, 16-bit, float, ...). Carries the backend's name.
    Other(String),
}

impl ColorMode {
    /// Short tag used in reports and mixed into the content hash.
    pub fn as_str(&self) -> &str {
        match self {
            ColorMode::Rgb => "RGB",
            ColorMode::Luma => "L",
            ColorMode::Other(name) => name,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded image owned by whoever is currently processing it.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    /// Declared color mode.
    pub mode: ColorMode,
    /// Pixel data, `(H, W)` or `(H, W, C)`.
    ///
    /// For [`ColorMode::Other`] the data is the backend's RGBA expansion and
    /// is only informational; such images never pass validation.
    pub pixels: ArrayD<u8>,
}

impl DecodedImage {
    /// Builds an image from raw row-major bytes.
    pub fn from_raw(
        mode: ColorMode,
        width: usize,
        height: usize,
        channels: usize,
        raw: Vec<u8>,
    ) -> Result<Self, CurateError> {
        let shape = if channels == 1 {
            IxDyn(&[height, width])
        } else {
            IxDyn(&[height, width, channels])
        };
        let pixels = ArrayD::from_shape_vec(shape, raw).map_err(|e| {
            CurateError::shape(format!(
                "pixel buffer does not match {}x{}x{}: {}",
                width, height, channels, e
            ))
        })?;
        Ok(Self { mode, pixels })
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.pixels.shape()[0]
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.pixels.shape().get(1).copied().unwrap_or(0)
    }

    /// Number of channels (1 for a 2-D array).
    pub fn channel_count(&self) -> usize {
        match self.pixels.ndim() {
            3 => self.pixels.shape()[2],
            _ => 1,
        }
    }

    /// Exact-equality fingerprint over the mode and full pixel sequence.
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of(self)
    }
}

/// Something that can turn a file into pixels.
pub trait ImageDecoder {
    /// Decodes the file at `path`.
    ///
    /// Undecodable content must be reported as [`CurateError::Decode`].
    /// Any other error is treated by callers as fatal for the whole run.
    fn decode(&self, path: &Path) -> Result<DecodedImage, CurateError>;
}

/// Default decoder backed by the `image` crate.
///
/// The format is sniffed from the file content, not the file name, so a PNG
/// stored under a `.jpg` name decodes as PNG. The color mode is the one the
/// file declares: a CMYK JPEG or a palette PNG is reported as
/// [`ColorMode::Other`] even though the backend expands it to RGB.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, CurateError> {
        let bytes = fs::read(path)?;
        decode_slice(&bytes, path)
    }
}

/// Decodes an in-memory buffer with the default backend.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, CurateError> {
    decode_slice(bytes, Path::new("<bytes>"))
}

fn decode_slice(bytes: &[u8], path: &Path) -> Result<DecodedImage, CurateError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format();
    let decoder = reader.into_decoder().map_err(|err| classify(err, path))?;
    let fallback = decoder.original_color_type();
    let image = DynamicImage::from_decoder(decoder).map_err(|err| classify(err, path))?;

    let mode = match format {
        Some(ImageFormat::Jpeg) => jpeg_mode(bytes, path)?,
        Some(ImageFormat::Png) => png_mode(bytes, path)?,
        _ => mode_of(fallback),
    };
    from_dynamic(image, mode)
}

fn mode_of(color: ExtendedColorType) -> ColorMode {
    match color {
        ExtendedColorType::L8 => ColorMode::Luma,
        ExtendedColorType::Rgb8 => ColorMode::Rgb,
        other => ColorMode::Other(format!("{:?}", other)),
    }
}

/// JPEG color space from the frame header; the backend converts CMYK to RGB.
fn jpeg_mode(bytes: &[u8], path: &Path) -> Result<ColorMode, CurateError> {
    let options = DecoderOptions::default()
        .set_strict_mode(false)
        .set_max_width(usize::MAX)
        .set_max_height(usize::MAX);
    let mut header = zune_jpeg::JpegDecoder::new_with_options(ZCursor::new(bytes), options);
    header.decode_headers().map_err(|e| CurateError::Decode {
        path: path.to_path_buf(),
        source: DecodeFailure::Corrupt(e.to_string()),
    })?;

    Ok(match header.input_colorspace() {
        Some(ColorSpace::Luma) => ColorMode::Luma,
        Some(ColorSpace::YCbCr | ColorSpace::RGB) => ColorMode::Rgb,
        Some(other) => ColorMode::Other(format!("{:?}", other)),
        None => ColorMode::Other("unknown".to_string()),
    })
}

/// PNG color type and bit depth; the backend expands palettes and low depths.
fn png_mode(bytes: &[u8], path: &Path) -> Result<ColorMode, CurateError> {
    let reader = png::Decoder::new(Cursor::new(bytes))
        .read_info()
        .map_err(|e| CurateError::Decode {
            path: path.to_path_buf(),
            source: DecodeFailure::Corrupt(e.to_string()),
        })?;
    let info = reader.info();

    Ok(match (info.color_type, info.bit_depth) {
        (png::ColorType::Grayscale, BitDepth::Two | BitDepth::Four | BitDepth::Eight) => {
            ColorMode::Luma
        }
        (png::ColorType::Rgb, BitDepth::Eight) => ColorMode::Rgb,
        (color, depth) => ColorMode::Other(format!("{:?}/{}", color, depth as u8)),
    })
}

/// Splits backend errors into per-file decode failures and fatal faults.
fn classify(err: ImageError, path: &Path) -> CurateError {
    let failure = match err {
        ImageError::Decoding(e) => DecodeFailure::Corrupt(e.to_string()),
        ImageError::Unsupported(e) => match e.kind() {
            image::error::UnsupportedErrorKind::Format(image::error::ImageFormatHint::Unknown) => {
                DecodeFailure::UnknownFormat
            }
            _ => DecodeFailure::Unsupported(e.to_string()),
        },
        ImageError::Limits(e) => DecodeFailure::Limits(e.to_string()),
        ImageError::Parameter(e) => DecodeFailure::Corrupt(e.to_string()),
        ImageError::IoError(e)
            if matches!(
                e.kind(),
                io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData
            ) =>
        {
            DecodeFailure::Corrupt(e.to_string())
        }
        ImageError::IoError(e) => return CurateError::Io(e),
        ImageError::Encoding(e) => return CurateError::Io(io::Error::other(e.to_string())),
    };

    CurateError::Decode {
        path: path.to_path_buf(),
        source: failure,
    }
}

fn from_dynamic(image: DynamicImage, mode: ColorMode) -> Result<DecodedImage, CurateError> {
    let (width, height) = (image.width() as usize, image.height() as usize);

    match (mode, image) {
        (ColorMode::Luma, DynamicImage::ImageLuma8(buf)) => {
            DecodedImage::from_raw(ColorMode::Luma, width, height, 1, buf.into_raw())
        }
        (ColorMode::Rgb, DynamicImage::ImageRgb8(buf)) => {
            DecodedImage::from_raw(ColorMode::Rgb, width, height, 3, buf.into_raw())
        }
        (mode, other) => {
            let mode = match mode {
                ColorMode::Other(name) => ColorMode::Other(name),
                _ => ColorMode::Other(format!("{:?}", other.color())),
            };
            DecodedImage::from_raw(mode, width, height, 4, other.to_rgba8().into_raw())
        }
    }
}
