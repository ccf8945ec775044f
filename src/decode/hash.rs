//! Exact-content fingerprints for duplicate detection.

use std::fmt;

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use super::DecodedImage;

/// SHA-256 over a decoded image's color mode and row-major pixel bytes.
///
/// Dimensions are not part of the digest: two images are
/// duplicates when their mode and flat pixel sequence match.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Computes the fingerprint of `image`.
    pub fn of(image: &DecodedImage) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(image.mode.as_str().as_bytes());
        hasher.update([0u8]);

        match image.pixels.as_slice() {
            Some(bytes) => hasher.update(bytes),
            None => {
                for value in image.pixels.iter() {
                    hasher.update([*value]);
                }
            }
        }

        Self(hasher.finalize().into())
    }

    /// Returns the raw digest bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ColorMode;

    fn image(mode: ColorMode, w: usize, h: usize, c: usize, raw: Vec<u8>) -> DecodedImage {
        DecodedImage::from_raw(mode, w, h, c, raw).expect("build image")
    }

    #[test]
    fn test_identical_pixels_hash_equal() {
        let a = image(ColorMode::Rgb, 2, 1, 3, vec![1, 2, 3, 4, 5, 6]);
        let b = image(ColorMode::Rgb, 2, 1, 3, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_single_pixel_difference_changes_hash() {
        let a = image(ColorMode::Rgb, 2, 1, 3, vec![1, 2, 3, 4, 5, 6]);
        let b = image(ColorMode::Rgb, 2, 1, 3, vec![1, 2, 3, 4, 5, 7]);
        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_mode_is_part_of_hash() {
        let gray = image(ColorMode::Luma, 3, 1, 1, vec![5, 5, 5]);
        let rgb = image(ColorMode::Rgb, 1, 1, 3, vec![5, 5, 5]);
        assert_ne!(gray.content_hash(), rgb.content_hash());
    }

    #[test]
    fn test_display_is_lowercase_hex() {
        let hash = image(ColorMode::Luma, 1, 1, 1, vec![0]).content_hash();
        let text = hash.to_string();
        assert_eq!(text.len(), 64);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
