//! Element types the normalization chain can operate on.
//!
//! Integer elements are converted to `f64` for the colorimetric math and
//! rounded half-to-even on the way back. Float elements keep their own
//! precision throughout, so an `f32` image is processed in `f32`.

/// Floating-point type used for the sRGB transfer functions.
pub trait LinearLight: Copy {
    fn from_f64(value: f64) -> Self;

    /// Inverse sRGB companding of a value in [0, 1].
    fn srgb_to_linear(self) -> Self;

    /// Forward sRGB companding of a linear value in [0, 1].
    fn linear_to_srgb(self) -> Self;

    /// Rec. 709 relative luminance of linear R, G, B.
    fn luminance(r: Self, g: Self, b: Self) -> Self;
}

macro_rules! impl_linear_light {
    ($t:ty) => {
        impl LinearLight for $t {
            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $t
            }

            #[inline]
            fn srgb_to_linear(self) -> Self {
                if self <= <$t>::from_f64(0.04045) {
                    self / <$t>::from_f64(12.92)
                } else {
                    ((self + <$t>::from_f64(0.055)) / <$t>::from_f64(1.055))
                        .powf(<$t>::from_f64(2.4))
                }
            }

            #[inline]
            fn linear_to_srgb(self) -> Self {
                if self <= <$t>::from_f64(0.0031308) {
                    <$t>::from_f64(12.92) * self
                } else {
                    <$t>::from_f64(1.055) * self.powf(<$t>::from_f64(1.0 / 2.4))
                        - <$t>::from_f64(0.055)
                }
            }

            #[inline]
            fn luminance(r: Self, g: Self, b: Self) -> Self {
                <$t>::from_f64(0.2126) * r + <$t>::from_f64(0.7152) * g + <$t>::from_f64(0.0722) * b
            }
        }
    };
}

impl_linear_light!(f32);
impl_linear_light!(f64);

/// A pixel element type: 8/16-bit unsigned integers or floats.
pub trait Pixel: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// Precision the colorimetric math runs in.
    type Work: LinearLight;

    /// True for integer element types.
    const IS_INTEGER: bool;

    /// Divides by 255 in working precision.
    fn to_unit(self) -> Self::Work;

    /// Casts back to the element type, rounding integers half-to-even.
    fn from_work(value: Self::Work) -> Self;

    /// Lossless widening from a decoded byte.
    fn from_u8(value: u8) -> Self;

    /// Value as `f64`, for reporting and previews.
    fn to_f64(self) -> f64;
}

macro_rules! impl_integer_pixel {
    ($t:ty) => {
        impl Pixel for $t {
            type Work = f64;
            const IS_INTEGER: bool = true;

            #[inline]
            fn to_unit(self) -> f64 {
                self as f64 / 255.0
            }

            #[inline]
            fn from_work(value: f64) -> Self {
                value.round_ties_even() as $t
            }

            #[inline]
            fn from_u8(value: u8) -> Self {
                value as $t
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

macro_rules! impl_float_pixel {
    ($t:ty) => {
        impl Pixel for $t {
            type Work = $t;
            const IS_INTEGER: bool = false;

            #[inline]
            fn to_unit(self) -> $t {
                self / 255.0
            }

            #[inline]
            fn from_work(value: $t) -> Self {
                value
            }

            #[inline]
            fn from_u8(value: u8) -> Self {
                value as $t
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_integer_pixel!(u8);
impl_integer_pixel!(u16);
impl_float_pixel!(f32);
impl_float_pixel!(f64);
