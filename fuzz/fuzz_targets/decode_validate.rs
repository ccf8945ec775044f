//! Fuzz target for image decoding and the post-decode rules.
//!
//! Arbitrary bytes are decoded; whatever decodes is run through the shape
//! and variance rules and hashed, checking for panics or hangs.
//!
//! Run with:
//!   cargo +nightly fuzz run decode_validate

#![no_main]

use imgcurate::decode::decode_bytes;
use imgcurate::gate::{check_shape, check_variance, GateOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Matches the default file size cap; larger files never reach the decoder.
    if data.len() > 250_000 {
        return;
    }

    let Ok(image) = decode_bytes(data) else {
        return;
    };

    let options = GateOptions {
        min_dimension: 1,
        ..Default::default()
    };
    let _ = check_shape(&image, &options);
    let _ = check_variance(&image);
    let _ = image.content_hash();
});
