#![allow(dead_code)]

use ndarray::Array3;
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// A `(1, H, W)` canvas with arbitrary 16-bit content.
pub fn arb_canvas(max_side: usize) -> BoxedStrategy<Array3<u16>> {
    arb_canvas_between(1, max_side)
}

/// Like [`arb_canvas`], with both sides in `min_side..=max_side`.
pub fn arb_canvas_between(min_side: usize, max_side: usize) -> BoxedStrategy<Array3<u16>> {
    (min_side..=max_side, min_side..=max_side)
        .prop_flat_map(|(height, width)| {
            prop::collection::vec(any::<u16>(), height * width).prop_map(move |values| {
                Array3::from_shape_vec((1, height, width), values).expect("shape matches length")
            })
        })
        .boxed()
}

/// An RGB image as `(H, W, 3)` floats on the 0..=255 scale.
pub fn arb_rgb(max_side: usize) -> BoxedStrategy<Array3<f64>> {
    (1..=max_side, 1..=max_side)
        .prop_flat_map(|(height, width)| {
            prop::collection::vec(0.0f64..=255.0, height * width * 3).prop_map(move |values| {
                Array3::from_shape_vec((height, width, 3), values).expect("shape matches length")
            })
        })
        .boxed()
}
