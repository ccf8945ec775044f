use imgcurate::normalize::{
    crop_split, pad_split, prepare_image, resize_canvas, to_grayscale, Subarea, MIN_CANVAS_SIDE,
};
use ndarray::s;
use proptest::prelude::*;

mod proptest_helpers;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn splits_cover_the_difference(current in 0usize..500, target in 0usize..500) {
        let (lead, trail) = pad_split(current, target);
        prop_assert_eq!(lead + trail, target.saturating_sub(current));
        prop_assert!(trail >= lead && trail - lead <= 1);

        let (lead, trail) = crop_split(current, target);
        prop_assert_eq!(lead + trail, current.saturating_sub(target));
        prop_assert!(lead >= trail && lead - trail <= 1);
    }

    #[test]
    fn resize_yields_target_shape(
        canvas in proptest_helpers::arb_canvas(80),
        width in MIN_CANVAS_SIDE..96,
        height in MIN_CANVAS_SIDE..96,
    ) {
        let out = resize_canvas(canvas.view().into_dyn(), width, height).expect("resize");
        prop_assert_eq!(out.dim(), (1, height, width));
    }

    #[test]
    fn padding_keeps_source_at_offset(canvas in proptest_helpers::arb_canvas(40)) {
        let (_, h, w) = canvas.dim();
        let target = 48;
        let out = resize_canvas(canvas.view().into_dyn(), target, target).expect("resize");

        let top = pad_split(h, target).0;
        let left = pad_split(w, target).0;
        prop_assert_eq!(out.slice(s![.., top..top + h, left..left + w]), canvas.view());

        // Padding replicates the nearest edge pixel.
        prop_assert_eq!(out[[0, 0, 0]], canvas[[0, 0, 0]]);
        prop_assert_eq!(out[[0, target - 1, target - 1]], canvas[[0, h - 1, w - 1]]);
    }

    #[test]
    fn cropping_keeps_the_center(
        canvas in proptest_helpers::arb_canvas_between(MIN_CANVAS_SIDE, 80)
    ) {
        let (_, h, w) = canvas.dim();

        let out = resize_canvas(canvas.view().into_dyn(), MIN_CANVAS_SIDE, MIN_CANVAS_SIDE)
            .expect("resize");
        let top = crop_split(h, MIN_CANVAS_SIDE).0;
        let left = crop_split(w, MIN_CANVAS_SIDE).0;
        prop_assert_eq!(
            out.view(),
            canvas.slice(s![.., top..top + MIN_CANVAS_SIDE, left..left + MIN_CANVAS_SIDE])
        );
    }

    #[test]
    fn even_pad_then_crop_restores(
        canvas in proptest_helpers::arb_canvas_between(MIN_CANVAS_SIDE, 40),
        extra in 0usize..8,
    ) {
        let (_, h, w) = canvas.dim();

        // An even amount of padding is split evenly, so cropping undoes it.
        let grown = resize_canvas(canvas.view().into_dyn(), w + 2 * extra, h + 2 * extra)
            .expect("pad");
        let back = resize_canvas(grown.view().into_dyn(), w, h).expect("crop");
        prop_assert_eq!(back, canvas);
    }

    #[test]
    fn grayscale_stays_in_unit_range(image in proptest_helpers::arb_rgb(12)) {
        let gray = to_grayscale(image.view().into_dyn()).expect("grayscale");
        let (h, w, _) = image.dim();
        prop_assert_eq!(gray.dim(), (1, h, w));
        for value in gray.iter() {
            prop_assert!((-1e-9..=1.0 + 1e-9).contains(value), "out of range: {}", value);
        }
    }

    #[test]
    fn subarea_matches_canvas_window(
        canvas in proptest_helpers::arb_canvas(60),
        x in 0usize..40,
        y in 0usize..40,
    ) {
        let width = 72;
        let height = 64;
        prop_assume!(x + MIN_CANVAS_SIDE <= width && y + MIN_CANVAS_SIDE <= height);

        let (resized, window) = prepare_image(
            canvas.view().into_dyn(),
            width,
            height,
            Subarea::new(x, y, MIN_CANVAS_SIDE),
        )
        .expect("prepare");
        prop_assert_eq!(
            window.view(),
            resized.slice(s![.., y..y + MIN_CANVAS_SIDE, x..x + MIN_CANVAS_SIDE])
        );
    }
}
