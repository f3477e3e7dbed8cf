//! Comprehensive edge case and error condition tests
//!
//! This test suite focuses on boundary values, error conditions, and edge
//! cases: degenerate dimensions, zero sizes, windows that overhang or miss
//! the source entirely, and minimal 1x1 inputs.

use image::{Luma, Rgb};
use matting_eval::{
    composite_over_background, compute_mse, compute_sad, fit_background, AlphaMatte,
    CompositeError, CropError, CropWindow, GenerateTrimap, Image, MetricsError, SafeCropper,
    SampleCropOrigin, Trimap, TrimapError, TrimapLabel, UnitAlphaMatte,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Helper to create a 1x1 alpha matte with the given value
fn minimal_matte(value: u8) -> AlphaMatte {
    AlphaMatte::from_pixel(1, 1, Luma([value]))
}

/// Helper to create a solid RGB image
fn solid_image(width: u32, height: u32, color: [u8; 3]) -> Image<Rgb<u8>> {
    Image::from_pixel(width, height, Rgb(color))
}

#[test]
fn trimap_generation_rejects_degenerate_dimensions() {
    for (width, height) in [(0, 0), (0, 5), (5, 0)] {
        let matte = AlphaMatte::new(width, height);
        assert_eq!(
            matte.generate_trimap_with_radius(3),
            Err(TrimapError::EmptyMatte { width, height })
        );
    }
}

#[test]
fn trimap_generation_handles_minimal_matte() {
    // 1x1 opaque: survives erosion trivially (no background neighbor exists).
    let trimap = minimal_matte(255).generate_trimap_with_radius(1).unwrap();
    assert_eq!(trimap.label(0, 0), TrimapLabel::Foreground);

    // 1x1 transparent: nothing to dilate from.
    let trimap = minimal_matte(0).generate_trimap_with_radius(1).unwrap();
    assert_eq!(trimap.label(0, 0), TrimapLabel::Background);

    // 1x1 half-covered: unknown from the start, and stays unknown.
    let trimap = minimal_matte(128).generate_trimap_with_radius(1).unwrap();
    assert_eq!(trimap.label(0, 0), TrimapLabel::Unknown);
}

#[test]
fn trimap_from_image_rejects_non_canonical_values() {
    let image: Image<Luma<u8>> = Image::from_pixel(2, 2, Luma([64]));
    assert!(matches!(
        Trimap::from_image(image),
        Err(TrimapError::IllegalLabel { value: 64, .. })
    ));
}

#[test]
fn all_unknown_matte_produces_all_unknown_trimap() {
    // No pixel is exactly 0 or 255, so everything starts and stays unknown.
    let matte = AlphaMatte::from_pixel(6, 6, Luma([127]));
    let trimap = matte.generate_trimap_with_radius(20).unwrap();
    assert_eq!(trimap.count_unknown(), 36);
}

#[test]
fn crop_window_rejects_zero_size() {
    assert_eq!(CropWindow::new(5, 5, 0), Err(CropError::ZeroCropSize));
}

#[test]
fn safe_cropper_rejects_zero_target() {
    assert!(matches!(SafeCropper::new(0), Err(CropError::ZeroTargetSize)));
}

#[test]
fn safe_crop_of_minimal_image_pads_to_target() {
    let image = solid_image(1, 1, [10, 20, 30]);
    let cropper = SafeCropper::new(4).unwrap();
    let window = CropWindow::new(0, 0, 4).unwrap();

    let cropped = cropper.crop_image(&image, window);
    assert_eq!(cropped.dimensions(), (4, 4));
    assert_eq!(cropped.get_pixel(0, 0), &Rgb([10, 20, 30]));
    assert_eq!(cropped.get_pixel(3, 3), &Rgb([0, 0, 0]));
}

#[test]
fn safe_crop_window_past_both_edges_is_fully_padded() {
    let matte = AlphaMatte::from_pixel(3, 3, Luma([255]));
    let cropper = SafeCropper::new(2).unwrap();
    let window = CropWindow::new(100, 100, 2).unwrap();

    let cropped = cropper.crop_matte(&matte, window);
    assert!(cropped.pixels().all(|pixel| pixel[0] == 0));
}

#[test]
fn crop_origin_on_single_pixel_trimap_is_zero() {
    let trimap = Trimap::from_image(Image::from_pixel(1, 1, Luma([Trimap::UNKNOWN]))).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(trimap.sample_crop_origin((1, 1), &mut rng), (0, 0));
    assert_eq!(trimap.sample_crop_origin((64, 64), &mut rng), (0, 0));
}

#[test]
fn composite_rejects_zero_target() {
    let foreground = solid_image(1, 1, [0, 0, 0]);
    let background = solid_image(1, 1, [0, 0, 0]);
    let alpha = UnitAlphaMatte::new(1, 1);
    let mut rng = StdRng::seed_from_u64(0);

    assert!(matches!(
        composite_over_background(&foreground, &background, &alpha, 0, 1, &mut rng),
        Err(CompositeError::EmptyTarget { .. })
    ));
}

#[test]
fn composite_rejects_mismatched_alpha() {
    let foreground = solid_image(4, 4, [50, 50, 50]);
    let background = solid_image(4, 4, [0, 0, 0]);
    let alpha = UnitAlphaMatte::new(2, 2);
    let mut rng = StdRng::seed_from_u64(0);

    assert_eq!(
        composite_over_background(&foreground, &background, &alpha, 4, 4, &mut rng),
        Err(CompositeError::AlphaDimensionMismatch {
            expected: (4, 4),
            actual: (2, 2),
        })
    );
}

#[test]
fn composite_rounds_half_blend_consistently() {
    let foreground = solid_image(1, 1, [255, 255, 255]);
    let background = solid_image(1, 1, [0, 0, 0]);
    let alpha = UnitAlphaMatte::from_pixel(1, 1, Luma([0.5]));
    let mut rng = StdRng::seed_from_u64(0);

    let result =
        composite_over_background(&foreground, &background, &alpha, 1, 1, &mut rng).unwrap();
    // 0.5 * 255 = 127.5 truncates to 127.
    assert_eq!(result.composite.get_pixel(0, 0), &Rgb([127, 127, 127]));
}

#[test]
fn composite_clamps_out_of_range_alpha() {
    let foreground = solid_image(1, 1, [200, 200, 200]);
    let background = solid_image(1, 1, [20, 20, 20]);
    let mut rng = StdRng::seed_from_u64(0);

    let over = UnitAlphaMatte::from_pixel(1, 1, Luma([1.5]));
    let result =
        composite_over_background(&foreground, &background, &over, 1, 1, &mut rng).unwrap();
    assert_eq!(result.composite.get_pixel(0, 0), &Rgb([200, 200, 200]));

    let under = UnitAlphaMatte::from_pixel(1, 1, Luma([-0.5]));
    let result =
        composite_over_background(&foreground, &background, &under, 1, 1, &mut rng).unwrap();
    assert_eq!(result.composite.get_pixel(0, 0), &Rgb([20, 20, 20]));
}

#[test]
fn fit_background_rejects_empty_background() {
    let background: Image<Rgb<u8>> = Image::new(0, 3);
    assert!(matches!(
        fit_background(&background, 8, 8),
        Err(CompositeError::EmptyTarget { .. })
    ));
}

#[test]
fn fit_background_upscales_both_axes_to_cover() {
    let background = solid_image(3, 12, [1, 2, 3]);
    let fitted = fit_background(&background, 9, 9).unwrap();
    let (width, height) = fitted.dimensions();
    assert!(width >= 9);
    assert!(height >= 9);
}

#[test]
fn metrics_reject_mismatched_dimensions() {
    let a = UnitAlphaMatte::new(3, 3);
    let b = UnitAlphaMatte::new(3, 4);
    assert!(matches!(
        compute_sad(&a, &b),
        Err(MetricsError::DimensionMismatch { .. })
    ));

    let trimap = Trimap::from_image(Image::from_pixel(2, 2, Luma([Trimap::UNKNOWN]))).unwrap();
    assert!(matches!(
        compute_mse(&a, &a, &trimap),
        Err(MetricsError::TrimapDimensionMismatch { .. })
    ));
}

#[test]
fn mse_on_minimal_unknown_pixel_measures_it() {
    let prediction = UnitAlphaMatte::from_pixel(1, 1, Luma([0.25]));
    let truth = UnitAlphaMatte::from_pixel(1, 1, Luma([0.75]));
    let trimap = Trimap::from_image(Image::from_pixel(1, 1, Luma([Trimap::UNKNOWN]))).unwrap();

    let mse = compute_mse(&prediction, &truth, &trimap).unwrap();
    assert!((mse - 0.25).abs() < 1e-9);
}
