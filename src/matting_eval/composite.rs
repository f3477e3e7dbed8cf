use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, Rgb};
use rand::Rng;

use crate::error::CompositeError;
use crate::utils::{clamp_f32_to_primitive, validate_non_empty_image};
use crate::{Image, UnitAlphaMatte};

/// Output of a compositing pass.
///
/// Carries the exact background crop next to the blend so a run can be
/// inspected and reproduced from its artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeResult {
    /// The blended image at the requested dimensions.
    pub composite: Image<Rgb<u8>>,
    /// The background crop the blend used, same dimensions.
    pub background: Image<Rgb<u8>>,
}

/// Blends a foreground over a randomly placed crop of a background.
///
/// The foreground and alpha must already be sized to `(width, height)`. When
/// the background is strictly larger along an axis, the crop offset on that
/// axis is drawn uniformly from `0..bg - target`; otherwise it is 0 and the
/// full background extent is used. Each output sample is
/// `alpha * fg + (1 - alpha) * bg` computed in `f32` and clamped to `u8`,
/// with the alpha broadcast across all three channels.
///
/// # Arguments
///
/// * `foreground` - Foreground image, exactly `(width, height)`
/// * `background` - Background image, at least `(width, height)`
/// * `alpha` - Unit-domain matte, exactly `(width, height)`
/// * `width`, `height` - Output dimensions
/// * `rng` - Random stream for the offset draw; the only randomness here
///
/// # Errors
///
/// * `CompositeError::EmptyTarget` - When a requested dimension is 0
/// * `CompositeError::ForegroundDimensionMismatch` - When the foreground is
///   not `(width, height)`
/// * `CompositeError::AlphaDimensionMismatch` - When the alpha is not
///   `(width, height)`
/// * `CompositeError::BackgroundTooSmall` - When the background cannot cover
///   the output; resize it first with [`fit_background`]
pub fn composite_over_background<R: Rng + ?Sized>(
    foreground: &Image<Rgb<u8>>,
    background: &Image<Rgb<u8>>,
    alpha: &UnitAlphaMatte,
    width: u32,
    height: u32,
    rng: &mut R,
) -> Result<CompositeResult, CompositeError> {
    if width == 0 || height == 0 {
        return Err(CompositeError::EmptyTarget { width, height });
    }
    if foreground.dimensions() != (width, height) {
        return Err(CompositeError::ForegroundDimensionMismatch {
            expected: (width, height),
            actual: foreground.dimensions(),
        });
    }
    if alpha.dimensions() != (width, height) {
        return Err(CompositeError::AlphaDimensionMismatch {
            expected: (width, height),
            actual: alpha.dimensions(),
        });
    }
    let (bg_width, bg_height) = background.dimensions();
    if bg_width < width || bg_height < height {
        return Err(CompositeError::BackgroundTooSmall {
            requested: (width, height),
            actual: (bg_width, bg_height),
        });
    }

    let x = if bg_width > width {
        rng.gen_range(0..bg_width - width)
    } else {
        0
    };
    let y = if bg_height > height {
        rng.gen_range(0..bg_height - height)
    } else {
        0
    };
    let crop = imageops::crop_imm(background, x, y, width, height).to_image();

    let composite = ImageBuffer::from_fn(width, height, |px, py| {
        let Rgb([fg_r, fg_g, fg_b]) = *foreground.get_pixel(px, py);
        let Rgb([bg_r, bg_g, bg_b]) = *crop.get_pixel(px, py);
        let Luma([a]) = *alpha.get_pixel(px, py);
        let a = a.clamp(0.0, 1.0);
        Rgb([
            blend_channel(fg_r, bg_r, a),
            blend_channel(fg_g, bg_g, a),
            blend_channel(fg_b, bg_b, a),
        ])
    });

    Ok(CompositeResult {
        composite,
        background: crop,
    })
}

#[inline]
fn blend_channel(foreground: u8, background: u8, alpha: f32) -> u8 {
    clamp_f32_to_primitive(alpha * f32::from(foreground) + (1.0 - alpha) * f32::from(background))
}

/// Upscales a background so a `(width, height)` crop fits inside it.
///
/// The scale is the larger of the two covering ratios; dimensions are rounded
/// up so the scaled image never falls short by a fractional pixel. A
/// background that already covers the target is returned unchanged.
///
/// # Errors
///
/// * `CompositeError::EmptyTarget` - When a requested dimension is 0 or the
///   background itself has a zero dimension
pub fn fit_background(
    background: &Image<Rgb<u8>>,
    width: u32,
    height: u32,
) -> Result<Image<Rgb<u8>>, CompositeError> {
    if width == 0 || height == 0 {
        return Err(CompositeError::EmptyTarget { width, height });
    }
    let (bg_width, bg_height) = background.dimensions();
    validate_non_empty_image(bg_width, bg_height, "fit_background").map_err(|_| {
        CompositeError::EmptyTarget {
            width: bg_width,
            height: bg_height,
        }
    })?;

    let width_ratio = f64::from(width) / f64::from(bg_width);
    let height_ratio = f64::from(height) / f64::from(bg_height);
    let ratio = width_ratio.max(height_ratio);
    if ratio <= 1.0 {
        return Ok(background.clone());
    }

    let scaled_width = (f64::from(bg_width) * ratio).ceil() as u32;
    let scaled_height = (f64::from(bg_height) * ratio).ceil() as u32;
    Ok(imageops::resize(
        background,
        scaled_width,
        scaled_height,
        FilterType::CatmullRom,
    ))
}
