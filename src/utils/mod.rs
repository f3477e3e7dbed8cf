//! Internal utility functions for matting-eval.
//!
//! This module contains the scale conversions and dimension checks shared by
//! the evaluation operations.

use image::{Luma, Primitive};
use imageproc::definitions::Clamp;
use imageproc::map::map_colors;

use crate::{AlphaMatte, UnitAlphaMatte};

/// Clamps a floating-point value to the range of a primitive type.
///
/// # Arguments
///
/// * `value` - The floating-point value to clamp
///
/// # Returns
///
/// The clamped value as the target primitive type
#[inline]
pub fn clamp_f32_to_primitive<T: Primitive + Clamp<f32>>(value: f32) -> T {
    T::clamp(value)
}

/// Converts a stored `[0, 255]` alpha matte to the unit `[0, 1]` domain.
///
/// Metrics and compositing consume unit-domain mattes; ground truth and
/// predictor trimap inputs live in the byte domain. Conversions happen only
/// at those boundaries, never inside an operation.
///
/// # Arguments
///
/// * `matte` - The stored alpha matte
///
/// # Returns
///
/// The same matte with every sample divided by 255
pub fn normalize_matte(matte: &AlphaMatte) -> UnitAlphaMatte {
    let max_value = f32::from(u8::MAX);
    map_colors(matte, |Luma([alpha])| Luma([f32::from(alpha) / max_value]))
}

/// Converts a unit `[0, 1]` alpha matte back to the stored `[0, 255]` domain.
///
/// Out-of-range samples are clamped, so predictions that overshoot the unit
/// interval still produce a valid byte matte.
///
/// # Arguments
///
/// * `matte` - The unit-domain alpha matte
///
/// # Returns
///
/// The matte scaled by 255 and clamped to `u8`
pub fn denormalize_matte(matte: &UnitAlphaMatte) -> AlphaMatte {
    let max_value = f32::from(u8::MAX);
    map_colors(matte, |Luma([alpha])| {
        Luma([clamp_f32_to_primitive::<u8>(alpha * max_value)])
    })
}

/// Validates that an image has non-zero dimensions.
///
/// # Arguments
///
/// * `width` - The width of the image
/// * `height` - The height of the image
/// * `context` - A description of the context for error messages
///
/// # Returns
///
/// `Ok(())` if the dimensions are valid, otherwise an error
pub fn validate_non_empty_image(width: u32, height: u32, context: &str) -> Result<(), String> {
    if width == 0 || height == 0 {
        Err(format!("{}: Image dimensions must be non-zero", context))
    } else {
        Ok(())
    }
}

/// Validates that two images have matching dimensions.
///
/// # Arguments
///
/// * `width1` - The width of the first image
/// * `height1` - The height of the first image
/// * `width2` - The width of the second image
/// * `height2` - The height of the second image
/// * `context` - A description of the context for error messages
///
/// # Returns
///
/// `Ok(())` if the dimensions match, otherwise an error
pub fn validate_matching_dimensions(
    width1: u32,
    height1: u32,
    width2: u32,
    height2: u32,
    context: &str,
) -> Result<(), String> {
    if width1 != width2 || height1 != height2 {
        Err(format!(
            "{}: Image dimensions must match. Got {}x{} and {}x{}",
            context, width1, height1, width2, height2
        ))
    } else {
        Ok(())
    }
}
