//! Test utilities for matting-eval
//!
//! This module provides common fixture builders for testing the evaluation
//! operations. It is only compiled when running tests.

use image::{Luma, Rgb};

use crate::matting_eval::trimap::Trimap;
use crate::{AlphaMatte, Image, UnitAlphaMatte};

/// Creates a binary alpha matte with a fully opaque block on a transparent
/// field.
///
/// The block starts at `(block_x, block_y)` and spans
/// `block_width x block_height`; everything else is 0.
///
/// # Returns
/// An alpha matte whose pixels are exactly 0 or 255
pub fn create_block_matte(
    width: u32,
    height: u32,
    block_x: u32,
    block_y: u32,
    block_width: u32,
    block_height: u32,
) -> AlphaMatte {
    AlphaMatte::from_fn(width, height, |x, y| {
        let inside = x >= block_x
            && x < block_x + block_width
            && y >= block_y
            && y < block_y + block_height;
        Luma([if inside { 255 } else { 0 }])
    })
}

/// Creates a trimap where every pixel carries the same label.
///
/// # Panics
/// Panics if `label` is not one of the three canonical label values.
pub fn create_uniform_trimap(width: u32, height: u32, label: u8) -> Trimap {
    Trimap::from_image(Image::from_pixel(width, height, Luma([label])))
        .expect("uniform label must be canonical")
}

/// Creates a unit-domain alpha matte filled with a single value.
pub fn create_uniform_matte_f32(width: u32, height: u32, value: f32) -> UnitAlphaMatte {
    UnitAlphaMatte::from_pixel(width, height, Luma([value]))
}

/// Creates an RGB image with a per-pixel gradient so crops are
/// distinguishable.
pub fn create_gradient_image(width: u32, height: u32) -> Image<Rgb<u8>> {
    Image::from_fn(width, height, |x, y| {
        Rgb([
            (x * 7 % 256) as u8,
            (y * 11 % 256) as u8,
            ((x + y) * 13 % 256) as u8,
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_block_matte_with_interior_block_is_binary() {
        let matte = create_block_matte(6, 6, 2, 2, 2, 2);
        assert_eq!(matte.get_pixel(2, 2)[0], 255);
        assert_eq!(matte.get_pixel(3, 3)[0], 255);
        assert_eq!(matte.get_pixel(0, 0)[0], 0);
        assert_eq!(matte.get_pixel(4, 4)[0], 0);
    }

    #[test]
    fn create_uniform_trimap_with_unknown_label_counts_all_pixels() {
        let trimap = create_uniform_trimap(3, 3, Trimap::UNKNOWN);
        assert_eq!(trimap.count_unknown(), 9);
    }

    #[test]
    fn create_gradient_image_varies_by_position() {
        let image = create_gradient_image(10, 10);
        assert_ne!(image.get_pixel(0, 0), image.get_pixel(5, 5));
    }
}
