use image::imageops::{self, FilterType};
use image::{Pixel, Rgb};

use crate::error::CropError;
use crate::matting_eval::trimap::Trimap;
use crate::{AlphaMatte, Image};

/// Square crop window into a source buffer.
///
/// The window may overhang the source on the right/bottom; the cropper pads
/// the missing area instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl CropWindow {
    /// Creates a window at `(x, y)` with the given edge length.
    ///
    /// # Errors
    ///
    /// * `CropError::ZeroCropSize` - When `size` is 0
    pub const fn new(x: u32, y: u32, size: u32) -> Result<Self, CropError> {
        if size == 0 {
            return Err(CropError::ZeroCropSize);
        }
        Ok(Self { x, y, size })
    }
}

/// Boundary-safe cropper producing fixed-size network inputs.
///
/// Extracts a [`CropWindow`] from a source buffer, padding any part of the
/// window that falls outside the source with zero samples (background, for
/// trimaps), then resizes the result to the configured target dimension.
/// Output dimensions are always exactly `target_size x target_size`.
pub struct SafeCropper {
    target_size: u32,
}

impl SafeCropper {
    /// Creates a cropper for the given network input dimension.
    ///
    /// # Errors
    ///
    /// * `CropError::ZeroTargetSize` - When `target_size` is 0
    pub const fn new(target_size: u32) -> Result<Self, CropError> {
        if target_size == 0 {
            return Err(CropError::ZeroTargetSize);
        }
        Ok(Self { target_size })
    }

    pub const fn target_size(&self) -> u32 {
        self.target_size
    }

    /// Crops a color image, resizing with Catmull-Rom (cubic) interpolation.
    pub fn crop_image(&self, image: &Image<Rgb<u8>>, window: CropWindow) -> Image<Rgb<u8>> {
        self.finish(extract_padded(image, window), window, FilterType::CatmullRom)
    }

    /// Crops an alpha matte, resizing with Triangle (linear) interpolation.
    pub fn crop_matte(&self, matte: &AlphaMatte, window: CropWindow) -> AlphaMatte {
        self.finish(extract_padded(matte, window), window, FilterType::Triangle)
    }

    /// Crops a trimap, resizing with nearest-neighbor interpolation only.
    ///
    /// Nearest resampling selects existing samples, so the output stays
    /// inside the three-label set; any smoother filter would fabricate
    /// values between the labels.
    pub fn crop_trimap(&self, trimap: &Trimap, window: CropWindow) -> Trimap {
        let cropped = self.finish(
            extract_padded(trimap.as_image(), window),
            window,
            FilterType::Nearest,
        );
        Trimap::from_image_unchecked(cropped)
    }

    fn finish<P>(&self, padded: Image<P>, window: CropWindow, filter: FilterType) -> Image<P>
    where
        P: Pixel + 'static,
        P::Subpixel: 'static,
    {
        if window.size == self.target_size {
            padded
        } else {
            imageops::resize(&padded, self.target_size, self.target_size, filter)
        }
    }
}

/// Extracts `window` from `source` onto a zeroed canvas.
///
/// Rows and columns of the window beyond the source bounds keep the canvas
/// zero value.
fn extract_padded<P>(source: &Image<P>, window: CropWindow) -> Image<P>
where
    P: Pixel + 'static,
{
    let mut canvas: Image<P> = Image::new(window.size, window.size);
    let (source_width, source_height) = source.dimensions();

    if window.x < source_width && window.y < source_height {
        let available_width = (source_width - window.x).min(window.size);
        let available_height = (source_height - window.y).min(window.size);
        let view = imageops::crop_imm(source, window.x, window.y, available_width, available_height);
        imageops::overlay(&mut canvas, &*view, 0, 0);
    }

    canvas
}
