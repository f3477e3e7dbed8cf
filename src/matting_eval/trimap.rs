use std::ops::RangeInclusive;

use image::Luma;
use imageproc::distance_transform::Norm;
use imageproc::map::{map_colors, map_colors2};
use imageproc::morphology::{dilate, erode};
use rand::Rng;

use crate::error::TrimapError;
use crate::utils::validate_non_empty_image;
use crate::{AlphaMatte, Image};

/// Range the morphology kernel radius is drawn from, fresh per generated
/// trimap.
///
/// Varying the radius varies the width of the unknown band, so an evaluation
/// run never settles on a single boundary width.
pub const KERNEL_RADIUS_RANGE: RangeInclusive<u8> = 1..=20;

/// The three canonical trimap labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimapLabel {
    /// Definitely background (stored as 0)
    Background,
    /// Boundary region where matting difficulty concentrates (stored as 128)
    Unknown,
    /// Definitely foreground (stored as 255)
    Foreground,
}

impl TrimapLabel {
    /// Returns the stored pixel value for this label.
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Background => Trimap::BACKGROUND,
            Self::Unknown => Trimap::UNKNOWN,
            Self::Foreground => Trimap::FOREGROUND,
        }
    }

    /// Parses a stored pixel value, rejecting anything outside the label set.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            Trimap::BACKGROUND => Some(Self::Background),
            Trimap::UNKNOWN => Some(Self::Unknown),
            Trimap::FOREGROUND => Some(Self::Foreground),
            _ => None,
        }
    }
}

/// Three-way segmentation of an alpha matte.
///
/// Every pixel is one of [`Trimap::BACKGROUND`], [`Trimap::UNKNOWN`] or
/// [`Trimap::FOREGROUND`]; the constructors enforce this, so holders of a
/// `Trimap` can rely on the label set without re-scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trimap(Image<Luma<u8>>);

impl Trimap {
    /// Stored value of the background label.
    pub const BACKGROUND: u8 = 0;
    /// Stored value of the unknown label.
    pub const UNKNOWN: u8 = 128;
    /// Stored value of the foreground label.
    pub const FOREGROUND: u8 = 255;

    /// Wraps a raw image, validating the label-closure invariant.
    ///
    /// # Errors
    ///
    /// * `TrimapError::EmptyMatte` - When a dimension is zero
    /// * `TrimapError::IllegalLabel` - When any pixel is not 0, 128 or 255
    pub fn from_image(image: Image<Luma<u8>>) -> Result<Self, TrimapError> {
        let (width, height) = image.dimensions();
        validate_non_empty_image(width, height, "Trimap")
            .map_err(|_| TrimapError::EmptyMatte { width, height })?;

        for (x, y, pixel) in image.enumerate_pixels() {
            if TrimapLabel::from_u8(pixel[0]).is_none() {
                return Err(TrimapError::IllegalLabel {
                    value: pixel[0],
                    x,
                    y,
                });
            }
        }

        Ok(Self(image))
    }

    /// Wraps an image already known to satisfy the invariant.
    ///
    /// Callers must only pass images whose pixels are all canonical labels,
    /// e.g. outputs of label-preserving transforms.
    pub(crate) fn from_image_unchecked(image: Image<Luma<u8>>) -> Self {
        Self(image)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Returns the label at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the trimap bounds.
    pub fn label(&self, x: u32, y: u32) -> TrimapLabel {
        match self.0.get_pixel(x, y)[0] {
            Self::BACKGROUND => TrimapLabel::Background,
            Self::UNKNOWN => TrimapLabel::Unknown,
            _ => TrimapLabel::Foreground,
        }
    }

    /// Iterates over the coordinates of all unknown pixels.
    pub fn unknown_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0
            .enumerate_pixels()
            .filter(|(_, _, pixel)| pixel[0] == Self::UNKNOWN)
            .map(|(x, y, _)| (x, y))
    }

    /// Number of unknown pixels.
    pub fn count_unknown(&self) -> usize {
        self.unknown_pixels().count()
    }

    pub fn as_image(&self) -> &Image<Luma<u8>> {
        &self.0
    }

    pub fn into_image(self) -> Image<Luma<u8>> {
        self.0
    }
}

/// Trait deriving a trimap from an alpha matte
///
/// The fully opaque region is eroded and the nonzero-coverage region dilated
/// with a square structuring element, so the band of unknown pixels straddles
/// the true matte boundary with a width set by the kernel radius.
pub trait GenerateTrimap {
    /// Generates a trimap with a kernel radius drawn from
    /// [`KERNEL_RADIUS_RANGE`].
    ///
    /// # Arguments
    ///
    /// * `rng` - Random stream the radius is drawn from; fixing its seed
    ///   fixes the output
    ///
    /// # Errors
    ///
    /// * `TrimapError::EmptyMatte` - When the matte has a zero dimension
    fn generate_trimap<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Trimap, TrimapError>;

    /// Generates a trimap with a fixed kernel radius.
    ///
    /// Pixels that stay fully opaque under erosion by `radius` become
    /// foreground; pixels untouched by dilating the nonzero region by
    /// `radius` become background; everything else is unknown.
    ///
    /// # Errors
    ///
    /// * `TrimapError::EmptyMatte` - When the matte has a zero dimension
    /// * `TrimapError::ZeroKernelRadius` - When `radius` is 0
    fn generate_trimap_with_radius(&self, radius: u8) -> Result<Trimap, TrimapError>;
}

impl GenerateTrimap for AlphaMatte {
    fn generate_trimap<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Trimap, TrimapError> {
        let radius = rng.gen_range(KERNEL_RADIUS_RANGE);
        self.generate_trimap_with_radius(radius)
    }

    fn generate_trimap_with_radius(&self, radius: u8) -> Result<Trimap, TrimapError> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height, "GenerateTrimap")
            .map_err(|_| TrimapError::EmptyMatte { width, height })?;
        if radius == 0 {
            return Err(TrimapError::ZeroKernelRadius);
        }

        let opaque = map_colors(self, |Luma([alpha])| {
            Luma([if alpha == u8::MAX { u8::MAX } else { 0 }])
        });
        let coverage = map_colors(self, |Luma([alpha])| {
            Luma([if alpha > 0 { u8::MAX } else { 0 }])
        });

        // LInf ball of the given radius == square structuring element.
        let foreground = erode(&opaque, Norm::LInf, radius);
        let covered = dilate(&coverage, Norm::LInf, radius);

        let trimap = map_colors2(&foreground, &covered, |Luma([fg]), Luma([cov])| {
            if fg == u8::MAX {
                Luma([Trimap::FOREGROUND])
            } else if cov == 0 {
                Luma([Trimap::BACKGROUND])
            } else {
                Luma([Trimap::UNKNOWN])
            }
        });

        Ok(Trimap::from_image_unchecked(trimap))
    }
}
