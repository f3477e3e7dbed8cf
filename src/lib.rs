mod error;
mod matting_eval;
#[cfg(test)]
mod test_utils;
mod utils;

use image::{ImageBuffer, Luma, Pixel};

pub use error::{CompositeError, CropError, EvalError, MetricsError, TrimapError};
pub use matting_eval::composite::{composite_over_background, fit_background, CompositeResult};
pub use matting_eval::evaluate::{
    evaluate_batch, evaluate_sample, EvalConfig, EvalSample, MattingPredictor, SampleEvaluation,
};
pub use matting_eval::metrics::{compute_mse, compute_sad, constrain_to_trimap, score, ScorePair};
pub use matting_eval::random_crop::SampleCropOrigin;
pub use matting_eval::safe_crop::{CropWindow, SafeCropper};
pub use matting_eval::trimap::{GenerateTrimap, Trimap, TrimapLabel, KERNEL_RADIUS_RANGE};
pub use utils::{denormalize_matte, normalize_matte};

pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;

/// Alpha matte as stored and loaded from ground truth: `u8` samples in `[0, 255]`.
pub type AlphaMatte = Image<Luma<u8>>;

/// Alpha matte as consumed by metrics and compositing: `f32` samples in `[0, 1]`.
///
/// The subpixel type is the domain tag. Convert between the two scales with
/// [`normalize_matte`] and [`denormalize_matte`] rather than ad hoc arithmetic.
pub type UnitAlphaMatte = Image<Luma<f32>>;
