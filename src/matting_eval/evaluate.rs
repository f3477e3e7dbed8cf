use std::error::Error;

use image::imageops;
use image::Rgb;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::EvalError;
use crate::matting_eval::composite::{composite_over_background, fit_background, CompositeResult};
use crate::matting_eval::metrics::{constrain_to_trimap, score, ScorePair};
use crate::matting_eval::random_crop::SampleCropOrigin;
use crate::matting_eval::safe_crop::{CropWindow, SafeCropper};
use crate::matting_eval::trimap::{GenerateTrimap, Trimap};
use crate::utils::normalize_matte;
use crate::{AlphaMatte, Image, UnitAlphaMatte};

/// The external matting model.
///
/// The crate treats the model as an opaque function from a cropped image and
/// its trimap to a unit-domain alpha map at the same dimensions. Tensor
/// construction, batching and checkpoint handling all live behind this trait.
pub trait MattingPredictor {
    /// Predicts an alpha map for `image` guided by `trimap`.
    ///
    /// Both inputs are at the configured network input size; the returned
    /// map must match their dimensions.
    fn predict(
        &self,
        image: &Image<Rgb<u8>>,
        trimap: &Trimap,
    ) -> Result<UnitAlphaMatte, Box<dyn Error + Send + Sync>>;
}

/// Evaluation parameters.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Fixed network input dimension; every cropped triple is resized to
    /// this square size.
    pub network_input_size: u32,
    /// Crop sizes drawn uniformly per sample. Repetition is the weighting:
    /// listing a size three times makes it three times as likely.
    pub crop_size_candidates: Vec<u32>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            network_input_size: 320,
            crop_size_candidates: vec![320, 320, 320, 480, 640],
        }
    }
}

/// One evaluation input: a merged foreground image, its ground-truth alpha
/// and a background to re-composite onto.
///
/// The alpha may be smaller than the image; it is padded with transparent
/// pixels to the image dimensions before the trimap is derived.
#[derive(Debug, Clone)]
pub struct EvalSample {
    pub image: Image<Rgb<u8>>,
    pub alpha: AlphaMatte,
    pub background: Image<Rgb<u8>>,
}

/// Everything produced while evaluating one sample.
///
/// The buffers are the artifacts a driver persists for inspection: the
/// cropped triple fed to the model, the constrained prediction, and the
/// re-composite over the fitted background.
#[derive(Debug, Clone)]
pub struct SampleEvaluation {
    pub scores: ScorePair,
    pub crop_size: u32,
    pub window: CropWindow,
    pub image: Image<Rgb<u8>>,
    pub alpha: AlphaMatte,
    pub trimap: Trimap,
    pub prediction: UnitAlphaMatte,
    pub composite: CompositeResult,
}

/// Runs the full evaluation pipeline for one sample.
///
/// Pads the alpha to the image dimensions, derives a trimap, draws a crop
/// size and an unknown-biased window, safe-crops the image/alpha/trimap
/// triple, invokes the predictor, constrains the prediction to the trimap,
/// scores it against the cropped ground truth, and composites the cropped
/// image over the fitted background using the prediction as the matte.
///
/// All randomness (kernel radius, crop size, crop center, background offset)
/// comes from `rng`, so a fixed seed reproduces the evaluation exactly.
///
/// # Errors
///
/// Propagates the per-stage invalid-input errors, wraps predictor failures
/// in `EvalError::Predictor`, and rejects predictions of the wrong shape
/// with `EvalError::PredictionShape`.
pub fn evaluate_sample<P, R>(
    predictor: &P,
    sample: &EvalSample,
    config: &EvalConfig,
    rng: &mut R,
) -> Result<SampleEvaluation, EvalError>
where
    P: MattingPredictor + ?Sized,
    R: Rng + ?Sized,
{
    let (width, height) = sample.image.dimensions();
    let alpha = pad_alpha_to(&sample.alpha, width, height);
    let trimap = alpha.generate_trimap(rng)?;
    debug!(width, height, unknown = trimap.count_unknown(), "generated trimap");

    let crop_size = choose_crop_size(config, rng);
    let (x, y) = trimap.sample_crop_origin((crop_size, crop_size), rng);
    let window = CropWindow::new(x, y, crop_size)?;
    debug!(x, y, size = crop_size, "chose crop window");

    let cropper = SafeCropper::new(config.network_input_size)?;
    let image = cropper.crop_image(&sample.image, window);
    let alpha = cropper.crop_matte(&alpha, window);
    let trimap = cropper.crop_trimap(&trimap, window);

    let mut prediction = predictor
        .predict(&image, &trimap)
        .map_err(EvalError::Predictor)?;
    let expected = (config.network_input_size, config.network_input_size);
    if prediction.dimensions() != expected {
        return Err(EvalError::PredictionShape {
            expected,
            actual: prediction.dimensions(),
        });
    }
    constrain_to_trimap(&mut prediction, &trimap)?;

    let ground_truth = normalize_matte(&alpha);
    let scores = score(&prediction, &ground_truth, &trimap)?;
    debug!(sad = scores.sad, mse = scores.mse, "scored prediction");

    let background = fit_background(
        &sample.background,
        config.network_input_size,
        config.network_input_size,
    )?;
    let composite = composite_over_background(
        &image,
        &background,
        &prediction,
        config.network_input_size,
        config.network_input_size,
        rng,
    )?;

    Ok(SampleEvaluation {
        scores,
        crop_size,
        window,
        image,
        alpha,
        trimap,
        prediction,
        composite,
    })
}

/// Evaluates a batch of samples with one random stream per sample.
///
/// Sample `i` uses `StdRng` seeded with `seed + i`, so results are
/// reproducible and independent of evaluation order. With the `rayon`
/// feature enabled samples run in parallel; the scores are identical either
/// way.
#[cfg(feature = "rayon")]
pub fn evaluate_batch<P>(
    predictor: &P,
    samples: &[EvalSample],
    config: &EvalConfig,
    seed: u64,
) -> Result<Vec<SampleEvaluation>, EvalError>
where
    P: MattingPredictor + Sync + ?Sized,
{
    use rayon::prelude::*;

    samples
        .par_iter()
        .enumerate()
        .map(|(index, sample)| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
            evaluate_sample(predictor, sample, config, &mut rng)
        })
        .collect()
}

/// Evaluates a batch of samples with one random stream per sample.
///
/// Sample `i` uses `StdRng` seeded with `seed + i`, so results are
/// reproducible and independent of evaluation order. With the `rayon`
/// feature enabled samples run in parallel; the scores are identical either
/// way.
#[cfg(not(feature = "rayon"))]
pub fn evaluate_batch<P>(
    predictor: &P,
    samples: &[EvalSample],
    config: &EvalConfig,
    seed: u64,
) -> Result<Vec<SampleEvaluation>, EvalError>
where
    P: MattingPredictor + ?Sized,
{
    samples
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
            evaluate_sample(predictor, sample, config, &mut rng)
        })
        .collect()
}

/// Draws a crop size from the weighted candidate list.
///
/// An empty list falls back to the network input size, which makes the crop
/// a no-op resize.
fn choose_crop_size<R: Rng + ?Sized>(config: &EvalConfig, rng: &mut R) -> u32 {
    config
        .crop_size_candidates
        .choose(rng)
        .copied()
        .unwrap_or(config.network_input_size)
}

/// Pads a ground-truth alpha with transparent pixels up to `(width, height)`.
///
/// Ground-truth mattes are stored at the foreground's own dimensions, which
/// can be smaller than the merged image they were composited into.
fn pad_alpha_to(alpha: &AlphaMatte, width: u32, height: u32) -> AlphaMatte {
    if alpha.dimensions() == (width, height) {
        return alpha.clone();
    }
    let mut canvas = AlphaMatte::new(width, height);
    imageops::overlay(&mut canvas, alpha, 0, 0);
    canvas
}
