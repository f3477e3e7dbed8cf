use itertools::izip;

use crate::error::MetricsError;
use crate::matting_eval::trimap::Trimap;
use crate::utils::validate_matching_dimensions;
use crate::UnitAlphaMatte;

/// SAD is reported over the 8-bit alpha range, in thousands, following the
/// Deep Image Matting benchmark convention. Both constants are part of the
/// reported numbers' meaning; changing either breaks comparability with
/// published baselines.
const SAD_ALPHA_SCALE: f64 = 255.0;
const SAD_REPORT_DIVISOR: f64 = 1000.0;

/// Scores for one evaluated sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorePair {
    /// Sum of absolute differences, 8-bit alpha range, in thousands.
    pub sad: f64,
    /// Mean squared error over the unknown region, unit alpha range.
    pub mse: f64,
}

/// Computes the sum of absolute differences between two unit-domain mattes.
///
/// The unit-range sum is scaled by 255 and divided by 1000, so a reported
/// value of 1.0 corresponds to 1000 alpha levels of accumulated error.
///
/// # Errors
///
/// * `MetricsError::DimensionMismatch` - When the mattes differ in size
pub fn compute_sad(
    prediction: &UnitAlphaMatte,
    ground_truth: &UnitAlphaMatte,
) -> Result<f64, MetricsError> {
    validate_pair(prediction, ground_truth)?;

    let sum: f64 = prediction
        .iter()
        .zip(ground_truth.iter())
        .map(|(&predicted, &truth)| f64::from((predicted - truth).abs()))
        .sum();

    Ok(sum * SAD_ALPHA_SCALE / SAD_REPORT_DIVISOR)
}

/// Computes the mean squared error restricted to the unknown region.
///
/// Pixels labeled background or foreground do not contribute. A trimap with
/// no unknown pixels yields 0.0 by definition rather than dividing by zero.
///
/// # Errors
///
/// * `MetricsError::DimensionMismatch` - When the mattes differ in size
/// * `MetricsError::TrimapDimensionMismatch` - When the trimap differs from
///   the prediction in size
pub fn compute_mse(
    prediction: &UnitAlphaMatte,
    ground_truth: &UnitAlphaMatte,
    trimap: &Trimap,
) -> Result<f64, MetricsError> {
    validate_pair(prediction, ground_truth)?;
    validate_trimap(prediction, trimap)?;

    let mut sum = 0.0_f64;
    let mut unknown_count = 0_u64;
    for (&predicted, &truth, &label) in izip!(
        prediction.iter(),
        ground_truth.iter(),
        trimap.as_image().iter()
    ) {
        if label == Trimap::UNKNOWN {
            let diff = f64::from(predicted - truth);
            sum += diff * diff;
            unknown_count += 1;
        }
    }

    if unknown_count == 0 {
        Ok(0.0)
    } else {
        Ok(sum / unknown_count as f64)
    }
}

/// Computes both matting metrics for one sample.
///
/// The caller is expected to have already constrained the prediction with
/// [`constrain_to_trimap`], so known regions carry no error by construction
/// and the scores measure the genuinely ambiguous pixels plus overall
/// fidelity. This is not re-validated here.
///
/// # Errors
///
/// Same conditions as [`compute_sad`] and [`compute_mse`].
pub fn score(
    prediction: &UnitAlphaMatte,
    ground_truth: &UnitAlphaMatte,
    trimap: &Trimap,
) -> Result<ScorePair, MetricsError> {
    Ok(ScorePair {
        sad: compute_sad(prediction, ground_truth)?,
        mse: compute_mse(prediction, ground_truth, trimap)?,
    })
}

/// Forces a prediction to agree with the trimap's known regions.
///
/// Background pixels become 0.0 and foreground pixels 1.0; unknown pixels
/// are left untouched. Run this before [`score`].
///
/// # Errors
///
/// * `MetricsError::TrimapDimensionMismatch` - When the trimap differs from
///   the prediction in size
pub fn constrain_to_trimap(
    prediction: &mut UnitAlphaMatte,
    trimap: &Trimap,
) -> Result<(), MetricsError> {
    validate_trimap(prediction, trimap)?;

    for (pixel, label) in prediction.pixels_mut().zip(trimap.as_image().pixels()) {
        match label[0] {
            Trimap::BACKGROUND => pixel[0] = 0.0,
            Trimap::FOREGROUND => pixel[0] = 1.0,
            _ => {}
        }
    }

    Ok(())
}

fn validate_pair(
    prediction: &UnitAlphaMatte,
    ground_truth: &UnitAlphaMatte,
) -> Result<(), MetricsError> {
    let (pred_w, pred_h) = prediction.dimensions();
    let (truth_w, truth_h) = ground_truth.dimensions();

    validate_matching_dimensions(pred_w, pred_h, truth_w, truth_h, "Metrics").map_err(|_| {
        MetricsError::DimensionMismatch {
            prediction: (pred_w, pred_h),
            ground_truth: (truth_w, truth_h),
        }
    })
}

fn validate_trimap(prediction: &UnitAlphaMatte, trimap: &Trimap) -> Result<(), MetricsError> {
    let (pred_w, pred_h) = prediction.dimensions();
    let (tri_w, tri_h) = trimap.dimensions();

    validate_matching_dimensions(tri_w, tri_h, pred_w, pred_h, "Metrics").map_err(|_| {
        MetricsError::TrimapDimensionMismatch {
            trimap: (tri_w, tri_h),
            prediction: (pred_w, pred_h),
        }
    })
}
