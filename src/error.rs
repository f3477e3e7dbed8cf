use thiserror::Error;

/// Error type for trimap generation and construction
///
/// All variants are invalid-input conditions; trimap generation has no
/// other failure mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrimapError {
    /// The source alpha matte has a zero-sized dimension
    #[error("Alpha matte dimensions must be non-zero, got {width}x{height}")]
    EmptyMatte { width: u32, height: u32 },

    /// The morphology kernel radius is zero
    ///
    /// A zero radius would leave no unknown band at all and is always a
    /// caller bug rather than a degenerate-but-valid request.
    #[error("Morphology kernel radius must be at least 1")]
    ZeroKernelRadius,

    /// A pixel value outside the three canonical labels was found
    ///
    /// Returned when constructing a trimap from a raw image that does not
    /// satisfy the label-closure invariant.
    #[error("Trimap contains illegal label {value} at ({x}, {y}); expected 0, 128 or 255")]
    IllegalLabel { value: u8, x: u32, y: u32 },
}

/// Error type for crop window construction and safe cropping
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CropError {
    /// The requested crop window size is zero
    #[error("Crop window size must be non-zero")]
    ZeroCropSize,

    /// The configured network input size is zero
    #[error("Target size must be non-zero")]
    ZeroTargetSize,
}

/// Error type for compositing operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeError {
    /// The requested composite size has a zero dimension
    #[error("Composite dimensions must be non-zero, got {width}x{height}")]
    EmptyTarget { width: u32, height: u32 },

    /// The foreground is not already sized to the requested dimensions
    #[error("Foreground dimensions mismatch: expected {expected:?}, actual {actual:?}")]
    ForegroundDimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The alpha matte is not sized to the requested dimensions
    #[error("Alpha dimensions mismatch: expected {expected:?}, actual {actual:?}")]
    AlphaDimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The background cannot cover the requested crop
    ///
    /// Backgrounds are never upscaled implicitly; resize first with
    /// [`fit_background`](crate::fit_background).
    #[error("Background {actual:?} is smaller than the requested size {requested:?}")]
    BackgroundTooSmall {
        requested: (u32, u32),
        actual: (u32, u32),
    },
}

/// Error type for metric computation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    /// Prediction and ground truth dimensions differ
    #[error("Prediction {prediction:?} and ground truth {ground_truth:?} dimensions do not match")]
    DimensionMismatch {
        prediction: (u32, u32),
        ground_truth: (u32, u32),
    },

    /// Trimap dimensions differ from the prediction
    #[error("Trimap {trimap:?} does not match prediction {prediction:?}")]
    TrimapDimensionMismatch {
        trimap: (u32, u32),
        prediction: (u32, u32),
    },
}

/// Error type for the evaluation driver
///
/// Wraps the per-stage errors and the two failure modes introduced by the
/// external predictor boundary.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Trimap(#[from] TrimapError),

    #[error(transparent)]
    Crop(#[from] CropError),

    #[error(transparent)]
    Composite(#[from] CompositeError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// The external predictor reported a failure
    #[error("Predictor failed: {0}")]
    Predictor(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The predictor returned a map of the wrong dimensions
    #[error("Prediction dimensions {actual:?} do not match network input {expected:?}")]
    PredictionShape {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}
