use segaug_image::ImageError;
use segaug_imgproc::ImgprocError;

/// An error type for the augmentation pipeline.
#[derive(thiserror::Error, Debug)]
pub enum AugmentError {
    /// The zoom range is neither a scalar nor a pair of bounds.
    #[error("zoom_range should be a float or a list of two floats, received {0}")]
    InvalidZoomRange(String),

    /// The fill mode name is not supported.
    #[error("Unsupported fill mode \"{0}\"")]
    UnsupportedFillMode(String),

    /// A numeric parameter is negative or not finite.
    #[error("Invalid {name}: {value}")]
    InvalidRange {
        /// Name of the configuration field.
        name: &'static str,
        /// Received value.
        value: f64,
    },

    /// The crop size has a zero dimension.
    #[error("Invalid crop size ({0}, {1})")]
    InvalidCropSize(usize, usize),

    /// The mask batch is not co-indexed with the image batch.
    #[error("Mask shape {mask:?} does not match image shape {image:?}")]
    MaskShapeMismatch {
        /// Shape of the image batch.
        image: [usize; 4],
        /// Shape of the mask batch.
        mask: [usize; 4],
    },

    /// The configuration could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Error coming from the batch containers.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error coming from an image operation.
    #[error(transparent)]
    Imgproc(#[from] ImgprocError),
}
