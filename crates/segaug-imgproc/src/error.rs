use segaug_image::ImageError;
use segaug_tensor::TensorError;

/// An error type for the image processing operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImgprocError {
    /// Error coming from the image batch containers.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error coming from the underlying tensors.
    #[error(transparent)]
    Tensor(#[from] TensorError),

    /// The padding or border mode name is not supported.
    #[error("Unsupported padding mode \"{0}\"")]
    UnsupportedPaddingMode(String),

    /// A random range is negative or not finite.
    #[error("Invalid {name}: {value} (must be finite and >= 0)")]
    InvalidRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// Received value.
        value: f64,
    },

    /// The zoom bounds are not finite or not ordered.
    #[error("Invalid zoom bounds [{0}, {1}]")]
    InvalidZoomBounds(f64, f64),

    /// The control grid does not fit the image.
    #[error("Invalid control grid {rows}x{cols} for an image of {height}x{width} pixels")]
    InvalidGridSize {
        /// Control points along the rows.
        rows: usize,
        /// Control points along the columns.
        cols: usize,
        /// Image height.
        height: usize,
        /// Image width.
        width: usize,
    },

    /// The displacement field does not match the image extent.
    #[error("Displacement field shape {0:?} does not match image size {1}x{2}")]
    FieldShapeMismatch([usize; 3], usize, usize),

    /// The array to pad has a zero-sized dimension.
    #[error("Cannot pad an empty array of shape {0:?}")]
    EmptyArray([usize; 3]),

    /// The margin is too large to remove from the array.
    #[error("Cannot remove a margin of {margin} from a {rows}x{cols} array")]
    InvalidMargin {
        /// Margin to remove.
        margin: usize,
        /// Rows of the padded array.
        rows: usize,
        /// Columns of the padded array.
        cols: usize,
    },

    /// The crop window lies outside the image.
    #[error("Crop window {height}x{width} at ({top}, {left}) exceeds image size {image_height}x{image_width}")]
    InvalidCropWindow {
        /// Top offset.
        top: usize,
        /// Left offset.
        left: usize,
        /// Window height.
        height: usize,
        /// Window width.
        width: usize,
        /// Image height.
        image_height: usize,
        /// Image width.
        image_width: usize,
    },

    /// The number of channel shifts does not match the batch.
    #[error("Expected {expected} channel shifts, got {actual}")]
    ShiftCountMismatch {
        /// Number of (sample, channel) planes.
        expected: usize,
        /// Number of shifts provided.
        actual: usize,
    },
}
