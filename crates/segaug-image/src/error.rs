use segaug_tensor::TensorError;

/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when shape is not valid.
    #[error("Invalid shape")]
    InvalidShape(#[from] TensorError),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when an image batch has a zero-sized dimension.
    #[error("Image batch must be non-empty, got shape {0:?}")]
    EmptyImage([usize; 4]),

    /// Error when two images do not have the same size.
    #[error("Image size mismatch: ({0}x{1}) vs ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the image and mask batches are not co-indexed.
    #[error("Batch size mismatch: {0} images vs {1} masks")]
    BatchSizeMismatch(usize, usize),

    /// Error when a label batch has more than one channel.
    #[error("Label batches must have a single channel, got {0}")]
    InvalidMaskChannels(usize),

    /// Error when the sample index is out of bounds.
    #[error("Sample index {0} is out of bounds ({1})")]
    SampleIndexOutOfBounds(usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),
}
