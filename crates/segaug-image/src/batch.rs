use std::collections::BTreeSet;
use std::ops;

use segaug_tensor::{Tensor2, Tensor3, Tensor4};

use crate::error::ImageError;

/// Image size in pixels
///
/// # Examples
///
/// ```
/// use segaug_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels in one plane.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Trait for pixel data types.
///
/// Floating point intensities and integer class ids both go through `f32` when an
/// operation needs arithmetic; integer types round on the way back.
pub trait ImageDtype:
    Copy + Default + PartialOrd + num_traits::Zero + std::fmt::Debug + Send + Sync + 'static
{
    /// Convert the value to f32.
    fn to_f32(self) -> f32;

    /// Convert a f32 value to the image data type.
    fn from_f32(x: f32) -> Self;
}

impl ImageDtype for f32 {
    fn to_f32(self) -> f32 {
        self
    }

    fn from_f32(x: f32) -> Self {
        x
    }
}

impl ImageDtype for u8 {
    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, 255.0) as u8
    }
}

impl ImageDtype for u16 {
    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, u16::MAX as f32) as u16
    }
}

impl ImageDtype for i32 {
    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(x: f32) -> Self {
        x.round() as i32
    }
}

/// A batch of multi-channel images.
///
/// The batch is a 4D tensor with shape (N, C, H, W): every sample is stored as
/// `C` contiguous row-major planes of `H x W` pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBatch<T = f32>(pub Tensor4<T>);

/// A batch of integer label masks with a single channel.
pub type LabelBatch = ImageBatch<i32>;

/// helper to deference the inner tensor
impl<T> ops::Deref for ImageBatch<T> {
    type Target = Tensor4<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// helper to deference the inner tensor
impl<T> ops::DerefMut for ImageBatch<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T: ImageDtype> ImageBatch<T> {
    /// Create a new batch from pixel data.
    ///
    /// # Arguments
    ///
    /// * `shape` - The batch shape as `[batch, channels, height, width]`.
    /// * `data` - The pixel data in (N, C, H, W) order.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the shape, or any dimension is
    /// zero, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use segaug_image::ImageBatch;
    ///
    /// let batch = ImageBatch::new([2, 3, 4, 5], vec![0f32; 2 * 3 * 4 * 5]).unwrap();
    ///
    /// assert_eq!(batch.batch_size(), 2);
    /// assert_eq!(batch.num_channels(), 3);
    /// assert_eq!(batch.height(), 4);
    /// assert_eq!(batch.width(), 5);
    /// ```
    pub fn new(shape: [usize; 4], data: Vec<T>) -> Result<Self, ImageError> {
        if shape.contains(&0) {
            return Err(ImageError::EmptyImage(shape));
        }

        let numel = shape.iter().product::<usize>();
        if data.len() != numel {
            return Err(ImageError::InvalidChannelShape(data.len(), numel));
        }

        Ok(Self(Tensor4::from_shape_vec(shape, data)?))
    }

    /// Create a new batch with the given shape filled with `val`.
    pub fn from_shape_val(shape: [usize; 4], val: T) -> Result<Self, ImageError> {
        let numel = shape.iter().product::<usize>();
        Self::new(shape, vec![val; numel])
    }

    /// Get the number of samples in the batch.
    pub fn batch_size(&self) -> usize {
        self.shape[0]
    }

    /// Get the number of channels of every sample.
    pub fn num_channels(&self) -> usize {
        self.shape[1]
    }

    /// Get the height of the images in pixels.
    pub fn height(&self) -> usize {
        self.shape[2]
    }

    /// Get the width of the images in pixels.
    pub fn width(&self) -> usize {
        self.shape[3]
    }

    /// Get the number of rows of the images.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the number of columns of the images.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the spatial size of the images in pixels.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Number of 2D planes in the batch, i.e. `batch_size * num_channels`.
    pub fn num_planes(&self) -> usize {
        self.batch_size() * self.num_channels()
    }

    /// Get a single `H x W` plane of the batch.
    ///
    /// # Errors
    ///
    /// If the sample or channel index is out of bounds, an error is returned.
    pub fn plane(&self, sample: usize, channel: usize) -> Result<&[T], ImageError> {
        let offset = self.plane_offset(sample, channel)?;
        Ok(&self.as_slice()[offset..offset + self.size().area()])
    }

    /// Get a single `H x W` plane of the batch mutably.
    pub fn plane_mut(&mut self, sample: usize, channel: usize) -> Result<&mut [T], ImageError> {
        let offset = self.plane_offset(sample, channel)?;
        let area = self.size().area();
        Ok(&mut self.as_slice_mut()[offset..offset + area])
    }

    /// Copy a single plane into its own 2D tensor.
    pub fn plane_tensor(&self, sample: usize, channel: usize) -> Result<Tensor2<T>, ImageError> {
        let plane = self.plane(sample, channel)?;
        Ok(Tensor2::from_shape_vec(
            [self.height(), self.width()],
            plane.to_vec(),
        )?)
    }

    fn plane_offset(&self, sample: usize, channel: usize) -> Result<usize, ImageError> {
        if sample >= self.batch_size() {
            return Err(ImageError::SampleIndexOutOfBounds(
                sample,
                self.batch_size(),
            ));
        }
        if channel >= self.num_channels() {
            return Err(ImageError::ChannelIndexOutOfBounds(
                channel,
                self.num_channels(),
            ));
        }
        Ok(self.get_iter_offset_unchecked([sample, channel, 0, 0]))
    }

    /// Iterate over the `H x W` planes of the batch in (sample, channel) order.
    pub fn planes(&self) -> std::slice::ChunksExact<'_, T> {
        let area = self.size().area();
        self.as_slice().chunks_exact(area)
    }

    /// Iterate mutably over the `H x W` planes of the batch in (sample, channel) order.
    pub fn planes_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        let area = self.size().area();
        self.as_slice_mut().chunks_exact_mut(area)
    }

    /// Extract one sample as a batch of size one.
    pub fn sample(&self, index: usize) -> Result<Self, ImageError> {
        if index >= self.batch_size() {
            return Err(ImageError::SampleIndexOutOfBounds(
                index,
                self.batch_size(),
            ));
        }
        let stride = self.strides[0];
        let data = self.as_slice()[index * stride..(index + 1) * stride].to_vec();
        Self::new(
            [1, self.num_channels(), self.height(), self.width()],
            data,
        )
    }

    /// Concatenate batches along the sample dimension.
    ///
    /// # Errors
    ///
    /// All parts must share channel count and spatial size and the list must not be empty.
    pub fn concat(parts: &[Self]) -> Result<Self, ImageError> {
        let first = parts.first().ok_or(ImageError::EmptyImage([0, 0, 0, 0]))?;
        let (channels, size) = (first.num_channels(), first.size());

        let mut batch_size = 0;
        let mut data = Vec::with_capacity(parts.iter().map(|p| p.numel()).sum());
        for part in parts {
            if part.num_channels() != channels {
                return Err(ImageError::ChannelIndexOutOfBounds(
                    part.num_channels(),
                    channels,
                ));
            }
            if part.size() != size {
                return Err(ImageError::InvalidImageSize(
                    part.width(),
                    part.height(),
                    size.width,
                    size.height,
                ));
            }
            batch_size += part.batch_size();
            data.extend_from_slice(part.as_slice());
        }

        Self::new([batch_size, channels, size.height, size.width], data)
    }

    /// Cast the pixel data of the batch to a different type.
    ///
    /// Integer targets round to the nearest value.
    pub fn cast<U: ImageDtype>(&self) -> ImageBatch<U> {
        ImageBatch(self.0.map(|&x| U::from_f32(x.to_f32())))
    }

    /// Minimum pixel value over the whole batch.
    pub fn min_value(&self) -> T {
        self.as_slice()
            .iter()
            .copied()
            .fold(self.as_slice()[0], |acc, x| if x < acc { x } else { acc })
    }
}

impl ImageBatch<i32> {
    /// Create a label batch from a `(batch, height, width)` shaped mask buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use segaug_image::LabelBatch;
    ///
    /// let masks = LabelBatch::from_masks([1, 2, 2], vec![0, 1, 1, 2]).unwrap();
    /// assert_eq!(masks.num_channels(), 1);
    /// ```
    pub fn from_masks(shape: [usize; 3], data: Vec<i32>) -> Result<Self, ImageError> {
        Self::new([shape[0], 1, shape[1], shape[2]], data)
    }

    /// Create a label batch from a `(batch, 1, height, width)` shaped mask buffer.
    pub fn from_masks_with_channel(shape: [usize; 4], data: Vec<i32>) -> Result<Self, ImageError> {
        if shape[1] != 1 {
            return Err(ImageError::InvalidMaskChannels(shape[1]));
        }
        Self::new(shape, data)
    }

    /// Drop the singleton channel and return the masks as a `(batch, height, width)` tensor.
    pub fn into_masks(self) -> Result<Tensor3<i32>, ImageError> {
        let [n, _, h, w] = self.shape;
        Ok(self.0.reshape([n, h, w])?)
    }

    /// The set of distinct class ids present in the batch.
    pub fn unique_labels(&self) -> BTreeSet<i32> {
        self.as_slice().iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::batch::{ImageBatch, ImageDtype, ImageSize, LabelBatch};
    use crate::error::ImageError;

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.area(), 200);
    }

    #[test]
    fn batch_smoke() -> Result<(), ImageError> {
        let batch = ImageBatch::<f32>::new([2, 3, 4, 5], vec![0f32; 2 * 3 * 4 * 5])?;
        assert_eq!(batch.size(), ImageSize { width: 5, height: 4 });
        assert_eq!(batch.num_planes(), 6);
        assert_eq!(batch.planes().count(), 6);
        Ok(())
    }

    #[test]
    fn batch_rejects_bad_shapes() {
        let res = ImageBatch::<f32>::new([1, 1, 2, 2], vec![0.0; 3]);
        assert_eq!(res, Err(ImageError::InvalidChannelShape(3, 4)));

        let res = ImageBatch::<f32>::new([1, 1, 0, 2], vec![]);
        assert_eq!(res, Err(ImageError::EmptyImage([1, 1, 0, 2])));
    }

    #[test]
    fn batch_plane_access() -> Result<(), ImageError> {
        let data = (0..16).map(|x| x as f32).collect();
        let mut batch = ImageBatch::new([2, 2, 2, 2], data)?;
        assert_eq!(batch.plane(1, 0)?, &[8.0, 9.0, 10.0, 11.0]);

        batch.plane_mut(0, 1)?.fill(-1.0);
        assert_eq!(batch.plane(0, 1)?, &[-1.0; 4]);

        let t = batch.plane_tensor(1, 1)?;
        assert_eq!(t.get([1, 0]), Some(&14.0));

        assert!(batch.plane(2, 0).is_err());
        assert!(batch.plane(0, 2).is_err());
        Ok(())
    }

    #[test]
    fn batch_sample_and_concat() -> Result<(), ImageError> {
        let data = (0..8).map(|x| x as f32).collect();
        let batch = ImageBatch::new([2, 1, 2, 2], data)?;
        let s0 = batch.sample(0)?;
        let s1 = batch.sample(1)?;
        assert_eq!(s1.as_slice(), &[4.0, 5.0, 6.0, 7.0]);

        let joined = ImageBatch::concat(&[s0, s1])?;
        assert_eq!(joined, batch);
        Ok(())
    }

    #[test]
    fn label_batch_shapes() -> Result<(), ImageError> {
        let masks = LabelBatch::from_masks([2, 1, 3], vec![0, 1, 2, 2, 1, 0])?;
        assert_eq!(masks.shape, [2, 1, 1, 3]);
        assert_eq!(masks.unique_labels().into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);

        let t = masks.into_masks()?;
        assert_eq!(t.shape, [2, 1, 3]);

        let res = LabelBatch::from_masks_with_channel([1, 2, 1, 1], vec![0, 0]);
        assert_eq!(res, Err(ImageError::InvalidMaskChannels(2)));
        Ok(())
    }

    #[test]
    fn dtype_rounding() {
        assert_eq!(i32::from_f32(2.6), 3);
        assert_eq!(i32::from_f32(-0.4), 0);
        assert_eq!(u8::from_f32(300.0), 255);
        assert_eq!(f32::from_f32(0.25), 0.25);
    }

    #[test]
    fn batch_cast_and_min() -> Result<(), ImageError> {
        let batch = ImageBatch::new([1, 1, 1, 3], vec![1.4f32, -2.6, 0.5])?;
        let ints: ImageBatch<i32> = batch.cast();
        assert_eq!(ints.as_slice(), &[1, -3, 1]);
        assert_eq!(batch.min_value(), -2.6);
        Ok(())
    }
}
