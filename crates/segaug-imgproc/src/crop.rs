use segaug_image::{ImageBatch, ImageDtype, ImageSize};

use crate::error::ImgprocError;

/// A rectangular region shared by every plane of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    /// Row of the top-left corner.
    pub top: usize,
    /// Column of the top-left corner.
    pub left: usize,
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
}

impl CropWindow {
    /// The full extent of an image of the given size.
    pub fn full(size: ImageSize) -> Self {
        Self {
            top: 0,
            left: 0,
            height: size.height,
            width: size.width,
        }
    }

    /// Size of the cropped region.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }

    fn fits(&self, size: ImageSize) -> bool {
        self.height > 0
            && self.width > 0
            && self.top + self.height <= size.height
            && self.left + self.width <= size.width
    }
}

/// Crop every plane of a batch to the same window.
///
/// # Arguments
///
/// * `src` - The input batch with shape (N, C, H, W).
/// * `window` - The region to keep.
///
/// # Errors
///
/// Returns an error if the window is empty or does not lie inside the image.
///
/// # Examples
///
/// ```rust
/// use segaug_image::ImageBatch;
/// use segaug_imgproc::crop::{crop_batch, CropWindow};
///
/// let image = ImageBatch::new([1, 1, 4, 4], (0..16u8).collect()).unwrap();
/// let window = CropWindow { top: 1, left: 1, height: 2, width: 2 };
///
/// let cropped = crop_batch(&image, window).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_batch<T: ImageDtype>(
    src: &ImageBatch<T>,
    window: CropWindow,
) -> Result<ImageBatch<T>, ImgprocError> {
    let size = src.size();
    if !window.fits(size) {
        return Err(ImgprocError::InvalidCropWindow {
            top: window.top,
            left: window.left,
            height: window.height,
            width: window.width,
            image_height: size.height,
            image_width: size.width,
        });
    }

    if window == CropWindow::full(size) {
        return Ok(src.clone());
    }

    let cols = src.cols();
    let mut data = Vec::with_capacity(src.num_planes() * window.height * window.width);
    for plane in src.planes() {
        for src_row in plane
            .chunks_exact(cols)
            .skip(window.top)
            .take(window.height)
        {
            // copy the slice at the left corner
            data.extend_from_slice(&src_row[window.left..window.left + window.width]);
        }
    }

    Ok(ImageBatch::new(
        [
            src.batch_size(),
            src.num_channels(),
            window.height,
            window.width,
        ],
        data,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_every_plane() -> Result<(), ImgprocError> {
        let src = ImageBatch::new([2, 1, 3, 3], (0..18).map(|x| x as f32).collect())?;
        let window = CropWindow {
            top: 1,
            left: 0,
            height: 2,
            width: 2,
        };
        let dst = crop_batch(&src, window)?;
        assert_eq!(dst.shape, [2, 1, 2, 2]);
        assert_eq!(dst.as_slice(), &[3.0, 4.0, 6.0, 7.0, 12.0, 13.0, 15.0, 16.0]);
        Ok(())
    }

    #[test]
    fn full_window_is_copy() -> Result<(), ImgprocError> {
        let src = ImageBatch::new([1, 2, 2, 3], (0..12).collect::<Vec<i32>>())?;
        let dst = crop_batch(&src, CropWindow::full(src.size()))?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn window_outside_image() -> Result<(), ImgprocError> {
        let src = ImageBatch::new([1, 1, 3, 3], vec![0u8; 9])?;
        let window = CropWindow {
            top: 2,
            left: 0,
            height: 2,
            width: 1,
        };
        assert!(matches!(
            crop_batch(&src, window),
            Err(ImgprocError::InvalidCropWindow { .. })
        ));
        Ok(())
    }
}
