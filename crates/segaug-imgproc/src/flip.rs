use segaug_image::{ImageBatch, ImageDtype};

/// Axis reversed by [`flip_axis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    /// Reverse the column order (mirror left/right).
    Horizontal,
    /// Reverse the row order (mirror top/bottom).
    Vertical,
}

/// Flip every plane of a batch along the given axis.
///
/// # Arguments
///
/// * `src` - The input batch with shape (N, C, H, W).
/// * `axis` - The axis to reverse.
///
/// # Returns
///
/// The flipped batch.
///
/// # Example
///
/// ```
/// use segaug_image::ImageBatch;
/// use segaug_imgproc::flip::{flip_axis, FlipAxis};
///
/// let src = ImageBatch::new([1, 1, 2, 2], vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
/// let flipped = flip_axis(&src, FlipAxis::Horizontal);
///
/// assert_eq!(flipped.as_slice(), &[2.0, 1.0, 4.0, 3.0]);
/// ```
pub fn flip_axis<T: ImageDtype>(src: &ImageBatch<T>, axis: FlipAxis) -> ImageBatch<T> {
    let (rows, cols) = (src.rows(), src.cols());
    let mut dst = src.clone();

    for plane in dst.planes_mut() {
        match axis {
            FlipAxis::Horizontal => plane.chunks_exact_mut(cols).for_each(|row| row.reverse()),
            FlipAxis::Vertical => {
                let mut i = 0;
                let mut j = rows - 1;
                while i < j {
                    let (top, bottom) = plane.split_at_mut(j * cols);
                    top[i * cols..(i + 1) * cols].swap_with_slice(&mut bottom[..cols]);
                    i += 1;
                    j -= 1;
                }
            }
        }
    }

    dst
}

/// Flip the input batch horizontally.
pub fn horizontal_flip<T: ImageDtype>(src: &ImageBatch<T>) -> ImageBatch<T> {
    flip_axis(src, FlipAxis::Horizontal)
}

/// Flip the input batch vertically.
pub fn vertical_flip<T: ImageDtype>(src: &ImageBatch<T>) -> ImageBatch<T> {
    flip_axis(src, FlipAxis::Vertical)
}
