use std::str::FromStr;

use segaug_image::ImageDtype;
use segaug_tensor::{Tensor2, Tensor3};

use crate::error::ImgprocError;

/// A border type for spatial padding and out-of-bounds sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    /// This border type fills the border with a single, constant value.
    ///
    /// Example: ...d c b a | k k k k...
    Constant,

    /// This border type fills the border with zeros.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    Zero,

    /// This border type takes the outermost row or column of pixels and repeats it into the padded region.
    ///
    /// Example: ...d c b a | a a a a...
    #[default]
    Nearest,

    /// This border type reflects the pixel values at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,
}

impl PaddingMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        // the mirrored sequence repeats every 2 * len indices
        let period = 2 * len as isize;
        let i = i.rem_euclid(period);
        if i < len as isize {
            i as usize
        } else {
            (period - 1 - i) as usize
        }
    }

    /// Maps index `i` to a valid index within `[0, len)`, or `None` when the mode
    /// fills the border with a value instead of source pixels.
    ///
    /// - `Nearest`: clamp to edge
    /// - `Reflect`: mirror including edge
    /// - `Constant`, `Zero`: `None` outside the range
    ///
    /// An empty range has no valid index and always yields `None`.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }
        match self {
            PaddingMode::Nearest => Some(i.clamp(0, len as isize - 1) as usize),
            PaddingMode::Reflect => Some(Self::reflect(i, len)),
            PaddingMode::Constant | PaddingMode::Zero => None,
        }
    }

    /// The value written into the border for fill-type modes.
    #[inline]
    pub fn fill_value<T: ImageDtype>(&self, constant: T) -> T {
        match self {
            PaddingMode::Constant => constant,
            _ => T::zero(),
        }
    }

    /// The canonical name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaddingMode::Constant => "constant",
            PaddingMode::Zero => "zero",
            PaddingMode::Nearest => "nearest",
            PaddingMode::Reflect => "reflect",
        }
    }
}

impl std::fmt::Display for PaddingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaddingMode {
    type Err = ImgprocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(PaddingMode::Constant),
            "zero" => Ok(PaddingMode::Zero),
            "nearest" | "replicate" => Ok(PaddingMode::Nearest),
            "reflect" => Ok(PaddingMode::Reflect),
            other => Err(ImgprocError::UnsupportedPaddingMode(other.to_string())),
        }
    }
}

fn check_not_empty(rows: usize, cols: usize, channels: usize) -> Result<(), ImgprocError> {
    if rows == 0 || cols == 0 || channels == 0 {
        return Err(ImgprocError::EmptyArray([rows, cols, channels]));
    }
    Ok(())
}

/// Pad an interleaved `(rows, cols, C)` buffer by `margin` on every side.
///
/// The border is first filled with the mode's fill value and the source copied into
/// the centre. Replicating modes then fill the left/right borders of the centre
/// rows, and the top/bottom rows are copied from already padded centre rows, so
/// the corners become the double mirror (or double clamp) of the corner blocks.
pub(crate) fn pad_interleaved<T: ImageDtype>(
    src: &[T],
    rows: usize,
    cols: usize,
    channels: usize,
    margin: usize,
    mode: PaddingMode,
    constant: T,
) -> Vec<T> {
    let new_rows = rows + 2 * margin;
    let new_cols = cols + 2 * margin;
    let old_stride = cols * channels;
    let new_stride = new_cols * channels;

    let mut dst = vec![mode.fill_value(constant); new_rows * new_stride];

    // copy the source as centre of the new buffer
    let row_offset = margin * new_stride + margin * channels;
    for (src_row, dst_row) in src
        .chunks_exact(old_stride)
        .zip(dst[row_offset..].chunks_exact_mut(new_stride))
    {
        dst_row[..old_stride].copy_from_slice(src_row);
    }

    if matches!(mode, PaddingMode::Constant | PaddingMode::Zero) || margin == 0 {
        return dst;
    }

    // left and right borders of the centre rows
    for row in dst[margin * new_stride..(margin + rows) * new_stride].chunks_exact_mut(new_stride)
    {
        for x in (0..margin).chain(margin + cols..new_cols) {
            if let Some(src_x) = mode.map_index(x as isize - margin as isize, cols) {
                let src_idx = (margin + src_x) * channels;
                row.copy_within(src_idx..src_idx + channels, x * channels);
            }
        }
    }

    // top and bottom rows, including the corners
    for y in (0..margin).chain(margin + rows..new_rows) {
        if let Some(src_y) = mode.map_index(y as isize - margin as isize, rows) {
            let src_start = (margin + src_y) * new_stride;
            dst.copy_within(src_start..src_start + new_stride, y * new_stride);
        }
    }

    dst
}

/// Pad a 2D array by `margin` pixels on every side.
///
/// # Arguments
///
/// * `src` - The array to pad with shape (H, W).
/// * `margin` - The number of pixels added on each side.
/// * `mode` - The border handling defined in [`PaddingMode`].
/// * `constant` - The fill value for [`PaddingMode::Constant`].
///
/// # Returns
///
/// The padded array with shape (H + 2 * margin, W + 2 * margin).
///
/// # Errors
///
/// Returns an error if the array has no rows or no columns.
///
/// # Example
///
/// ```rust
/// use segaug_imgproc::padding::{pad_image, PaddingMode};
/// use segaug_tensor::Tensor2;
///
/// let src = Tensor2::from_shape_vec([2, 2], vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
/// let padded = pad_image(&src, 1, PaddingMode::Reflect, 0.0).unwrap();
///
/// assert_eq!(padded.shape, [4, 4]);
/// assert_eq!(padded.get([0, 0]), Some(&1.0));
/// ```
pub fn pad_image<T: ImageDtype>(
    src: &Tensor2<T>,
    margin: usize,
    mode: PaddingMode,
    constant: T,
) -> Result<Tensor2<T>, ImgprocError> {
    let [rows, cols] = src.shape;
    check_not_empty(rows, cols, 1)?;
    let data = pad_interleaved(src.as_slice(), rows, cols, 1, margin, mode, constant);
    Ok(Tensor2::from_shape_vec(
        [rows + 2 * margin, cols + 2 * margin],
        data,
    )?)
}

/// Remove a `margin` pixels wide border from a 2D array.
///
/// # Errors
///
/// Returns an error if the array is empty or the margin leaves no pixels.
pub fn unpad_image<T: ImageDtype>(
    src: &Tensor2<T>,
    margin: usize,
) -> Result<Tensor2<T>, ImgprocError> {
    let [rows, cols] = src.shape;
    check_not_empty(rows, cols, 1)?;
    let data = unpad_interleaved(src.as_slice(), rows, cols, 1, margin)?;
    Ok(Tensor2::from_shape_vec(
        [rows - 2 * margin, cols - 2 * margin],
        data,
    )?)
}

/// Pad a `(H, W, C)` field of vectors by `margin` pixels on every side.
///
/// # Errors
///
/// Returns an error if any dimension of the field is zero.
pub fn pad_field(
    src: &Tensor3<f32>,
    margin: usize,
    mode: PaddingMode,
) -> Result<Tensor3<f32>, ImgprocError> {
    let [rows, cols, channels] = src.shape;
    check_not_empty(rows, cols, channels)?;
    let data = pad_interleaved(src.as_slice(), rows, cols, channels, margin, mode, 0.0);
    Ok(Tensor3::from_shape_vec(
        [rows + 2 * margin, cols + 2 * margin, channels],
        data,
    )?)
}

pub(crate) fn unpad_interleaved<T: ImageDtype>(
    src: &[T],
    rows: usize,
    cols: usize,
    channels: usize,
    margin: usize,
) -> Result<Vec<T>, ImgprocError> {
    if 2 * margin >= rows || 2 * margin >= cols {
        return Err(ImgprocError::InvalidMargin { margin, rows, cols });
    }

    let stride = cols * channels;
    let inner = (cols - 2 * margin) * channels;
    let data = src
        .chunks_exact(stride)
        .skip(margin)
        .take(rows - 2 * margin)
        .flat_map(|row| row[margin * channels..margin * channels + inner].iter().copied())
        .collect();

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_src_2x2() -> Result<Tensor2<f32>, ImgprocError> {
        Ok(Tensor2::from_shape_vec([2, 2], vec![1.0, 2.0, 3.0, 4.0])?)
    }

    #[test]
    fn pad_reflect_margin_one() -> Result<(), ImgprocError> {
        let padded = pad_image(&make_src_2x2()?, 1, PaddingMode::Reflect, 0.0)?;

        #[rustfmt::skip]
        let expected = vec![
            1.0, 1.0, 2.0, 2.0,
            1.0, 1.0, 2.0, 2.0,
            3.0, 3.0, 4.0, 4.0,
            3.0, 3.0, 4.0, 4.0,
        ];
        assert_eq!(padded.shape, [4, 4]);
        assert_eq!(padded.as_slice(), expected.as_slice());
        Ok(())
    }

    #[test]
    fn pad_reflect_corners_are_double_mirror() -> Result<(), ImgprocError> {
        let src = Tensor2::from_shape_fn([3, 3], |[r, c]| (r * 3 + c) as f32);
        let padded = pad_image(&src, 2, PaddingMode::Reflect, 0.0)?;

        // top-left 2x2 block is the flipud(fliplr()) of the source corner block
        assert_eq!(padded.get([0, 0]), Some(&4.0));
        assert_eq!(padded.get([0, 1]), Some(&3.0));
        assert_eq!(padded.get([1, 0]), Some(&1.0));
        assert_eq!(padded.get([1, 1]), Some(&0.0));

        // bottom-right
        assert_eq!(padded.get([6, 6]), Some(&4.0));
        assert_eq!(padded.get([5, 5]), Some(&8.0));
        Ok(())
    }

    #[test]
    fn pad_nearest() -> Result<(), ImgprocError> {
        let padded = pad_image(&make_src_2x2()?, 2, PaddingMode::Nearest, 0.0)?;
        assert_eq!(padded.shape, [6, 6]);
        assert_eq!(padded.get([0, 0]), Some(&1.0));
        assert_eq!(padded.get([0, 5]), Some(&2.0));
        assert_eq!(padded.get([5, 0]), Some(&3.0));
        assert_eq!(padded.get([5, 5]), Some(&4.0));
        assert_eq!(padded.get([3, 0]), Some(&3.0));
        assert_eq!(padded.get([0, 3]), Some(&2.0));
        Ok(())
    }

    #[test]
    fn pad_constant_and_zero() -> Result<(), ImgprocError> {
        let src = make_src_2x2()?;

        let padded = pad_image(&src, 1, PaddingMode::Constant, 9.0)?;
        assert_eq!(padded.get([0, 0]), Some(&9.0));
        assert_eq!(padded.get([3, 2]), Some(&9.0));
        assert_eq!(padded.get([1, 1]), Some(&1.0));
        assert_eq!(padded.get([2, 2]), Some(&4.0));

        let padded = pad_image(&src, 1, PaddingMode::Zero, 9.0)?;
        assert_eq!(padded.get([0, 0]), Some(&0.0));
        assert_eq!(padded.get([2, 3]), Some(&0.0));
        assert_eq!(padded.get([2, 1]), Some(&3.0));
        Ok(())
    }

    #[test]
    fn pad_unpad_roundtrip_all_modes() -> Result<(), ImgprocError> {
        let src = Tensor2::from_shape_fn([4, 5], |[r, c]| (r * 5 + c) as i32);
        for mode in [
            PaddingMode::Reflect,
            PaddingMode::Nearest,
            PaddingMode::Constant,
            PaddingMode::Zero,
        ] {
            for margin in [0, 1, 3, 7] {
                let padded = pad_image(&src, margin, mode, -1)?;
                assert_eq!(padded.shape, [4 + 2 * margin, 5 + 2 * margin]);
                let restored = unpad_image(&padded, margin)?;
                assert_eq!(restored, src, "mode {mode}, margin {margin}");
            }
        }
        Ok(())
    }

    #[test]
    fn pad_field_replicates_vectors() -> Result<(), ImgprocError> {
        let field = Tensor3::from_shape_vec([1, 2, 2], vec![1.0, -1.0, 2.0, -2.0])?;
        let padded = pad_field(&field, 1, PaddingMode::Nearest)?;
        assert_eq!(padded.shape, [3, 4, 2]);
        assert_eq!(padded.get([0, 0, 0]), Some(&1.0));
        assert_eq!(padded.get([0, 0, 1]), Some(&-1.0));
        assert_eq!(padded.get([2, 3, 0]), Some(&2.0));
        assert_eq!(padded.get([2, 3, 1]), Some(&-2.0));
        Ok(())
    }

    #[test]
    fn unpad_rejects_large_margin() -> Result<(), ImgprocError> {
        let res = unpad_image(&make_src_2x2()?, 1);
        assert_eq!(
            res,
            Err(ImgprocError::InvalidMargin {
                margin: 1,
                rows: 2,
                cols: 2
            })
        );
        Ok(())
    }

    #[test]
    fn empty_arrays_are_rejected() -> Result<(), ImgprocError> {
        for mode in [
            PaddingMode::Reflect,
            PaddingMode::Nearest,
            PaddingMode::Constant,
            PaddingMode::Zero,
        ] {
            let wide = Tensor2::<f32>::from_shape_vec([0, 3], vec![])?;
            assert_eq!(
                pad_image(&wide, 1, mode, 0.0),
                Err(ImgprocError::EmptyArray([0, 3, 1]))
            );
            let tall = Tensor2::<f32>::from_shape_vec([2, 0], vec![])?;
            assert_eq!(
                pad_image(&tall, 1, mode, 0.0),
                Err(ImgprocError::EmptyArray([2, 0, 1]))
            );
        }

        let field = Tensor3::<f32>::from_shape_vec([0, 2, 2], vec![])?;
        assert_eq!(
            pad_field(&field, 1, PaddingMode::Nearest),
            Err(ImgprocError::EmptyArray([0, 2, 2]))
        );
        let src = Tensor2::<i32>::from_shape_vec([3, 0], vec![])?;
        assert_eq!(unpad_image(&src, 0), Err(ImgprocError::EmptyArray([3, 0, 1])));
        Ok(())
    }

    #[test]
    fn map_index_far_outside() {
        assert_eq!(PaddingMode::Reflect.map_index(-1, 0), None);
        assert_eq!(PaddingMode::Nearest.map_index(3, 0), None);
        assert_eq!(PaddingMode::Reflect.map_index(7, 1), Some(0));
        assert_eq!(PaddingMode::Reflect.map_index(8 * 1_000_000_000_000 + 5, 4), Some(2));
        assert_eq!(PaddingMode::Reflect.map_index(-8 * 1_000_000_000_000 - 1, 4), Some(0));
        assert_eq!(PaddingMode::Reflect.map_index(isize::MIN, 3), Some(1));
        assert_eq!(PaddingMode::Reflect.map_index(isize::MAX, 4), Some(0));
        assert_eq!(PaddingMode::Nearest.map_index(isize::MIN, 4), Some(0));
    }

    #[test]
    fn mode_from_str() {
        assert_eq!("reflect".parse::<PaddingMode>(), Ok(PaddingMode::Reflect));
        assert_eq!("replicate".parse::<PaddingMode>(), Ok(PaddingMode::Nearest));
        assert_eq!(
            "wrap".parse::<PaddingMode>(),
            Err(ImgprocError::UnsupportedPaddingMode("wrap".to_string()))
        );
    }

    #[test]
    fn map_index_modes() {
        assert_eq!(PaddingMode::Reflect.map_index(-1, 4), Some(0));
        assert_eq!(PaddingMode::Reflect.map_index(-2, 4), Some(1));
        assert_eq!(PaddingMode::Reflect.map_index(5, 4), Some(2));
        assert_eq!(PaddingMode::Nearest.map_index(9, 4), Some(3));
        assert_eq!(PaddingMode::Constant.map_index(-1, 4), None);
        assert_eq!(PaddingMode::Zero.map_index(2, 4), Some(2));
    }
}
