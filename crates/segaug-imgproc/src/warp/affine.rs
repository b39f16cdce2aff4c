use segaug_image::{ImageBatch, ImageDtype};

use crate::affine::AffineMatrix;
use crate::error::ImgprocError;
use crate::padding::PaddingMode;

/// Resample every plane of a batch under an affine map.
///
/// The output pixel at `(i, j)` is read from the source coordinate
/// `A · (i, j) + b`, where `A` is the linear part and `b` the offset of `m`,
/// rounded to the nearest pixel. Source coordinates outside the plane are resolved
/// with `mode`: `Nearest` clamps, `Reflect` mirrors, `Constant` writes `cval` and
/// `Zero` writes zero.
///
/// Only source values are ever copied, so integer masks keep their label set.
///
/// # Arguments
///
/// * `src` - The input batch with shape (N, C, H, W).
/// * `m` - The output-to-source affine matrix.
/// * `mode` - The border mode.
/// * `cval` - The fill value for [`PaddingMode::Constant`].
///
/// # Returns
///
/// A new batch with the same shape as `src`.
pub fn apply_transform<T: ImageDtype>(
    src: &ImageBatch<T>,
    m: &AffineMatrix,
    mode: PaddingMode,
    cval: T,
) -> Result<ImageBatch<T>, ImgprocError> {
    if m.is_identity() {
        return Ok(src.clone());
    }

    let (rows, cols) = (src.rows(), src.cols());
    let [[a00, a01], [a10, a11]] = m.linear();
    let [b0, b1] = m.offset();

    // source offset of every output pixel, shared by all planes
    let lookup: Vec<Option<usize>> = (0..rows * cols)
        .map(|idx| {
            let (i, j) = ((idx / cols) as f64, (idx % cols) as f64);
            let u = a00 * i + a01 * j + b0;
            let v = a10 * i + a11 * j + b1;
            let iu = mode.map_index((u + 0.5).floor() as isize, rows)?;
            let iv = mode.map_index((v + 0.5).floor() as isize, cols)?;
            Some(iu * cols + iv)
        })
        .collect();

    let fill = mode.fill_value(cval);
    let mut dst = src.clone();
    for (src_plane, dst_plane) in src.planes().zip(dst.planes_mut()) {
        for (dst_pixel, src_idx) in dst_plane.iter_mut().zip(lookup.iter()) {
            *dst_pixel = match src_idx {
                Some(k) => src_plane[*k],
                None => fill,
            };
        }
    }

    Ok(dst)
}
