use segaug_image::{ImageBatch, ImageDtype};

use crate::displacement::{max_displacement, DisplacementField};
use crate::error::ImgprocError;
use crate::interpolation::{interpolate_pixel, nearest_index, InterpolationMode};
use crate::padding::{pad_interleaved, PaddingMode};

/// Warp every plane of a batch with a dense displacement field.
///
/// Each plane is padded by `ceil(max |d|)` pixels with `mode`, so that pixels
/// displaced past the edge still read border-consistent values. The output
/// pixel `p` samples the padded plane at `p + d(p)`. Coordinates that leave the
/// padded plane take the minimum value of the batch.
///
/// # Arguments
///
/// * `src` - The input batch with shape (N, C, H, W).
/// * `field` - The `(H, W, 2)` row/column displacement field.
/// * `mode` - The padding mode used to extend each plane.
/// * `interpolation` - The sampling kernel.
/// * `cval` - The fill value for [`PaddingMode::Constant`].
///
/// # Returns
///
/// A new batch with the same shape as `src`. Nearest sampling copies source
/// values unchanged; bilinear results are rounded for integer pixel types.
pub fn apply_warp<T: ImageDtype>(
    src: &ImageBatch<T>,
    field: &DisplacementField,
    mode: PaddingMode,
    interpolation: InterpolationMode,
    cval: T,
) -> Result<ImageBatch<T>, ImgprocError> {
    let (rows, cols) = (src.rows(), src.cols());
    if field.shape != [rows, cols, 2] {
        return Err(ImgprocError::FieldShapeMismatch(field.shape, rows, cols));
    }

    let margin = max_displacement(field).ceil() as usize;
    let (padded_rows, padded_cols) = (rows + 2 * margin, cols + 2 * margin);
    let edge = src.min_value();

    // only the centre of the padded output survives the final crop, where the
    // nearest-padded field equals the input field
    let coords: Vec<Option<(f32, f32)>> = field
        .as_slice()
        .chunks_exact(2)
        .enumerate()
        .map(|(idx, d)| {
            let u = (idx / cols + margin) as f32 + d[0];
            let v = (idx % cols + margin) as f32 + d[1];
            interpolation
                .contains(u, v, padded_rows, padded_cols)
                .then_some((u, v))
        })
        .collect();

    let mut dst = src.clone();
    for (src_plane, dst_plane) in src.planes().zip(dst.planes_mut()) {
        let padded = pad_interleaved(src_plane, rows, cols, 1, margin, mode, cval);

        match interpolation {
            // copy source values as they are, so integer labels never pass through f32
            InterpolationMode::Nearest => {
                for (dst_pixel, coord) in dst_plane.iter_mut().zip(coords.iter()) {
                    *dst_pixel = match coord {
                        Some((u, v)) => padded[nearest_index(padded_rows, padded_cols, *u, *v)],
                        None => edge,
                    };
                }
            }
            InterpolationMode::Bilinear => {
                let padded: Vec<f32> = padded.into_iter().map(|x| x.to_f32()).collect();
                for (dst_pixel, coord) in dst_plane.iter_mut().zip(coords.iter()) {
                    *dst_pixel = match coord {
                        Some((u, v)) => T::from_f32(interpolate_pixel(
                            &padded,
                            padded_rows,
                            padded_cols,
                            *u,
                            *v,
                            interpolation,
                        )),
                        None => edge,
                    };
                }
            }
        }
    }

    Ok(dst)
}
