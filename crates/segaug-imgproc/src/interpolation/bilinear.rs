/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `plane` - The input plane in row-major order.
/// * `u` - The row coordinate of the pixel to interpolate.
/// * `v` - The column coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel value.
#[inline]
pub(crate) fn bilinear_interpolation(
    plane: &[f32],
    rows: usize,
    cols: usize,
    u: f32,
    v: f32,
) -> f32 {
    let u = u.max(0.0);
    let v = v.max(0.0);

    let iu0 = (u.trunc() as usize).min(rows - 1);
    let iv0 = (v.trunc() as usize).min(cols - 1);

    let frac_u = u.fract();
    let frac_v = v.fract();

    let iu1 = if iu0 + 1 < rows { iu0 + 1 } else { iu0 };
    let iv1 = if iv0 + 1 < cols { iv0 + 1 } else { iv0 };

    let p00 = plane[iu0 * cols + iv0];
    let p01 = plane[iu0 * cols + iv1];
    let p10 = plane[iu1 * cols + iv0];
    let p11 = plane[iu1 * cols + iv1];

    let w00 = (1.0 - frac_u) * (1.0 - frac_v);
    let w01 = (1.0 - frac_u) * frac_v;
    let w10 = frac_u * (1.0 - frac_v);
    let w11 = frac_u * frac_v;

    p00 * w00 + p01 * w01 + p10 * w10 + p11 * w11
}
