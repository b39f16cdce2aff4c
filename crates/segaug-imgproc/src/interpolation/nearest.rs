/// Offset of the pixel closest to `(u, v)` in a `rows x cols` plane.
///
/// Coordinates are rounded with `floor(x + 0.5)` and clamped to the plane.
#[inline]
pub(crate) fn nearest_index(rows: usize, cols: usize, u: f32, v: f32) -> usize {
    let iu = ((u + 0.5).floor() as isize).clamp(0, rows as isize - 1) as usize;
    let iv = ((v + 0.5).floor() as isize).clamp(0, cols as isize - 1) as usize;
    iu * cols + iv
}

/// Kernel for nearest neighbor interpolation
#[inline]
pub(crate) fn nearest_neighbor_interpolation(
    plane: &[f32],
    rows: usize,
    cols: usize,
    u: f32,
    v: f32,
) -> f32 {
    plane[nearest_index(rows, cols, u, v)]
}
