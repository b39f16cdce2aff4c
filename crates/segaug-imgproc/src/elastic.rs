use rand::Rng;
use segaug_image::{ImageBatch, ImageDtype};

use crate::displacement::{displacement_vecs, grid_displacement_field, DisplacementField, SurfaceKind};
use crate::error::ImgprocError;

/// Apply an integer displacement field to every plane of a batch.
///
/// The output pixel `(x, y)` copies the source pixel
/// `(clip(x - dx, 0, H - 1), clip(y - dy, 0, W - 1))`, where `(dx, dy)` is the
/// field value at `(x, y)` truncated to integers.
///
/// # Arguments
///
/// * `src` - The input batch with shape (N, C, H, W).
/// * `field` - The `(H, W, 2)` displacement field.
///
/// # Returns
///
/// The deformed batch. Only source values are copied.
pub fn elastic_deform<T: ImageDtype>(
    src: &ImageBatch<T>,
    field: &DisplacementField,
) -> Result<ImageBatch<T>, ImgprocError> {
    let (rows, cols) = (src.rows(), src.cols());
    if field.shape != [rows, cols, 2] {
        return Err(ImgprocError::FieldShapeMismatch(field.shape, rows, cols));
    }

    let lookup: Vec<usize> = field
        .as_slice()
        .chunks_exact(2)
        .enumerate()
        .map(|(idx, d)| {
            let x = (idx / cols) as isize - d[0] as isize;
            let y = (idx % cols) as isize - d[1] as isize;
            let x = x.clamp(0, rows as isize - 1) as usize;
            let y = y.clamp(0, cols as isize - 1) as usize;
            x * cols + y
        })
        .collect();

    let mut dst = ImageBatch::from_shape_val(src.shape, T::default())?;
    for (src_plane, dst_plane) in src.planes().zip(dst.planes_mut()) {
        for (dst_pixel, &k) in dst_plane.iter_mut().zip(lookup.iter()) {
            *dst_pixel = src_plane[k];
        }
    }

    Ok(dst)
}

/// Deform a batch with a random grid-interpolated displacement field.
///
/// One field is drawn per call and applied to every sample.
///
/// # Arguments
///
/// * `src` - The input batch with shape (N, C, H, W).
/// * `std` - The standard deviation of the control-point offsets in pixels.
/// * `grid_size` - Control points along rows and columns.
/// * `kind` - The interpolating surface.
/// * `rng` - The random source.
pub fn batch_elastic_deform<T: ImageDtype, R: Rng + ?Sized>(
    src: &ImageBatch<T>,
    std: f64,
    grid_size: [usize; 2],
    kind: SurfaceKind,
    rng: &mut R,
) -> Result<ImageBatch<T>, ImgprocError> {
    let (disp_x, disp_y) = displacement_vecs(rng, std, grid_size)?;
    let field = grid_displacement_field(src.size(), &disp_x, &disp_y, kind)?;
    elastic_deform(src, &field)
}
