//! Random smooth displacement fields for elastic deformation.
//!
//! Two generators are provided:
//!
//! - [`displacement_vecs`] + [`grid_displacement_field`]: integer offsets drawn on
//!   a coarse control grid and interpolated with a bilinear or bicubic surface.
//! - [`gen_warp_field`]: a `(grid + 3) x (grid + 3)` control lattice whose outer
//!   ring is pinned to zero, densified with a cubic spline. The field is exactly
//!   zero on the border rows and columns of the image.
//!
//! A field has shape `(H, W, 2)`; component 0 is the row offset and component 1
//! the column offset of each pixel.

use rand::Rng;
use segaug_image::ImageSize;
use segaug_tensor::{Tensor2, Tensor3};

use crate::error::ImgprocError;
use crate::sampling::normal;

/// A dense `(H, W, 2)` field of per-pixel `(row, col)` offsets.
pub type DisplacementField = Tensor3<f32>;

/// Surface used to interpolate a coarse control grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceKind {
    /// Piecewise bilinear surface.
    #[default]
    Linear,
    /// Separable natural cubic spline surface.
    Cubic,
}

/// Largest absolute component of a displacement field.
pub fn max_displacement(field: &DisplacementField) -> f32 {
    field
        .as_slice()
        .iter()
        .fold(0.0f32, |acc, &d| acc.max(d.abs()))
}

fn check_sigma(name: &'static str, value: f64) -> Result<(), ImgprocError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ImgprocError::InvalidRange { name, value })
    }
}

/// Draw the integer control-point displacements of a coarse grid.
///
/// Every entry is `trunc(z * std)` with `z ~ N(0, 1)`; all row offsets are drawn
/// before all column offsets.
///
/// # Arguments
///
/// * `rng` - The random source.
/// * `std` - The standard deviation of the offsets in pixels.
/// * `grid_size` - Number of control points along rows and columns.
///
/// # Returns
///
/// The `(row_offsets, col_offsets)` grids, both of shape `grid_size`.
pub fn displacement_vecs<R: Rng + ?Sized>(
    rng: &mut R,
    std: f64,
    grid_size: [usize; 2],
) -> Result<(Tensor2<i32>, Tensor2<i32>), ImgprocError> {
    check_sigma("std", std)?;
    let numel = grid_size[0] * grid_size[1];

    let draw = |rng: &mut R| -> Vec<i32> {
        (0..numel).map(|_| normal(rng, std).trunc() as i32).collect()
    };
    let disp_x = draw(&mut *rng);
    let disp_y = draw(&mut *rng);

    Ok((
        Tensor2::from_shape_vec(grid_size, disp_x)?,
        Tensor2::from_shape_vec(grid_size, disp_y)?,
    ))
}

/// Control point coordinates: `n` evenly spaced integers spanning `[0, len - 1]`.
fn control_nodes(n: usize, len: usize) -> Vec<f64> {
    if n == 1 {
        return vec![0.0];
    }
    (0..n).map(|k| (k * (len - 1) / (n - 1)) as f64).collect()
}

/// Second derivatives of the natural cubic spline through `(xs, ys)`.
fn natural_spline_moments(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }

    // Thomas algorithm over the interior moments
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];
    for i in 1..n - 1 {
        let h0 = xs[i] - xs[i - 1];
        let h1 = xs[i + 1] - xs[i];
        let a = h0 / 6.0;
        let b = (h0 + h1) / 3.0;
        let c = h1 / 6.0;
        let d = (ys[i + 1] - ys[i]) / h1 - (ys[i] - ys[i - 1]) / h0;

        let denom = b - a * c_prime[i - 1];
        c_prime[i] = c / denom;
        d_prime[i] = (d - a * d_prime[i - 1]) / denom;
    }
    for i in (1..n - 1).rev() {
        m[i] = d_prime[i] - c_prime[i] * m[i + 1];
    }
    m
}

/// Evaluate the interpolant through `(nodes, values)` at `0, 1, ..., len - 1`.
///
/// `nodes` must be strictly increasing and span `[0, len - 1]`.
fn resample_1d(nodes: &[f64], values: &[f64], kind: SurfaceKind, len: usize) -> Vec<f64> {
    if nodes.len() == 1 {
        return vec![values[0]; len];
    }

    let moments = match kind {
        SurfaceKind::Linear => vec![0.0; nodes.len()],
        SurfaceKind::Cubic => natural_spline_moments(nodes, values),
    };

    let mut k = 0;
    (0..len)
        .map(|p| {
            let t = p as f64;
            while k + 2 < nodes.len() && t > nodes[k + 1] {
                k += 1;
            }
            let h = nodes[k + 1] - nodes[k];
            let a = (nodes[k + 1] - t) / h;
            let b = (t - nodes[k]) / h;
            a * values[k]
                + b * values[k + 1]
                + ((a * a * a - a) * moments[k] + (b * b * b - b) * moments[k + 1]) * h * h / 6.0
        })
        .collect()
}

/// Interpolate coarse control-grid offsets into a dense per-pixel field.
///
/// Control points sit at `grid` evenly spaced integer coordinates spanning
/// `[0, H - 1]` and `[0, W - 1]`. The surface is evaluated at every pixel and
/// truncated to integer offsets.
///
/// # Arguments
///
/// * `size` - The image size.
/// * `disp_x` - Row offsets at the control points.
/// * `disp_y` - Column offsets at the control points.
/// * `kind` - The interpolating surface.
///
/// # Errors
///
/// The grids must have the same shape, at least one point per axis and no more
/// points than pixels along each axis.
pub fn grid_displacement_field(
    size: ImageSize,
    disp_x: &Tensor2<i32>,
    disp_y: &Tensor2<i32>,
    kind: SurfaceKind,
) -> Result<DisplacementField, ImgprocError> {
    let [grid_rows, grid_cols] = disp_x.shape;
    let (height, width) = (size.height, size.width);

    let invalid_grid = || ImgprocError::InvalidGridSize {
        rows: grid_rows,
        cols: grid_cols,
        height,
        width,
    };
    if disp_y.shape != disp_x.shape {
        return Err(ImgprocError::InvalidGridSize {
            rows: disp_y.shape[0],
            cols: disp_y.shape[1],
            height: grid_rows,
            width: grid_cols,
        });
    }
    if grid_rows == 0 || grid_cols == 0 || grid_rows > height || grid_cols > width {
        return Err(invalid_grid());
    }

    let row_nodes = control_nodes(grid_rows, height);
    let col_nodes = control_nodes(grid_cols, width);

    let mut field = DisplacementField::zeros([height, width, 2]);
    for (component, grid) in [disp_x, disp_y].into_iter().enumerate() {
        // interpolate along the columns of every control row
        let partial: Vec<Vec<f64>> = grid
            .as_slice()
            .chunks_exact(grid_cols)
            .map(|row| {
                let values: Vec<f64> = row.iter().map(|&v| v as f64).collect();
                resample_1d(&col_nodes, &values, kind, width)
            })
            .collect();

        // then along the rows of every column
        for c in 0..width {
            let values: Vec<f64> = partial.iter().map(|row| row[c]).collect();
            let dense = resample_1d(&row_nodes, &values, kind, height);
            for (r, v) in dense.into_iter().enumerate() {
                field.as_slice_mut()[(r * width + c) * 2 + component] = v.trunc() as f32;
            }
        }
    }

    Ok(field)
}

/// Densify lattice values onto `len` pixels with a uniform Catmull-Rom spline.
///
/// Lattice node `0` sits on pixel `0` and node `n - 1` on pixel `len - 1`, so the
/// outermost pixels take the outermost lattice values exactly.
fn catmull_rom_1d(values: &[f64], len: usize) -> Vec<f64> {
    let n = values.len();
    if len == 1 {
        return vec![values[0]];
    }

    let at = |i: isize| values[i.clamp(0, n as isize - 1) as usize];
    (0..len)
        .map(|p| {
            let u = (p * (n - 1)) as f64 / (len - 1) as f64;
            let k = (u.floor() as usize).min(n - 2);
            let t = u - k as f64;
            let (t2, t3) = (t * t, t * t * t);

            let w0 = 0.5 * (-t3 + 2.0 * t2 - t);
            let w1 = 0.5 * (3.0 * t3 - 5.0 * t2 + 2.0);
            let w2 = 0.5 * (-3.0 * t3 + 4.0 * t2 + t);
            let w3 = 0.5 * (t3 - t2);

            let k = k as isize;
            w0 * at(k - 1) + w1 * at(k) + w2 * at(k + 1) + w3 * at(k + 2)
        })
        .collect()
}

/// Generate a smooth random displacement field anchored at the image border.
///
/// A `(grid_size + 3) x (grid_size + 3) x 2` control lattice is drawn from
/// `N(0, sigma)`, its border rows and columns are set to zero, and the lattice is
/// densified over the image with a cubic spline.
///
/// # Arguments
///
/// * `rng` - The random source.
/// * `size` - The image size the field covers.
/// * `sigma` - The standard deviation of the control offsets in pixels.
/// * `grid_size` - The number of spline cells along each axis.
///
/// # Returns
///
/// A `(H, W, 2)` field whose border rows and columns are exactly zero.
///
/// # Example
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use segaug_image::ImageSize;
/// use segaug_imgproc::displacement::gen_warp_field;
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let field = gen_warp_field(&mut rng, ImageSize { width: 16, height: 8 }, 2.0, 3).unwrap();
/// assert_eq!(field.shape, [8, 16, 2]);
/// assert_eq!(field.get([0, 5, 0]), Some(&0.0));
/// ```
pub fn gen_warp_field<R: Rng + ?Sized>(
    rng: &mut R,
    size: ImageSize,
    sigma: f64,
    grid_size: usize,
) -> Result<DisplacementField, ImgprocError> {
    check_sigma("warp_sigma", sigma)?;
    let (height, width) = (size.height, size.width);
    if grid_size == 0 || height == 0 || width == 0 {
        return Err(ImgprocError::InvalidGridSize {
            rows: grid_size,
            cols: grid_size,
            height,
            width,
        });
    }

    let n = grid_size + 3;
    let mut lattice: Vec<f64> = (0..n * n * 2).map(|_| normal(rng, sigma)).collect();

    // anchor the edges of the image
    for a in 0..n {
        for b in 0..n {
            if a == 0 || b == 0 || a == n - 1 || b == n - 1 {
                lattice[(a * n + b) * 2] = 0.0;
                lattice[(a * n + b) * 2 + 1] = 0.0;
            }
        }
    }

    let mut field = DisplacementField::zeros([height, width, 2]);
    for component in 0..2 {
        let partial: Vec<Vec<f64>> = (0..n)
            .map(|a| {
                let values: Vec<f64> = (0..n).map(|b| lattice[(a * n + b) * 2 + component]).collect();
                catmull_rom_1d(&values, width)
            })
            .collect();

        for c in 0..width {
            let values: Vec<f64> = partial.iter().map(|row| row[c]).collect();
            for (r, v) in catmull_rom_1d(&values, height).into_iter().enumerate() {
                field.as_slice_mut()[(r * width + c) * 2 + component] = v as f32;
            }
        }
    }

    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn control_nodes_span_extent() {
        assert_eq!(control_nodes(3, 10), vec![0.0, 4.0, 9.0]);
        assert_eq!(control_nodes(2, 5), vec![0.0, 4.0]);
        assert_eq!(control_nodes(1, 5), vec![0.0]);
    }

    #[test]
    fn resample_linear_and_cubic_pass_through_nodes() {
        let nodes = [0.0, 3.0, 6.0];
        let values = [0.0, 3.0, 0.0];

        let linear = resample_1d(&nodes, &values, SurfaceKind::Linear, 7);
        assert_eq!(linear, vec![0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0]);

        let cubic = resample_1d(&nodes, &values, SurfaceKind::Cubic, 7);
        assert_relative_eq!(cubic[0], 0.0);
        assert_relative_eq!(cubic[3], 3.0, epsilon = 1e-12);
        assert_relative_eq!(cubic[6], 0.0, epsilon = 1e-12);
        // the spline bulges above the linear interpolant between the nodes
        assert!(cubic[1] > linear[1]);
    }

    #[test]
    fn displacement_vecs_shapes() -> Result<(), ImgprocError> {
        let mut rng = StdRng::seed_from_u64(11);
        let (dx, dy) = displacement_vecs(&mut rng, 4.0, [3, 4])?;
        assert_eq!(dx.shape, [3, 4]);
        assert_eq!(dy.shape, [3, 4]);

        let (dx, _) = displacement_vecs(&mut rng, 0.0, [2, 2])?;
        assert!(dx.as_slice().iter().all(|&v| v == 0));

        assert!(displacement_vecs(&mut rng, -1.0, [2, 2]).is_err());
        Ok(())
    }

    #[test]
    fn grid_field_interpolates_control_points() -> Result<(), ImgprocError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };
        let dx = Tensor2::from_shape_vec([2, 2], vec![0, 4, 0, 4])?;
        let dy = Tensor2::from_shape_vec([2, 2], vec![2, 2, -2, -2])?;

        let field = grid_displacement_field(size, &dx, &dy, SurfaceKind::Linear)?;
        assert_eq!(field.shape, [5, 5, 2]);

        // row offset grows along the columns
        assert_eq!(field.get([2, 0, 0]), Some(&0.0));
        assert_eq!(field.get([2, 2, 0]), Some(&2.0));
        assert_eq!(field.get([0, 4, 0]), Some(&4.0));

        // column offset shrinks along the rows, truncated toward zero
        assert_eq!(field.get([0, 3, 1]), Some(&2.0));
        assert_eq!(field.get([1, 3, 1]), Some(&1.0));
        assert_eq!(field.get([2, 3, 1]), Some(&0.0));
        assert_eq!(field.get([3, 3, 1]), Some(&-1.0));
        assert_eq!(field.get([4, 3, 1]), Some(&-2.0));
        Ok(())
    }

    #[test]
    fn grid_field_rejects_bad_grids() -> Result<(), ImgprocError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let big = Tensor2::from_shape_vec([3, 3], vec![0; 9])?;
        assert!(grid_displacement_field(size, &big, &big, SurfaceKind::Linear).is_err());

        let a = Tensor2::from_shape_vec([2, 2], vec![0; 4])?;
        let b = Tensor2::from_shape_vec([1, 2], vec![0; 2])?;
        assert!(grid_displacement_field(size, &a, &b, SurfaceKind::Linear).is_err());
        Ok(())
    }

    #[test]
    fn warp_field_border_is_zero() -> Result<(), ImgprocError> {
        let mut rng = StdRng::seed_from_u64(5);
        for (sigma, grid, h, w) in [(0.1, 3, 17, 23), (5.0, 1, 9, 4), (50.0, 6, 32, 32), (3.0, 2, 1, 7)] {
            let size = ImageSize {
                width: w,
                height: h,
            };
            let field = gen_warp_field(&mut rng, size, sigma, grid)?;
            assert_eq!(field.shape, [h, w, 2]);

            for r in 0..h {
                for c in 0..w {
                    if r == 0 || c == 0 || r == h - 1 || c == w - 1 {
                        assert_eq!(field.get([r, c, 0]), Some(&0.0));
                        assert_eq!(field.get([r, c, 1]), Some(&0.0));
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    fn warp_field_moves_interior() -> Result<(), ImgprocError> {
        let mut rng = StdRng::seed_from_u64(9);
        let size = ImageSize {
            width: 20,
            height: 20,
        };
        let field = gen_warp_field(&mut rng, size, 4.0, 3)?;
        assert!(max_displacement(&field) > 0.0);

        let still = gen_warp_field(&mut rng, size, 0.0, 3)?;
        assert_eq!(max_displacement(&still), 0.0);
        Ok(())
    }

    #[test]
    fn warp_field_rejects_invalid_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        assert!(gen_warp_field(&mut rng, size, f64::NAN, 3).is_err());
        assert!(gen_warp_field(&mut rng, size, 1.0, 0).is_err());
    }
}
