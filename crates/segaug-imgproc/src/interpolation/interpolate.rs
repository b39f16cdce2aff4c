use super::bilinear::bilinear_interpolation;
use super::nearest::nearest_neighbor_interpolation;

/// Interpolation mode for resampling operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Bilinear interpolation
    Bilinear,
    /// Nearest neighbor interpolation
    #[default]
    Nearest,
}

impl InterpolationMode {
    /// Whether the continuous coordinate `(u, v)` can be sampled from a plane of
    /// `rows x cols` pixels with this mode.
    #[inline]
    pub fn contains(&self, u: f32, v: f32, rows: usize, cols: usize) -> bool {
        match self {
            InterpolationMode::Nearest => {
                u >= -0.5 && u < rows as f32 - 0.5 && v >= -0.5 && v < cols as f32 - 0.5
            }
            InterpolationMode::Bilinear => {
                u >= 0.0 && u <= (rows - 1) as f32 && v >= 0.0 && v <= (cols - 1) as f32
            }
        }
    }
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `plane` - The input plane with shape (rows, cols) in row-major order.
/// * `rows` - The number of rows of the plane.
/// * `cols` - The number of columns of the plane.
/// * `u` - The row coordinate of the pixel to interpolate.
/// * `v` - The column coordinate of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The interpolated pixel value.
pub fn interpolate_pixel(
    plane: &[f32],
    rows: usize,
    cols: usize,
    u: f32,
    v: f32,
    interpolation: InterpolationMode,
) -> f32 {
    match interpolation {
        InterpolationMode::Bilinear => bilinear_interpolation(plane, rows, cols, u, v),
        InterpolationMode::Nearest => nearest_neighbor_interpolation(plane, rows, cols, u, v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[rustfmt::skip]
    const PLANE: [f32; 9] = [
        0.0, 1.0, 2.0,
        3.0, 4.0, 5.0,
        6.0, 7.0, 8.0,
    ];

    #[test]
    fn nearest_rounds_half_up() {
        let v = interpolate_pixel(&PLANE, 3, 3, 0.5, 1.49, InterpolationMode::Nearest);
        assert_eq!(v, 4.0);
        let v = interpolate_pixel(&PLANE, 3, 3, 2.2, -0.4, InterpolationMode::Nearest);
        assert_eq!(v, 6.0);
    }

    #[test]
    fn bilinear_blends_neighbours() {
        let v = interpolate_pixel(&PLANE, 3, 3, 0.5, 0.5, InterpolationMode::Bilinear);
        assert_relative_eq!(v, 2.0);
        let v = interpolate_pixel(&PLANE, 3, 3, 2.0, 2.0, InterpolationMode::Bilinear);
        assert_relative_eq!(v, 8.0);
        let v = interpolate_pixel(&PLANE, 3, 3, 1.0, 1.25, InterpolationMode::Bilinear);
        assert_relative_eq!(v, 4.25);
    }

    #[test]
    fn contains_bounds() {
        let nn = InterpolationMode::Nearest;
        assert!(nn.contains(-0.5, 0.0, 3, 3));
        assert!(!nn.contains(2.5, 0.0, 3, 3));
        let bl = InterpolationMode::Bilinear;
        assert!(bl.contains(2.0, 2.0, 3, 3));
        assert!(!bl.contains(-0.1, 0.0, 3, 3));
    }
}
