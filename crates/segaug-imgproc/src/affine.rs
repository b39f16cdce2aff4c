//! Homogeneous 2D affine matrices and their random composition.
//!
//! All matrices act on `(row, col, 1)` index coordinates, i.e. the first
//! coordinate runs along the image height. A matrix produced by
//! [`AffineParams::to_matrix`] maps an *output* pixel index to the *source*
//! index it is sampled from, which is the convention used by
//! [`crate::warp::apply_transform`].

use std::ops::Mul;

use rand::Rng;
use segaug_image::ImageSize;

use crate::error::ImgprocError;
use crate::sampling::uniform;

/// A 3x3 homogeneous affine matrix whose bottom row is always `[0, 0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineMatrix([[f64; 3]; 3]);

impl AffineMatrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// The identity transform.
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Build a matrix from its 2x3 upper part.
    pub fn from_rows(r0: [f64; 3], r1: [f64; 3]) -> Self {
        Self([r0, r1, [0.0, 0.0, 1.0]])
    }

    /// Rotation by `theta` radians.
    pub fn rotation(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::from_rows([cos, -sin, 0.0], [sin, cos, 0.0])
    }

    /// Translation by `tx` rows and `ty` columns.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::from_rows([1.0, 0.0, tx], [0.0, 1.0, ty])
    }

    /// Shear along the first axis by `shear` radians.
    pub fn shear(shear: f64) -> Self {
        let (sin, cos) = shear.sin_cos();
        Self::from_rows([1.0, -sin, 0.0], [0.0, cos, 0.0])
    }

    /// Axis-aligned scaling by `zx` along rows and `zy` along columns.
    pub fn zoom(zx: f64, zy: f64) -> Self {
        Self::from_rows([zx, 0.0, 0.0], [0.0, zy, 0.0])
    }

    /// Re-anchor the transform so its fixed point is the image centre.
    ///
    /// Computes `C · M · C⁻¹` where `C` translates by `(height / 2 + 0.5, width / 2 + 0.5)`.
    pub fn offset_center(&self, height: usize, width: usize) -> Self {
        let o_x = height as f64 / 2.0 + 0.5;
        let o_y = width as f64 / 2.0 + 0.5;
        Self::translation(o_x, o_y) * *self * Self::translation(-o_x, -o_y)
    }

    /// The 2x2 linear part of the transform.
    pub fn linear(&self) -> [[f64; 2]; 2] {
        let m = &self.0;
        [[m[0][0], m[0][1]], [m[1][0], m[1][1]]]
    }

    /// The translation column of the transform.
    pub fn offset(&self) -> [f64; 2] {
        [self.0[0][2], self.0[1][2]]
    }

    /// The full 3x3 matrix.
    pub fn as_array(&self) -> &[[f64; 3]; 3] {
        &self.0
    }

    /// Map a `(row, col)` coordinate through the transform.
    #[inline]
    pub fn transform_point(&self, row: f64, col: f64) -> (f64, f64) {
        let m = &self.0;
        (
            m[0][0] * row + m[0][1] * col + m[0][2],
            m[1][0] * row + m[1][1] * col + m[1][2],
        )
    }

    /// Whether the matrix is exactly the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for AffineMatrix {
    type Output = AffineMatrix;

    fn mul(self, rhs: AffineMatrix) -> AffineMatrix {
        let (a, b) = (&self.0, &rhs.0);
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        AffineMatrix(out)
    }
}

/// The scalars of one random affine draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineParams {
    /// Rotation in radians.
    pub theta: f64,
    /// Translation along rows in pixels.
    pub tx: f64,
    /// Translation along columns in pixels.
    pub ty: f64,
    /// Shear in radians.
    pub shear: f64,
    /// Zoom along rows.
    pub zx: f64,
    /// Zoom along columns.
    pub zy: f64,
}

impl Default for AffineParams {
    fn default() -> Self {
        Self {
            theta: 0.0,
            tx: 0.0,
            ty: 0.0,
            shear: 0.0,
            zx: 1.0,
            zy: 1.0,
        }
    }
}

impl AffineParams {
    /// Compose `R · T · Sh · Z` and anchor it at the centre of an image of `size`.
    ///
    /// # Example
    ///
    /// ```
    /// use segaug_image::ImageSize;
    /// use segaug_imgproc::affine::AffineParams;
    ///
    /// let m = AffineParams::default().to_matrix(ImageSize { width: 8, height: 6 });
    /// assert!(m.is_identity());
    /// ```
    pub fn to_matrix(&self, size: ImageSize) -> AffineMatrix {
        let m = AffineMatrix::rotation(self.theta)
            * AffineMatrix::translation(self.tx, self.ty)
            * AffineMatrix::shear(self.shear)
            * AffineMatrix::zoom(self.zx, self.zy);
        m.offset_center(size.height, size.width)
    }
}

/// Ranges the random affine parameters are drawn from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineRanges {
    /// Rotation range in degrees; `theta ~ U(-r, r)`.
    pub rotation_range: f64,
    /// Row shift as a fraction of the image height.
    pub height_shift_range: f64,
    /// Column shift as a fraction of the image width.
    pub width_shift_range: f64,
    /// Shear range in radians.
    pub shear_range: f64,
    /// Zoom bounds `[min, max]`.
    pub zoom_bounds: [f64; 2],
}

impl Default for AffineRanges {
    fn default() -> Self {
        Self {
            rotation_range: 0.0,
            height_shift_range: 0.0,
            width_shift_range: 0.0,
            shear_range: 0.0,
            zoom_bounds: [1.0, 1.0],
        }
    }
}

fn check_range(name: &'static str, value: f64) -> Result<(), ImgprocError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ImgprocError::InvalidRange { name, value })
    }
}

impl AffineRanges {
    /// Check that every range is finite and non-negative and the zoom bounds are
    /// positive and ordered.
    pub fn validate(&self) -> Result<(), ImgprocError> {
        check_range("rotation_range", self.rotation_range)?;
        check_range("height_shift_range", self.height_shift_range)?;
        check_range("width_shift_range", self.width_shift_range)?;
        check_range("shear_range", self.shear_range)?;

        let [lo, hi] = self.zoom_bounds;
        if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || lo > hi {
            return Err(ImgprocError::InvalidZoomBounds(lo, hi));
        }
        Ok(())
    }

    /// Draw one set of affine parameters for an image of `size`.
    ///
    /// A zero range contributes an exact identity component without consuming
    /// randomness, and zoom bounds of exactly `[1, 1]` skip the zoom draw.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        size: ImageSize,
    ) -> Result<AffineParams, ImgprocError> {
        self.validate()?;

        let mut params = AffineParams::default();

        if self.rotation_range != 0.0 {
            params.theta = uniform(rng, -self.rotation_range, self.rotation_range).to_radians();
        }
        if self.height_shift_range != 0.0 {
            params.tx = uniform(rng, -self.height_shift_range, self.height_shift_range)
                * size.height as f64;
        }
        if self.width_shift_range != 0.0 {
            params.ty = uniform(rng, -self.width_shift_range, self.width_shift_range)
                * size.width as f64;
        }
        if self.shear_range != 0.0 {
            params.shear = uniform(rng, -self.shear_range, self.shear_range);
        }

        let [lo, hi] = self.zoom_bounds;
        if !(lo == 1.0 && hi == 1.0) {
            params.zx = uniform(rng, lo, hi);
            params.zy = uniform(rng, lo, hi);
        }

        Ok(params)
    }
}
