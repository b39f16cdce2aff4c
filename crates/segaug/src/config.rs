use std::fmt;
use std::str::FromStr;

use segaug_image::ImageBatch;
use segaug_imgproc::{affine::AffineRanges, padding::PaddingMode};
use serde::{Deserialize, Serialize};

use crate::error::AugmentError;

/// Zoom range as a symmetric spread around 1 or explicit `[min, max]` bounds.
///
/// Serialized either as a number or as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoomRange {
    /// Zoom factors drawn from `[1 - z, 1 + z]`.
    Spread(f64),
    /// Zoom factors drawn from `[list[0], list[1]]`; any other length is an error.
    Bounds(Vec<f64>),
}

impl Default for ZoomRange {
    fn default() -> Self {
        ZoomRange::Spread(0.0)
    }
}

impl ZoomRange {
    /// Normalize to `[min, max]` bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use segaug::ZoomRange;
    ///
    /// assert_eq!(ZoomRange::Spread(0.2).bounds().unwrap(), [0.8, 1.2]);
    /// assert!(ZoomRange::Bounds(vec![0.5, 1.0, 2.0]).bounds().is_err());
    /// ```
    pub fn bounds(&self) -> Result<[f64; 2], AugmentError> {
        match self {
            ZoomRange::Spread(z) => Ok([1.0 - z, 1.0 + z]),
            ZoomRange::Bounds(v) => match v.as_slice() {
                &[lo, hi] => Ok([lo, hi]),
                other => Err(AugmentError::InvalidZoomRange(format!("{other:?}"))),
            },
        }
    }
}

/// How pixels outside the image are filled by the geometric stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    /// Clamp to the closest edge pixel.
    #[default]
    Nearest,
    /// Mirror across the edge, including the edge pixel.
    Reflect,
    /// Use `cval` for images and `cval_mask` for masks.
    Constant,
    /// Use zero.
    Zero,
}

impl FillMode {
    /// Name of the fill mode as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            FillMode::Nearest => "nearest",
            FillMode::Reflect => "reflect",
            FillMode::Constant => "constant",
            FillMode::Zero => "zero",
        }
    }
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FillMode {
    type Err = AugmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" => Ok(FillMode::Nearest),
            "reflect" => Ok(FillMode::Reflect),
            "constant" => Ok(FillMode::Constant),
            "zero" => Ok(FillMode::Zero),
            other => Err(AugmentError::UnsupportedFillMode(other.to_string())),
        }
    }
}

impl From<FillMode> for PaddingMode {
    fn from(mode: FillMode) -> Self {
        match mode {
            FillMode::Nearest => PaddingMode::Nearest,
            FillMode::Reflect => PaddingMode::Reflect,
            FillMode::Constant => PaddingMode::Constant,
            FillMode::Zero => PaddingMode::Zero,
        }
    }
}

/// Configuration of [`random_transform`](crate::random_transform).
///
/// The default configuration is the identity transform. Every field may be
/// omitted from a serialized configuration.
///
/// # Example
///
/// ```
/// use segaug::{AugmentConfig, FillMode};
///
/// let config = AugmentConfig::from_json_str(
///     r#"{"rotation_range": 10.0, "zoom_range": [0.9, 1.1], "fill_mode": "reflect", "cvalMask": 255}"#,
/// ).unwrap();
///
/// assert_eq!(config.fill_mode, FillMode::Reflect);
/// assert_eq!(config.cval_mask, 255.0);
/// assert_eq!(config.warp_grid_size, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    /// Rotation range in degrees.
    pub rotation_range: f64,
    /// Column shift range as a fraction of the width.
    pub width_shift_range: f64,
    /// Row shift range as a fraction of the height.
    pub height_shift_range: f64,
    /// Shear range in radians.
    pub shear_range: f64,
    /// Zoom range.
    pub zoom_range: ZoomRange,
    /// Channel intensity jitter range.
    pub channel_shift_range: f64,
    /// Border handling of the geometric stages.
    pub fill_mode: FillMode,
    /// Fill value for images.
    pub cval: f32,
    /// Fill value for masks.
    #[serde(alias = "cvalMask")]
    pub cval_mask: f32,
    /// Flip columns with probability 0.5.
    pub horizontal_flip: bool,
    /// Flip rows with probability 0.5.
    pub vertical_flip: bool,
    /// Multiplicative rescale factor, applied by the caller with
    /// [`AugmentConfig::apply_rescale`].
    pub rescale: Option<f32>,
    /// Apply a smooth random displacement field.
    pub spline_warp: bool,
    /// Standard deviation of the warp control points in pixels.
    pub warp_sigma: f64,
    /// Number of spline cells of the warp field along each axis.
    pub warp_grid_size: usize,
    /// Output `(height, width)`.
    pub crop_size: Option<(usize, usize)>,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            rotation_range: 0.0,
            width_shift_range: 0.0,
            height_shift_range: 0.0,
            shear_range: 0.0,
            zoom_range: ZoomRange::default(),
            channel_shift_range: 0.0,
            fill_mode: FillMode::default(),
            cval: 0.0,
            cval_mask: 0.0,
            horizontal_flip: false,
            vertical_flip: false,
            rescale: None,
            spline_warp: false,
            warp_sigma: 0.1,
            warp_grid_size: 3,
            crop_size: None,
        }
    }
}

fn check_range(name: &'static str, value: f64) -> Result<(), AugmentError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AugmentError::InvalidRange { name, value })
    }
}

impl AugmentConfig {
    /// Parse a configuration from a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, AugmentError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field of the configuration.
    pub fn validate(&self) -> Result<(), AugmentError> {
        check_range("rotation_range", self.rotation_range)?;
        check_range("width_shift_range", self.width_shift_range)?;
        check_range("height_shift_range", self.height_shift_range)?;
        check_range("shear_range", self.shear_range)?;
        check_range("channel_shift_range", self.channel_shift_range)?;
        self.affine_ranges()?.validate()?;

        if !self.cval.is_finite() {
            return Err(AugmentError::InvalidRange {
                name: "cval",
                value: self.cval as f64,
            });
        }
        if !self.cval_mask.is_finite() {
            return Err(AugmentError::InvalidRange {
                name: "cval_mask",
                value: self.cval_mask as f64,
            });
        }
        if let Some(rescale) = self.rescale {
            if !rescale.is_finite() {
                return Err(AugmentError::InvalidRange {
                    name: "rescale",
                    value: rescale as f64,
                });
            }
        }

        if self.spline_warp {
            check_range("warp_sigma", self.warp_sigma)?;
            if self.warp_grid_size == 0 {
                return Err(AugmentError::InvalidRange {
                    name: "warp_grid_size",
                    value: 0.0,
                });
            }
        }

        if let Some((height, width)) = self.crop_size {
            if height == 0 || width == 0 {
                return Err(AugmentError::InvalidCropSize(height, width));
            }
        }

        Ok(())
    }

    /// The affine ranges described by this configuration.
    pub fn affine_ranges(&self) -> Result<AffineRanges, AugmentError> {
        Ok(AffineRanges {
            rotation_range: self.rotation_range,
            height_shift_range: self.height_shift_range,
            width_shift_range: self.width_shift_range,
            shear_range: self.shear_range,
            zoom_bounds: self.zoom_range.bounds()?,
        })
    }

    /// Multiply every pixel by the `rescale` factor, if any.
    pub fn apply_rescale(&self, image: &ImageBatch<f32>) -> ImageBatch<f32> {
        match self.rescale {
            Some(factor) => ImageBatch(image.map(|&x| x * factor)),
            None => image.clone(),
        }
    }
}
