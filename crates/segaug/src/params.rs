use rand::Rng;
use segaug_image::{ImageBatch, ImageDtype, ImageError, ImageSize, LabelBatch};
use segaug_imgproc::{
    affine::{AffineMatrix, AffineParams},
    crop::{crop_batch, CropWindow},
    displacement::{gen_warp_field, DisplacementField},
    flip::{horizontal_flip, vertical_flip},
    intensity::{channel_shift, sample_channel_shifts},
    interpolation::InterpolationMode,
    padding::PaddingMode,
    warp::{apply_transform, apply_warp},
};

use crate::config::AugmentConfig;
use crate::error::AugmentError;

/// Every random draw of one augmentation call.
///
/// The parameters are sampled once for a batch shape and can then be applied to
/// the image batch and to the co-indexed mask batch independently, which keeps
/// both spatially aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformParams {
    /// The drawn affine scalars.
    pub affine: AffineParams,
    /// The centred output-to-source matrix built from `affine`.
    pub matrix: AffineMatrix,
    /// One intensity offset per (sample, channel) of the image batch.
    pub channel_shifts: Option<Vec<f32>>,
    /// Reverse the columns.
    pub horizontal_flip: bool,
    /// Reverse the rows.
    pub vertical_flip: bool,
    /// Dense displacement field of the spline warp.
    pub warp_field: Option<DisplacementField>,
    /// Final crop window.
    pub crop: Option<CropWindow>,
    /// Border handling of the geometric stages.
    pub padding: PaddingMode,
    /// Fill value for images.
    pub cval: f32,
    /// Fill value for masks.
    pub cval_mask: i32,
}

/// Offset and extent of a crop along one axis.
fn crop_extent<R: Rng + ?Sized>(
    rng: &mut R,
    crop: usize,
    len: usize,
    axis: &str,
) -> (usize, usize) {
    if crop < len {
        (rng.random_range(0..=len - crop), crop)
    } else {
        log::warn!("Crop {axis} {crop} >= image {axis} {len}, keeping the full {axis}");
        (0, len)
    }
}

impl TransformParams {
    /// Draw the parameters for a batch of the given `[N, C, H, W]` shape.
    ///
    /// Draws happen in pipeline order: affine, channel shifts, horizontal flip
    /// coin, vertical flip coin, warp field, crop offsets. Disabled stages do not
    /// consume randomness.
    ///
    /// # Errors
    ///
    /// The configuration is validated before any draw.
    pub fn sample<R: Rng + ?Sized>(
        rng: &mut R,
        config: &AugmentConfig,
        shape: [usize; 4],
    ) -> Result<Self, AugmentError> {
        config.validate()?;
        if shape.contains(&0) {
            return Err(ImageError::EmptyImage(shape).into());
        }

        let [batch_size, channels, height, width] = shape;
        let size = ImageSize { width, height };

        let affine = config.affine_ranges()?.sample(rng, size)?;
        let matrix = affine.to_matrix(size);

        let channel_shifts = if config.channel_shift_range != 0.0 {
            Some(sample_channel_shifts(
                rng,
                batch_size * channels,
                config.channel_shift_range,
            )?)
        } else {
            None
        };

        let horizontal_flip = config.horizontal_flip && rng.random::<f64>() < 0.5;
        let vertical_flip = config.vertical_flip && rng.random::<f64>() < 0.5;

        let warp_field = if config.spline_warp {
            Some(gen_warp_field(
                rng,
                size,
                config.warp_sigma,
                config.warp_grid_size,
            )?)
        } else {
            None
        };

        let crop = config.crop_size.map(|(crop_height, crop_width)| {
            let (top, height) = crop_extent(rng, crop_height, height, "height");
            let (left, width) = crop_extent(rng, crop_width, width, "width");
            CropWindow {
                top,
                left,
                height,
                width,
            }
        });

        Ok(Self {
            affine,
            matrix,
            channel_shifts,
            horizontal_flip,
            vertical_flip,
            warp_field,
            crop,
            padding: config.fill_mode.into(),
            cval: config.cval,
            cval_mask: i32::from_f32(config.cval_mask),
        })
    }

    /// Flips, warp and crop, shared by images and masks.
    fn apply_spatial<T: ImageDtype>(
        &self,
        mut dst: ImageBatch<T>,
        cval: T,
    ) -> Result<ImageBatch<T>, AugmentError> {
        if self.horizontal_flip {
            dst = horizontal_flip(&dst);
        }
        if self.vertical_flip {
            dst = vertical_flip(&dst);
        }
        if let Some(field) = &self.warp_field {
            dst = apply_warp(&dst, field, self.padding, InterpolationMode::Nearest, cval)?;
        }
        if let Some(window) = self.crop {
            dst = crop_batch(&dst, window)?;
        }
        Ok(dst)
    }

    /// Apply the parameters to an image batch.
    pub fn apply_image(&self, image: &ImageBatch<f32>) -> Result<ImageBatch<f32>, AugmentError> {
        let mut dst = apply_transform(image, &self.matrix, self.padding, self.cval)?;
        if let Some(shifts) = &self.channel_shifts {
            dst = channel_shift(&dst, shifts)?;
        }
        self.apply_spatial(dst, self.cval)
    }

    /// Apply the parameters to a mask batch. Channel shifts are never applied.
    pub fn apply_mask(&self, mask: &LabelBatch) -> Result<LabelBatch, AugmentError> {
        let dst = apply_transform(mask, &self.matrix, self.padding, self.cval_mask)?;
        self.apply_spatial(dst, self.cval_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn default_config_draws_nothing() -> Result<(), AugmentError> {
        let mut rng = StdRng::seed_from_u64(0);
        let params = TransformParams::sample(&mut rng, &AugmentConfig::default(), [2, 3, 4, 4])?;
        assert!(params.matrix.is_identity());
        assert_eq!(params.channel_shifts, None);
        assert!(!params.horizontal_flip && !params.vertical_flip);
        assert!(params.warp_field.is_none());
        assert!(params.crop.is_none());

        // the generator was never advanced
        let mut fresh = StdRng::seed_from_u64(0);
        assert_eq!(rng.random::<u64>(), fresh.random::<u64>());
        Ok(())
    }

    #[test]
    fn channel_shifts_use_the_shared_sampler() -> Result<(), AugmentError> {
        let config = AugmentConfig {
            channel_shift_range: 0.3,
            ..Default::default()
        };
        let params = TransformParams::sample(&mut StdRng::seed_from_u64(11), &config, [2, 3, 4, 4])?;
        let expected = sample_channel_shifts(&mut StdRng::seed_from_u64(11), 6, 0.3)?;
        assert_eq!(params.channel_shifts, Some(expected));
        Ok(())
    }

    #[test]
    fn same_seed_same_params() -> Result<(), AugmentError> {
        let config = AugmentConfig {
            rotation_range: 20.0,
            zoom_range: crate::ZoomRange::Spread(0.1),
            channel_shift_range: 0.2,
            horizontal_flip: true,
            spline_warp: true,
            warp_sigma: 2.0,
            crop_size: Some((3, 5)),
            ..Default::default()
        };
        let a = TransformParams::sample(&mut StdRng::seed_from_u64(7), &config, [1, 2, 8, 8])?;
        let b = TransformParams::sample(&mut StdRng::seed_from_u64(7), &config, [1, 2, 8, 8])?;
        assert_eq!(a, b);
        assert_eq!(a.channel_shifts.as_ref().map(Vec::len), Some(2));
        assert_eq!(a.crop.map(|w| (w.height, w.width)), Some((3, 5)));
        Ok(())
    }

    #[test]
    fn oversized_crop_keeps_full_extent() -> Result<(), AugmentError> {
        let _ = env_logger::builder().is_test(true).try_init();
        let config = AugmentConfig {
            crop_size: Some((10, 2)),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let params = TransformParams::sample(&mut rng, &config, [1, 1, 4, 4])?;
        let window = params.crop.ok_or(AugmentError::InvalidCropSize(0, 0))?;
        assert_eq!((window.top, window.height), (0, 4));
        assert_eq!(window.width, 2);
        assert!(window.left <= 2);
        Ok(())
    }

    #[test]
    fn invalid_config_fails_before_drawing() {
        let config = AugmentConfig {
            zoom_range: crate::ZoomRange::Bounds(vec![1.0]),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            TransformParams::sample(&mut rng, &config, [1, 1, 4, 4]),
            Err(AugmentError::InvalidZoomRange(_))
        ));
        let mut fresh = StdRng::seed_from_u64(3);
        assert_eq!(rng.random::<u64>(), fresh.random::<u64>());
    }
}
