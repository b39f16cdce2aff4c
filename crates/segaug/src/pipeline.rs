use rand::Rng;
use segaug_image::{ImageBatch, ImageError, LabelBatch};

use crate::config::AugmentConfig;
use crate::error::AugmentError;
use crate::params::TransformParams;

/// The output of one augmentation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Augmented {
    /// The augmented image batch.
    pub image: ImageBatch<f32>,
    /// The augmented mask batch, when a mask was given.
    pub mask: Option<LabelBatch>,
}

/// Check that a mask batch is co-indexed with an image batch.
pub(crate) fn check_mask(image: &ImageBatch<f32>, mask: &LabelBatch) -> Result<(), AugmentError> {
    if mask.num_channels() != 1 {
        return Err(ImageError::InvalidMaskChannels(mask.num_channels()).into());
    }
    if mask.batch_size() != image.batch_size() {
        return Err(ImageError::BatchSizeMismatch(image.batch_size(), mask.batch_size()).into());
    }
    if mask.size() != image.size() {
        return Err(AugmentError::MaskShapeMismatch {
            image: image.shape,
            mask: mask.shape,
        });
    }
    Ok(())
}

/// Randomly augment an image batch and its optional label masks.
///
/// The stages run in a fixed order, each one gated by the configuration:
///
/// 1. affine transform (rotation, shift, shear, zoom) about the image centre
/// 2. channel intensity jitter on the image
/// 3. horizontal flip with probability 0.5
/// 4. vertical flip with probability 0.5
/// 5. smooth spline warp with nearest-neighbour sampling
/// 6. crop
///
/// Images and masks go through identical geometric transforms; masks are filled
/// with `cval_mask` and only ever take values already present in the input or
/// the fill value.
///
/// # Arguments
///
/// * `image` - The image batch with shape (N, C, H, W).
/// * `mask` - Optional label masks with shape (N, 1, H, W).
/// * `config` - The augmentation configuration.
/// * `rng` - The random source.
///
/// # Errors
///
/// The configuration and the mask shape are checked before any random draw.
///
/// # Example
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use segaug::{random_transform, AugmentConfig};
/// use segaug_image::{ImageBatch, LabelBatch};
///
/// let image = ImageBatch::new([1, 1, 4, 4], (0..16).map(|x| x as f32).collect()).unwrap();
/// let mask = LabelBatch::from_masks([1, 4, 4], vec![1; 16]).unwrap();
///
/// let config = AugmentConfig {
///     horizontal_flip: true,
///     crop_size: Some((2, 3)),
///     ..Default::default()
/// };
/// let mut rng = StdRng::seed_from_u64(42);
/// let out = random_transform(&image, Some(&mask), &config, &mut rng).unwrap();
///
/// assert_eq!(out.image.shape, [1, 1, 2, 3]);
/// assert_eq!(out.mask.unwrap().shape, [1, 1, 2, 3]);
/// ```
pub fn random_transform<R: Rng + ?Sized>(
    image: &ImageBatch<f32>,
    mask: Option<&LabelBatch>,
    config: &AugmentConfig,
    rng: &mut R,
) -> Result<Augmented, AugmentError> {
    config.validate()?;
    if let Some(mask) = mask {
        check_mask(image, mask)?;
    }

    let params = TransformParams::sample(rng, config, image.shape)?;
    log::debug!(
        "affine {:?}, channel shifts {:?}, hflip {}, vflip {}, warp {}, crop {:?}",
        params.affine,
        params.channel_shifts,
        params.horizontal_flip,
        params.vertical_flip,
        params.warp_field.is_some(),
        params.crop,
    );

    let image = params.apply_image(image)?;
    let mask = mask.map(|m| params.apply_mask(m)).transpose()?;

    Ok(Augmented { image, mask })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn mask_must_match_image() -> Result<(), AugmentError> {
        let image = ImageBatch::new([2, 3, 4, 4], vec![0.0f32; 96])?;
        let mut rng = StdRng::seed_from_u64(0);
        let config = AugmentConfig::default();

        let mask = LabelBatch::from_masks([1, 4, 4], vec![0; 16])?;
        assert!(matches!(
            random_transform(&image, Some(&mask), &config, &mut rng),
            Err(AugmentError::Image(ImageError::BatchSizeMismatch(2, 1)))
        ));

        let mask = LabelBatch::from_masks([2, 4, 3], vec![0; 24])?;
        assert!(matches!(
            random_transform(&image, Some(&mask), &config, &mut rng),
            Err(AugmentError::MaskShapeMismatch { .. })
        ));

        let mask = ImageBatch::new([2, 2, 4, 4], vec![0i32; 64])?;
        assert!(matches!(
            random_transform(&image, Some(&mask), &config, &mut rng),
            Err(AugmentError::Image(ImageError::InvalidMaskChannels(2)))
        ));
        Ok(())
    }

    #[test]
    fn image_only() -> Result<(), AugmentError> {
        let image = ImageBatch::new([1, 2, 5, 5], (0..50).map(|x| x as f32).collect())?;
        let config = AugmentConfig {
            rotation_range: 30.0,
            ..Default::default()
        };
        let out = random_transform(&image, None, &config, &mut StdRng::seed_from_u64(4))?;
        assert_eq!(out.image.shape, image.shape);
        assert!(out.mask.is_none());
        Ok(())
    }
}
