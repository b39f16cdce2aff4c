use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use segaug_image::{ImageBatch, LabelBatch};

use crate::config::AugmentConfig;
use crate::error::AugmentError;
use crate::pipeline::{check_mask, random_transform, Augmented};

/// Seed of the generator used for one sample.
///
/// Mixes the sample index into the base seed so that neighbouring base seeds do
/// not share per-sample streams.
pub fn sample_seed(base_seed: u64, index: usize) -> u64 {
    base_seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Augment every sample of a batch independently and in parallel.
///
/// Each sample draws its own parameters from a [`StdRng`] seeded with
/// [`sample_seed`], so the result does not depend on thread scheduling.
/// Crops must produce the same size for every sample, which holds for any fixed
/// configuration.
///
/// # Arguments
///
/// * `image` - The image batch with shape (N, C, H, W).
/// * `mask` - Optional label masks with shape (N, 1, H, W).
/// * `config` - The augmentation configuration.
/// * `base_seed` - The seed all per-sample seeds are derived from.
pub fn augment_samples_par(
    image: &ImageBatch<f32>,
    mask: Option<&LabelBatch>,
    config: &AugmentConfig,
    base_seed: u64,
) -> Result<Augmented, AugmentError> {
    config.validate()?;
    if let Some(mask) = mask {
        check_mask(image, mask)?;
    }

    let results = (0..image.batch_size())
        .into_par_iter()
        .map(|index| -> Result<Augmented, AugmentError> {
            let mut rng = StdRng::seed_from_u64(sample_seed(base_seed, index));
            let sample = image.sample(index)?;
            let sample_mask = mask.map(|m| m.sample(index)).transpose()?;
            random_transform(&sample, sample_mask.as_ref(), config, &mut rng)
        })
        .collect::<Result<Vec<_>, AugmentError>>()?;

    let (images, masks): (Vec<_>, Vec<_>) = results
        .into_iter()
        .map(|r| (r.image, r.mask))
        .unzip();
    let masks = masks.into_iter().collect::<Option<Vec<_>>>();

    Ok(Augmented {
        image: ImageBatch::concat(&images)?,
        mask: masks.map(|m| LabelBatch::concat(&m)).transpose()?,
    })
}
