use rand::Rng;
use segaug_image::ImageBatch;

use crate::error::ImgprocError;
use crate::sampling::uniform;

/// Add a constant offset to every channel of every sample.
///
/// `shifts[n * C + c]` is added to channel `c` of sample `n`. Each shifted plane
/// is clipped to the `[min, max]` range the plane had before the shift.
///
/// # Arguments
///
/// * `src` - The input batch with shape (N, C, H, W).
/// * `shifts` - One offset per (sample, channel) plane.
///
/// # Returns
///
/// The shifted batch.
///
/// # Example
///
/// ```
/// use segaug_image::ImageBatch;
/// use segaug_imgproc::intensity::channel_shift;
///
/// let src = ImageBatch::new([1, 2, 1, 2], vec![0.0f32, 1.0, 0.5, 0.75]).unwrap();
/// let dst = channel_shift(&src, &[0.5, -0.5]).unwrap();
///
/// assert_eq!(dst.as_slice(), &[0.5, 1.0, 0.5, 0.5]);
/// ```
pub fn channel_shift(
    src: &ImageBatch<f32>,
    shifts: &[f32],
) -> Result<ImageBatch<f32>, ImgprocError> {
    if shifts.len() != src.num_planes() {
        return Err(ImgprocError::ShiftCountMismatch {
            expected: src.num_planes(),
            actual: shifts.len(),
        });
    }

    let mut dst = src.clone();
    for (plane, &shift) in dst.planes_mut().zip(shifts) {
        let (min, max) = plane
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        plane
            .iter_mut()
            .for_each(|x| *x = (*x + shift).clamp(min, max));
    }

    Ok(dst)
}

/// Draw one offset from `U(-intensity, intensity)` for each of `num_planes`
/// planes, in sample-major order.
///
/// # Errors
///
/// Returns an error if `intensity` is negative or not finite.
pub fn sample_channel_shifts<R: Rng + ?Sized>(
    rng: &mut R,
    num_planes: usize,
    intensity: f64,
) -> Result<Vec<f32>, ImgprocError> {
    if !intensity.is_finite() || intensity < 0.0 {
        return Err(ImgprocError::InvalidRange {
            name: "channel_shift_range",
            value: intensity,
        });
    }

    Ok((0..num_planes)
        .map(|_| uniform(rng, -intensity, intensity) as f32)
        .collect())
}

/// Shift every channel by an offset drawn from `U(-intensity, intensity)`.
///
/// One offset is drawn per (sample, channel) plane, in sample-major order.
pub fn random_channel_shift<R: Rng + ?Sized>(
    src: &ImageBatch<f32>,
    intensity: f64,
    rng: &mut R,
) -> Result<ImageBatch<f32>, ImgprocError> {
    let shifts = sample_channel_shifts(rng, src.num_planes(), intensity)?;
    channel_shift(src, &shifts)
}
