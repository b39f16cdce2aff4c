use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Draw from `U(low, high)` as `low + (high - low) * u` with `u ~ U[0, 1)`.
///
/// Unlike `Rng::random_range` this accepts `low == high` and always consumes
/// exactly one draw.
#[inline]
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + (high - low) * rng.random::<f64>()
}

/// Draw from `N(0, std)`.
#[inline]
pub(crate) fn normal<R: Rng + ?Sized>(rng: &mut R, std: f64) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    z * std
}
