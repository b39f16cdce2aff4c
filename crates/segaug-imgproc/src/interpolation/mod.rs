//! Pixel interpolation kernels used when resampling planes at fractional
//! coordinates.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: copies the closest source pixel; never creates new values, so it
//!   is the only mode used for label masks
//! - **Bilinear**: smooth linear interpolation between the four neighbours

mod bilinear;
mod interpolate;
mod nearest;

pub use interpolate::{interpolate_pixel, InterpolationMode};
pub(crate) use nearest::nearest_index;
