#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// random affine matrix builder module.
pub mod affine;

/// image cropping module.
pub mod crop;

/// random displacement field generators.
pub mod displacement;

/// grid elastic deformation module.
pub mod elastic;

/// error types for the image processing operations.
pub mod error;

/// image flipping module.
pub mod flip;

/// channel intensity jitter module.
pub mod intensity;

/// utilities for interpolation.
pub mod interpolation;

/// edge-aware padding module.
pub mod padding;

mod sampling;

/// image geometric transformations module.
pub mod warp;

pub use error::ImgprocError;
