//! Geometric resampling of image and mask batches.
//!
//! - [`apply_transform`]: affine resampling with nearest-neighbour sampling and a
//!   configurable border mode
//! - [`apply_warp`]: dense displacement-field warping with edge-safe padding
//!
//! # Examples
//!
//! Shifting a batch by one row:
//!
//! ```
//! use segaug_image::ImageBatch;
//! use segaug_imgproc::affine::AffineMatrix;
//! use segaug_imgproc::padding::PaddingMode;
//! use segaug_imgproc::warp::apply_transform;
//!
//! let src = ImageBatch::new([1, 1, 3, 1], vec![1.0f32, 2.0, 3.0]).unwrap();
//! let m = AffineMatrix::translation(1.0, 0.0);
//! let dst = apply_transform(&src, &m, PaddingMode::Constant, 0.0).unwrap();
//! assert_eq!(dst.as_slice(), &[2.0, 3.0, 0.0]);
//! ```

mod affine;
mod remap;

pub use affine::apply_transform;
pub use remap::apply_warp;
