#![deny(missing_docs)]
//! Randomized joint augmentation of image batches and their label masks for
//! segmentation training.
//!
//! [`random_transform`] samples a [`TransformParams`] from an [`AugmentConfig`] and
//! applies the same geometry to the images and the masks. The building blocks live
//! in the re-exported [`imgproc`] crate.

/// configuration of the augmentation pipeline.
pub mod config;

/// error types for the augmentation pipeline.
pub mod error;

/// per-sample parallel augmentation helpers.
pub mod parallel;

/// the random transform parameters shared by images and masks.
pub mod params;

/// the augmentation pipeline.
pub mod pipeline;

pub use crate::config::{AugmentConfig, FillMode, ZoomRange};
pub use crate::error::AugmentError;
pub use crate::parallel::augment_samples_par;
pub use crate::params::TransformParams;
pub use crate::pipeline::{random_transform, Augmented};

#[doc(inline)]
pub use segaug_tensor as tensor;

#[doc(inline)]
pub use segaug_image as image;

#[doc(inline)]
pub use segaug_imgproc as imgproc;
