#![deny(missing_docs)]
//! Image and label-mask batch types for segmentation data augmentation

/// batch representation for images and label masks.
pub mod batch;

/// Error types for the image module.
pub mod error;

pub use crate::batch::{ImageBatch, ImageDtype, ImageSize, LabelBatch};
pub use crate::error::ImageError;
