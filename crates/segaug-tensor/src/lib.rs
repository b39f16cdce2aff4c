#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `segaug-tensor` provides the owned, row-major, N-dimensional array that every
//! image and mask batch in the workspace is stored in. Data always lives in a
//! single contiguous buffer in standard (C) layout.
//!
//! ```rust
//! use segaug_tensor::Tensor2;
//!
//! let t = Tensor2::from_shape_vec([2, 3], vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
//! assert_eq!(t.get([1, 2]), Some(&6.0));
//! assert_eq!(t.strides, [3, 1]);
//! ```

/// Tensor module containing the main tensor implementation and error types.
pub mod tensor;

pub use crate::tensor::{get_strides_from_shape, Tensor, TensorError};

/// Type alias for a 1-dimensional tensor.
pub type Tensor1<T> = Tensor<T, 1>;

/// Type alias for a 2-dimensional tensor.
pub type Tensor2<T> = Tensor<T, 2>;

/// Type alias for a 3-dimensional tensor.
pub type Tensor3<T> = Tensor<T, 3>;

/// Type alias for a 4-dimensional tensor.
pub type Tensor4<T> = Tensor<T, 4>;
