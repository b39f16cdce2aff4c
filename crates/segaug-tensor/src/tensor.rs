use thiserror::Error;

/// An error type for tensor operations.
#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    /// Tensor shape does not match the provided data.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// Index exceeds tensor bounds.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: usize,
        /// The size of the dimension being indexed
        size: usize,
    },

    /// Tensor dimensions incompatible for the requested operation.
    #[error("Dimension mismatch: {message}. Expected shape: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },
}

impl TensorError {
    /// Creates an InvalidShape error with clear context.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Creates an IndexOutOfBounds error with clear context.
    pub fn index_out_of_bounds(index: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }

    /// Creates a DimensionMismatch error with formatted shapes.
    pub fn dimension_mismatch(
        message: impl Into<String>,
        expected: &[usize],
        actual: &[usize],
    ) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

/// Compute the row-major strides of a tensor from its shape.
///
/// # Examples
///
/// ```rust
/// use segaug_tensor::get_strides_from_shape;
///
/// let strides = get_strides_from_shape([2, 3, 4]);
/// assert_eq!(strides, [12, 4, 1]);
/// ```
pub fn get_strides_from_shape<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides: [usize; N] = [0; N];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// A multi-dimensional array with owned, contiguous, row-major data.
///
/// # Type Parameters
///
/// * `T` - The element type stored in the tensor
/// * `N` - The number of dimensions
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor<T, const N: usize> {
    /// The storage of the tensor.
    pub storage: Vec<T>,
    /// The shape of the tensor.
    pub shape: [usize; N],
    /// The strides of the tensor data in memory.
    pub strides: [usize; N],
}

impl<T, const N: usize> Tensor<T, N> {
    /// Get the data of the tensor as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.storage
    }

    /// Get the data of the tensor as a mutable slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.storage
    }

    /// Consume the tensor and return its data.
    pub fn into_vec(self) -> Vec<T> {
        self.storage
    }

    /// Creates a new `Tensor` with the given shape and data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape of the tensor, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use segaug_tensor::Tensor2;
    ///
    /// let t = Tensor2::from_shape_vec([2, 2], vec![1u8, 2, 3, 4]).unwrap();
    /// assert_eq!(t.shape, [2, 2]);
    /// ```
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>) -> Result<Self, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(TensorError::invalid_shape(numel, data.len()));
        }
        let strides = get_strides_from_shape(shape);
        Ok(Self {
            storage: data,
            shape,
            strides,
        })
    }

    /// Creates a new `Tensor` with the given shape filled with `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use segaug_tensor::Tensor3;
    ///
    /// let t = Tensor3::from_shape_val([2, 1, 3], 2u8);
    /// assert_eq!(t.as_slice(), vec![2, 2, 2, 2, 2, 2]);
    /// ```
    pub fn from_shape_val(shape: [usize; N], value: T) -> Self
    where
        T: Clone,
    {
        let numel = shape.iter().product::<usize>();
        Self {
            storage: vec![value; numel],
            shape,
            strides: get_strides_from_shape(shape),
        }
    }

    /// Create a new `Tensor` with the given shape and a function to generate the data.
    ///
    /// The function `f` is called with the index of the element to generate.
    ///
    /// # Example
    ///
    /// ```
    /// use segaug_tensor::Tensor2;
    ///
    /// let t = Tensor2::from_shape_fn([2, 2], |[i, j]| (i * 2 + j) as u8);
    /// assert_eq!(t.as_slice(), vec![0, 1, 2, 3]);
    /// ```
    pub fn from_shape_fn<F>(shape: [usize; N], f: F) -> Self
    where
        F: Fn([usize; N]) -> T,
    {
        let numel = shape.iter().product::<usize>();
        let storage: Vec<T> = (0..numel)
            .map(|i| {
                let mut index = [0; N];
                let mut j = i;
                for k in (0..N).rev() {
                    index[k] = j % shape[k];
                    j /= shape[k];
                }
                f(index)
            })
            .collect();
        Self {
            storage,
            shape,
            strides: get_strides_from_shape(shape),
        }
    }

    /// Creates a new `Tensor` filled with the default value of `T`.
    pub fn zeros(shape: [usize; N]) -> Self
    where
        T: Clone + Default,
    {
        Self::from_shape_val(shape, T::default())
    }

    /// Returns the number of elements in the tensor.
    #[inline]
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Get the offset of the element at the given index.
    pub fn get_iter_offset(&self, index: [usize; N]) -> Option<usize> {
        let mut offset = 0;
        for ((&idx, dim_size), stride) in index.iter().zip(self.shape).zip(self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }

    /// Get the offset of the element at the given index without checking dim sizes.
    #[inline]
    pub fn get_iter_offset_unchecked(&self, index: [usize; N]) -> usize {
        let mut offset = 0;
        for (&idx, stride) in index.iter().zip(self.strides) {
            offset += idx * stride;
        }
        offset
    }

    /// Get the element at the given index without checking the dimension sizes.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset lies outside the storage.
    #[inline]
    pub fn get_unchecked(&self, index: [usize; N]) -> &T {
        &self.storage[self.get_iter_offset_unchecked(index)]
    }

    /// Get the element at the given index, or `None` if any index is out of bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use segaug_tensor::Tensor2;
    ///
    /// let t = Tensor2::from_shape_vec([2, 2], vec![1u8, 2, 3, 4]).unwrap();
    /// assert_eq!(t.get([1, 0]), Some(&3));
    /// assert!(t.get([2, 0]).is_none());
    /// ```
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        self.get_iter_offset(index).and_then(|i| self.storage.get(i))
    }

    /// Get a mutable reference to the element at the given index.
    pub fn get_mut(&mut self, index: [usize; N]) -> Option<&mut T> {
        let offset = self.get_iter_offset(index)?;
        self.storage.get_mut(offset)
    }

    /// Reshape the tensor to a new shape, consuming it.
    ///
    /// # Errors
    ///
    /// If the number of elements in the new shape differs, an error is returned.
    pub fn reshape<const M: usize>(self, shape: [usize; M]) -> Result<Tensor<T, M>, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != self.numel() {
            return Err(TensorError::dimension_mismatch(
                "Reshape operation requires same number of elements",
                &shape,
                &self.shape,
            ));
        }
        Ok(Tensor {
            storage: self.storage,
            shape,
            strides: get_strides_from_shape(shape),
        })
    }

    /// Apply a function to each element, producing a new tensor of the same shape.
    pub fn map<U, F>(&self, f: F) -> Tensor<U, N>
    where
        F: Fn(&T) -> U,
    {
        Tensor {
            storage: self.storage.iter().map(f).collect(),
            shape: self.shape,
            strides: self.strides,
        }
    }
}
