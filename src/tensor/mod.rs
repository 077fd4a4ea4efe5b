// src/tensor/mod.rs
// Concrete values flowing through a session run.
// Every value is an f32 ndarray tagged with the dtype the graph declared for it,
// booleans are stored as 0.0 / 1.0 so the same kernels work on both.

pub mod shape;
mod tests;

pub use shape::{DType, Shape, TensorSpec};

use crate::error::{GraphError, Result};
use ndarray::{ArrayD, IxDyn};

#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: ArrayD<f32>,
    dtype: DType,
}

impl Tensor {
    pub fn new(data: ArrayD<f32>) -> Self {
        Self {
            data,
            dtype: DType::Float32,
        }
    }

    pub fn with_dtype(data: ArrayD<f32>, dtype: DType) -> Self {
        Self { data, dtype }
    }

    pub fn from_vec(data: Vec<f32>, shape: &[usize]) -> Result<Self> {
        let total: usize = shape.iter().product();
        if data.len() != total {
            return Err(GraphError::InvalidShape(format!(
                "{} elements cannot be viewed as {:?}",
                data.len(),
                shape
            )));
        }
        let array = ArrayD::from_shape_vec(IxDyn(shape), data)
            .map_err(|e| GraphError::InvalidShape(e.to_string()))?;
        Ok(Self::new(array))
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::new(ArrayD::zeros(IxDyn(shape)))
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::new(ArrayD::ones(IxDyn(shape)))
    }

    pub fn scalar(value: f32) -> Self {
        Self::new(ArrayD::from_elem(IxDyn(&[]), value))
    }

    pub fn scalar_bool(value: bool) -> Self {
        Self::with_dtype(
            ArrayD::from_elem(IxDyn(&[]), if value { 1.0 } else { 0.0 }),
            DType::Bool,
        )
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    // Single element tensors of any rank can be read back as a scalar.
    pub fn to_scalar(&self) -> Result<f32> {
        if self.data.len() != 1 {
            return Err(GraphError::InvalidShape(format!(
                "expected a single element, got shape {:?}",
                self.shape()
            )));
        }
        Ok(self.data.iter().next().copied().unwrap_or_default())
    }

    pub fn to_bool(&self) -> Result<bool> {
        if self.dtype != DType::Bool {
            return Err(GraphError::DTypeMismatch {
                op: "to_bool".to_string(),
                expected: DType::Bool,
                actual: self.dtype,
            });
        }
        Ok(self.to_scalar()? != 0.0)
    }

    pub fn spec(&self) -> TensorSpec {
        TensorSpec::new(self.dtype, Shape::known(self.shape()))
    }
}

impl From<ArrayD<f32>> for Tensor {
    fn from(data: ArrayD<f32>) -> Self {
        Self::new(data)
    }
}
