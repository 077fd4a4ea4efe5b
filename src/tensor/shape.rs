// src/tensor/shape.rs
// Static shape information attached to every graph node.
// A `None` dimension is unknown at construction time (the batch dimension of a placeholder).

use crate::error::{GraphError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Float32,
    Bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape(Vec<Option<usize>>);

impl Shape {
    pub fn new(dims: Vec<Option<usize>>) -> Self {
        Self(dims)
    }

    pub fn scalar() -> Self {
        Self(Vec::new())
    }

    pub fn known(dims: &[usize]) -> Self {
        Self(dims.iter().map(|&d| Some(d)).collect())
    }

    /// `[?, cols]`, the shape of a batched feature matrix.
    pub fn batched(cols: usize) -> Self {
        Self(vec![None, Some(cols)])
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn dims(&self) -> &[Option<usize>] {
        &self.0
    }

    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.0.get(axis).copied().flatten()
    }

    pub fn is_scalar(&self) -> bool {
        self.0.is_empty()
    }

    // A concrete shape matches when ranks agree and every known dimension is equal.
    pub fn is_compatible_with(&self, concrete: &[usize]) -> bool {
        self.0.len() == concrete.len()
            && self
                .0
                .iter()
                .zip(concrete)
                .all(|(dim, &actual)| dim.is_none_or(|d| d == actual))
    }

    /// Numpy-style broadcast of two static shapes.
    pub fn broadcast(&self, other: &Shape, op: &str) -> Result<Shape> {
        let rank = self.rank().max(other.rank());
        let mut dims = Vec::with_capacity(rank);
        for i in 0..rank {
            let a = self.aligned(i, rank);
            let b = other.aligned(i, rank);
            let dim = match (a, b) {
                (Some(x), Some(y)) if x == y => Some(x),
                (Some(1), y) | (y, Some(1)) => y,
                (None, Some(y)) | (Some(y), None) => Some(y),
                (None, None) => None,
                (Some(x), Some(y)) => {
                    return Err(GraphError::shape(
                        op,
                        format!("cannot broadcast {} with {} (dims {} vs {})", self, other, x, y),
                    ));
                }
            };
            dims.push(dim);
        }
        Ok(Shape(dims))
    }

    // Dimension `i` of a shape right-aligned to `rank`; missing leading dims act as 1.
    fn aligned(&self, i: usize, rank: usize) -> Option<usize> {
        let offset = rank - self.rank();
        if i < offset { Some(1) } else { self.0[i - offset] }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self
            .0
            .iter()
            .map(|d| d.map_or_else(|| "?".to_string(), |d| d.to_string()))
            .collect();
        write!(f, "[{}]", dims.join(", "))
    }
}

/// Static type of a node: what the graph knows before anything is fed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TensorSpec {
    pub dtype: DType,
    pub shape: Shape,
}

impl TensorSpec {
    pub fn new(dtype: DType, shape: Shape) -> Self {
        Self { dtype, shape }
    }

    pub fn float(shape: Shape) -> Self {
        Self::new(DType::Float32, shape)
    }

    pub fn expect_dtype(&self, op: &str, dtype: DType) -> Result<()> {
        if self.dtype != dtype {
            return Err(GraphError::DTypeMismatch {
                op: op.to_string(),
                expected: dtype,
                actual: self.dtype,
            });
        }
        Ok(())
    }
}
