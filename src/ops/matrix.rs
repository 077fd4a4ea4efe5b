// matrix.rs
// Matrix multiplication for the dense layers: [batch, dim_in] @ [dim_in, units].

use crate::error::{GraphError, Result};
use crate::ops::{ExecContext, Operator, expect_inputs};
use crate::tensor::{DType, Shape, Tensor, TensorSpec};
use ndarray::{ArrayView2, Ix2};

/// Matrix multiplication of two rank 2 tensors.
/// The contracted dimension must be statically known on both sides.
#[derive(Debug, Clone)]
pub struct MatMul;

impl Operator for MatMul {
    fn compute(&self, inputs: &[&Tensor], _ctx: &mut ExecContext<'_>) -> Result<Tensor> {
        expect_inputs("MatMul", inputs, 2)?;
        let a = as_matrix(inputs[0])?;
        let b = as_matrix(inputs[1])?;

        if a.ncols() != b.nrows() {
            return Err(GraphError::shape(
                "MatMul",
                format!("cannot multiply {:?} by {:?}", a.shape(), b.shape()),
            ));
        }

        Ok(Tensor::new(a.dot(&b).into_dyn()))
    }

    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
        expect_inputs("MatMul", inputs, 2)?;
        let (a, b) = (&inputs[0].shape, &inputs[1].shape);
        inputs[0].expect_dtype("MatMul", DType::Float32)?;
        inputs[1].expect_dtype("MatMul", DType::Float32)?;

        if a.rank() != 2 || b.rank() != 2 {
            return Err(GraphError::shape(
                "MatMul",
                format!("expected two matrices, got {} and {}", a, b),
            ));
        }

        match (a.dim(1), b.dim(0)) {
            (Some(inner_a), Some(inner_b)) if inner_a == inner_b => {}
            (Some(_), Some(_)) => {
                return Err(GraphError::shape(
                    "MatMul",
                    format!("inner dimensions of {} and {} differ", a, b),
                ));
            }
            _ => {
                return Err(GraphError::shape(
                    "MatMul",
                    format!("inner dimension of {} @ {} must be statically known", a, b),
                ));
            }
        }

        Ok(TensorSpec::float(Shape::new(vec![a.dims()[0], b.dims()[1]])))
    }

    fn num_inputs(&self) -> usize {
        2
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}

fn as_matrix(t: &Tensor) -> Result<ArrayView2<'_, f32>> {
    t.data()
        .view()
        .into_dimensionality::<Ix2>()
        .map_err(|_| GraphError::shape("MatMul", format!("{:?} is not a matrix", t.shape())))
}
