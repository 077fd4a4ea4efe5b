// reduction.rs
// Reductions used by the loss and the error-rate metrics.

use crate::error::Result;
use crate::ops::{ExecContext, Operator, expect_inputs};
use crate::tensor::{DType, Shape, Tensor, TensorSpec};

/// Mean over every element, producing a scalar.
/// The mean of an empty tensor is NaN, as 0/0 would be.
#[derive(Debug, Clone)]
pub struct Mean;

impl Operator for Mean {
    fn compute(&self, inputs: &[&Tensor], _ctx: &mut ExecContext<'_>) -> Result<Tensor> {
        expect_inputs("Mean", inputs, 1)?;
        let data = inputs[0].data();
        let mean = data.mean().unwrap_or(f32::NAN);
        Ok(Tensor::scalar(mean))
    }

    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
        expect_inputs("Mean", inputs, 1)?;
        inputs[0].expect_dtype("Mean", DType::Float32)?;
        Ok(TensorSpec::float(Shape::scalar()))
    }

    fn num_inputs(&self) -> usize {
        1
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}
