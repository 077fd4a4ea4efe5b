// unary.rs
// Element-wise unary operations for the computational graph.

use crate::error::Result;
use crate::ops::{ExecContext, Operator, expect_inputs};
use crate::tensor::{DType, Tensor, TensorSpec};

fn infer_unary(op: &str, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
    expect_inputs(op, inputs, 1)?;
    inputs[0].expect_dtype(op, DType::Float32)?;
    Ok(inputs[0].clone())
}

/// Rectified linear unit: output = max(0, input)
#[derive(Debug, Clone)]
pub struct Relu;

impl Operator for Relu {
    fn compute(&self, inputs: &[&Tensor], _ctx: &mut ExecContext<'_>) -> Result<Tensor> {
        expect_inputs("Relu", inputs, 1)?;
        Ok(Tensor::new(inputs[0].data().mapv(|x| x.max(0.0))))
    }

    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
        infer_unary("Relu", inputs)
    }

    fn num_inputs(&self) -> usize {
        1
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}

/// Element-wise absolute value: output = |input|
#[derive(Debug, Clone)]
pub struct Abs;

impl Operator for Abs {
    fn compute(&self, inputs: &[&Tensor], _ctx: &mut ExecContext<'_>) -> Result<Tensor> {
        expect_inputs("Abs", inputs, 1)?;
        Ok(Tensor::new(inputs[0].data().mapv(f32::abs)))
    }

    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
        infer_unary("Abs", inputs)
    }

    fn num_inputs(&self) -> usize {
        1
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}

/// Element-wise square: output = input²
#[derive(Debug, Clone)]
pub struct Square;

impl Operator for Square {
    fn compute(&self, inputs: &[&Tensor], _ctx: &mut ExecContext<'_>) -> Result<Tensor> {
        expect_inputs("Square", inputs, 1)?;
        Ok(Tensor::new(inputs[0].data().mapv(|x| x * x)))
    }

    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
        infer_unary("Square", inputs)
    }

    fn num_inputs(&self) -> usize {
        1
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}
