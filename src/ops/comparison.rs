// comparison.rs
// Comparison and dtype casts.
// Comparisons produce Bool tensors holding 1.0 for true and 0.0 for false, so a Cast back to
// Float32 only changes the dtype tag.

use crate::error::Result;
use crate::ops::{ExecContext, Operator, broadcast_pair, expect_inputs};
use crate::tensor::{DType, Tensor, TensorSpec};

/// Element-wise greater than: output = input1 > input2
/// Any comparison involving NaN is false.
#[derive(Debug, Clone)]
pub struct Greater;

impl Operator for Greater {
    fn compute(&self, inputs: &[&Tensor], _ctx: &mut ExecContext<'_>) -> Result<Tensor> {
        expect_inputs("Greater", inputs, 2)?;
        let (a, b) = broadcast_pair("Greater", inputs[0].data(), inputs[1].data())?;
        let mut out = a.to_owned();
        out.zip_mut_with(&b, |x, &y| *x = if *x > y { 1.0 } else { 0.0 });
        Ok(Tensor::with_dtype(out, DType::Bool))
    }

    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
        expect_inputs("Greater", inputs, 2)?;
        inputs[0].expect_dtype("Greater", DType::Float32)?;
        inputs[1].expect_dtype("Greater", DType::Float32)?;
        let shape = inputs[0].shape.broadcast(&inputs[1].shape, "Greater")?;
        Ok(TensorSpec::new(DType::Bool, shape))
    }

    fn num_inputs(&self) -> usize {
        2
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}

/// Reinterprets a tensor as another dtype.
/// Casting to Bool maps every non-zero value to 1.0.
#[derive(Debug, Clone)]
pub struct Cast {
    pub to: DType,
}

impl Cast {
    pub fn new(to: DType) -> Self {
        Self { to }
    }
}

impl Operator for Cast {
    fn compute(&self, inputs: &[&Tensor], _ctx: &mut ExecContext<'_>) -> Result<Tensor> {
        expect_inputs("Cast", inputs, 1)?;
        let data = match self.to {
            DType::Float32 => inputs[0].data().clone(),
            DType::Bool => inputs[0].data().mapv(|x| if x != 0.0 { 1.0 } else { 0.0 }),
        };
        Ok(Tensor::with_dtype(data, self.to))
    }

    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
        expect_inputs("Cast", inputs, 1)?;
        Ok(TensorSpec::new(self.to, inputs[0].shape.clone()))
    }

    fn num_inputs(&self) -> usize {
        1
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}
