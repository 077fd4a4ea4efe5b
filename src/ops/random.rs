// random.rs
// Randomized operators. They draw from the session RNG, so a session created with a fixed seed
// reproduces the same masks run after run.

use crate::error::{GraphError, Result};
use crate::ops::{ExecContext, Operator, expect_inputs};
use crate::tensor::{DType, Tensor, TensorSpec};
use rand::Rng;

/// Inverted dropout with a fed keep probability.
/// Inputs: `[x, keep_prob]`. Each element is kept with probability `keep_prob` and scaled by
/// `1 / keep_prob`, otherwise zeroed. A keep probability of exactly 1.0 is the identity.
#[derive(Debug, Clone)]
pub struct DropoutOp;

impl Operator for DropoutOp {
    fn compute(&self, inputs: &[&Tensor], ctx: &mut ExecContext<'_>) -> Result<Tensor> {
        expect_inputs("DropoutOp", inputs, 2)?;
        let keep_prob = inputs[1].to_scalar()?;
        if !(keep_prob > 0.0 && keep_prob <= 1.0) {
            return Err(GraphError::InvalidArgument(format!(
                "keep probability must be in (0, 1], got {}",
                keep_prob
            )));
        }

        if keep_prob == 1.0 {
            return Ok(inputs[0].clone());
        }

        let scale = 1.0 / keep_prob;
        let rng = ctx.rng();
        let out = inputs[0].data().mapv(|x| {
            if rng.random::<f32>() < keep_prob {
                x * scale
            } else {
                0.0
            }
        });
        Ok(Tensor::new(out))
    }

    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
        expect_inputs("DropoutOp", inputs, 2)?;
        inputs[0].expect_dtype("DropoutOp", DType::Float32)?;
        inputs[1].expect_dtype("DropoutOp", DType::Float32)?;
        if !inputs[1].shape.is_scalar() {
            return Err(GraphError::shape(
                "DropoutOp",
                format!("keep probability must be a scalar, got {}", inputs[1].shape),
            ));
        }
        Ok(inputs[0].clone())
    }

    fn num_inputs(&self) -> usize {
        2
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}
