// basic.rs
// Element-wise arithmetic for the computational graph.
// Both operands broadcast against each other with numpy semantics, e.g. a [?, U] activation
// plus a [U] bias.

use crate::error::Result;
use crate::ops::{ExecContext, Operator, broadcast_pair, expect_inputs};
use crate::tensor::{DType, Tensor, TensorSpec};

fn infer_binary(op: &str, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
    expect_inputs(op, inputs, 2)?;
    inputs[0].expect_dtype(op, DType::Float32)?;
    inputs[1].expect_dtype(op, DType::Float32)?;
    let shape = inputs[0].shape.broadcast(&inputs[1].shape, op)?;
    Ok(TensorSpec::float(shape))
}

fn compute_binary(op: &str, inputs: &[&Tensor], f: impl Fn(f32, f32) -> f32) -> Result<Tensor> {
    expect_inputs(op, inputs, 2)?;
    let (a, b) = broadcast_pair(op, inputs[0].data(), inputs[1].data())?;
    let mut out = a.to_owned();
    out.zip_mut_with(&b, |x, &y| *x = f(*x, y));
    Ok(Tensor::new(out))
}

/// Element-wise addition: output = input1 + input2
#[derive(Debug, Clone)]
pub struct Add;

impl Operator for Add {
    fn compute(&self, inputs: &[&Tensor], _ctx: &mut ExecContext<'_>) -> Result<Tensor> {
        compute_binary("Add", inputs, |x, y| x + y)
    }

    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
        infer_binary("Add", inputs)
    }

    fn num_inputs(&self) -> usize {
        2
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}

/// Element-wise subtraction: output = input1 - input2
#[derive(Debug, Clone)]
pub struct Sub;

impl Operator for Sub {
    fn compute(&self, inputs: &[&Tensor], _ctx: &mut ExecContext<'_>) -> Result<Tensor> {
        compute_binary("Sub", inputs, |x, y| x - y)
    }

    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
        infer_binary("Sub", inputs)
    }

    fn num_inputs(&self) -> usize {
        2
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}

/// Element-wise division: output = input1 / input2
/// Division by zero follows IEEE 754 (x/0 = ±Inf, 0/0 = NaN) and is not an error.
#[derive(Debug, Clone)]
pub struct Div;

impl Operator for Div {
    fn compute(&self, inputs: &[&Tensor], _ctx: &mut ExecContext<'_>) -> Result<Tensor> {
        compute_binary("Div", inputs, |x, y| x / y)
    }

    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
        infer_binary("Div", inputs)
    }

    fn num_inputs(&self) -> usize {
        2
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Shape;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn run(op: &dyn Operator, inputs: &[&Tensor]) -> Result<Tensor> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = ExecContext::new(&mut rng);
        op.compute(inputs, &mut ctx)
    }

    #[test]
    fn test_add_broadcasts_bias_row() {
        let x = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let b = Tensor::from_vec(vec![10.0, 20.0], &[2]).unwrap();
        let out = run(&Add, &[&x, &b]).unwrap();
        assert_eq!(out.to_vec(), vec![11.0, 22.0, 13.0, 24.0]);
    }

    #[test]
    fn test_sub() {
        let a = Tensor::from_vec(vec![5.0, 7.0], &[2]).unwrap();
        let b = Tensor::from_vec(vec![2.0, 3.0], &[2]).unwrap();
        assert_eq!(run(&Sub, &[&a, &b]).unwrap().to_vec(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_div_by_zero_is_not_an_error() {
        let a = Tensor::from_vec(vec![1.0, 0.0], &[2]).unwrap();
        let b = Tensor::from_vec(vec![0.0, 0.0], &[2]).unwrap();
        let out = run(&Div, &[&a, &b]).unwrap().to_vec();
        assert!(out[0].is_infinite());
        assert!(out[1].is_nan());
    }

    #[test]
    fn test_infer_binary_broadcast() {
        let x = TensorSpec::float(Shape::batched(4));
        let b = TensorSpec::float(Shape::known(&[4]));
        assert_eq!(Add.infer(&[&x, &b]).unwrap(), TensorSpec::float(Shape::batched(4)));

        let wrong = TensorSpec::float(Shape::known(&[3]));
        assert!(Add.infer(&[&x, &wrong]).is_err());
    }

    #[test]
    fn test_runtime_shape_mismatch_is_reported() {
        let a = Tensor::zeros(&[2, 3]);
        let b = Tensor::zeros(&[2, 4]);
        assert!(run(&Sub, &[&a, &b]).is_err());
    }
}
