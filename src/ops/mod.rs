// ops/mod.rs
// Operators of the computational graph.
// Every operator knows how to infer its static output spec from its input specs at
// construction time, and how to compute its output from concrete tensors when a session runs.
// There is no gradient here: the graph is forward only.
use crate::error::{GraphError, Result};
use crate::graph::NodeId;
use crate::tensor::{Tensor, TensorSpec};
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use rand::rngs::StdRng;
use std::any::type_name;

// All operators in the computational graph implement this trait.
pub trait Operator: std::fmt::Debug {
    // Computes the output of the operator from already evaluated inputs.
    fn compute(&self, inputs: &[&Tensor], ctx: &mut ExecContext<'_>) -> Result<Tensor>;

    // Static output spec, checked once when the node is added to the graph.
    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec>;

    // Get number of inputs this operator expects
    fn num_inputs(&self) -> usize;

    fn name(&self) -> String {
        let full_name = type_name::<Self>();
        full_name
            .rsplit("::")
            .next()
            .unwrap_or(full_name)
            .to_string()
    }

    fn clone_op(&self) -> Box<dyn Operator>;
}

impl Operator for Box<dyn Operator> {
    fn compute(&self, inputs: &[&Tensor], ctx: &mut ExecContext<'_>) -> Result<Tensor> {
        self.as_ref().compute(inputs, ctx)
    }

    fn infer(&self, inputs: &[&TensorSpec]) -> Result<TensorSpec> {
        self.as_ref().infer(inputs)
    }

    fn num_inputs(&self) -> usize {
        self.as_ref().num_inputs()
    }

    fn name(&self) -> String {
        self.as_ref().name()
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        self.as_ref().clone_op()
    }
}

/// Per-run state handed to operators: the session RNG and the queue of
/// variable assignments applied once the run has finished.
pub struct ExecContext<'a> {
    rng: &'a mut StdRng,
    updates: Vec<(NodeId, Tensor)>,
}

impl<'a> ExecContext<'a> {
    pub fn new(rng: &'a mut StdRng) -> Self {
        Self {
            rng,
            updates: Vec::new(),
        }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut *self.rng
    }

    pub fn assign(&mut self, variable: NodeId, value: Tensor) {
        self.updates.push((variable, value));
    }

    pub fn into_updates(self) -> Vec<(NodeId, Tensor)> {
        self.updates
    }
}

pub mod basic;
pub mod comparison;
pub mod matrix;
pub mod normalization;
pub mod random;
pub mod reduction;
pub mod unary;

pub use basic::{Add, Div, Sub};
pub use comparison::{Cast, Greater};
pub use matrix::MatMul;
pub use normalization::BatchNormOp;
pub use random::DropoutOp;
pub use reduction::Mean;
pub use unary::{Abs, Relu, Square};

// Shared by the binary operators: views both operands with their common broadcast shape,
// failing instead of panicking when the shapes are incompatible.
pub(crate) fn broadcast_pair<'a>(
    op: &str,
    a: &'a ArrayD<f32>,
    b: &'a ArrayD<f32>,
) -> Result<(ArrayViewD<'a, f32>, ArrayViewD<'a, f32>)> {
    let rank = a.ndim().max(b.ndim());
    let pad = |shape: &[usize]| -> Vec<usize> {
        let mut dims = vec![1; rank - shape.len()];
        dims.extend_from_slice(shape);
        dims
    };
    let (sa, sb) = (pad(a.shape()), pad(b.shape()));

    let mut target = Vec::with_capacity(rank);
    for (&x, &y) in sa.iter().zip(&sb) {
        let dim = if x == y || y == 1 {
            x
        } else if x == 1 {
            y
        } else {
            return Err(GraphError::shape(
                op,
                format!("cannot broadcast {:?} with {:?}", a.shape(), b.shape()),
            ));
        };
        target.push(dim);
    }

    let incompatible =
        || GraphError::shape(op, format!("cannot broadcast to {:?}", target));
    let va = a.broadcast(IxDyn(&target)).ok_or_else(incompatible)?;
    let vb = b.broadcast(IxDyn(&target)).ok_or_else(incompatible)?;
    Ok((va, vb))
}

// Shared arity check for `compute`.
pub(crate) fn expect_inputs<T>(op: &str, inputs: &[T], expected: usize) -> Result<()> {
    if inputs.len() != expected {
        return Err(GraphError::InvalidArity {
            op: op.to_string(),
            expected,
            actual: inputs.len(),
        });
    }
    Ok(())
}
