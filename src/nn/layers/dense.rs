// src/nn/layers/dense.rs
// Fully connected layer with ReLU activation: y = relu(x * W + b)

use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeId};
use crate::nn::Module;
use crate::nn::initializers::{Initializer, Zeros, he_truncated_normal};
use tracing::debug;

pub const DEFAULT_DENSE_SCOPE: &str = "dense_relu";

/// Dense layer followed by a ReLU.
///
/// The kernel is `[dim_in, units]`, He-initialized from a truncated normal seeded
/// with `seed`. The bias is `[units]` and starts at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense {
    pub dim_in: usize,
    pub units: usize,
    pub seed: u64,
    pub name: String,
}

impl Dense {
    pub fn new(dim_in: usize, units: usize, seed: u64) -> Self {
        Self {
            dim_in,
            units,
            seed,
            name: DEFAULT_DENSE_SCOPE.to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Module for Dense {
    fn forward(&self, graph: &mut Graph, input: NodeId) -> Result<NodeId> {
        let spec = graph.spec(input)?;
        if let Some(inner) = spec.shape.dim(1)
            && inner != self.dim_in
        {
            return Err(GraphError::shape(
                "Dense",
                format!(
                    "layer expects {} input features, input has shape {}",
                    self.dim_in, spec.shape
                ),
            ));
        }

        graph.name_scope(&self.name, |g| {
            debug!(scope = g.current_scope(), dim_in = self.dim_in, units = self.units, "dense layer");

            let kernel_init = he_truncated_normal(self.dim_in, self.seed);
            let kernel = g.variable(
                "kernel",
                kernel_init.initialize(&[self.dim_in, self.units])?,
                true,
            )?;
            let bias = g.variable("bias", Zeros.initialize(&[self.units])?, true)?;

            let xw = g.matmul(input, kernel)?;
            let z = g.add(xw, bias)?;
            g.relu(z)
        })
    }

    fn units(&self) -> usize {
        self.units
    }
}

/// Builds a [`Dense`] layer in the default `dense_relu` scope.
pub fn dense_relu(
    graph: &mut Graph,
    input: NodeId,
    dim_in: usize,
    units: usize,
    seed: u64,
) -> Result<NodeId> {
    Dense::new(dim_in, units, seed).forward(graph, input)
}
