// src/nn/layers/block.rs
// Regularized hidden layer: dense + ReLU, then batch normalization, then dropout.

use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::nn::Module;
use crate::nn::layers::{BatchNorm, Dense, Dropout};

pub const DEFAULT_BLOCK_SCOPE: &str = "dense_relu_bn_drop";

/// Hidden layer of the network.
///
/// The order is fixed: the activation comes before the normalization, and dropout comes last.
/// `training` (Bool scalar) and `keep_prob` (Float32 scalar) are handles shared by every block
/// of a network.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseBlock {
    pub dense: Dense,
    pub norm: BatchNorm,
    pub dropout: Dropout,
    pub name: String,
}

impl DenseBlock {
    pub fn new(
        dim_in: usize,
        units: usize,
        seed: u64,
        training: NodeId,
        keep_prob: NodeId,
    ) -> Self {
        Self {
            dense: Dense::new(dim_in, units, seed),
            norm: BatchNorm::new(units, training),
            dropout: Dropout::new(units, keep_prob),
            name: DEFAULT_BLOCK_SCOPE.to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Module for DenseBlock {
    fn forward(&self, graph: &mut Graph, input: NodeId) -> Result<NodeId> {
        graph.name_scope(&self.name, |g| {
            let activated = self.dense.forward(g, input)?;
            let normalized = self.norm.forward(g, activated)?;
            self.dropout.forward(g, normalized)
        })
    }

    fn units(&self) -> usize {
        self.dense.units
    }
}

/// Builds a [`DenseBlock`] in the default `dense_relu_bn_drop` scope.
pub fn dense_relu_bn_drop(
    graph: &mut Graph,
    input: NodeId,
    dim_in: usize,
    units: usize,
    seed: u64,
    training: NodeId,
    keep_prob: NodeId,
) -> Result<NodeId> {
    DenseBlock::new(dim_in, units, seed, training, keep_prob).forward(graph, input)
}
