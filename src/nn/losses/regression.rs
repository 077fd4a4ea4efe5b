// src/nn/losses/regression.rs
// Regression losses built from graph operations

use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::nn::losses::Loss;

/// Mean Squared Error Loss: MSE = mean((predictions - targets)²)
/// Averaged over every element, batch and outputs alike.
#[derive(Debug, Clone, Copy, Default)]
pub struct MSELoss;

impl MSELoss {
    pub fn new() -> Self {
        Self
    }
}

impl Loss for MSELoss {
    fn forward(&self, graph: &mut Graph, predictions: NodeId, targets: NodeId) -> Result<NodeId> {
        let diff = graph.sub(predictions, targets)?;
        let squared_diff = graph.square(diff)?;
        graph.mean(squared_diff)
    }
}
