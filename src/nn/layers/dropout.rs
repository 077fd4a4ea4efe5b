// src/nn/layers/dropout.rs
// Dropout layer driven by a fed keep probability

use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::nn::Module;
use crate::ops::DropoutOp;
use tracing::debug;

/// Inverted dropout: each element survives with probability `keep_prob` and is
/// scaled by `1 / keep_prob`. Feeding 1.0 turns the layer into the identity.
/// The layer does not look at the training flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Dropout {
    pub units: usize,
    pub keep_prob: NodeId,
}

impl Dropout {
    pub fn new(units: usize, keep_prob: NodeId) -> Self {
        Self { units, keep_prob }
    }
}

impl Module for Dropout {
    fn forward(&self, graph: &mut Graph, input: NodeId) -> Result<NodeId> {
        graph.name_scope("dropout", |g| {
            debug!(scope = g.current_scope(), "dropout");
            g.apply_operation(Box::new(DropoutOp), vec![input, self.keep_prob])
        })
    }

    fn units(&self) -> usize {
        self.units
    }
}
