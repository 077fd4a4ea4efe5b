// src/nn/layers/norm.rs
// Batch normalization layer built on the BatchNormOp graph operator.

use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::nn::Module;
use crate::nn::initializers::{Initializer, Ones, Zeros};
use crate::ops::BatchNormOp;
use tracing::debug;

pub const DEFAULT_EPSILON: f32 = 1e-3;
pub const DEFAULT_MOMENTUM: f32 = 0.99;

/// Batch normalization over the feature axis of a `[batch, features]` input.
///
/// Learnable `gamma` (scale, starts at one) and `beta` (center, starts at zero),
/// plus non-trainable `moving_mean` and `moving_variance`.
/// When the boolean `training` handle is true the layer normalizes with batch
/// statistics and updates the moving ones; when false it normalizes with the
/// moving statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchNorm {
    pub features: usize,
    pub epsilon: f32,
    pub momentum: f32,
    pub training: NodeId,
}

impl BatchNorm {
    pub fn new(features: usize, training: NodeId) -> Self {
        Self {
            features,
            epsilon: DEFAULT_EPSILON,
            momentum: DEFAULT_MOMENTUM,
            training,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_momentum(mut self, momentum: f32) -> Self {
        self.momentum = momentum;
        self
    }
}

impl Module for BatchNorm {
    fn forward(&self, graph: &mut Graph, input: NodeId) -> Result<NodeId> {
        graph.name_scope("batch_normalization", |g| {
            debug!(scope = g.current_scope(), features = self.features, "batch norm");
            let shape = [self.features];

            let gamma = g.variable("gamma", Ones.initialize(&shape)?, true)?;
            let beta = g.variable("beta", Zeros.initialize(&shape)?, true)?;
            let moving_mean = g.variable("moving_mean", Zeros.initialize(&shape)?, false)?;
            let moving_variance = g.variable("moving_variance", Ones.initialize(&shape)?, false)?;

            let op = BatchNormOp::new(self.epsilon, self.momentum, moving_mean, moving_variance);
            g.apply_operation(
                Box::new(op),
                vec![input, gamma, beta, moving_mean, moving_variance, self.training],
            )
        })
    }

    fn units(&self) -> usize {
        self.features
    }
}
