// src/nn/network.rs
// Assembly of the complete feed-forward regression network.

use crate::error::{GraphError, Result};
use crate::graph::{FeedDict, Graph, NodeId};
use crate::nn::Module;
use crate::nn::layers::{Dense, DenseBlock};
use crate::nn::metrics::attach_metrics;
use crate::tensor::{DType, Shape, Tensor};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Shape of a network: input width, hidden widths (in order), output width and the
/// seed shared by every kernel initializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTopology {
    pub feature_count: usize,
    pub layer_sizes: Vec<usize>,
    pub label_count: usize,
    #[serde(default)]
    pub seed: u64,
}

impl NetworkTopology {
    pub fn new(feature_count: usize, layer_sizes: Vec<usize>, label_count: usize, seed: u64) -> Self {
        Self {
            feature_count,
            layer_sizes,
            label_count,
            seed,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Assembles the network into a fresh graph.
    pub fn build(&self) -> Result<(Graph, NetworkBundle)> {
        dense_nn(Graph::new(), self)
    }
}

/// Handles of everything a caller needs to feed and fetch an assembled network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkBundle {
    pub inputs: NodeId,
    pub labels: NodeId,
    pub keep_prob: NodeId,
    pub training_phase: NodeId,
    pub predictions: NodeId,
    pub loss: NodeId,
    pub err_2pc: NodeId,
    pub err_1pc: NodeId,
    pub feature_count: usize,
    pub label_count: usize,
}

impl NetworkBundle {
    /// Feeds for one run. `inputs` must be `[batch, feature_count]` and `labels`
    /// `[batch, label_count]` with the same batch size; `keep_prob` must lie in (0, 1].
    pub fn feed(
        &self,
        inputs: Tensor,
        labels: Tensor,
        keep_prob: f32,
        training: bool,
    ) -> Result<FeedDict> {
        if !(keep_prob > 0.0 && keep_prob <= 1.0) {
            return Err(GraphError::InvalidArgument(format!(
                "keep probability must be in (0, 1], got {}",
                keep_prob
            )));
        }
        check_matrix("inputs", &inputs, self.feature_count)?;
        check_matrix("labels", &labels, self.label_count)?;
        if inputs.shape()[0] != labels.shape()[0] {
            return Err(GraphError::FeedMismatch {
                name: "labels".to_string(),
                detail: format!(
                    "batch of {} labels for {} inputs",
                    labels.shape()[0],
                    inputs.shape()[0]
                ),
            });
        }

        Ok(FeedDict::new()
            .with(self.inputs, inputs)
            .with(self.labels, labels)
            .with(self.keep_prob, Tensor::scalar(keep_prob))
            .with(self.training_phase, Tensor::scalar_bool(training)))
    }

    /// `[predictions, loss, err_2pc, err_1pc]`
    pub fn fetches(&self) -> [NodeId; 4] {
        [self.predictions, self.loss, self.err_2pc, self.err_1pc]
    }
}

fn check_matrix(name: &str, tensor: &Tensor, columns: usize) -> Result<()> {
    if tensor.ndim() != 2 || tensor.shape()[1] != columns {
        return Err(GraphError::FeedMismatch {
            name: name.to_string(),
            detail: format!("expected [batch, {}], got {:?}", columns, tensor.shape()),
        });
    }
    Ok(())
}

/// Builds the regression network described by `topology` into `graph`.
///
/// The graph is reset first, so passing a graph that already holds a network
/// replaces it. Hidden layers are regularized blocks named `dense_hidden_{i}`
/// (so their kernels are `dense_hidden_{i}/dense_relu/kernel`); the output layer is
/// a plain dense + ReLU layer named `predictions` (`predictions/kernel`). On error
/// nothing is returned and the graph is dropped.
pub fn dense_nn(mut graph: Graph, topology: &NetworkTopology) -> Result<(Graph, NetworkBundle)> {
    graph.reset();
    let seed = topology.seed;

    let inputs = graph.placeholder(
        "inputs",
        DType::Float32,
        Shape::batched(topology.feature_count),
    );
    let labels = graph.placeholder("labels", DType::Float32, Shape::batched(topology.label_count));
    let training_phase = graph.placeholder("training_phase", DType::Bool, Shape::scalar());
    let keep_prob = graph.placeholder("pkeep", DType::Float32, Shape::scalar());

    let mut hidden = inputs;
    let mut dim_in = topology.feature_count;
    for (i, &units) in topology.layer_sizes.iter().enumerate() {
        let scope = format!("dense_hidden_{}", i);
        debug!(%scope, dim_in, units, "hidden layer");
        let block =
            DenseBlock::new(dim_in, units, seed, training_phase, keep_prob).with_name(scope);
        hidden = block.forward(&mut graph, hidden)?;
        dim_in = block.units();
    }

    let predictions = Dense::new(dim_in, topology.label_count, seed)
        .with_name("predictions")
        .forward(&mut graph, hidden)?;

    let metrics = attach_metrics(&mut graph, predictions, labels)?;

    info!(
        nodes = graph.len(),
        parameters = graph.parameter_count(),
        hidden_layers = topology.layer_sizes.len(),
        "network assembled"
    );

    let bundle = NetworkBundle {
        inputs,
        labels,
        keep_prob,
        training_phase,
        predictions,
        loss: metrics.loss,
        err_2pc: metrics.err_2pc,
        err_1pc: metrics.err_1pc,
        feature_count: topology.feature_count,
        label_count: topology.label_count,
    };
    Ok((graph, bundle))
}
