use crate::error::{GraphError, Result};
use crate::ops::ExecContext;
use crate::summary::SummarySink;
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use tracing::trace;

use super::engine::Graph;
use super::node::{NodeId, NodeKind};

/// Values supplied for placeholders on a single run.
#[derive(Debug, Clone, Default)]
pub struct FeedDict {
    values: HashMap<NodeId, Tensor>,
}

impl FeedDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, value: Tensor) {
        self.values.insert(node, value);
    }

    /// Builder form of [`FeedDict::insert`].
    pub fn with(mut self, node: NodeId, value: Tensor) -> Self {
        self.insert(node, value);
        self
    }

    pub fn get(&self, node: NodeId) -> Option<&Tensor> {
        self.values.get(&node)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Evaluates nodes of a [`Graph`].
///
/// A session owns the current value of every variable, starting from its initial value,
/// and the RNG used by randomized operators.
pub struct Session<'g> {
    graph: &'g Graph,
    variables: HashMap<NodeId, Tensor>,
    rng: StdRng,
}

impl<'g> Session<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self::with_rng(graph, StdRng::from_os_rng())
    }

    /// Same seed, same dropout masks.
    pub fn with_seed(graph: &'g Graph, seed: u64) -> Self {
        Self::with_rng(graph, StdRng::seed_from_u64(seed))
    }

    fn with_rng(graph: &'g Graph, rng: StdRng) -> Self {
        let variables = graph
            .nodes()
            .filter_map(|node| match &node.kind {
                NodeKind::Variable { initial, .. } => Some((node.id, initial.clone())),
                _ => None,
            })
            .collect();
        Self {
            graph,
            variables,
            rng,
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Current value of a variable.
    pub fn variable(&self, id: NodeId) -> Result<&Tensor> {
        self.variables.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Evaluates `fetches` and returns their values in the same order.
    ///
    /// Only the nodes the fetches depend on are computed. Any node may be fed, which
    /// overrides its value for this run. Variable assignments queued by operators
    /// (batch normalization statistics) are applied after all fetches are computed.
    pub fn run(&mut self, fetches: &[NodeId], feeds: &FeedDict) -> Result<Vec<Tensor>> {
        // Fed nodes are not computed, so their inputs are not needed.
        let order = self.graph.dependencies(fetches, |id| feeds.get(id).is_some())?;
        let mut values: HashMap<NodeId, Tensor> = HashMap::with_capacity(order.len());
        let mut ctx = ExecContext::new(&mut self.rng);

        // Ids grow with creation order, so ascending order is a topological order.
        for id in order {
            let node = self.graph.node(id)?;

            let value = if let Some(fed) = feeds.get(id) {
                if fed.dtype() != node.spec.dtype {
                    return Err(GraphError::FeedMismatch {
                        name: node.name.clone(),
                        detail: format!("expected {:?}, got {:?}", node.spec.dtype, fed.dtype()),
                    });
                }
                if !node.spec.shape.is_compatible_with(fed.shape()) {
                    return Err(GraphError::FeedMismatch {
                        name: node.name.clone(),
                        detail: format!("expected shape {}, got {:?}", node.spec.shape, fed.shape()),
                    });
                }
                fed.clone()
            } else {
                match &node.kind {
                    NodeKind::Placeholder => return Err(GraphError::MissingFeed(node.name.clone())),
                    NodeKind::Constant(value) => value.clone(),
                    NodeKind::Variable { .. } => self
                        .variables
                        .get(&id)
                        .cloned()
                        .ok_or(GraphError::NodeNotFound(id))?,
                    NodeKind::Operation { op, inputs } => {
                        let input_values = inputs
                            .iter()
                            .map(|input| values.get(input).ok_or(GraphError::NodeNotFound(*input)))
                            .collect::<Result<Vec<&Tensor>>>()?;
                        op.compute(&input_values, &mut ctx)?
                    }
                }
            };

            trace!(name = %node.name, shape = ?value.shape(), "evaluated");
            values.insert(id, value);
        }

        let outputs = fetches
            .iter()
            .map(|id| values.get(id).cloned().ok_or(GraphError::NodeNotFound(*id)))
            .collect::<Result<Vec<_>>>()?;

        for (variable, value) in ctx.into_updates() {
            self.variables.insert(variable, value);
        }

        Ok(outputs)
    }

    pub fn run_one(&mut self, fetch: NodeId, feeds: &FeedDict) -> Result<Tensor> {
        let mut outputs = self.run(&[fetch], feeds)?;
        outputs.pop().ok_or(GraphError::NodeNotFound(fetch))
    }

    /// Evaluates every scalar summary registered on the graph and records it under `step`.
    pub fn write_summaries(
        &mut self,
        step: u64,
        feeds: &FeedDict,
        sink: &mut dyn SummarySink,
    ) -> Result<()> {
        let summaries = self.graph.summaries();
        if summaries.is_empty() {
            return Ok(());
        }

        let fetches: Vec<NodeId> = summaries.iter().map(|s| s.node).collect();
        let values = self.run(&fetches, feeds)?;
        for (summary, value) in summaries.iter().zip(values) {
            sink.record(step, &summary.tag, value.to_scalar()?);
        }
        Ok(())
    }
}
