use crate::error::Result;
use crate::graph::{Graph, NodeId};

/// A graph building block.
///
/// A module holds the configuration of a layer (widths, seeds, the shared
/// training-flag and keep-probability handles) and appends its nodes to a
/// [`Graph`] when `forward` is called. Each call creates fresh variables, so
/// calling `forward` twice builds two independent layers.
///
/// # Examples
///
/// ```rust
/// use densegraph::graph::Graph;
/// use densegraph::nn::{Dense, Module};
/// use densegraph::tensor::{DType, Shape};
///
/// let mut graph = Graph::new();
/// let x = graph.placeholder("inputs", DType::Float32, Shape::batched(4));
/// let y = Dense::new(4, 8, 0).forward(&mut graph, x).unwrap();
/// assert_eq!(graph.spec(y).unwrap().shape, Shape::batched(8));
/// ```
pub trait Module {
    /// Appends the layer to `graph`, consuming `input`, and returns the output handle.
    fn forward(&self, graph: &mut Graph, input: NodeId) -> Result<NodeId>;

    /// Number of output features.
    fn units(&self) -> usize;
}
