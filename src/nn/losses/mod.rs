pub mod regression;

use crate::error::Result;
use crate::graph::{Graph, NodeId};
pub use regression::MSELoss;

/// Base trait for all loss functions
/// predictions and targets are `[batch, outputs]`; the result is a scalar node.
pub trait Loss {
    fn forward(&self, graph: &mut Graph, predictions: NodeId, targets: NodeId) -> Result<NodeId>;
}
