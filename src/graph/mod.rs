pub mod engine;
pub mod node;
pub mod plot;
pub mod session;
mod tests;

pub use engine::Graph;
pub use node::{Node, NodeId, NodeKind};
pub use plot::{GraphVisualizer, VisualizationConfig};
pub use session::{FeedDict, Session};
