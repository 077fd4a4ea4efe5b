// Neural network building blocks for the graph engine.
// Layers, losses and metrics append nodes to a Graph; the network module
// assembles them into a complete regression model.

pub mod initializers;
pub mod layers;
pub mod losses;
pub mod metrics;
pub mod module;
pub mod network;

// Re-export the main types and traits for convenience
pub use initializers::{Initializer, Ones, TruncatedNormal, Zeros, he_truncated_normal};
pub use layers::{BatchNorm, Dense, DenseBlock, Dropout, dense_relu, dense_relu_bn_drop};
pub use losses::{Loss, MSELoss};
pub use metrics::{Metrics, attach_metrics};
pub use module::Module;
pub use network::{NetworkBundle, NetworkTopology, dense_nn};
