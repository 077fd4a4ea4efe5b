// src/nn/layers/mod.rs
// Layer builders. Every layer appends its nodes to a Graph inside its own name scope.

pub mod block;
pub mod dense;
pub mod dropout;
pub mod norm;

pub use block::{DenseBlock, dense_relu_bn_drop};
pub use dense::{Dense, dense_relu};
pub use dropout::Dropout;
pub use norm::BatchNorm;
