//! # densegraph
//!
//! A small forward-only computational graph engine in Rust, and a builder for
//! dense feed-forward regression networks on top of it.
//!
//! ## Features
//!
//! - Explicit graph contexts: no global state, several graphs may coexist
//! - Static shape and dtype inference with an unknown batch dimension
//! - TensorFlow-style name scopes and unique node names
//! - Sessions with fed placeholders, variable state and seeded randomness
//! - Dense, batch normalization and dropout layers with He initialization
//! - MSE loss and relative-error threshold metrics with scalar summaries
//! - Graph visualization in Graphviz DOT format
//!
//! ```rust
//! use densegraph::graph::Session;
//! use densegraph::nn::NetworkTopology;
//! use densegraph::tensor::Tensor;
//!
//! let topology = NetworkTopology::new(3, vec![8, 4], 1, 42);
//! let (graph, bundle) = topology.build().unwrap();
//!
//! let inputs = Tensor::from_vec(vec![0.5; 6], &[2, 3]).unwrap();
//! let labels = Tensor::from_vec(vec![1.0, 2.0], &[2, 1]).unwrap();
//! let feeds = bundle.feed(inputs, labels, 1.0, false).unwrap();
//!
//! let mut session = Session::with_seed(&graph, 0);
//! let outputs = session.run(&bundle.fetches(), &feeds).unwrap();
//! assert_eq!(outputs[0].shape(), &[2, 1]);
//! ```
pub mod error;
pub mod graph;
pub mod nn;
pub mod ops;
pub mod summary;
pub mod tensor;

// Re-export commonly used types for convenience
pub use error::{GraphError, Result};
pub use graph::{FeedDict, Graph, NodeId, Session};
pub use nn::{NetworkBundle, NetworkTopology, dense_nn};
pub use tensor::{DType, Shape, Tensor};
