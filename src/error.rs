use crate::graph::NodeId;
use crate::tensor::DType;

/// Errors raised while building or executing a computational graph.
#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    #[error("Shape mismatch in {op}: {detail}")]
    ShapeMismatch { op: String, detail: String },

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("{op} expects {expected:?} input, got {actual:?}")]
    DTypeMismatch {
        op: String,
        expected: DType,
        actual: DType,
    },

    #[error("Node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("Operation {op} expects {expected} inputs, got {actual}")]
    InvalidArity {
        op: String,
        expected: usize,
        actual: usize,
    },

    #[error("No value fed for placeholder '{0}'")]
    MissingFeed(String),

    #[error("Value fed for '{name}' is incompatible: {detail}")]
    FeedMismatch { name: String, detail: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl GraphError {
    pub(crate) fn shape(op: impl Into<String>, detail: impl Into<String>) -> Self {
        GraphError::ShapeMismatch {
            op: op.into(),
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
