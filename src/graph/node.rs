use crate::ops::Operator;
use crate::tensor::{Tensor, TensorSpec};

// Id of the node in the computational graph.
// Ids are handed out by the owning graph in creation order, so an operator's inputs always
// carry smaller ids than the operator itself. The session relies on this to evaluate in id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Debug)]
pub enum NodeKind {
    /// Value supplied through a feed on every run.
    Placeholder,

    /// Value fixed at construction time.
    Constant(Tensor),

    /// Session state, starting from `initial`.
    Variable { initial: Tensor, trainable: bool },

    /// Result of applying `op` to `inputs`.
    Operation {
        op: Box<dyn Operator>,
        inputs: Vec<NodeId>,
    },
}

impl Clone for NodeKind {
    fn clone(&self) -> Self {
        match self {
            NodeKind::Placeholder => NodeKind::Placeholder,
            NodeKind::Constant(tensor) => NodeKind::Constant(tensor.clone()),
            NodeKind::Variable { initial, trainable } => NodeKind::Variable {
                initial: initial.clone(),
                trainable: *trainable,
            },
            NodeKind::Operation { op, inputs } => NodeKind::Operation {
                op: op.clone_op(),
                inputs: inputs.clone(),
            },
        }
    }
}

// Represents a value in the computational graph
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    // Fully scoped, unique name, e.g. "dense_hidden_0/dense_relu/kernel"
    pub name: String,
    pub spec: TensorSpec,
    pub kind: NodeKind,
}

impl Node {
    pub fn inputs(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Operation { inputs, .. } => inputs.as_slice(),
            _ => &[],
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, NodeKind::Variable { .. })
    }

    pub fn is_trainable(&self) -> bool {
        matches!(self.kind, NodeKind::Variable { trainable: true, .. })
    }

    // Everything before the last '/', empty for nodes created at the root.
    pub fn scope(&self) -> &str {
        self.name.rsplit_once('/').map_or("", |(scope, _)| scope)
    }

    pub fn base_name(&self) -> &str {
        self.name.rsplit_once('/').map_or(self.name.as_str(), |(_, base)| base)
    }

    pub fn kind_label(&self) -> String {
        match &self.kind {
            NodeKind::Placeholder => "Placeholder".to_string(),
            NodeKind::Constant(_) => "Const".to_string(),
            NodeKind::Variable { .. } => "Variable".to_string(),
            NodeKind::Operation { op, .. } => op.name(),
        }
    }
}
