use crate::error::{GraphError, Result};
use crate::ops::{Abs, Add, Cast, Div, Greater, MatMul, Mean, Operator, Relu, Square, Sub};
use crate::summary::ScalarSummary;
use crate::tensor::{DType, Shape, Tensor, TensorSpec};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use super::node::{Node, NodeId, NodeKind};

/// An explicit computational graph context.
///
/// Nodes are only ever appended; the graph is rebuilt from scratch with [`Graph::reset`].
/// Several graphs may coexist, each with its own ids and names.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    names: HashMap<String, NodeId>,
    // Uniquified full names (of nodes and scopes) and how often each was requested.
    names_in_use: HashMap<String, usize>,
    scope_stack: Vec<String>,
    summaries: Vec<ScalarSummary>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every node, name, scope and summary.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.names.clear();
        self.names_in_use.clear();
        self.scope_stack.clear();
        self.summaries.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn spec(&self, id: NodeId) -> Result<&TensorSpec> {
        Ok(&self.node(id)?.spec)
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn variables(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.is_variable())
            .map(|n| n.id)
            .collect()
    }

    pub fn trainable_variables(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.is_trainable())
            .map(|n| n.id)
            .collect()
    }

    /// Number of scalar weights held by trainable variables.
    pub fn parameter_count(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|n| match &n.kind {
                NodeKind::Variable {
                    initial,
                    trainable: true,
                } => Some(initial.len()),
                _ => None,
            })
            .sum()
    }

    /// Ids of every node `outputs` depend on, outputs included, in ascending order.
    /// The walk does not look past nodes for which `cut` returns true.
    pub fn dependencies(
        &self,
        outputs: &[NodeId],
        cut: impl Fn(NodeId) -> bool,
    ) -> Result<BTreeSet<NodeId>> {
        let mut visited = BTreeSet::new();
        let mut stack = outputs.to_vec();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let node = self.node(id)?;
            if !cut(id) {
                stack.extend_from_slice(node.inputs());
            }
        }

        Ok(visited)
    }

    pub fn current_scope(&self) -> &str {
        self.scope_stack.last().map_or("", String::as_str)
    }

    /// Runs `build` inside a named scope.
    ///
    /// Scope names are uniquified against everything already created under the same parent,
    /// so calling a builder twice with the same name yields `name` and `name_1`.
    /// The scope is left even when `build` fails.
    pub fn name_scope<R>(
        &mut self,
        name: &str,
        build: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let scope = self.unique_name(name);
        self.scope_stack.push(scope);
        let result = build(self);
        self.scope_stack.pop();
        result
    }

    // TensorFlow-style uniquification: "a", "a_1", "a_2", ...
    fn unique_name(&mut self, name: &str) -> String {
        let full = match self.current_scope() {
            "" => name.to_string(),
            scope => format!("{}/{}", scope, name),
        };

        let count = self.names_in_use.entry(full.clone()).or_insert(0);
        let mut i = *count;
        *count += 1;
        if i == 0 {
            return full;
        }

        loop {
            let candidate = format!("{}_{}", full, i);
            if !self.names_in_use.contains_key(&candidate) {
                self.names_in_use.insert(candidate.clone(), 1);
                return candidate;
            }
            i += 1;
        }
    }

    fn push(&mut self, name: String, spec: TensorSpec, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.names.insert(name.clone(), id);
        self.nodes.push(Node {
            id,
            name,
            spec,
            kind,
        });
        id
    }

    pub fn placeholder(&mut self, name: &str, dtype: DType, shape: Shape) -> NodeId {
        let name = self.unique_name(name);
        debug!(%name, %shape, ?dtype, "placeholder");
        self.push(name, TensorSpec::new(dtype, shape), NodeKind::Placeholder)
    }

    pub fn constant(&mut self, name: &str, value: Tensor) -> NodeId {
        let name = self.unique_name(name);
        let spec = value.spec();
        self.push(name, spec, NodeKind::Constant(value))
    }

    pub fn scalar(&mut self, value: f32) -> NodeId {
        self.constant("Const", Tensor::scalar(value))
    }

    // Variables always have a fully known, non-empty shape.
    pub fn variable(&mut self, name: &str, initial: Tensor, trainable: bool) -> Result<NodeId> {
        if initial.shape().contains(&0) {
            return Err(GraphError::InvalidShape(format!(
                "variable '{}' would have a zero-sized dimension: {:?}",
                name,
                initial.shape()
            )));
        }
        let name = self.unique_name(name);
        debug!(%name, shape = ?initial.shape(), trainable, "variable");
        let spec = initial.spec();
        Ok(self.push(name, spec, NodeKind::Variable { initial, trainable }))
    }

    fn validate_inputs(&self, op: &dyn Operator, input_ids: &[NodeId]) -> Result<()> {
        for &input_id in input_ids {
            if input_id.0 >= self.nodes.len() {
                return Err(GraphError::NodeNotFound(input_id));
            }
        }

        if input_ids.len() != op.num_inputs() {
            return Err(GraphError::InvalidArity {
                op: op.name(),
                expected: op.num_inputs(),
                actual: input_ids.len(),
            });
        }

        Ok(())
    }

    /// Adds an operator node after checking its inputs and inferring its static output spec.
    /// Nothing is computed here; values only exist inside a session run.
    pub fn apply_operation(
        &mut self,
        op: Box<dyn Operator>,
        input_ids: Vec<NodeId>,
    ) -> Result<NodeId> {
        self.validate_inputs(op.as_ref(), &input_ids)?;

        let spec = {
            let specs: Vec<&TensorSpec> = input_ids.iter().map(|id| &self.nodes[id.0].spec).collect();
            op.infer(&specs)?
        };

        let name = self.unique_name(&op.name());
        debug!(%name, shape = %spec.shape, "operation");
        Ok(self.push(
            name,
            spec,
            NodeKind::Operation {
                op,
                inputs: input_ids,
            },
        ))
    }

    pub fn matmul(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(MatMul), vec![a, b])
    }

    pub fn add(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Add), vec![a, b])
    }

    pub fn sub(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Sub), vec![a, b])
    }

    pub fn div(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Div), vec![a, b])
    }

    pub fn relu(&mut self, x: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Relu), vec![x])
    }

    pub fn abs(&mut self, x: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Abs), vec![x])
    }

    pub fn square(&mut self, x: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Square), vec![x])
    }

    pub fn mean(&mut self, x: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Mean), vec![x])
    }

    pub fn greater(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Greater), vec![a, b])
    }

    pub fn cast(&mut self, x: NodeId, to: DType) -> Result<NodeId> {
        self.apply_operation(Box::new(Cast::new(to)), vec![x])
    }

    /// Registers `node` to be reported under `tag` by [`crate::graph::Session::write_summaries`].
    pub fn add_scalar_summary(&mut self, tag: &str, node: NodeId) -> Result<()> {
        let spec = self.spec(node)?;
        if !spec.shape.is_scalar() {
            return Err(GraphError::InvalidShape(format!(
                "summary '{}' needs a scalar, got {}",
                tag, spec.shape
            )));
        }
        self.summaries.push(ScalarSummary {
            tag: tag.to_string(),
            node,
        });
        Ok(())
    }

    pub fn summaries(&self) -> &[ScalarSummary] {
        &self.summaries
    }
}
