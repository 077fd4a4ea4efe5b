use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

use super::engine::Graph;
use super::node::{Node, NodeId, NodeKind};

/// Graph visualization in Graphviz DOT format
pub struct GraphVisualizer {
    pub config: VisualizationConfig,
}

/// Configuration for graph visualization
#[derive(Debug, Clone)]
pub struct VisualizationConfig {
    pub show_shapes: bool,
    // One cluster per top level name scope, e.g. "dense_hidden_0".
    pub cluster_scopes: bool,
    pub placeholder_color: String,
    pub variable_color: String,
    pub op_color: String,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            show_shapes: true,
            cluster_scopes: true,
            placeholder_color: "#E3F2FD".to_string(),
            variable_color: "#E8F5E8".to_string(),
            op_color: "#FFF3E0".to_string(),
        }
    }
}

impl Default for GraphVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphVisualizer {
    pub fn new() -> Self {
        Self {
            config: VisualizationConfig::default(),
        }
    }

    /// Generate DOT format representation of the whole graph
    pub fn to_dot(&self, graph: &Graph) -> String {
        let nodes: Vec<&Node> = graph.nodes().collect();
        self.render(&nodes)
    }

    /// DOT representation restricted to the nodes `outputs` depend on, e.g. only the
    /// inference path when `outputs` is the predictions node.
    pub fn to_dot_for(&self, graph: &Graph, outputs: &[NodeId]) -> Result<String> {
        let relevant = graph.dependencies(outputs, |_| false)?;
        let nodes = relevant
            .iter()
            .map(|&id| graph.node(id))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.render(&nodes))
    }

    fn render(&self, nodes: &[&Node]) -> String {
        let mut dot = String::new();
        dot.push_str("digraph ComputationalGraph {\n");
        dot.push_str("    rankdir=TB;\n");
        dot.push_str("    node [shape=box, style=filled];\n");
        dot.push_str("    edge [color=gray];\n");

        let mut clusters: BTreeMap<&str, Vec<&Node>> = BTreeMap::new();
        for &node in nodes {
            let cluster = if self.config.cluster_scopes {
                top_level_scope(node)
            } else {
                ""
            };
            clusters.entry(cluster).or_default().push(node);
        }

        for (index, (scope, members)) in clusters.iter().enumerate() {
            if scope.is_empty() {
                for node in members {
                    dot.push_str(&format!("    {}\n", self.node_line(node)));
                }
            } else {
                dot.push_str(&format!("    subgraph cluster_{} {{\n", index));
                dot.push_str(&format!("        label=\"{}\";\n", scope));
                for node in members {
                    dot.push_str(&format!("        {}\n", self.node_line(node)));
                }
                dot.push_str("    }\n");
            }
        }

        for node in nodes {
            for input in node.inputs() {
                dot.push_str(&format!("    n{} -> n{};\n", input.0, node.id.0));
            }
        }

        dot.push_str("}\n");
        dot
    }

    fn node_line(&self, node: &Node) -> String {
        format!(
            "n{} [label=\"{}\", fillcolor=\"{}\"];",
            node.id.0,
            self.create_node_label(node),
            self.get_node_color(node)
        )
    }

    fn create_node_label(&self, node: &Node) -> String {
        let mut label = format!("{}\\n{}", node.base_name(), node.kind_label());
        if self.config.show_shapes {
            label.push_str(&format!("\\n{}", node.spec.shape));
        }
        label
    }

    fn get_node_color(&self, node: &Node) -> &str {
        match node.kind {
            NodeKind::Placeholder => &self.config.placeholder_color,
            NodeKind::Variable { .. } | NodeKind::Constant(_) => &self.config.variable_color,
            NodeKind::Operation { .. } => &self.config.op_color,
        }
    }

    /// Save the graph as a DOT file
    pub fn save_dot(&self, graph: &Graph, path: impl AsRef<Path>) -> Result<()> {
        let dot_content = self.to_dot(graph);
        let mut file = File::create(path)?;
        file.write_all(dot_content.as_bytes())?;
        Ok(())
    }
}

fn top_level_scope(node: &Node) -> &str {
    match node.scope() {
        "" => "",
        scope => scope.split('/').next().unwrap_or(scope),
    }
}
