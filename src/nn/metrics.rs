// src/nn/metrics.rs
// Regression quality metrics: loss, per-element relative error and the share of
// predictions whose relative error exceeds a threshold.

use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::nn::losses::{Loss, MSELoss};
use crate::tensor::DType;
use tracing::debug;

pub const THRESHOLD_2PC: f32 = 0.02;
pub const THRESHOLD_1PC: f32 = 0.01;

/// Handles of the metric nodes attached to a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub loss: NodeId,
    pub relative_error: NodeId,
    pub err_2pc: NodeId,
    pub err_1pc: NodeId,
}

/// `|predictions - labels| / labels`, element-wise.
/// A zero label yields Inf (or NaN for 0/0) in the corresponding element.
pub fn relative_error(graph: &mut Graph, predictions: NodeId, labels: NodeId) -> Result<NodeId> {
    let diff = graph.sub(predictions, labels)?;
    let abs = graph.abs(diff)?;
    graph.div(abs, labels)
}

/// Fraction of elements of `relative_error` strictly greater than `threshold`.
/// NaN elements never count as exceeding.
pub fn error_rate(graph: &mut Graph, relative_error: NodeId, threshold: f32) -> Result<NodeId> {
    let limit = graph.scalar(threshold);
    let exceeds = graph.greater(relative_error, limit)?;
    let as_float = graph.cast(exceeds, DType::Float32)?;
    graph.mean(as_float)
}

/// Wires the MSE loss (scope `loss`) and the relative error metrics (scope `accuracy`),
/// and registers the `loss`, `error_2pc` and `error_1pc` scalar summaries.
pub fn attach_metrics(graph: &mut Graph, predictions: NodeId, labels: NodeId) -> Result<Metrics> {
    let loss = graph.name_scope("loss", |g| MSELoss.forward(g, predictions, labels))?;
    graph.add_scalar_summary("loss", loss)?;

    let (relative_error, err_2pc, err_1pc) = graph.name_scope("accuracy", |g| {
        let rel = relative_error(g, predictions, labels)?;
        let err_2pc = error_rate(g, rel, THRESHOLD_2PC)?;
        let err_1pc = error_rate(g, rel, THRESHOLD_1PC)?;
        Ok((rel, err_2pc, err_1pc))
    })?;
    graph.add_scalar_summary("error_2pc", err_2pc)?;
    graph.add_scalar_summary("error_1pc", err_1pc)?;

    debug!(?loss, ?err_2pc, ?err_1pc, "metrics attached");
    Ok(Metrics {
        loss,
        relative_error,
        err_2pc,
        err_1pc,
    })
}
