// summary.rs
// Scalar summaries: named scalar nodes whose values are reported after a run.

use crate::graph::NodeId;
use tracing::info;

/// A scalar node registered for reporting under `tag`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSummary {
    pub tag: String,
    pub node: NodeId,
}

/// Destination of summary values.
pub trait SummarySink {
    fn record(&mut self, step: u64, tag: &str, value: f32);
}

/// Emits every value as a structured `info` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl SummarySink for TracingSink {
    fn record(&mut self, step: u64, tag: &str, value: f32) {
        info!(step, tag, value, "summary");
    }
}

/// Keeps every recorded value in memory, in recording order.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub records: Vec<(u64, String, f32)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent value recorded under `tag`.
    pub fn latest(&self, tag: &str) -> Option<f32> {
        self.records
            .iter()
            .rev()
            .find(|(_, t, _)| t == tag)
            .map(|&(_, _, v)| v)
    }
}

impl SummarySink for MemorySink {
    fn record(&mut self, step: u64, tag: &str, value: f32) {
        self.records.push((step, tag.to_string(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_latest() {
        let mut sink = MemorySink::new();
        sink.record(0, "loss", 2.0);
        sink.record(0, "error_2pc", 0.5);
        sink.record(1, "loss", 1.0);

        assert_eq!(sink.latest("loss"), Some(1.0));
        assert_eq!(sink.latest("error_2pc"), Some(0.5));
        assert_eq!(sink.latest("error_1pc"), None);
        assert_eq!(sink.records.len(), 3);
    }
}
