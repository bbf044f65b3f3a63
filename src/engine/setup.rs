use crate::{graph::Graph, registry::WorkRegistry, types::NodeId};
use thiserror::Error;
use tracing::debug;

/// Configuration errors detected while constructing an engine.
///
/// These are fatal: nothing runs until the input is fixed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineSetupError {
    /// The initial active-node set is empty.
    #[error("initial active set is empty")]
    EmptyActiveSet,
    /// An initial active node does not exist in the graph.
    #[error("active node {node} is out of range for a graph of {node_count} nodes")]
    NodeOutOfRange {
        /// Offending identity.
        node: NodeId,
        /// Nodes in the graph.
        node_count: usize,
    },
    /// An edge points outside the graph.
    #[error("node {node} has neighbor {neighbor} out of range for a graph of {node_count} nodes")]
    NeighborOutOfRange {
        /// Edge source.
        node: NodeId,
        /// Edge target.
        neighbor: NodeId,
        /// Nodes in the graph.
        node_count: usize,
    },
    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Every neighbor identity must index the engine tables.
pub(super) fn validate_topology<G: Graph + ?Sized>(graph: &G) -> Result<(), EngineSetupError> {
    let node_count = graph.node_count();
    for node in 0..node_count {
        if let Some(&neighbor) = graph.neighbors(node).iter().find(|&&n| n >= node_count) {
            return Err(EngineSetupError::NeighborOutOfRange {
                node,
                neighbor,
                node_count,
            });
        }
    }
    Ok(())
}

/// Build the first current worklist, deduplicated through the registry.
pub(super) fn seed_worklist(
    initial: impl IntoIterator<Item = NodeId>,
    registry: &WorkRegistry,
) -> Result<Vec<NodeId>, EngineSetupError> {
    let node_count = registry.len();
    let mut current = Vec::new();
    for node in initial {
        if node >= node_count {
            return Err(EngineSetupError::NodeOutOfRange { node, node_count });
        }
        if !registry.enqueue(node, &mut current) {
            debug!(node, "duplicate initial node ignored");
        }
    }
    if current.is_empty() {
        return Err(EngineSetupError::EmptyActiveSet);
    }
    Ok(current)
}
