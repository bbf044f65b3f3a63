use crate::{graph::Graph, types::NodeId};

/// Result of executing one work item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Activation {
    /// Domain events consumed by this execution. Summed into
    /// [`RunReport::events_processed`](crate::engine::RunReport::events_processed).
    pub events_processed: u64,
    /// Whether the executed node must run again in a later round.
    pub still_runnable: bool,
}

impl Activation {
    /// The node has no more work after this execution.
    #[must_use]
    pub const fn done(events_processed: u64) -> Self {
        Self {
            events_processed,
            still_runnable: false,
        }
    }

    /// The node stays active and is requeued for the next round.
    #[must_use]
    pub const fn again(events_processed: u64) -> Self {
        Self {
            events_processed,
            still_runnable: true,
        }
    }
}

/// Single-pass per-node computation.
///
/// `apply` may read and write the node and its direct neighbors. The engine
/// guarantees that no other item touching any of those nodes runs
/// concurrently. Writes to data outside the closed neighborhood, or changes to
/// the edge set, are not protected.
pub trait Operator<G: Graph + ?Sized>: Sync {
    /// Execute the node.
    fn apply(&self, node: NodeId, graph: &G) -> Activation;
    /// Whether `node` currently has work. Consulted for the neighbors of an
    /// executed node to decide which of them become active.
    fn is_runnable(&self, node: NodeId, graph: &G) -> bool;
    /// Amount of pending work queued at `node`, sampled right before it
    /// executes. The maximum is reported in
    /// [`RunReport::max_pending_work`](crate::engine::RunReport::max_pending_work).
    fn pending_work(&self, _node: NodeId, _graph: &G) -> u64 {
        0
    }
}

/// Two-phase per-node computation for the speculative strategies.
///
/// `compute` runs before the cautious point and must not mutate shared
/// state: it may be discarded if the item aborts. `commit` applies the scratch
/// result once the item is known not to be retried.
pub trait TwoPhaseOperator<G: Graph + ?Sized>: Sync {
    /// Item-local state produced by the first pass.
    type Scratch: Send;
    /// First pass: read the neighborhood and compute into private scratch.
    fn compute(&self, node: NodeId, graph: &G) -> Self::Scratch;
    /// Second pass: apply the scratch to the shared graph state.
    fn commit(&self, node: NodeId, scratch: Self::Scratch, graph: &G) -> Activation;
    /// See [`Operator::is_runnable`].
    fn is_runnable(&self, node: NodeId, graph: &G) -> bool;
    /// See [`Operator::pending_work`].
    fn pending_work(&self, _node: NodeId, _graph: &G) -> u64 {
        0
    }
}

/// Runs a single-pass operator through the two-phase interface: the whole
/// `apply` happens at commit time.
#[derive(Debug)]
pub(crate) struct SinglePass<'a, O>(pub(crate) &'a O);

impl<G: Graph + ?Sized, O: Operator<G>> TwoPhaseOperator<G> for SinglePass<'_, O> {
    type Scratch = ();

    fn compute(&self, _node: NodeId, _graph: &G) -> Self::Scratch {}

    fn commit(&self, node: NodeId, (): Self::Scratch, graph: &G) -> Activation {
        self.0.apply(node, graph)
    }

    fn is_runnable(&self, node: NodeId, graph: &G) -> bool {
        self.0.is_runnable(node, graph)
    }

    fn pending_work(&self, node: NodeId, graph: &G) -> u64 {
        self.0.pending_work(node, graph)
    }
}
