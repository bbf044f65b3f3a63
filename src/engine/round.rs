use crate::{
    engine::workers::Workers,
    graph::Graph,
    guard::ConflictGuard,
    operator::TwoPhaseOperator,
    propagate::propagate,
    registry::WorkRegistry,
    types::NodeId,
};
use tracing::trace;

/// What happened to one item of a round.
#[derive(Debug)]
pub(super) struct ItemOutcome {
    /// The item's computation started.
    pub(super) attempted: bool,
    /// The item's result reached the graph.
    pub(super) committed: bool,
    pub(super) events_processed: u64,
    pub(super) pending_work: u64,
    /// Entries for the next worklist, in push order.
    pub(super) pushes: Vec<NodeId>,
}

impl ItemOutcome {
    /// Not admitted; moves to the next worklist unchanged, keeping its flag.
    pub(super) fn deferred(node: NodeId) -> Self {
        Self {
            attempted: false,
            committed: false,
            events_processed: 0,
            pending_work: 0,
            pushes: vec![node],
        }
    }

    /// Computed but not committed; its scratch is already dropped.
    pub(super) fn aborted(node: NodeId) -> Self {
        Self {
            attempted: true,
            ..Self::deferred(node)
        }
    }
}

/// Everything an item needs while a round is draining.
pub(super) struct RoundCtx<'a, G: ?Sized, O> {
    pub(super) graph: &'a G,
    pub(super) op: &'a O,
    pub(super) guard: &'a ConflictGuard,
    pub(super) registry: &'a WorkRegistry,
}

impl<G, O> RoundCtx<'_, G, O>
where
    G: Graph + ?Sized,
    O: TwoPhaseOperator<G>,
{
    /// Both passes back to back. The caller owns the neighborhood already.
    pub(super) fn execute(&self, node: NodeId) -> ItemOutcome {
        let pending_work = self.op.pending_work(node, self.graph);
        let scratch = self.op.compute(node, self.graph);
        self.commit(node, scratch, pending_work)
    }

    /// Second pass and propagation.
    pub(super) fn commit(&self, node: NodeId, scratch: O::Scratch, pending_work: u64) -> ItemOutcome {
        let activation = self.op.commit(node, scratch, self.graph);
        let mut pushes = Vec::new();
        propagate(node, self.graph, self.op, &activation, self.registry, &mut pushes);
        ItemOutcome {
            attempted: true,
            committed: true,
            events_processed: activation.events_processed,
            pending_work,
            pushes,
        }
    }
}

/// Optimistic locking: every item tries to lock its neighborhood and is
/// deferred if any of it is taken.
pub(super) fn base_round<G, O>(
    ctx: &RoundCtx<'_, G, O>,
    workers: &Workers,
    items: &[NodeId],
) -> Vec<ItemOutcome>
where
    G: Graph + ?Sized,
    O: TwoPhaseOperator<G>,
{
    workers.map_ref(items, |&node| {
        if ctx.guard.try_acquire(node, ctx.graph) {
            ctx.execute(node)
        } else {
            trace!(node, "neighborhood busy, deferred");
            ItemOutcome::deferred(node)
        }
    })
}

/// Admission decided up front over `items` sorted by identity: an item is
/// admitted when its neighborhood misses every earlier admitted one. Admitted
/// items never abort.
pub(super) fn disjoint_round<G, O>(
    ctx: &RoundCtx<'_, G, O>,
    workers: &Workers,
    items: &[NodeId],
) -> Vec<ItemOutcome>
where
    G: Graph + ?Sized,
    O: TwoPhaseOperator<G>,
{
    debug_assert!(
        items.windows(2).all(|pair| pair[0] < pair[1]),
        "disjoint_round: [1]"
    );
    let plan: Vec<(NodeId, bool)> = items
        .iter()
        .map(|&node| (node, ctx.guard.try_acquire(node, ctx.graph)))
        .collect();
    workers.map_owned(plan, |(node, admitted)| {
        if admitted {
            ctx.execute(node)
        } else {
            trace!(node, "overlaps an admitted item, deferred");
            ItemOutcome::deferred(node)
        }
    })
}
