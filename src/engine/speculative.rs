use crate::{
    engine::{
        round::{ItemOutcome, RoundCtx},
        workers::Workers,
    },
    graph::{Graph, Neighborhood},
    operator::TwoPhaseOperator,
    types::NodeId,
};
use tracing::trace;

/// First-pass result of one item, held until the cautious point.
struct Speculation<S> {
    node: NodeId,
    neighborhood: Neighborhood,
    pending_work: u64,
    scratch: S,
}

/// Two-phase round over `items` sorted by identity.
///
/// First pass: every item claims its closed neighborhood and computes into
/// private scratch; the graph is not written. Cautious point: the first pass
/// has joined, so every claim of the round is final. Second pass: an item
/// that owns its whole neighborhood commits; the others drop their scratch
/// and are requeued unchanged. The lowest identity of every overlapping
/// cluster owns its neighborhood, so each round commits at least one item, and
/// the set of winners does not depend on how the first pass was scheduled.
pub(super) fn speculative_round<G, O>(
    ctx: &RoundCtx<'_, G, O>,
    workers: &Workers,
    items: &[NodeId],
) -> Vec<ItemOutcome>
where
    G: Graph + ?Sized,
    O: TwoPhaseOperator<G>,
{
    let speculations = workers.map_ref(items, |&node| {
        let neighborhood = Neighborhood::closed(node, ctx.graph);
        ctx.guard.claim_neighborhood(node, &neighborhood);
        Speculation {
            node,
            neighborhood,
            pending_work: ctx.op.pending_work(node, ctx.graph),
            scratch: ctx.op.compute(node, ctx.graph),
        }
    });

    workers.map_owned(speculations, |speculation| {
        let Speculation {
            node,
            neighborhood,
            pending_work,
            scratch,
        } = speculation;
        if ctx.guard.owns_all(node, &neighborhood) {
            ctx.commit(node, scratch, pending_work)
        } else {
            trace!(node, "speculation aborted at cautious point");
            ItemOutcome::aborted(node)
        }
    })
}
