use crate::{
    graph::Graph,
    operator::{Activation, TwoPhaseOperator},
    registry::WorkRegistry,
    types::NodeId,
};

/// Queue the work made runnable by executing `node`.
///
/// Runnable neighbors go through the registry, so a neighbor already queued in
/// either worklist is not queued again. The executed node itself is still
/// flagged as queued: it is pushed straight back if it stays runnable, and its
/// flag is cleared otherwise so that no flag outlives its worklist entry.
pub fn propagate<G, O>(
    node: NodeId,
    graph: &G,
    op: &O,
    activation: &Activation,
    registry: &WorkRegistry,
    next: &mut Vec<NodeId>,
) where
    G: Graph + ?Sized,
    O: TwoPhaseOperator<G> + ?Sized,
{
    for &neighbor in graph.neighbors(node) {
        if op.is_runnable(neighbor, graph) {
            registry.enqueue(neighbor, next);
        }
    }
    if activation.still_runnable {
        next.push(node);
    } else {
        registry.retire(node);
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use crate::operator::{Operator, SinglePass};

    struct Flags(Vec<bool>);

    impl Operator<Vec<Vec<NodeId>>> for Flags {
        fn apply(&self, _node: NodeId, _graph: &Vec<Vec<NodeId>>) -> Activation {
            Activation::default()
        }

        fn is_runnable(&self, node: NodeId, _graph: &Vec<Vec<NodeId>>) -> bool {
            self.0[node]
        }
    }

    #[test]
    fn runnable_neighbors_are_queued_once() {
        let graph = vec![vec![1, 2, 3], vec![0], vec![0], vec![0]];
        let op = Flags(vec![false, true, false, true]);
        let registry = WorkRegistry::new(4);
        let mut next = Vec::new();
        // 0 is executing and 3 is already queued elsewhere.
        registry.enqueue(0, &mut Vec::new());
        registry.enqueue(3, &mut Vec::new());
        propagate(0, &graph, &SinglePass(&op), &Activation::done(1), &registry, &mut next);
        assert_eq!(next, [1]);
        assert!(!registry.is_queued(0));
        assert!(registry.is_queued(1));
    }

    #[test]
    fn still_runnable_node_is_requeued() {
        let graph = vec![vec![]];
        let op = Flags(vec![true]);
        let registry = WorkRegistry::new(1);
        let mut next = Vec::new();
        registry.enqueue(0, &mut Vec::new());
        propagate(0, &graph, &SinglePass(&op), &Activation::again(0), &registry, &mut next);
        assert_eq!(next, [0]);
        assert!(registry.is_queued(0));
    }
}
