use crate::{
    sync::{AtomicBool, Ordering},
    types::{HashSet, NodeId},
};
use derive_more::Debug;

/// Set-semantics membership table for the worklists.
///
/// One flag per node records whether the node currently sits in either
/// worklist. The flag is set on the first enqueue and cleared only when the
/// node is known not to stay queued, which is what keeps every node at most
/// once in flight.
#[derive(Debug)]
pub struct WorkRegistry {
    #[debug(skip)]
    flags: Vec<AtomicBool>,
}

impl WorkRegistry {
    /// Allocate a registry with every flag cleared.
    pub fn new(node_count: usize) -> Self {
        Self {
            flags: (0..node_count).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    /// Number of nodes covered by the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the registry covers no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether `node` is currently marked as queued.
    #[must_use]
    pub fn is_queued(&self, node: NodeId) -> bool {
        self.flags[node].load(Ordering::Acquire)
    }

    /// Append `node` to `target` unless it is already queued.
    ///
    /// Returns `true` if the node was appended. Safe to call concurrently: of
    /// several racing callers for the same node exactly one appends it.
    pub fn enqueue(&self, node: NodeId, target: &mut Vec<NodeId>) -> bool {
        let newly_queued = !self.flags[node].swap(true, Ordering::AcqRel);
        if newly_queued {
            target.push(node);
        }
        newly_queued
    }

    /// Clear the flag of a node that leaves the worklists for good.
    pub fn retire(&self, node: NodeId) {
        let was_queued = self.flags[node].swap(false, Ordering::AcqRel);
        assert!(was_queued, "WorkRegistry::retire: [1] node {node} was not queued");
    }

    /// Number of nodes currently flagged.
    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.flags
            .iter()
            .filter(|flag| flag.load(Ordering::Acquire))
            .count()
    }

    /// Check that the flags describe `worklist` exactly: every entry flagged,
    /// no entry twice, and no flag without an entry.
    ///
    /// # Panics
    /// If the set semantics are broken. This is a scheduler bug and is never
    /// silently repaired.
    pub fn assert_consistent(&self, worklist: &[NodeId]) {
        let mut seen = HashSet::with_capacity_and_hasher(worklist.len(), Default::default());
        for &node in worklist {
            assert!(
                seen.insert(node),
                "WorkRegistry::assert_consistent: [1] node {node} queued twice"
            );
            assert!(
                self.is_queued(node),
                "WorkRegistry::assert_consistent: [2] node {node} queued without its flag"
            );
        }
        assert_eq!(
            self.queued_count(),
            worklist.len(),
            "WorkRegistry::assert_consistent: [3] flagged nodes missing from the worklists"
        );
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    #[test]
    fn enqueue_is_deduplicated() {
        let registry = WorkRegistry::new(4);
        let mut list = Vec::new();
        assert!(registry.enqueue(2, &mut list));
        assert!(!registry.enqueue(2, &mut list));
        assert!(registry.enqueue(0, &mut list));
        assert_eq!(list, [2, 0]);
        assert_eq!(registry.queued_count(), 2);
        registry.assert_consistent(&list);
    }

    #[test]
    fn retire_allows_requeue() {
        let registry = WorkRegistry::new(1);
        let mut list = Vec::new();
        registry.enqueue(0, &mut list);
        registry.retire(0);
        assert!(!registry.is_queued(0));
        assert!(registry.enqueue(0, &mut list));
        assert_eq!(list, [0, 0]);
    }

    #[test]
    #[should_panic(expected = "WorkRegistry::retire: [1]")]
    fn retiring_unqueued_node_fails_loudly() {
        WorkRegistry::new(1).retire(0);
    }

    #[test]
    #[should_panic(expected = "WorkRegistry::assert_consistent: [3]")]
    fn orphan_flag_is_detected() {
        let registry = WorkRegistry::new(3);
        registry.enqueue(1, &mut Vec::new());
        registry.assert_consistent(&[]);
    }

    #[test]
    #[should_panic(expected = "WorkRegistry::assert_consistent: [1]")]
    fn duplicate_entry_is_detected() {
        let registry = WorkRegistry::new(3);
        let mut list = Vec::new();
        registry.enqueue(1, &mut list);
        list.push(1);
        registry.assert_consistent(&list);
    }
}
