use crate::{
    graph::{Graph, Neighborhood},
    sync::{AtomicUsize, Ordering},
    types::NodeId,
};
use derive_more::Debug;

const FREE: usize = usize::MAX;

/// Round-scoped neighborhood lock table.
///
/// Each slot holds the identity of the item that owns the node this round, or
/// nothing. Locks are never released per item: they are held until
/// [`ConflictGuard::release_all`] at the round boundary, so a conflicting item
/// is simply deferred to the next round instead of waiting.
///
/// The same table carries claims for the speculative strategy, where the
/// lowest item identity claiming a node wins it.
#[derive(Debug)]
pub struct ConflictGuard {
    #[debug(skip)]
    owners: Vec<AtomicUsize>,
}

impl ConflictGuard {
    /// Allocate a table with every node free.
    pub fn new(node_count: usize) -> Self {
        Self {
            owners: (0..node_count).map(|_| AtomicUsize::new(FREE)).collect(),
        }
    }

    /// Number of nodes covered by the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether the table covers no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Whether `node` is locked or claimed this round.
    #[must_use]
    pub fn is_locked(&self, node: NodeId) -> bool {
        self.owner(node).is_some()
    }

    /// The item currently owning `node`, if any.
    #[must_use]
    pub fn owner(&self, node: NodeId) -> Option<NodeId> {
        match self.owners[node].load(Ordering::Acquire) {
            FREE => None,
            owner => Some(owner),
        }
    }

    /// Lock the closed neighborhood of `node` if none of it is locked.
    ///
    /// All-or-nothing: on failure the table is left as it was.
    pub fn try_acquire<G: Graph + ?Sized>(&self, node: NodeId, graph: &G) -> bool {
        self.try_acquire_neighborhood(node, &Neighborhood::closed(node, graph))
    }

    /// Lock every node of `neighborhood` on behalf of `owner`.
    ///
    /// Nodes are taken in ascending order and the ones already taken are
    /// handed back when a later one turns out to be held. Concurrent callers
    /// therefore never both fail because of each other alone: the chain of
    /// holders ends at a caller that succeeds.
    pub fn try_acquire_neighborhood(&self, owner: NodeId, neighborhood: &Neighborhood) -> bool {
        for (taken, &node) in neighborhood.iter().enumerate() {
            if self.owners[node]
                .compare_exchange(FREE, owner, Ordering::Acquire, Ordering::Relaxed)
                .is_err()
            {
                for &held in &neighborhood[..taken] {
                    self.owners[held].store(FREE, Ordering::Release);
                }
                return false;
            }
        }
        true
    }

    /// Claim the closed neighborhood of `node` for speculation.
    pub fn claim<G: Graph + ?Sized>(&self, node: NodeId, graph: &G) {
        self.claim_neighborhood(node, &Neighborhood::closed(node, graph));
    }

    /// Claim every node of `neighborhood` for `owner`; a lower identity
    /// overrides a higher one.
    pub fn claim_neighborhood(&self, owner: NodeId, neighborhood: &Neighborhood) {
        for &node in neighborhood.iter() {
            self.owners[node].fetch_min(owner, Ordering::AcqRel);
        }
    }

    /// Whether `node` won every claim on its closed neighborhood.
    #[must_use]
    pub fn owns_neighborhood<G: Graph + ?Sized>(&self, node: NodeId, graph: &G) -> bool {
        self.owns_all(node, &Neighborhood::closed(node, graph))
    }

    /// Whether `owner` holds every node of `neighborhood`.
    #[must_use]
    pub fn owns_all(&self, owner: NodeId, neighborhood: &Neighborhood) -> bool {
        neighborhood
            .iter()
            .all(|&node| self.owners[node].load(Ordering::Acquire) == owner)
    }

    /// Free every node. Called once per round boundary; idempotent.
    pub fn release_all(&mut self) {
        for owner in &self.owners {
            owner.store(FREE, Ordering::Relaxed);
        }
    }

    /// Whether no node is locked.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.owners
            .iter()
            .all(|owner| owner.load(Ordering::Acquire) == FREE)
    }
}
