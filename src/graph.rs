use crate::types::NodeId;
use derive_more::Deref;

/// Read-only view of the graph topology the engine schedules over.
///
/// The engine never owns node or edge storage. It only requires dense node
/// identities and a stable neighbor list per node. Topology must not change
/// while an [`Engine`](crate::engine::Engine) borrows the graph; node payloads
/// may still be mutated by operators through interior mutability, since the
/// engine guarantees that concurrently executing items touch disjoint
/// neighborhoods.
pub trait Graph: Sync {
    /// Number of nodes. Valid identities are `0..node_count()`.
    fn node_count(&self) -> usize;
    /// Direct neighbors of `node` under the current edge set.
    fn neighbors(&self, node: NodeId) -> &[NodeId];
}

impl Graph for [Vec<NodeId>] {
    fn node_count(&self) -> usize {
        self.len()
    }

    fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self[node]
    }
}

impl Graph for Vec<Vec<NodeId>> {
    fn node_count(&self) -> usize {
        self.len()
    }

    fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self[node]
    }
}

/// Closed neighborhood of a node: the node itself plus its direct neighbors,
/// sorted ascending with duplicates removed.
///
/// The ascending order is also the lock acquisition order used by
/// [`ConflictGuard`](crate::guard::ConflictGuard).
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct Neighborhood(Vec<NodeId>);

impl Neighborhood {
    /// Build the closed neighborhood of `node`.
    pub fn closed<G: Graph + ?Sized>(node: NodeId, graph: &G) -> Self {
        let neighbors = graph.neighbors(node);
        let mut nodes = Vec::with_capacity(neighbors.len() + 1);
        nodes.push(node);
        nodes.extend_from_slice(neighbors);
        nodes.sort_unstable();
        nodes.dedup();
        Self(nodes)
    }

    /// Whether the two neighborhoods share at least one node.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let (mut lhs, mut rhs) = (self.0.iter().peekable(), other.0.iter().peekable());
        while let (Some(&&a), Some(&&b)) = (lhs.peek(), rhs.peek()) {
            match a.cmp(&b) {
                core::cmp::Ordering::Less => {
                    lhs.next();
                }
                core::cmp::Ordering::Greater => {
                    rhs.next();
                }
                core::cmp::Ordering::Equal => return true,
            }
        }
        false
    }
}

/// Compressed sparse row adjacency.
///
/// `offsets` has `node_count + 1` entries; the neighbors of `n` are
/// `targets[offsets[n]..offsets[n + 1]]`.
#[derive(Debug, Clone, Default)]
pub struct CsrGraph {
    offsets: Vec<usize>,
    targets: Vec<NodeId>,
}

impl CsrGraph {
    /// Builds a CSR graph from an adjacency list.
    ///
    /// # Panics
    ///
    /// Panics if any edge references a node outside of the adjacency list.
    pub fn from_adjacency(adjacency: &[Vec<NodeId>]) -> Self {
        let n = adjacency.len();
        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0);
        let mut targets = Vec::with_capacity(adjacency.iter().map(Vec::len).sum());
        for (u, neighbors) in adjacency.iter().enumerate() {
            for &v in neighbors {
                assert!(v < n, "edge {u}->{v} is out of bounds for n={n}");
                targets.push(v);
            }
            offsets.push(targets.len());
        }
        Self { offsets, targets }
    }

    /// Builds a graph where every `(u, v)` pair yields edges in both
    /// directions.
    ///
    /// # Panics
    ///
    /// Panics if an endpoint is not below `node_count`.
    pub fn undirected(node_count: usize, edges: impl IntoIterator<Item = (NodeId, NodeId)>) -> Self {
        let mut adjacency = vec![Vec::new(); node_count];
        for (u, v) in edges {
            assert!(
                u < node_count && v < node_count,
                "edge {u}-{v} is out of bounds for n={node_count}"
            );
            adjacency[u].push(v);
            if u != v {
                adjacency[v].push(u);
            }
        }
        Self::from_adjacency(&adjacency)
    }

    /// Number of stored (directed) edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.targets.len()
    }
}

impl Graph for CsrGraph {
    fn node_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.targets[self.offsets[node]..self.offsets[node + 1]]
    }
}
