#![allow(dead_code)]

use amorph::{Activation, Graph, NodeId, Operator, TwoPhaseOperator};
use std::sync::{
    Mutex,
    atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering},
};

/// Greedy coloring: an uncolored node takes the smallest color none of its
/// neighbors has. Color 0 means uncolored.
#[derive(Debug)]
pub struct Coloring {
    colors: Vec<AtomicU32>,
    pub computes: AtomicUsize,
    pub commits: AtomicUsize,
}

impl Coloring {
    pub fn new(node_count: usize) -> Self {
        Self {
            colors: (0..node_count).map(|_| AtomicU32::new(0)).collect(),
            computes: AtomicUsize::new(0),
            commits: AtomicUsize::new(0),
        }
    }

    pub fn colors(&self) -> Vec<u32> {
        self.colors
            .iter()
            .map(|color| color.load(Ordering::Relaxed))
            .collect()
    }

    /// Every node colored and no edge joins two nodes of the same color.
    pub fn is_proper<G: Graph + ?Sized>(&self, graph: &G) -> bool {
        let colors = self.colors();
        (0..graph.node_count()).all(|node| {
            colors[node] != 0
                && graph
                    .neighbors(node)
                    .iter()
                    .all(|&neighbor| neighbor == node || colors[neighbor] != colors[node])
        })
    }

    fn pick<G: Graph + ?Sized>(&self, node: NodeId, graph: &G) -> u32 {
        let taken: Vec<u32> = graph
            .neighbors(node)
            .iter()
            .filter(|&&neighbor| neighbor != node)
            .map(|&neighbor| self.colors[neighbor].load(Ordering::Relaxed))
            .collect();
        (1..).find(|color| !taken.contains(color)).unwrap()
    }
}

impl<G: Graph + ?Sized> TwoPhaseOperator<G> for Coloring {
    type Scratch = u32;

    fn compute(&self, node: NodeId, graph: &G) -> u32 {
        self.computes.fetch_add(1, Ordering::Relaxed);
        self.pick(node, graph)
    }

    fn commit(&self, node: NodeId, color: u32, _graph: &G) -> Activation {
        self.commits.fetch_add(1, Ordering::Relaxed);
        self.colors[node].store(color, Ordering::Relaxed);
        Activation::done(1)
    }

    fn is_runnable(&self, node: NodeId, _graph: &G) -> bool {
        self.colors[node].load(Ordering::Relaxed) == 0
    }
}

impl<G: Graph + ?Sized> Operator<G> for Coloring {
    fn apply(&self, node: NodeId, graph: &G) -> Activation {
        let color = TwoPhaseOperator::compute(self, node, graph);
        TwoPhaseOperator::commit(self, node, color, graph)
    }

    fn is_runnable(&self, node: NodeId, _graph: &G) -> bool {
        self.colors[node].load(Ordering::Relaxed) == 0
    }
}

/// Every node must run `remaining[node]` times. Runs are logged in order.
#[derive(Debug)]
pub struct Countdown {
    remaining: Vec<AtomicU64>,
    pub log: Mutex<Vec<NodeId>>,
}

impl Countdown {
    pub fn new(remaining: impl IntoIterator<Item = u64>) -> Self {
        Self {
            remaining: remaining.into_iter().map(AtomicU64::new).collect(),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn uniform(node_count: usize, runs: u64) -> Self {
        Self::new(std::iter::repeat(runs).take(node_count))
    }

    /// Runs logged since the last call.
    pub fn take_log(&self) -> Vec<NodeId> {
        std::mem::take(&mut *self.log.lock().unwrap())
    }
}

impl<G: Graph + ?Sized> Operator<G> for Countdown {
    fn apply(&self, node: NodeId, _graph: &G) -> Activation {
        self.log.lock().unwrap().push(node);
        let left = self.remaining[node]
            .load(Ordering::Relaxed)
            .saturating_sub(1);
        self.remaining[node].store(left, Ordering::Relaxed);
        Activation {
            events_processed: 1,
            still_runnable: left > 0,
        }
    }

    fn is_runnable(&self, node: NodeId, _graph: &G) -> bool {
        self.remaining[node].load(Ordering::Relaxed) > 0
    }
}

/// Discrete-event style token passing: a node consumes all tokens waiting at
/// it and forwards the same number to each of its neighbors.
#[derive(Debug)]
pub struct Tokens {
    pending: Vec<AtomicU64>,
}

impl Tokens {
    pub fn new(pending: impl IntoIterator<Item = u64>) -> Self {
        Self {
            pending: pending.into_iter().map(AtomicU64::new).collect(),
        }
    }
}

impl<G: Graph + ?Sized> Operator<G> for Tokens {
    fn apply(&self, node: NodeId, graph: &G) -> Activation {
        let tokens = self.pending[node].swap(0, Ordering::Relaxed);
        for &neighbor in graph.neighbors(node) {
            self.pending[neighbor].fetch_add(tokens, Ordering::Relaxed);
        }
        Activation::done(tokens)
    }

    fn is_runnable(&self, node: NodeId, _graph: &G) -> bool {
        self.pending[node].load(Ordering::Relaxed) > 0
    }

    fn pending_work(&self, node: NodeId, _graph: &G) -> u64 {
        self.pending[node].load(Ordering::Relaxed)
    }
}

/// A node that never runs out of work.
#[derive(Debug, Default)]
pub struct Perpetual;

impl<G: Graph + ?Sized> Operator<G> for Perpetual {
    fn apply(&self, _node: NodeId, _graph: &G) -> Activation {
        Activation::again(1)
    }

    fn is_runnable(&self, _node: NodeId, _graph: &G) -> bool {
        true
    }
}
