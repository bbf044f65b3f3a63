use rustc_hash::FxBuildHasher;
use std::collections::HashSet as _HashSet;

/// Stable identity of a graph node.
///
/// Identities are dense in `[0, node_count)` so that every engine-owned table
/// (locks, worklist flags) is a plain array indexed directly by `NodeId`.
pub type NodeId = usize;

pub(crate) type HashSet<T> = _HashSet<T, FxBuildHasher>;
