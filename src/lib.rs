//! Round-based execution engine for amorphous data-parallel graph algorithms.
//!
//! The unit of work is a graph node. Executing an item may read and write the
//! node and its direct neighbors, so two items conflict exactly when their
//! closed neighborhoods overlap. The engine:
//! - Runs work in rounds. Each round drains the current worklist, admits a set
//!   of items with pairwise disjoint neighborhoods, and defers the rest to the
//!   next round unchanged.
//! - Detects conflicts optimistically through a round-scoped lock table; locks
//!   are all-or-nothing per item and are all released at the round boundary.
//! - Propagates activity along edges into the next worklist with set
//!   semantics, so a node is never queued twice.
//! - Offers a speculative two-phase variant (compute into scratch, wait at the
//!   cautious point, commit) and a disjoint variant that decides admission
//!   ahead of execution. Both produce the same result for any worker count.
//!
//! Key modules:
//! - `engine`: the round controller, its strategies and the run report.
//! - `operator`: the per-node computation interfaces, single-pass and
//!   two-phase.
//! - `graph`: the topology interface the engine schedules over.
//! - `registry`, `worklist`, `guard`, `propagate`: the scheduling leaves.
//! - `profile`: per-round statistics and sinks.
//! - `config`: runtime strategy selection and engine settings.
//!
//! Quick start:
//! 1. Implement `Graph` for your topology (or use `CsrGraph` or an adjacency
//!    list).
//! 2. Implement `Operator::apply` and `Operator::is_runnable`, keeping node
//!    data behind interior mutability.
//! 3. Build an `Engine` with the initial active nodes and call `run`.
//!
//! The engine terminates when a round ends with nothing queued. A node that
//! stays runnable forever keeps it alive; bound such runs with
//! `EngineConfig::max_rounds` or drive them with `Engine::step`.

/// Runtime configuration: strategy selection, worker count, round cap.
pub mod config;
/// The round controller.
///
/// Drives rounds through begin, drain and end, dispatches items to one of the
/// strategies, and accumulates the run report.
pub mod engine;
/// Topology interface, closed neighborhoods and a CSR adjacency.
pub mod graph;
/// Round-scoped neighborhood lock table.
pub mod guard;
/// Per-node computation interfaces.
///
/// Defines `Operator` (single pass), `TwoPhaseOperator` (compute, then
/// commit) and the `Activation` they return.
pub mod operator;
/// Per-round statistics, sinks and the parallelism profile.
pub mod profile;
/// Activation propagation along the edges of an executed node.
pub mod propagate;
/// Set-semantics membership flags for the worklists.
pub mod registry;
mod sync;
/// Node identities.
pub mod types;
/// Double-buffered round worklists.
pub mod worklist;

pub use crate::{
    config::{EngineConfig, Strategy},
    engine::{Engine, EngineSetupError, RoundPhase, RunReport, Termination},
    graph::{CsrGraph, Graph, Neighborhood},
    operator::{Activation, Operator, TwoPhaseOperator},
    profile::{LogSink, ParallelismProfile, Round, RoundSink},
    types::NodeId,
};
