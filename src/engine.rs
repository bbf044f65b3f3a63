mod round;
mod setup;
mod speculative;
mod workers;

/// Error returned by `Engine::new` when the input cannot be scheduled.
pub use crate::engine::setup::EngineSetupError;
use crate::{
    config::{EngineConfig, Strategy},
    engine::{
        round::{RoundCtx, base_round, disjoint_round},
        speculative::speculative_round,
        workers::Workers,
    },
    graph::Graph,
    guard::ConflictGuard,
    operator::{Operator, SinglePass, TwoPhaseOperator},
    profile::{Round, RoundSink},
    registry::WorkRegistry,
    types::NodeId,
    worklist::Worklists,
};
use derive_more::{Debug, Display};
use tracing::{debug, info, instrument};

/// Lifecycle of the round controller.
///
/// Between calls the engine is either `Idle` (work is queued) or
/// `Terminated` (a round ended with an empty next worklist). The other phases
/// are only observable from inside a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RoundPhase {
    /// Waiting for the next round; the current worklist is non-empty.
    Idle,
    /// Snapshotting the worklist size and resetting per-round state.
    RoundBegin,
    /// Attempting the items of the current worklist.
    Draining,
    /// Releasing locks and swapping worklists.
    RoundEnd,
    /// No work left.
    Terminated,
}

/// Why a run returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A round ended with nothing queued for the next one.
    Converged,
    /// `EngineConfig::max_rounds` was reached with work still queued.
    RoundLimit,
    /// Work is still queued and no cap applied; the caller stopped stepping.
    Paused,
}

/// Aggregate counters of everything the engine ran so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Rounds completed.
    pub rounds: u64,
    /// Sum of `Activation::events_processed` over committed items.
    pub events_processed: u64,
    /// Committed items.
    pub iterations: u64,
    /// Largest `pending_work` sampled before a committed item ran.
    pub max_pending_work: u64,
    /// Why the run stopped.
    pub termination: Termination,
}

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    events_processed: u64,
    iterations: u64,
    max_pending_work: u64,
}

/// Round-based executor for amorphous data-parallel graph algorithms.
///
/// Each round drains the current worklist. An item runs only when its closed
/// neighborhood is disjoint from every other item running in the same round;
/// the rest are deferred to the next round unchanged. Work activated by
/// running items goes to the next worklist, deduplicated by the work
/// registry. The engine terminates exactly when a round ends with an empty
/// next worklist.
///
/// Engine-owned tables (locks, worklist flags) are allocated once at
/// construction, reset at every round boundary and dropped with the engine.
#[must_use]
#[derive(Debug)]
pub struct Engine<'g, G: Graph + ?Sized> {
    #[debug(skip)]
    graph: &'g G,
    config: EngineConfig,
    guard: ConflictGuard,
    registry: WorkRegistry,
    worklists: Worklists,
    workers: Workers,
    phase: RoundPhase,
    rounds: u64,
    totals: Totals,
}

impl<'g, G: Graph + ?Sized> Engine<'g, G> {
    /// Validate the graph, seed the worklist with `initial` and start the
    /// worker pool.
    ///
    /// Duplicate initial nodes are queued once.
    ///
    /// # Errors
    /// If `initial` is empty or out of range, if an edge points outside the
    /// graph, or if the worker pool cannot be built.
    pub fn new(
        graph: &'g G,
        initial: impl IntoIterator<Item = NodeId>,
        config: EngineConfig,
    ) -> Result<Self, EngineSetupError> {
        setup::validate_topology(graph)?;
        let node_count = graph.node_count();
        let registry = WorkRegistry::new(node_count);
        let current = setup::seed_worklist(initial, &registry)?;
        let workers = Workers::new(config.threads)?;
        debug!(
            node_count,
            active = current.len(),
            strategy = %config.strategy,
            threads = config.threads.get(),
            "engine ready"
        );
        Ok(Self {
            graph,
            guard: ConflictGuard::new(node_count),
            registry,
            worklists: Worklists::with_current(current),
            workers,
            phase: RoundPhase::Idle,
            rounds: 0,
            totals: Totals::default(),
            config,
        })
    }

    /// Settings the engine was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Whether the last round left no work.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.phase == RoundPhase::Terminated
    }

    /// Rounds completed so far.
    #[must_use]
    pub fn rounds_completed(&self) -> u64 {
        self.rounds
    }

    /// Items queued for the next round, in the order they will be attempted
    /// by the base strategy.
    #[must_use]
    pub fn worklist(&self) -> &[NodeId] {
        self.worklists.current()
    }

    /// Whether `node` is queued.
    #[must_use]
    pub fn is_queued(&self, node: NodeId) -> bool {
        self.registry.is_queued(node)
    }

    /// Whether `node` is locked. Always `false` between rounds.
    #[must_use]
    pub fn is_locked(&self, node: NodeId) -> bool {
        self.guard.is_locked(node)
    }

    /// Counters accumulated so far.
    pub fn report(&self) -> RunReport {
        let termination = if self.is_terminated() {
            Termination::Converged
        } else {
            Termination::Paused
        };
        self.report_with(termination)
    }

    /// Run one round of a single-pass operator. `None` once terminated.
    pub fn step<O: Operator<G>>(&mut self, op: &O) -> Option<Round> {
        self.step_two_phase(&SinglePass(op))
    }

    /// Run one round of a two-phase operator. `None` once terminated.
    pub fn step_two_phase<O: TwoPhaseOperator<G>>(&mut self, op: &O) -> Option<Round> {
        (!self.is_terminated()).then(|| self.round(op))
    }

    /// Run a single-pass operator until termination or the round cap.
    pub fn run<O: Operator<G>>(&mut self, op: &O, sink: impl RoundSink) -> RunReport {
        self.run_two_phase(&SinglePass(op), sink)
    }

    /// Run a two-phase operator until termination or the round cap.
    #[instrument(
        level = "debug",
        skip_all,
        fields(strategy = %self.config.strategy, threads = self.config.threads.get())
    )]
    pub fn run_two_phase<O: TwoPhaseOperator<G>>(
        &mut self,
        op: &O,
        mut sink: impl RoundSink,
    ) -> RunReport {
        let termination = loop {
            if self.is_terminated() {
                break Termination::Converged;
            }
            if self.config.max_rounds.is_some_and(|cap| self.rounds >= cap) {
                break Termination::RoundLimit;
            }
            let round = self.round(op);
            sink.record(&round);
        };
        let report = self.report_with(termination);
        info!(
            rounds = report.rounds,
            events = report.events_processed,
            iterations = report.iterations,
            max_pending = report.max_pending_work,
            ?termination,
            "run finished"
        );
        report
    }

    fn report_with(&self, termination: Termination) -> RunReport {
        let Totals {
            events_processed,
            iterations,
            max_pending_work,
        } = self.totals;
        RunReport {
            rounds: self.rounds,
            events_processed,
            iterations,
            max_pending_work,
            termination,
        }
    }

    /// One full round: begin, drain, end.
    ///
    /// # Panics
    /// If called while not idle, or, with invariant checks on, if a lock
    /// survives the round boundary or the worklist flags disagree with the new
    /// current worklist. Both are scheduler bugs.
    fn round<O: TwoPhaseOperator<G>>(&mut self, op: &O) -> Round {
        assert_eq!(self.phase, RoundPhase::Idle, "Engine::round: [1]");

        self.phase = RoundPhase::RoundBegin;
        let index = self.rounds;
        self.worklists.clear_next();
        let mut items = self.worklists.dequeue_all_current();
        let worklist_size_at_start = items.len() as u64;

        self.phase = RoundPhase::Draining;
        if self.config.strategy != Strategy::Base {
            items.sort_unstable();
        }
        let ctx = RoundCtx {
            graph: self.graph,
            op,
            guard: &self.guard,
            registry: &self.registry,
        };
        let outcomes = match self.config.strategy {
            Strategy::Base => base_round(&ctx, &self.workers, &items),
            Strategy::Speculative => speculative_round(&ctx, &self.workers, &items),
            Strategy::Disjoint => disjoint_round(&ctx, &self.workers, &items),
        };
        let (mut items_attempted, mut items_committed) = (0, 0);
        let next = self.worklists.next_mut();
        for outcome in outcomes {
            items_attempted += u64::from(outcome.attempted);
            items_committed += u64::from(outcome.committed);
            self.totals.events_processed += outcome.events_processed;
            self.totals.max_pending_work = self.totals.max_pending_work.max(outcome.pending_work);
            next.extend(outcome.pushes);
        }
        self.totals.iterations += items_committed;

        self.phase = RoundPhase::RoundEnd;
        self.guard.release_all();
        self.worklists.finish_round(items);
        if self.config.verify_invariants {
            assert!(
                self.guard.is_clear(),
                "Engine::round: [2] lock held across a round boundary"
            );
            self.registry.assert_consistent(self.worklists.current());
        }
        self.rounds += 1;
        self.phase = if self.worklists.current().is_empty() {
            RoundPhase::Terminated
        } else {
            RoundPhase::Idle
        };

        let round = Round {
            index,
            items_attempted,
            items_committed,
            worklist_size_at_start,
        };
        debug!(
            round = index,
            committed = items_committed,
            attempted = items_attempted,
            wlsize = worklist_size_at_start,
            next = self.worklists.current().len(),
            "round finished"
        );
        round
    }
}
