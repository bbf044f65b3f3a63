use derive_more::Display;
use tracing::info;

/// Statistics of one finished round.
///
/// Renders as the ParaMeter line `<step> <activities> <worklist size>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{index} {items_committed} {worklist_size_at_start}")]
pub struct Round {
    /// Zero-based, strictly increasing round number.
    pub index: u64,
    /// Items whose computation started this round.
    pub items_attempted: u64,
    /// Items whose computation was applied to the graph this round.
    pub items_committed: u64,
    /// Length of the current worklist when the round began.
    pub worklist_size_at_start: u64,
}

/// Receiver of per-round statistics.
pub trait RoundSink {
    /// Called once per round, after the round's locks are released.
    fn record(&mut self, round: &Round);
}

impl RoundSink for () {
    fn record(&mut self, _round: &Round) {}
}

impl RoundSink for Vec<Round> {
    fn record(&mut self, round: &Round) {
        self.push(*round);
    }
}

impl<S: RoundSink + ?Sized> RoundSink for &mut S {
    fn record(&mut self, round: &Round) {
        (**self).record(round);
    }
}

/// Emits every round as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl RoundSink for LogSink {
    fn record(&mut self, round: &Round) {
        info!(
            step = round.index,
            activities = round.items_committed,
            attempted = round.items_attempted,
            wlsize = round.worklist_size_at_start,
            "parameter round"
        );
    }
}

/// Available-parallelism profile aggregated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParallelismProfile {
    /// Rounds recorded.
    pub rounds: u64,
    /// Sum of committed items.
    pub committed: u64,
    /// Sum of attempted items.
    pub attempted: u64,
    /// Largest number of items committed in one round.
    pub peak_parallelism: u64,
    /// Largest worklist seen at a round start.
    pub peak_worklist: u64,
}

impl ParallelismProfile {
    /// Mean committed items per round; zero before any round.
    #[must_use]
    pub fn average_parallelism(&self) -> f64 {
        if self.rounds == 0 {
            return 0.0;
        }
        self.committed as f64 / self.rounds as f64
    }

    /// Committed items over attempted items; one when nothing was attempted.
    #[must_use]
    pub fn commit_ratio(&self) -> f64 {
        if self.attempted == 0 {
            return 1.0;
        }
        self.committed as f64 / self.attempted as f64
    }
}

impl RoundSink for ParallelismProfile {
    fn record(&mut self, round: &Round) {
        self.rounds += 1;
        self.committed += round.items_committed;
        self.attempted += round.items_attempted;
        self.peak_parallelism = self.peak_parallelism.max(round.items_committed);
        self.peak_worklist = self.peak_worklist.max(round.worklist_size_at_start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(index: u64, attempted: u64, committed: u64, size: u64) -> Round {
        Round {
            index,
            items_attempted: attempted,
            items_committed: committed,
            worklist_size_at_start: size,
        }
    }

    #[test]
    fn renders_parameter_line() {
        assert_eq!(round(3, 5, 4, 9).to_string(), "3 4 9");
    }

    #[test]
    fn profile_aggregates() {
        let mut profile = ParallelismProfile::default();
        profile.record(&round(0, 4, 2, 6));
        profile.record(&round(1, 4, 4, 4));
        assert_eq!(profile.rounds, 2);
        assert_eq!(profile.peak_parallelism, 4);
        assert_eq!(profile.peak_worklist, 6);
        assert!((profile.average_parallelism() - 3.0).abs() < f64::EPSILON);
        assert!((profile.commit_ratio() - 0.75).abs() < f64::EPSILON);
    }
}
