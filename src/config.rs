use core::{num::NonZeroUsize, str::FromStr};
use derive_more::Display;
use thiserror::Error;
use tracing::warn;

/// How items of a round are admitted and executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum Strategy {
    /// Optimistic neighborhood locking; conflicting items are deferred to the
    /// next round. With one worker this is the exact serial ParaMeter loop.
    #[default]
    #[display("base")]
    Base,
    /// Compute every item into private scratch, stop at the cautious point,
    /// then commit only the items whose neighborhood no lower-identity item
    /// claimed. The others abort and are requeued.
    #[display("speculative")]
    Speculative,
    /// Sort by node identity and admit a greedy non-overlapping subset ahead
    /// of execution; nothing aborts.
    #[display("disjoint")]
    Disjoint,
}

/// Error returned when parsing an unknown [`Strategy`] name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown strategy {0:?}, expected one of: base, speculative, disjoint")]
pub struct ParseStrategyError(String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" | "nondet" => Ok(Self::Base),
            "speculative" | "cautious" | "prefix" => Ok(Self::Speculative),
            "disjoint" => Ok(Self::Disjoint),
            _ => Err(ParseStrategyError(s.to_owned())),
        }
    }
}

/// Runtime settings of an [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Admission strategy.
    pub strategy: Strategy,
    /// Worker threads per round. One runs items inline on the caller's thread.
    pub threads: NonZeroUsize,
    /// Stop after this many rounds even if work remains.
    pub max_rounds: Option<u64>,
    /// Check lock-table and worklist-flag invariants at every round end.
    pub verify_invariants: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Base,
            threads: NonZeroUsize::MIN,
            max_rounds: None,
            verify_invariants: cfg!(debug_assertions),
        }
    }
}

impl EngineConfig {
    /// Use `strategy`.
    #[must_use]
    pub fn with_strategy(self, strategy: Strategy) -> Self {
        Self { strategy, ..self }
    }

    /// Run rounds on `threads` workers; zero is treated as one.
    #[must_use]
    pub fn with_threads(self, threads: usize) -> Self {
        Self {
            threads: NonZeroUsize::new(threads).unwrap_or(NonZeroUsize::MIN),
            ..self
        }
    }

    /// Stop after `max_rounds` rounds.
    #[must_use]
    pub fn with_max_rounds(self, max_rounds: u64) -> Self {
        Self {
            max_rounds: Some(max_rounds),
            ..self
        }
    }

    /// Turn round-end invariant checks on or off.
    #[must_use]
    pub fn with_invariant_checks(self, verify_invariants: bool) -> Self {
        Self {
            verify_invariants,
            ..self
        }
    }

    /// Defaults overridden by environment variables:
    ///
    /// - `AMORPH_STRATEGY`: `base`, `speculative` or `disjoint`
    /// - `AMORPH_THREADS`: worker count
    /// - `AMORPH_MAX_ROUNDS`: round cap
    /// - `AMORPH_VERIFY_INVARIANTS`: `true` or `false`
    ///
    /// Unparsable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(strategy) = parsed(&lookup, "AMORPH_STRATEGY") {
            config.strategy = strategy;
        }
        if let Some(threads) = parsed::<usize>(&lookup, "AMORPH_THREADS") {
            config = config.with_threads(threads);
        }
        if let Some(max_rounds) = parsed(&lookup, "AMORPH_MAX_ROUNDS") {
            config.max_rounds = Some(max_rounds);
        }
        if let Some(verify) = parsed(&lookup, "AMORPH_VERIFY_INVARIANTS") {
            config.verify_invariants = verify;
        }
        config
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, value = %raw, %err, "ignoring invalid engine setting");
            None
        }
    }
}
