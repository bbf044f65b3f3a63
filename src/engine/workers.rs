use core::num::NonZeroUsize;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder, prelude::*};

/// Where the items of a round run.
#[derive(Debug)]
pub(super) enum Workers {
    /// On the caller's thread, in worklist order.
    Inline,
    /// On a dedicated pool; results still come back in worklist order.
    Pool(ThreadPool),
}

impl Workers {
    pub(super) fn new(threads: NonZeroUsize) -> Result<Self, ThreadPoolBuildError> {
        if threads.get() == 1 {
            return Ok(Self::Inline);
        }
        ThreadPoolBuilder::new()
            .num_threads(threads.get())
            .thread_name(|idx| format!("amorph-worker-{idx}"))
            .build()
            .map(Self::Pool)
    }

    /// Map every item, preserving order. Returning is the round's barrier:
    /// all effects of `f` happen-before the caller continues.
    pub(super) fn map_ref<'a, T, R, F>(&self, items: &'a [T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&'a T) -> R + Sync + Send,
    {
        match self {
            Self::Inline => items.iter().map(f).collect(),
            Self::Pool(pool) => pool.install(|| items.par_iter().map(f).collect()),
        }
    }

    /// Owned counterpart of [`Self::map_ref`].
    pub(super) fn map_owned<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync + Send,
    {
        match self {
            Self::Inline => items.into_iter().map(f).collect(),
            Self::Pool(pool) => pool.install(|| items.into_par_iter().map(f).collect()),
        }
    }
}
