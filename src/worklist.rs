use crate::types::NodeId;
use core::mem;

/// Double-buffered round worklists.
///
/// `current` is drained during a round while `next` is built; at the round
/// boundary the buffers swap so that `next` becomes `current` without copying
/// and the drained buffer's capacity is reused.
#[derive(Debug, Default)]
pub struct Worklists {
    current: Vec<NodeId>,
    next: Vec<NodeId>,
}

impl Worklists {
    /// Start with `initial` as the current worklist.
    pub fn with_current(initial: Vec<NodeId>) -> Self {
        Self {
            current: initial,
            next: Vec::new(),
        }
    }

    /// Items queued for the upcoming round.
    #[must_use]
    pub fn current(&self) -> &[NodeId] {
        &self.current
    }

    /// Items queued so far for the round after the one being drained.
    #[must_use]
    pub fn next(&self) -> &[NodeId] {
        &self.next
    }

    /// Round begin: forget whatever `next` held.
    pub fn clear_next(&mut self) {
        self.next.clear();
    }

    /// Take the whole current worklist in arrival order.
    ///
    /// The returned buffer should be handed back to [`Self::finish_round`] so
    /// its allocation is reused.
    pub fn dequeue_all_current(&mut self) -> Vec<NodeId> {
        mem::take(&mut self.current)
    }

    /// Buffer receiving pushes for the next round.
    pub fn next_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.next
    }

    /// Round end: `next` becomes `current` and the drained buffer becomes the
    /// empty `next`.
    pub fn finish_round(&mut self, mut drained: Vec<NodeId>) {
        assert!(
            self.current.is_empty(),
            "Worklists::finish_round: [1] current worklist was not drained"
        );
        drained.clear();
        self.current = mem::replace(&mut self.next, drained);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_moves_next_into_current() {
        let mut lists = Worklists::with_current(vec![3, 1]);
        lists.clear_next();
        let drained = lists.dequeue_all_current();
        assert_eq!(drained, [3, 1]);
        assert!(lists.current().is_empty());
        lists.next_mut().extend([1, 4]);
        let capacity = drained.capacity();
        lists.finish_round(drained);
        assert_eq!(lists.current(), [1, 4]);
        assert!(lists.next().is_empty());
        assert_eq!(lists.next.capacity(), capacity);
    }
}
