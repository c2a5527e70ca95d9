//! Tick-based deferred work
//!
//! Fire-and-forget tasks keyed by the tick they become due. Tasks may refer
//! to tiles that are gone by the time they fire; handlers must treat that as
//! a no-op.

use super::state::TileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Re-derive the sentence once bodies have settled
    RecomputeSentence,
    ClearCollisionFlash(TileId),
    ClearTrashFlash,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    /// (due tick, task), in scheduling order
    tasks: Vec<(u64, Deferred)>,
}

impl Scheduler {
    pub fn schedule(&mut self, due: u64, task: Deferred) {
        self.tasks.push((due, task));
    }

    /// Schedule `task`, replacing any pending copy of it
    pub fn debounce(&mut self, due: u64, task: Deferred) {
        self.tasks.retain(|&(_, pending)| pending != task);
        self.tasks.push((due, task));
    }

    /// Remove and return every task due at or before `now`
    pub fn take_due(&mut self, now: u64) -> Vec<Deferred> {
        let mut due = Vec::new();
        self.tasks.retain(|&(at, task)| {
            if at <= now {
                due.push(task);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_due_keeps_future_tasks() {
        let mut timers = Scheduler::default();
        timers.schedule(5, Deferred::ClearTrashFlash);
        timers.schedule(2, Deferred::ClearCollisionFlash(TileId(1)));

        assert_eq!(timers.take_due(3), vec![Deferred::ClearCollisionFlash(TileId(1))]);
        assert_eq!(timers.pending(), 1);
        assert_eq!(timers.take_due(5), vec![Deferred::ClearTrashFlash]);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_debounce_rearms() {
        let mut timers = Scheduler::default();
        timers.debounce(6, Deferred::RecomputeSentence);
        timers.debounce(8, Deferred::RecomputeSentence);
        timers.schedule(7, Deferred::ClearCollisionFlash(TileId(3)));

        assert_eq!(timers.take_due(7), vec![Deferred::ClearCollisionFlash(TileId(3))]);
        assert_eq!(timers.take_due(8), vec![Deferred::RecomputeSentence]);
    }
}
