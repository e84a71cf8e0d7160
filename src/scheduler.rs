//! Tick-indexed delayed effects.
//!
//! Effects are plain values rather than closures so the world can apply them
//! with full mutable access once they come due. The queue is drained at the
//! start of each executed tick; while the game is paused no ticks execute and
//! nothing fires.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Work deferred to a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Effect {
    /// Clears the player's attacking flag.
    EndMeleeWindow,
    /// Re-enables contact damage against the player.
    EndContactGrace,
    /// Spawns the next hostile wave.
    SpawnWave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Scheduled {
    due: u64,
    // Insertion order breaks ties so effects due together fire FIFO.
    seq: u64,
    effect: Effect,
}

/// Min-heap of effects keyed by due tick.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Scheduled>>,
    seq: u64,
}

impl Scheduler {
    /// An empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `effect` to fire on tick `due`.
    pub fn schedule(&mut self, due: u64, effect: Effect) {
        self.seq += 1;
        self.queue.push(Reverse(Scheduled {
            due,
            seq: self.seq,
            effect,
        }));
    }

    /// Queues `effect` to fire `delay` ticks after `now`.
    pub fn after(&mut self, now: u64, delay: u64, effect: Effect) {
        self.schedule(now.saturating_add(delay), effect);
    }

    /// Pops every effect due on or before tick `now`, earliest first.
    ///
    /// # Examples
    /// ```
    /// use skirmish::scheduler::{Effect, Scheduler};
    /// let mut scheduler = Scheduler::new();
    /// scheduler.after(0, 12, Effect::EndMeleeWindow);
    /// assert!(scheduler.drain_due(11).is_empty());
    /// assert_eq!(scheduler.drain_due(12), vec![Effect::EndMeleeWindow]);
    /// ```
    pub fn drain_due(&mut self, now: u64) -> Vec<Effect> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.queue.peek() {
            if next.due > now {
                break;
            }
            due.push(next.effect);
            self.queue.pop();
        }
        due
    }

    /// Whether an `effect` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, effect: Effect) -> bool {
        self.queue.iter().any(|Reverse(s)| s.effect == effect)
    }

    /// Number of effects still waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn effects_fire_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(30, Effect::EndContactGrace);
        scheduler.schedule(12, Effect::EndMeleeWindow);
        scheduler.schedule(120, Effect::SpawnWave);
        assert_eq!(
            scheduler.drain_due(200),
            vec![
                Effect::EndMeleeWindow,
                Effect::EndContactGrace,
                Effect::SpawnWave
            ]
        );
        assert!(scheduler.is_empty());
    }

    #[rstest]
    fn simultaneous_effects_fire_in_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(5, Effect::SpawnWave);
        scheduler.schedule(5, Effect::EndMeleeWindow);
        assert_eq!(
            scheduler.drain_due(5),
            vec![Effect::SpawnWave, Effect::EndMeleeWindow]
        );
    }

    #[rstest]
    #[case(0, 0)]
    #[case(11, 0)]
    #[case(12, 1)]
    #[case(13, 1)]
    fn nothing_fires_early(#[case] now: u64, #[case] fired: usize) {
        let mut scheduler = Scheduler::new();
        scheduler.after(0, 12, Effect::EndMeleeWindow);
        assert_eq!(scheduler.drain_due(now).len(), fired);
        assert_eq!(scheduler.is_pending(Effect::EndMeleeWindow), fired == 0);
    }
}
