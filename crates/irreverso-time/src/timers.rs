//! Timer queue - the cooperative event loop state
//!
//! Every delayed one-shot timer, repeating interval and frame request of a
//! sequence lives here, so teardown is a single `clear_all()` and leak checks
//! are a single `pending()`. Timers carry a scope; leaving a phase clears the
//! phase-scoped ones so no stale callback bleeds into the next phase.
//!
//! Due timers are popped one at a time in (due, registration) order. The
//! handler of one timer can therefore cancel another that is due at the
//! same instant, and same-instant timers fire in the order they were set.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use irreverso_core::SeqTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(u64);

/// Lifetime group of a timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerScope {
    /// Phase transitions and completion; live for the whole sequence
    Sequence,
    /// Narrative sub-steps; cleared on phase exit
    Phase,
    /// Log feed cadence
    Drip,
    /// Glitch rolls and pulse ends; cleared on phase exit
    Glitch,
}

struct TimerEntry<E> {
    scope: TimerScope,
    period: Option<Duration>,
    event: E,
}

/// A timer that came due
#[derive(Clone, Debug, PartialEq)]
pub struct Fired<E> {
    pub id: TimerId,
    pub scope: TimerScope,
    pub due: SeqTime,
    pub event: E,
}

pub struct TimerQueue<E> {
    queue: BTreeMap<(SeqTime, TimerId), TimerEntry<E>>,
    index: HashMap<TimerId, SeqTime>,
    frames: BTreeMap<FrameId, E>,
    next_timer: u64,
    next_frame: u64,
}

impl<E: Clone> TimerQueue<E> {
    pub fn new() -> Self {
        TimerQueue {
            queue: BTreeMap::new(),
            index: HashMap::new(),
            frames: BTreeMap::new(),
            next_timer: 0,
            next_frame: 0,
        }
    }

    /// One-shot timer firing `delay` after `now`
    pub fn set_timeout(&mut self, now: SeqTime, delay: Duration, scope: TimerScope, event: E) -> TimerId {
        self.insert(now + delay, scope, None, event)
    }

    /// One-shot timer firing at an absolute sequence time
    pub fn set_at(&mut self, due: SeqTime, scope: TimerScope, event: E) -> TimerId {
        self.insert(due, scope, None, event)
    }

    /// Repeating timer, first firing one `period` after `now`
    pub fn set_interval(&mut self, now: SeqTime, period: Duration, scope: TimerScope, event: E) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(now + period, scope, Some(period), event)
    }

    fn insert(&mut self, due: SeqTime, scope: TimerScope, period: Option<Duration>, event: E) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.queue.insert((due, id), TimerEntry { scope, period, event });
        self.index.insert(id, due);
        id
    }

    /// Cancel one timer; false if it already fired or was cancelled
    pub fn clear(&mut self, id: TimerId) -> bool {
        match self.index.remove(&id) {
            Some(due) => self.queue.remove(&(due, id)).is_some(),
            None => false,
        }
    }

    /// Cancel every timer in a scope, returning how many were pending
    pub fn clear_scope(&mut self, scope: TimerScope) -> usize {
        let doomed: Vec<(SeqTime, TimerId)> = self
            .queue
            .iter()
            .filter(|(_, entry)| entry.scope == scope)
            .map(|(key, _)| *key)
            .collect();
        for key in &doomed {
            self.queue.remove(key);
            self.index.remove(&key.1);
        }
        if !doomed.is_empty() {
            tracing::trace!(?scope, cancelled = doomed.len(), "timers cleared");
        }
        doomed.len()
    }

    /// Cancel every timer and frame request
    pub fn clear_all(&mut self) -> usize {
        let cleared = self.queue.len() + self.frames.len();
        self.queue.clear();
        self.index.clear();
        self.frames.clear();
        cleared
    }

    /// Pop the earliest timer due at or before `now`.
    /// Intervals are re-armed at their next period after `now`.
    pub fn pop_due(&mut self, now: SeqTime) -> Option<Fired<E>> {
        let (&(due, id), _) = self.queue.iter().next()?;
        if due > now {
            return None;
        }

        let entry = self.queue.remove(&(due, id))?;
        self.index.remove(&id);

        if let Some(period) = entry.period {
            let mut next = due + period;
            while next <= now {
                next = next + period;
            }
            self.queue.insert(
                (next, id),
                TimerEntry {
                    scope: entry.scope,
                    period: entry.period,
                    event: entry.event.clone(),
                },
            );
            self.index.insert(id, next);
        }

        Some(Fired {
            id,
            scope: entry.scope,
            due,
            event: entry.event,
        })
    }

    pub fn next_due(&self) -> Option<SeqTime> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.index.contains_key(&id)
    }

    /// Pending timers (frame requests not included)
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_in(&self, scope: TimerScope) -> usize {
        self.queue.values().filter(|e| e.scope == scope).count()
    }

    /// Ask for one callback on the next frame
    pub fn request_frame(&mut self, event: E) -> FrameId {
        let id = FrameId(self.next_frame);
        self.next_frame += 1;
        self.frames.insert(id, event);
        id
    }

    pub fn cancel_frame(&mut self, id: FrameId) -> bool {
        self.frames.remove(&id).is_some()
    }

    /// Drain the frame requests registered so far. Requests made while
    /// handling these land in the next frame.
    pub fn take_frames(&mut self) -> Vec<(FrameId, E)> {
        std::mem::take(&mut self.frames).into_iter().collect()
    }

    pub fn active_frames(&self) -> usize {
        self.frames.len()
    }
}

impl<E: Clone> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
