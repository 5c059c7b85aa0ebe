use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle returned by [`TimerQueue::schedule`], used to cancel.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimerId(u64);

/// Cancellable one-shot timers on a virtual clock.
///
/// Time only moves through [`TimerQueue::pop_due`] and
/// [`TimerQueue::advance_to`]. Timers sharing a deadline fire in scheduling
/// order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, TimerId), T>,
    deadlines: HashMap<TimerId, Duration>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Elapsed virtual time since the queue was created.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let deadline = self.now.saturating_add(delay);
        self.pending.insert((deadline, id), task);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancels a pending timer. Returns its task if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id)?;
        self.pending.remove(&(deadline, id))
    }

    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Delay from now until the earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending
            .keys()
            .next()
            .map(|(deadline, _)| deadline.saturating_sub(self.now))
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to
    /// its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        let (&(deadline, id), _) = self.pending.first_key_value()?;
        if deadline > until {
            return None;
        }
        let task = self.pending.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        self.now = self.now.max(deadline);
        Some((id, task))
    }

    /// Moves the clock forward to `until`; never moves it backwards.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::TimerQueue;
    use std::time::Duration;

    #[test]
    fn timers_fire_in_deadline_then_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::from_millis(20), "late");
        queue.schedule(Duration::from_millis(10), "first");
        queue.schedule(Duration::from_millis(10), "second");

        let until = Duration::from_millis(50);
        let mut fired = Vec::new();
        while let Some((_, task)) = queue.pop_due(until) {
            fired.push(task);
        }
        assert_eq!(fired, vec!["first", "second", "late"]);
        assert_eq!(queue.now(), Duration::from_millis(20));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(Duration::from_millis(5), 1);
        assert!(queue.is_pending(id));
        assert_eq!(queue.cancel(id), Some(1));
        assert_eq!(queue.cancel(id), None);
        assert!(queue.pop_due(Duration::from_secs(1)).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn next_deadline_is_relative_to_now() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::from_millis(100), ());
        queue.advance_to(Duration::from_millis(40));
        assert_eq!(queue.next_deadline(), Some(Duration::from_millis(60)));

        queue.advance_to(Duration::from_millis(10));
        assert_eq!(queue.now(), Duration::from_millis(40));
    }

    #[test]
    fn pop_due_leaves_future_timers() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::from_millis(100), ());
        assert!(queue.pop_due(Duration::from_millis(99)).is_none());
        assert_eq!(queue.len(), 1);
        assert!(queue.pop_due(Duration::from_millis(100)).is_some());
    }
}
