use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

/// Handle returned by [`TimerQueue::schedule`]; used to cancel a single timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub u64);

/// Virtual-time timer queue.
///
/// Determinism rule: timers due at the same instant fire in scheduling order. Cancellation is
/// lazy; cancelled entries stay in the heap until they surface and are skipped.
#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Reverse<(Duration, u64)>>,
    tasks: HashMap<u64, T>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            tasks: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `task` to fire at `at`.
    pub fn schedule(&mut self, at: Duration, task: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse((at, seq)));
        self.tasks.insert(seq, task);
        TimerHandle(seq)
    }

    /// Cancel one timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.tasks.remove(&handle.0).is_some()
    }

    /// Drop every pending timer.
    pub fn cancel_all(&mut self) {
        self.heap.clear();
        self.tasks.clear();
    }

    /// Pop the earliest live timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, T)> {
        loop {
            let &Reverse((at, seq)) = self.heap.peek()?;
            if at > now {
                return None;
            }
            self.heap.pop();
            if let Some(task) = self.tasks.remove(&seq) {
                return Some((at, task));
            }
        }
    }

    /// Due time of the earliest live timer.
    pub fn next_due(&mut self) -> Option<Duration> {
        while let Some(&Reverse((at, seq))) = self.heap.peek() {
            if self.tasks.contains_key(&seq) {
                return Some(at);
            }
            self.heap.pop();
        }
        None
    }

    /// Number of pending, uncancelled timers.
    pub fn outstanding(&self) -> usize {
        self.tasks.len()
    }

    /// Return `true` when no timer is pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
