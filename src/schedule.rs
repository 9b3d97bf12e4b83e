use std::collections::BTreeMap;
use std::time::Duration;

/// Opaque handle to a pending timer; used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Timer<K> {
    due: Duration,
    period: Option<Duration>,
    kind: K,
}

/// A timer that came due during `pop_due`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<K> {
    pub handle: TimerHandle,
    pub kind: K,
    pub at: Duration,
}

/// Single-threaded virtual clock with repeating and one-shot timers.
///
/// Time only moves when the owner calls [`Scheduler::pop_due`] /
/// [`Scheduler::settle`], so tests can drive it with exact durations while
/// the terminal loop feeds it measured wall-clock time.
#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<TimerHandle, Timer<K>>,
}

impl<K: Copy> Scheduler<K> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            timers: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule_repeating(&mut self, period: Duration, kind: K) -> TimerHandle {
        self.insert(period, Some(period), kind)
    }

    pub fn schedule_once(&mut self, delay: Duration, kind: K) -> TimerHandle {
        self.insert(delay, None, kind)
    }

    fn insert(&mut self, delay: Duration, period: Option<Duration>, kind: K) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            handle,
            Timer {
                due: self.now + delay,
                period,
                kind,
            },
        );
        handle
    }

    /// Returns true if the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(&handle).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to
    /// its due time. Ties fire in scheduling order. Repeating timers are
    /// re-armed one period later under the same handle.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<K>> {
        let (handle, due) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(h, t)| (t.due, **h))
            .map(|(h, t)| (*h, t.due))?;

        self.now = self.now.max(due);

        let kind = match self.timers.get_mut(&handle) {
            Some(timer) => {
                let kind = timer.kind;
                match timer.period {
                    Some(period) => timer.due += period,
                    None => {
                        self.timers.remove(&handle);
                    }
                }
                kind
            }
            None => return None,
        };

        Some(Fired {
            handle,
            kind,
            at: due,
        })
    }

    /// Moves the clock to `until` once every due timer has been popped.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl<K: Copy> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}
