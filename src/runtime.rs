use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// What woke the loop up.
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// Nothing arrived within the tick interval.
    Tick,
}

/// Terminal input, already reduced to the events the app cares about.
pub trait EventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Lets tests (and anything else holding a channel) feed the runner directly.
impl EventSource for Receiver<AppEvent> {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        Receiver::recv_timeout(self, timeout)
    }
}

/// Reads crossterm events on a background thread.
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let event = match event::read() {
                // key release/repeat events arrive on some platforms; only presses count
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(event).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Source of elapsed time for the countdown's virtual clock.
pub trait Clock {
    /// Time since the previous lap (or since creation).
    fn lap(&mut self) -> Duration;
}

/// Wall-clock time between laps.
#[derive(Debug)]
pub struct Stopwatch {
    last: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Clock for Stopwatch {
    fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        elapsed
    }
}

/// Every lap reports the same duration, however long the step really took.
#[derive(Clone, Copy, Debug)]
pub struct SteppedClock {
    step: Duration,
}

impl SteppedClock {
    pub fn new(step: Duration) -> Self {
        Self { step }
    }
}

impl Clock for SteppedClock {
    fn lap(&mut self) -> Duration {
        self.step
    }
}

/// One pass of the loop: how much time went by, and what ended the wait.
#[derive(Clone, Debug)]
pub struct Step {
    pub elapsed: Duration,
    pub event: AppEvent,
}

/// Waits for input at most one tick interval at a time and measures the time
/// that passed, so the caller can move the countdown before handling a key.
pub struct Runner<E: EventSource, C: Clock = Stopwatch> {
    events: E,
    tick_interval: Duration,
    clock: C,
}

impl<E: EventSource> Runner<E, Stopwatch> {
    pub fn new(events: E, tick_interval: Duration) -> Self {
        Self::with_clock(events, tick_interval, Stopwatch::start())
    }
}

impl<E: EventSource, C: Clock> Runner<E, C> {
    pub fn with_clock(events: E, tick_interval: Duration, clock: C) -> Self {
        Self {
            events,
            tick_interval,
            clock,
        }
    }

    pub fn step(&mut self) -> Step {
        let event = match self.events.recv_timeout(self.tick_interval) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        };
        Step {
            elapsed: self.clock.lap(),
            event,
        }
    }
}
