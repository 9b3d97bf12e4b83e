use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::schedule::{Scheduler, TimerHandle};
use crate::util::{format_mmss, format_short};

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);
pub const FLASH_WINDOW: Duration = Duration::from_millis(5000);
pub const MAX_MINUTES: u32 = 60;
pub const MAX_SECONDS: u32 = 59;

/// Duration given to every turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub minutes: u32,
    pub seconds: u32,
}

impl TimerConfig {
    /// Out-of-range values are clamped, never rejected.
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: minutes.min(MAX_MINUTES),
            seconds: seconds.min(MAX_SECONDS),
        }
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Self::new(minutes, 0)
    }

    pub fn clamped(self) -> Self {
        Self::new(self.minutes, self.seconds)
    }

    pub fn total_secs(&self) -> u32 {
        self.minutes * 60 + self.seconds
    }

    pub fn label(&self) -> String {
        format_short(self.minutes, self.seconds)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::from_minutes(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alarm {
    Tick,
    ClearFlash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Tick { remaining: u32 },
    Expired,
    FlashCleared,
}

/// The per-turn countdown.
///
/// Owns its scheduler. The repeating one-second tick exists exactly while
/// `running` is true; every path that stops the countdown cancels it before
/// returning. The flash-clear one-shot is independent of the running state.
#[derive(Debug, Clone)]
pub struct Countdown {
    config: TimerConfig,
    remaining: u32,
    running: bool,
    flashing: bool,
    flash_started: Option<Duration>,
    flash_on_expiry: bool,
    tick: Option<TimerHandle>,
    scheduler: Scheduler<Alarm>,
}

impl Countdown {
    pub fn new(config: TimerConfig) -> Self {
        let config = config.clamped();
        Self {
            config,
            remaining: config.total_secs(),
            running: false,
            flashing: false,
            flash_started: None,
            flash_on_expiry: true,
            tick: None,
            scheduler: Scheduler::new(),
        }
    }

    pub fn with_flash(mut self, flash_on_expiry: bool) -> Self {
        self.flash_on_expiry = flash_on_expiry;
        self
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    pub fn has_pending_tick(&self) -> bool {
        self.tick.is_some_and(|h| self.scheduler.is_pending(h))
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_count()
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn display(&self) -> String {
        format_mmss(self.remaining)
    }

    /// Blink state while flashing: hidden for the first half of every second
    /// since expiry, shown for the second half.
    pub fn clock_visible(&self) -> bool {
        match (self.flashing, self.flash_started) {
            (true, Some(started)) => {
                let since = self.scheduler.now().saturating_sub(started);
                since.as_millis() % 1000 >= 500
            }
            _ => true,
        }
    }

    /// Updates the configured duration only; the remaining count is left to
    /// the caller (see [`Countdown::rewind`]).
    pub fn set_duration(&mut self, minutes: u32, seconds: u32) -> TimerConfig {
        self.config = TimerConfig::new(minutes, seconds);
        debug!(
            minutes = self.config.minutes,
            seconds = self.config.seconds,
            "configured duration changed"
        );
        self.config
    }

    pub fn start(&mut self) -> bool {
        if self.running || self.remaining == 0 {
            return false;
        }
        self.running = true;
        self.tick = Some(self.scheduler.schedule_repeating(TICK_INTERVAL, Alarm::Tick));
        debug!(remaining = self.remaining, "countdown started");
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.stop();
        debug!(remaining = self.remaining, "countdown paused");
        true
    }

    /// Back to the full configured duration, paused, flash cleared.
    pub fn reset_to_configured(&mut self) {
        self.rewind();
        self.flashing = false;
        self.flash_started = None;
    }

    /// Back to the full configured duration, paused. Used when a new turn
    /// begins or the session ends; a running flash window is left alone.
    pub fn rewind(&mut self) {
        self.stop();
        self.remaining = self.config.total_secs();
    }

    /// Teardown: stop and drop every pending timer.
    pub fn shutdown(&mut self) {
        self.stop();
        self.scheduler.cancel_all();
    }

    fn stop(&mut self) {
        self.running = false;
        if let Some(handle) = self.tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Moves the clock forward by `elapsed`, firing due timers one at a time.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<CountdownEvent> {
        let until = self.scheduler.now() + elapsed;
        let mut events = vec![];

        while let Some(fired) = self.scheduler.pop_due(until) {
            match fired.kind {
                Alarm::Tick => {
                    if !self.running || self.remaining == 0 {
                        // stale handle; running is the source of truth
                        self.stop();
                        continue;
                    }
                    self.remaining -= 1;
                    events.push(CountdownEvent::Tick {
                        remaining: self.remaining,
                    });
                    if self.remaining == 0 {
                        self.expire(fired.at);
                        events.push(CountdownEvent::Expired);
                    }
                }
                Alarm::ClearFlash => {
                    self.flashing = false;
                    self.flash_started = None;
                    events.push(CountdownEvent::FlashCleared);
                }
            }
        }

        self.scheduler.settle(until);
        events
    }

    fn expire(&mut self, at: Duration) {
        self.stop();
        info!("countdown expired");
        if self.flash_on_expiry {
            self.flashing = true;
            self.flash_started = Some(at);
            self.scheduler.schedule_once(FLASH_WINDOW, Alarm::ClearFlash);
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn run_ticks(cd: &mut Countdown, n: u64) -> Vec<CountdownEvent> {
        let mut all = vec![];
        for _ in 0..n {
            all.extend(cd.advance(secs(1)));
        }
        all
    }

    fn expirations(events: &[CountdownEvent]) -> usize {
        events
            .iter()
            .filter(|e| **e == CountdownEvent::Expired)
            .count()
    }

    #[test]
    fn test_timer_config_clamps() {
        assert_eq!(TimerConfig::new(75, 80), TimerConfig::new(60, 59));
        assert_eq!(TimerConfig::new(2, 30).total_secs(), 150);
        assert_eq!(TimerConfig::default().total_secs(), 60);
        assert_eq!(TimerConfig::new(60, 59).total_secs(), 3659);
    }

    #[test]
    fn test_timer_config_label() {
        assert_eq!(TimerConfig::new(2, 5).label(), "2:05");
    }

    #[test]
    fn test_ninety_second_countdown_expires_once() {
        let mut cd = Countdown::new(TimerConfig::new(1, 30));
        assert!(cd.start());

        let events = run_ticks(&mut cd, 90);
        assert_eq!(cd.remaining_secs(), 0);
        assert!(!cd.is_running());
        assert_eq!(expirations(&events), 1);
        let zero_ticks = events
            .iter()
            .filter(|e| **e == CountdownEvent::Tick { remaining: 0 })
            .count();
        assert_eq!(zero_ticks, 1);

        // nothing else happens afterwards, apart from the flash clearing
        let later = run_ticks(&mut cd, 30);
        assert_eq!(expirations(&later), 0);
        assert_eq!(later, vec![CountdownEvent::FlashCleared]);
        assert_eq!(cd.remaining_secs(), 0);
    }

    #[test]
    fn test_single_large_advance_expires_once() {
        let mut cd = Countdown::new(TimerConfig::new(0, 10));
        cd.start();
        let events = cd.advance(secs(60));
        assert_eq!(expirations(&events), 1);
        assert_eq!(cd.remaining_secs(), 0);
        assert!(!cd.has_pending_tick());
    }

    #[test]
    fn test_sub_second_advances_accumulate() {
        let mut cd = Countdown::new(TimerConfig::new(0, 5));
        cd.start();
        for _ in 0..9 {
            cd.advance(Duration::from_millis(100));
        }
        assert_eq!(cd.remaining_secs(), 5);
        cd.advance(Duration::from_millis(100));
        assert_eq!(cd.remaining_secs(), 4);
    }

    #[test]
    fn test_pause_then_start_resumes_exactly() {
        let mut cd = Countdown::new(TimerConfig::new(0, 30));
        cd.start();
        run_ticks(&mut cd, 10);
        assert!(cd.pause());
        assert_eq!(cd.remaining_secs(), 20);

        // time passes while paused
        run_ticks(&mut cd, 15);
        assert_eq!(cd.remaining_secs(), 20);
        assert!(!cd.has_pending_tick());

        assert!(cd.start());
        run_ticks(&mut cd, 5);
        assert_eq!(cd.remaining_secs(), 15);
    }

    #[test]
    fn test_pause_when_paused_is_noop() {
        let mut cd = Countdown::new(TimerConfig::new(0, 30));
        let before = (cd.remaining_secs(), cd.is_running(), cd.is_flashing());
        assert!(!cd.pause());
        assert_eq!(
            (cd.remaining_secs(), cd.is_running(), cd.is_flashing()),
            before
        );
    }

    #[test]
    fn test_start_at_zero_is_noop() {
        let mut cd = Countdown::new(TimerConfig::new(0, 0));
        assert_eq!(cd.remaining_secs(), 0);
        assert!(!cd.start());
        assert!(!cd.is_running());
        assert!(!cd.has_pending_tick());

        let mut cd = Countdown::new(TimerConfig::new(0, 2));
        cd.start();
        run_ticks(&mut cd, 2);
        let before = (cd.remaining_secs(), cd.is_running(), cd.is_flashing());
        assert!(!cd.start());
        assert_eq!(
            (cd.remaining_secs(), cd.is_running(), cd.is_flashing()),
            before
        );
    }

    #[test]
    fn test_start_twice_keeps_single_tick() {
        let mut cd = Countdown::new(TimerConfig::new(0, 30));
        assert!(cd.start());
        assert!(!cd.start());
        assert_eq!(cd.pending_timers(), 1);
        run_ticks(&mut cd, 3);
        assert_eq!(cd.remaining_secs(), 27);
    }

    #[test]
    fn test_flash_lasts_five_seconds() {
        let mut cd = Countdown::new(TimerConfig::new(0, 1));
        cd.start();
        cd.advance(secs(1));
        assert!(cd.is_flashing());

        cd.advance(Duration::from_millis(4900));
        assert!(cd.is_flashing());
        let events = cd.advance(Duration::from_millis(100));
        assert_eq!(events, vec![CountdownEvent::FlashCleared]);
        assert!(!cd.is_flashing());
    }

    #[test]
    fn test_clock_blinks_while_flashing() {
        let mut cd = Countdown::new(TimerConfig::new(0, 1));
        assert!(cd.clock_visible());
        cd.start();
        cd.advance(secs(1));
        assert!(!cd.clock_visible());
        cd.advance(Duration::from_millis(499));
        assert!(!cd.clock_visible());
        cd.advance(Duration::from_millis(1));
        assert!(cd.clock_visible());
        cd.advance(Duration::from_millis(500));
        assert!(!cd.clock_visible());

        // steady once the flash window is over
        cd.advance(secs(5));
        assert!(!cd.is_flashing());
        assert!(cd.clock_visible());
    }

    #[test]
    fn test_no_flash_when_disabled() {
        let mut cd = Countdown::new(TimerConfig::new(0, 1)).with_flash(false);
        cd.start();
        let events = cd.advance(secs(1));
        assert_eq!(expirations(&events), 1);
        assert!(!cd.is_flashing());
        assert_eq!(cd.pending_timers(), 0);
    }

    #[test]
    fn test_reset_to_configured_clears_flash_but_not_pending_clear() {
        let mut cd = Countdown::new(TimerConfig::new(0, 1));
        cd.start();
        cd.advance(secs(1));
        cd.reset_to_configured();
        assert!(!cd.is_flashing());
        assert_eq!(cd.remaining_secs(), 1);
        // the one-shot clear is still pending
        assert_eq!(cd.pending_timers(), 1);
    }

    #[test]
    fn test_rewind_keeps_flash_running() {
        let mut cd = Countdown::new(TimerConfig::new(0, 1));
        cd.start();
        cd.advance(secs(1));
        cd.rewind();
        assert!(cd.is_flashing());
        assert_eq!(cd.remaining_secs(), 1);
        assert!(!cd.is_running());
    }

    #[test]
    fn test_stale_flash_clear_cuts_second_flash_short() {
        let mut cd = Countdown::new(TimerConfig::new(0, 2));
        cd.start();
        cd.advance(secs(2)); // expires at t=2, clear due at t=7
        cd.rewind();
        cd.start();
        cd.advance(secs(2)); // expires again at t=4, second clear due at t=9
        assert!(cd.is_flashing());

        cd.advance(secs(3)); // t=7: first clear fires
        assert!(!cd.is_flashing());
    }

    #[test]
    fn test_set_duration_leaves_remaining() {
        let mut cd = Countdown::new(TimerConfig::new(1, 0));
        let cfg = cd.set_duration(2, 30);
        assert_eq!(cfg.total_secs(), 150);
        assert_eq!(cd.remaining_secs(), 60);
        cd.rewind();
        assert_eq!(cd.remaining_secs(), 150);
    }

    #[test]
    fn test_set_duration_clamps() {
        let mut cd = Countdown::default();
        assert_eq!(cd.set_duration(99, 99), TimerConfig::new(60, 59));
    }

    #[test]
    fn test_shutdown_cancels_everything() {
        let mut cd = Countdown::new(TimerConfig::new(0, 1));
        cd.start();
        cd.advance(secs(1));
        cd.rewind();
        cd.start();
        assert_eq!(cd.pending_timers(), 2);
        cd.shutdown();
        assert_eq!(cd.pending_timers(), 0);
        assert!(!cd.is_running());
        assert!(cd.advance(secs(10)).is_empty());
    }

    #[test]
    fn test_display() {
        let mut cd = Countdown::new(TimerConfig::new(2, 30));
        assert_eq!(cd.display(), "02:30");
        cd.start();
        cd.advance(secs(31));
        assert_eq!(cd.display(), "01:59");
    }
}
