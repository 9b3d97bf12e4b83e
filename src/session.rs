use std::time::Duration;

use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::alert::Alert;
use crate::countdown::{Countdown, CountdownEvent, TimerConfig};
use crate::roster::{Participant, Roster};
use crate::turns::{Phase, Selection, TurnSelector};

pub const DEFAULT_PRESETS: [u32; 4] = [1, 2, 3, 5];

/// Owns the roster, the turn order and the countdown. Every user action goes
/// through one of its methods; actions that make no sense in the current
/// phase return false and change nothing.
pub struct Session<R = StdRng> {
    roster: Roster,
    turns: TurnSelector,
    countdown: Countdown,
    alert: Box<dyn Alert>,
    rng: R,
    presets: Vec<u32>,
    custom: Option<TimerConfig>,
    alerts_played: usize,
}

impl Session<StdRng> {
    pub fn new(alert: Box<dyn Alert>) -> Self {
        Self::with_rng(StdRng::from_entropy(), alert)
    }

    pub fn seeded(seed: u64, alert: Box<dyn Alert>) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), alert)
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(rng: R, alert: Box<dyn Alert>) -> Self {
        Self {
            roster: Roster::new(),
            turns: TurnSelector::new(),
            countdown: Countdown::default(),
            alert,
            rng,
            presets: DEFAULT_PRESETS.to_vec(),
            custom: None,
            alerts_played: 0,
        }
    }

    pub fn with_duration(mut self, config: TimerConfig) -> Self {
        self.set_duration(config.minutes, config.seconds);
        self
    }

    /// Clamped to the minute range, zero dropped, first occurrence kept. An
    /// empty result falls back to [`DEFAULT_PRESETS`].
    pub fn with_presets(mut self, presets: Vec<u32>) -> Self {
        self.presets = presets
            .into_iter()
            .map(|m| TimerConfig::from_minutes(m).minutes)
            .filter(|m| *m > 0)
            .unique()
            .collect();
        if self.presets.is_empty() {
            debug!("no usable presets configured, using defaults");
            self.presets = DEFAULT_PRESETS.to_vec();
        }
        self
    }

    pub fn with_flash(mut self, flash_on_expiry: bool) -> Self {
        self.countdown = self.countdown.with_flash(flash_on_expiry);
        self
    }

    // ---- roster ----

    pub fn add_participant(&mut self, name: &str) -> bool {
        if self.phase() != Phase::NotStarted {
            debug!("roster is locked while a session is running");
            return false;
        }
        let added = self.roster.add(name);
        if added {
            debug!(name = name.trim(), size = self.roster.len(), "participant added");
        }
        added
    }

    pub fn remove_participant(&mut self, name: &str) -> bool {
        if self.phase() != Phase::NotStarted {
            return false;
        }
        let removed = self.roster.remove(name);
        if removed {
            debug!(name, size = self.roster.len(), "participant removed");
        }
        removed
    }

    pub fn clear_all(&mut self) -> bool {
        if self.phase() != Phase::NotStarted {
            return false;
        }
        self.roster.clear();
        debug!("roster cleared");
        true
    }

    // ---- turns ----

    pub fn start_session(&mut self) -> bool {
        match self.turns.start(&self.roster, &mut self.rng) {
            Some(selection) => {
                info!(participants = self.roster.len(), "session started");
                self.on_selection(selection);
                true
            }
            None => false,
        }
    }

    /// "Next participant". The countdown does not have to be expired.
    pub fn advance(&mut self) -> bool {
        match self.turns.advance(&mut self.rng) {
            Some(selection) => {
                self.on_selection(selection);
                true
            }
            None => false,
        }
    }

    fn on_selection(&mut self, selection: Selection) {
        self.countdown.rewind();
        match selection {
            Selection::Turn(p) => info!(participant = %p, "turn started"),
            Selection::Completed => info!("session completed"),
        }
    }

    /// Ends the session early, or leaves the completed screen. The roster
    /// stays.
    pub fn end_session(&mut self) -> bool {
        let was = self.phase();
        self.turns.reset();
        self.countdown.rewind();
        if was != Phase::NotStarted {
            info!(from = %was, "session ended");
        }
        was != Phase::NotStarted
    }

    // ---- duration ----

    /// Clamped. Applied to the remaining count right away only when no turn
    /// is active; otherwise at the next turn or timer reset.
    pub fn set_duration(&mut self, minutes: u32, seconds: u32) -> TimerConfig {
        let config = self.countdown.set_duration(minutes, seconds);
        if self.turns.active().is_none() {
            self.countdown.rewind();
        }
        config
    }

    pub fn select_preset(&mut self, minutes: u32) -> TimerConfig {
        self.set_duration(minutes, 0)
    }

    /// Remembers the value as the custom duration and applies it.
    pub fn apply_custom(&mut self, minutes: u32, seconds: u32) -> TimerConfig {
        let config = TimerConfig::new(minutes, seconds);
        self.custom = Some(config);
        self.set_duration(config.minutes, config.seconds)
    }

    pub fn is_preset_selected(&self, minutes: u32) -> bool {
        self.countdown.config() == TimerConfig::from_minutes(minutes)
    }

    pub fn is_custom_selected(&self) -> bool {
        self.custom == Some(self.countdown.config())
    }

    // ---- countdown ----

    pub fn start_timer(&mut self) -> bool {
        self.turns.active().is_some() && self.countdown.start()
    }

    pub fn pause_timer(&mut self) -> bool {
        self.countdown.pause()
    }

    pub fn toggle_timer(&mut self) -> bool {
        if self.countdown.is_running() {
            self.pause_timer()
        } else {
            self.start_timer()
        }
    }

    pub fn reset_timer(&mut self) -> bool {
        if self.turns.active().is_none() {
            return false;
        }
        self.countdown.reset_to_configured();
        true
    }

    /// Feeds elapsed time to the countdown; plays the alert on expiry.
    /// Playback failures are logged and otherwise ignored.
    pub fn advance_clock(&mut self, elapsed: Duration) -> Vec<CountdownEvent> {
        let events = self.countdown.advance(elapsed);
        for event in &events {
            if *event == CountdownEvent::Expired {
                self.alerts_played += 1;
                if let Err(e) = self.alert.play() {
                    warn!(error = %e, "failed to play notification sound");
                }
            }
        }
        events
    }

    /// Teardown: cancels every pending timer.
    pub fn shutdown(&mut self) {
        self.countdown.shutdown();
        debug!("session shut down");
    }

    // ---- read access ----

    pub fn phase(&self) -> Phase {
        self.turns.phase()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn active(&self) -> Option<&Participant> {
        self.turns.active()
    }

    pub fn remaining(&self) -> &[Participant] {
        self.turns.remaining()
    }

    pub fn turns_taken(&self) -> usize {
        self.turns.turns_taken()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn duration(&self) -> TimerConfig {
        self.countdown.config()
    }

    pub fn presets(&self) -> &[u32] {
        &self.presets
    }

    pub fn custom(&self) -> Option<TimerConfig> {
        self.custom
    }

    pub fn alerts_played(&self) -> usize {
        self.alerts_played
    }

    pub fn clock_display(&self) -> String {
        self.countdown.display()
    }

    pub fn clock_visible(&self) -> bool {
        self.countdown.clock_visible()
    }
}
