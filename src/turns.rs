use rand::Rng;
use tracing::debug;

use crate::roster::{Participant, Roster};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    #[strum(serialize = "not started")]
    NotStarted,
    #[strum(serialize = "in progress")]
    InProgress,
    #[strum(serialize = "completed")]
    Completed,
}

/// Outcome of a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A new turn began for this participant
    Turn(Participant),
    /// Nobody was left; the session is now complete
    Completed,
}

/// Picks participants uniformly at random without replacement.
#[derive(Debug, Clone)]
pub struct TurnSelector {
    phase: Phase,
    remaining: Vec<Participant>,
    active: Option<Participant>,
    turns_taken: usize,
}

impl TurnSelector {
    pub fn new() -> Self {
        Self {
            phase: Phase::NotStarted,
            remaining: Vec::new(),
            active: None,
            turns_taken: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active(&self) -> Option<&Participant> {
        self.active.as_ref()
    }

    pub fn remaining(&self) -> &[Participant] {
        &self.remaining
    }

    pub fn turns_taken(&self) -> usize {
        self.turns_taken
    }

    /// Copies the roster and makes the first selection. None when the roster
    /// is empty or a session is already under way.
    pub fn start<R: Rng>(&mut self, roster: &Roster, rng: &mut R) -> Option<Selection> {
        if roster.is_empty() || self.phase != Phase::NotStarted {
            return None;
        }
        self.remaining = roster.participants().to_vec();
        self.turns_taken = 0;
        self.phase = Phase::InProgress;
        Some(self.select_next(rng))
    }

    /// "Next participant": only valid while in progress.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> Option<Selection> {
        if self.phase != Phase::InProgress {
            return None;
        }
        Some(self.select_next(rng))
    }

    fn select_next<R: Rng>(&mut self, rng: &mut R) -> Selection {
        if self.remaining.is_empty() {
            self.phase = Phase::Completed;
            self.active = None;
            debug!(turns = self.turns_taken, "no participants remaining");
            return Selection::Completed;
        }

        let idx = rng.gen_range(0..self.remaining.len());
        // Vec::remove keeps the order of everyone else
        let picked = self.remaining.remove(idx);
        self.active = Some(picked.clone());
        self.turns_taken += 1;
        debug!(
            participant = %picked,
            remaining = self.remaining.len(),
            "selected next participant"
        );
        Selection::Turn(picked)
    }

    /// Ends the session early (or acknowledges completion). The roster is
    /// not touched.
    pub fn reset(&mut self) {
        self.phase = Phase::NotStarted;
        self.remaining.clear();
        self.active = None;
        self.turns_taken = 0;
    }
}

impl Default for TurnSelector {
    fn default() -> Self {
        Self::new()
    }
}
