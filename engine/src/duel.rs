use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::combat::actions::resolve_pair;
use crate::conditions::{Action, Effect};
use crate::creature::{Creature, CreatureProfile};
use crate::error::DuelError;
use crate::report::{DuelReport, Slot, WinnerSlot};

/// Where a pairing stands between two resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelPhase {
    AwaitingActions,
    ResolutionReady,
    Finished(WinnerSlot),
    Forfeited,
}

impl DuelPhase {
    pub fn is_closed(self) -> bool {
        matches!(self, DuelPhase::Finished(_) | DuelPhase::Forfeited)
    }
}

/// Identifies one specific commitment: the round it was made in and the commit counter of its side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub round: u32,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketState {
    Current,
    /// The same side committed something else since.
    Replaced,
    /// The round this ticket belongs to has been resolved.
    RoundOver,
    Closed(DuelPhase),
}

/// What happened to a requested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The action is now committed with this window.
    Set { duration: Duration, ticket: Ticket },
    /// The same action was already committed.
    Unchanged,
    /// An effect holds the creature; the stored window is reported back. The ticket is the
    /// side's current one, so the forced round can still be resolved from this call.
    Suppressed {
        effect: Effect,
        duration: Duration,
        ticket: Ticket,
    },
}

impl Commit {
    /// The commit window, when there is one to report.
    pub fn duration(&self) -> Option<Duration> {
        match *self {
            Commit::Set { duration, .. } | Commit::Suppressed { duration, .. } => Some(duration),
            Commit::Unchanged => None,
        }
    }
}

/// Two creatures locked in a duel, without any notion of time or sessions.
#[derive(Debug, Clone)]
pub struct Duel {
    creatures: [Creature; 2],
    round: u32,
    commits: [u64; 2],
    closed: Option<DuelPhase>,
}

impl Duel {
    pub fn new(profile: CreatureProfile, time_unit: Duration) -> Self {
        let creature = Creature::new(profile, time_unit);
        Self {
            creatures: [creature.clone(), creature],
            round: 0,
            commits: [0; 2],
            closed: None,
        }
    }

    pub fn creature(&self, slot: Slot) -> &Creature {
        &self.creatures[slot.index()]
    }

    /// Rounds resolved so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> DuelPhase {
        if let Some(closed) = self.closed {
            return closed;
        }
        if self.is_ready(Slot::First) && self.is_ready(Slot::Second) {
            DuelPhase::ResolutionReady
        } else {
            DuelPhase::AwaitingActions
        }
    }

    pub fn is_open(&self) -> bool {
        self.closed.is_none()
    }

    pub fn is_ready(&self, slot: Slot) -> bool {
        self.creature(slot).is_ready()
    }

    pub fn commit(&mut self, slot: Slot, action: Action) -> Result<Commit, DuelError> {
        let current = Ticket {
            round: self.round,
            seq: self.commits[slot.index()],
        };
        let creature = &mut self.creatures[slot.index()];

        if let Some(effect) = creature.effect() {
            let duration = creature.set_action(action.into())?;
            return Ok(Commit::Suppressed {
                effect,
                duration,
                ticket: current,
            });
        }
        if creature.action() == action {
            return Ok(Commit::Unchanged);
        }

        let duration = creature.set_action(action.into())?;
        self.commits[slot.index()] += 1;
        let ticket = Ticket {
            round: self.round,
            seq: self.commits[slot.index()],
        };
        debug!(?slot, %action, ?duration, round = self.round, "[COMMIT]");
        Ok(Commit::Set { duration, ticket })
    }

    /// A ticket stays current until its side commits again, the round resolves, or the duel closes.
    pub fn ticket_state(&self, slot: Slot, ticket: Ticket) -> TicketState {
        if let Some(closed) = self.closed {
            TicketState::Closed(closed)
        } else if self.round != ticket.round {
            TicketState::RoundOver
        } else if self.commits[slot.index()] != ticket.seq {
            TicketState::Replaced
        } else {
            TicketState::Current
        }
    }

    /// Resolve both committed actions at once. Closes the duel when someone dropped.
    pub fn resolve(&mut self) -> DuelReport {
        let [first, second] = &mut self.creatures;
        let results = resolve_pair(first, second);
        self.round += 1;

        let winner = WinnerSlot::from_deaths(first.is_dead(), second.is_dead());
        if winner.is_terminal() {
            self.closed = Some(DuelPhase::Finished(winner));
        }
        DuelReport::new(self.round, results, winner)
    }

    /// Returns false when the duel was already closed.
    pub fn forfeit(&mut self) -> bool {
        if self.closed.is_some() {
            return false;
        }
        self.closed = Some(DuelPhase::Forfeited);
        true
    }
}
