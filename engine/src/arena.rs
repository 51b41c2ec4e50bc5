use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::{timeout, Instant};
use tracing::{debug, info, trace};

use crate::conditions::{Action, Effect, Status};
use crate::config::ArenaConfig;
use crate::creature::{Creature, StatusSnapshot};
use crate::duel::{Commit, DuelPhase, Ticket, TicketState};
use crate::error::DuelError;
use crate::registry::{Pairing, PairingId, Registry, SessionId};
use crate::report::{DuelReport, Slot};

/// Stand-in deadline for windows too long to represent.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// A resolved round together with who took part in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub pairing: PairingId,
    pub players: [SessionId; 2],
    pub report: DuelReport,
}

impl Resolution {
    pub fn slot_of(&self, session: SessionId) -> Option<Slot> {
        if self.players[0] == session {
            Some(Slot::First)
        } else if self.players[1] == session {
            Some(Slot::Second)
        } else {
            None
        }
    }
}

/// How a submitted action played out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The same action was already committed; nothing happened.
    Unchanged,
    /// An effect holds the creature this round and the opponent has yet to commit.
    Suppressed { effect: Effect, duration: Duration },
    /// Committed; the round resolves once the opponent commits.
    Deferred { duration: Duration },
    /// The caller switched to another action before its window closed.
    Aborted,
    /// The opponent's call resolved the round first.
    Superseded,
    /// The duel ended while the window was open.
    Cancelled,
    Resolved(Resolution),
}

enum Wait {
    OpponentReady,
    Elapsed,
    Interrupted(ActionOutcome),
}

/// Drives duels between registered sessions.
#[derive(Debug)]
pub struct Arena {
    config: ArenaConfig,
    registry: Mutex<Registry>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ArenaConfig::default())
    }
}

impl Arena {
    pub fn new(config: ArenaConfig) -> Self {
        let registry = Registry::new(config.profile, config.time_unit());
        Self {
            config,
            registry: Mutex::new(registry),
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Lock order is always registry before pairing.
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, session: SessionId, name: impl Into<String>) {
        self.registry().register(session, name);
    }

    pub fn engage(&self, a: SessionId, b: SessionId) -> Result<PairingId, DuelError> {
        self.registry().pair(a, b)
    }

    pub fn is_busy(&self, session: SessionId) -> bool {
        self.registry().is_busy(session)
    }

    pub fn name_of(&self, session: SessionId) -> Result<String, DuelError> {
        Ok(self.registry().player(session)?.name.clone())
    }

    pub fn opponent_of(&self, session: SessionId) -> Result<SessionId, DuelError> {
        self.registry().opponent_of(session)
    }

    pub fn creature(&self, session: SessionId) -> Result<Creature, DuelError> {
        self.registry().lookup_creature(session)
    }

    pub fn status(&self, session: SessionId) -> Result<StatusSnapshot, DuelError> {
        Ok(self.creature(session)?.status())
    }

    pub fn displayed_status(&self, session: SessionId) -> Result<Status, DuelError> {
        Ok(self.creature(session)?.displayed_status())
    }

    pub fn is_ready(&self, session: SessionId) -> Result<bool, DuelError> {
        Ok(self.creature(session)?.is_ready())
    }

    pub fn phase(&self, session: SessionId) -> Result<DuelPhase, DuelError> {
        let (pairing, _) = self.registry().pairing_of(session)?;
        let phase = pairing.duel().phase();
        Ok(phase)
    }

    fn locate(&self, session: SessionId) -> Result<(Arc<Pairing>, Slot), DuelError> {
        self.registry().pairing_of(session)
    }

    /// Commit an action without waiting for anything.
    pub fn set_player_action(
        &self,
        session: SessionId,
        action: Action,
    ) -> Result<Commit, DuelError> {
        let (pairing, slot) = self.locate(session)?;
        commit_on(&pairing, slot, session, action)
    }

    /// Commit an action and carry the round as far as it can go from this side.
    ///
    /// Attack and dodge open a commit window and wait for the opponent, at most for the
    /// window's length. Guard and defend never wait: they resolve when the opponent is
    /// already committed and are deferred otherwise. A creature held by an effect behaves
    /// like a guard: its forced idle resolves against a ready opponent.
    pub async fn submit_action(
        &self,
        session: SessionId,
        action: Action,
    ) -> Result<ActionOutcome, DuelError> {
        let (pairing, slot) = self.locate(session)?;
        let (duration, ticket) = match commit_on(&pairing, slot, session, action)? {
            Commit::Unchanged => return Ok(ActionOutcome::Unchanged),
            Commit::Suppressed {
                effect,
                duration,
                ticket,
            } => {
                debug!(%session, ?effect, "[COMMIT] suppressed by effect");
                // A forced idle is a settled commitment: resolve now if the opponent is too.
                return Ok(match self.finish(&pairing, slot, ticket, Some(duration)) {
                    ActionOutcome::Deferred { duration } => {
                        ActionOutcome::Suppressed { effect, duration }
                    }
                    other => other,
                });
            }
            Commit::Set { duration, ticket } => (duration, ticket),
        };

        if !action.is_intensive() {
            return Ok(self.finish(&pairing, slot, ticket, Some(duration)));
        }

        match self.wait_for_opponent(&pairing, slot, ticket, duration).await {
            Wait::OpponentReady | Wait::Elapsed => Ok(self.finish(&pairing, slot, ticket, None)),
            Wait::Interrupted(outcome) => Ok(outcome),
        }
    }

    /// Poll the pairing until the opponent is committed or the window runs out.
    ///
    /// Every change on the pairing wakes the wait early; the poll interval bounds the
    /// latency when a wake-up is missed.
    async fn wait_for_opponent(
        &self,
        pairing: &Pairing,
        slot: Slot,
        ticket: Ticket,
        window: Duration,
    ) -> Wait {
        let now = Instant::now();
        let deadline = now.checked_add(window).unwrap_or(now + FAR_FUTURE);
        let interval = self.config.poll_interval();

        loop {
            let notified = pairing.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let duel = pairing.duel();
                if let Some(outcome) = interrupted(duel.ticket_state(slot, ticket)) {
                    return Wait::Interrupted(outcome);
                }
                if duel.is_ready(slot.other()) {
                    trace!(pairing = %pairing.id, "[WAIT] opponent ready");
                    return Wait::OpponentReady;
                }
            }

            let now = Instant::now();
            if now >= deadline {
                trace!(pairing = %pairing.id, "[WAIT] window elapsed");
                return Wait::Elapsed;
            }
            let _ = timeout((deadline - now).min(interval), notified).await;
        }
    }

    /// Resolve the round if the ticket still stands. With `defer` set, an idle opponent
    /// postpones the round instead.
    fn finish(
        &self,
        pairing: &Pairing,
        slot: Slot,
        ticket: Ticket,
        defer: Option<Duration>,
    ) -> ActionOutcome {
        let report = {
            let mut duel = pairing.duel();
            if let Some(outcome) = interrupted(duel.ticket_state(slot, ticket)) {
                return outcome;
            }
            if let Some(duration) = defer {
                if !duel.is_ready(slot.other()) {
                    debug!(pairing = %pairing.id, ?slot, "[ROUND] deferred until opponent commits");
                    return ActionOutcome::Deferred { duration };
                }
            }
            duel.resolve()
        };
        ActionOutcome::Resolved(self.publish(pairing, report))
    }

    /// Resolve the round of `session`'s duel right now, whatever has been committed.
    pub fn resolve_round(&self, session: SessionId) -> Result<DuelReport, DuelError> {
        let (pairing, _) = self.locate(session)?;
        let report = {
            let mut duel = pairing.duel();
            if !duel.is_open() {
                return Err(DuelError::NotPaired(session));
            }
            duel.resolve()
        };
        Ok(self.publish(&pairing, report).report)
    }

    /// Wake waiters and release the pairing when the round was the last one.
    fn publish(&self, pairing: &Pairing, report: DuelReport) -> Resolution {
        pairing.wake();
        info!(
            pairing = %pairing.id,
            round = report.round,
            winner = ?report.winner,
            "[ROUND] resolved"
        );
        if report.match_ended {
            if let Err(err) = self.registry().end(pairing.id) {
                debug!(pairing = %pairing.id, %err, "[DUEL] already released");
            }
        }
        Resolution {
            pairing: pairing.id,
            players: pairing.players,
            report,
        }
    }

    /// End a duel. A second call reports [`DuelError::AlreadyEnded`].
    pub fn end_duel(&self, id: PairingId) -> Result<(), DuelError> {
        self.registry().end(id)
    }

    /// The caller walks away from its current duel.
    pub fn forfeit(&self, session: SessionId) -> Result<PairingId, DuelError> {
        self.registry().unpair(session)
    }
}

fn commit_on(
    pairing: &Pairing,
    slot: Slot,
    session: SessionId,
    action: Action,
) -> Result<Commit, DuelError> {
    let commit = {
        let mut duel = pairing.duel();
        if !duel.is_open() {
            return Err(DuelError::NotPaired(session));
        }
        duel.commit(slot, action)?
    };
    if matches!(commit, Commit::Set { .. }) {
        pairing.wake();
    }
    Ok(commit)
}

fn interrupted(state: TicketState) -> Option<ActionOutcome> {
    match state {
        TicketState::Current => None,
        TicketState::Replaced => Some(ActionOutcome::Aborted),
        TicketState::RoundOver | TicketState::Closed(DuelPhase::Finished(_)) => {
            Some(ActionOutcome::Superseded)
        }
        TicketState::Closed(_) => Some(ActionOutcome::Cancelled),
    }
}
