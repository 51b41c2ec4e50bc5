use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use tracing::info;

use crate::creature::{Creature, CreatureProfile};
use crate::duel::Duel;
use crate::error::DuelError;
use crate::report::Slot;

/// Identifier of a chat session / user as handed over by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairingId(pub u64);

impl fmt::Display for PairingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub pairing: Option<PairingId>,
}

/// The exclusive association of two sessions as opponents.
#[derive(Debug)]
pub struct Pairing {
    pub id: PairingId,
    pub players: [SessionId; 2],
    duel: Mutex<Duel>,
    pub(crate) notify: Notify,
}

impl Pairing {
    fn new(id: PairingId, players: [SessionId; 2], duel: Duel) -> Self {
        Self {
            id,
            players,
            duel: Mutex::new(duel),
            notify: Notify::new(),
        }
    }

    /// Both creatures live behind one lock, so a reader never sees half a round.
    pub fn duel(&self) -> MutexGuard<'_, Duel> {
        // Nothing inside the lock can panic halfway through a mutation, keep going on poison.
        self.duel.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn slot_of(&self, session: SessionId) -> Option<Slot> {
        if self.players[0] == session {
            Some(Slot::First)
        } else if self.players[1] == session {
            Some(Slot::Second)
        } else {
            None
        }
    }

    pub fn session(&self, slot: Slot) -> SessionId {
        self.players[slot.index()]
    }

    /// Wake every wait parked on this pairing.
    pub(crate) fn wake(&self) {
        self.notify.notify_waiters();
    }
}

/// Sessions and the duels they are engaged in. Owned by an arena, never global.
#[derive(Debug)]
pub struct Registry {
    profile: CreatureProfile,
    time_unit: Duration,
    players: IndexMap<SessionId, Player>,
    pairings: IndexMap<PairingId, Arc<Pairing>>,
    /// Ids are handed out in order, so every issued id below this that is gone has ended.
    next_id: u64,
}

impl Registry {
    pub fn new(profile: CreatureProfile, time_unit: Duration) -> Self {
        Self {
            profile,
            time_unit,
            players: IndexMap::new(),
            pairings: IndexMap::new(),
            next_id: 1,
        }
    }

    /// Add a session, or rename it if it is already known.
    pub fn register(&mut self, session: SessionId, name: impl Into<String>) {
        let name = name.into();
        self.players
            .entry(session)
            .and_modify(|p| p.name = name.clone())
            .or_insert(Player {
                name,
                pairing: None,
            });
    }

    pub fn player(&self, session: SessionId) -> Result<&Player, DuelError> {
        self.players
            .get(&session)
            .ok_or(DuelError::UnknownSession(session))
    }

    pub fn is_busy(&self, session: SessionId) -> bool {
        self.players
            .get(&session)
            .map_or(true, |p| p.pairing.is_some())
    }

    pub fn sessions(&self) -> impl Iterator<Item = (&SessionId, &Player)> {
        self.players.iter()
    }

    pub fn active_pairings(&self) -> usize {
        self.pairings.len()
    }

    /// Pair two idle sessions with fresh creatures.
    pub fn pair(&mut self, a: SessionId, b: SessionId) -> Result<PairingId, DuelError> {
        if a == b {
            return Err(DuelError::SelfChallenge(a));
        }
        for session in [a, b] {
            if self.player(session)?.pairing.is_some() {
                return Err(DuelError::AlreadyPaired(session));
            }
        }

        let id = PairingId(self.next_id);
        self.next_id += 1;
        let duel = Duel::new(self.profile, self.time_unit);
        self.pairings
            .insert(id, Arc::new(Pairing::new(id, [a, b], duel)));
        for session in [a, b] {
            if let Some(player) = self.players.get_mut(&session) {
                player.pairing = Some(id);
            }
        }
        info!(pairing = %id, first = %a, second = %b, "[DUEL] engaged");
        Ok(id)
    }

    pub fn pairing_of(&self, session: SessionId) -> Result<(Arc<Pairing>, Slot), DuelError> {
        let id = self
            .player(session)?
            .pairing
            .ok_or(DuelError::NotPaired(session))?;
        let pairing = self
            .pairings
            .get(&id)
            .cloned()
            .ok_or(DuelError::NotPaired(session))?;
        let slot = pairing.slot_of(session).ok_or(DuelError::NotPaired(session))?;
        Ok((pairing, slot))
    }

    pub fn pairing(&self, id: PairingId) -> Result<Arc<Pairing>, DuelError> {
        if let Some(pairing) = self.pairings.get(&id) {
            return Ok(pairing.clone());
        }
        if id.0 >= 1 && id.0 < self.next_id {
            Err(DuelError::AlreadyEnded(id))
        } else {
            Err(DuelError::UnknownPairing(id))
        }
    }

    pub fn opponent_of(&self, session: SessionId) -> Result<SessionId, DuelError> {
        let (pairing, slot) = self.pairing_of(session)?;
        Ok(pairing.session(slot.other()))
    }

    /// Snapshot of the creature a session is fighting with.
    pub fn lookup_creature(&self, session: SessionId) -> Result<Creature, DuelError> {
        let (pairing, slot) = self.pairing_of(session)?;
        let duel = pairing.duel();
        Ok(duel.creature(slot).clone())
    }

    /// Release both sessions of the duel `session` is in.
    pub fn unpair(&mut self, session: SessionId) -> Result<PairingId, DuelError> {
        let (pairing, _) = self.pairing_of(session)?;
        self.end(pairing.id)?;
        Ok(pairing.id)
    }

    /// Close a duel, discard its creatures and free both sessions.
    ///
    /// Ending twice reports [`DuelError::AlreadyEnded`] and changes nothing.
    pub fn end(&mut self, id: PairingId) -> Result<(), DuelError> {
        let pairing = self.pairing(id)?;
        pairing.duel().forfeit();
        pairing.wake();

        self.pairings.shift_remove(&id);
        for session in pairing.players {
            if let Some(player) = self.players.get_mut(&session) {
                if player.pairing == Some(id) {
                    player.pairing = None;
                }
            }
        }
        info!(pairing = %id, "[DUEL] ended");
        Ok(())
    }
}
