use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::conditions::{Action, Affliction, Effect, Status};
use crate::error::DuelError;
use crate::life::Vitals;
use crate::report::InvokeResult;

const DEFAULT_HEALTH: i32 = 20;
const DEFAULT_DAMAGE: u32 = 5;
const DEFAULT_STAMINA: u32 = 6;
const DEFAULT_MAX_STAMINA: u32 = 10;

/// Starting stats handed to both sides of a new duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreatureProfile {
    #[serde(default = "default_health")]
    pub health: i32,
    #[serde(default = "default_damage")]
    pub damage: u32,
    #[serde(default = "default_stamina")]
    pub stamina: u32,
    #[serde(default = "default_max_stamina")]
    pub max_stamina: u32,
}

fn default_health() -> i32 {
    DEFAULT_HEALTH
}

fn default_damage() -> u32 {
    DEFAULT_DAMAGE
}

fn default_stamina() -> u32 {
    DEFAULT_STAMINA
}

fn default_max_stamina() -> u32 {
    DEFAULT_MAX_STAMINA
}

impl Default for CreatureProfile {
    fn default() -> Self {
        Self {
            health: DEFAULT_HEALTH,
            damage: DEFAULT_DAMAGE,
            stamina: DEFAULT_STAMINA,
            max_stamina: DEFAULT_MAX_STAMINA,
        }
    }
}

/// Read-only view of what a creature is doing and what is holding it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub action: Action,
    pub effect: Option<Effect>,
}

/// The behaviour a creature will resolve with this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    Attack,
    Defend,
    Dodge,
    Guard,
    Stunned,
    Exhausted,
}

/// One combatant of a duel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub(crate) vitals: Vitals,
    damage: u32,
    pub(crate) action: Action,
    /// Window of the action committed this round; zero once the round resolves.
    pending_duration: Duration,
    /// Window of the last real commit. Survives resolution so a helpless creature can report it.
    last_window: Duration,
    pub(crate) affliction: Option<Affliction>,
    time_unit: Duration,
}

impl Creature {
    pub fn new(profile: CreatureProfile, time_unit: Duration) -> Self {
        Self {
            vitals: Vitals::new(profile.health, profile.stamina, profile.max_stamina),
            damage: profile.damage,
            action: Action::Guard,
            pending_duration: Duration::ZERO,
            last_window: Duration::ZERO,
            affliction: None,
            time_unit,
        }
    }

    pub fn health(&self) -> i32 {
        self.vitals.health
    }

    pub fn stamina(&self) -> u32 {
        self.vitals.stamina
    }

    pub fn max_stamina(&self) -> u32 {
        self.vitals.max_stamina
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn vitals(&self) -> Vitals {
        self.vitals
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn pending_duration(&self) -> Duration {
        self.pending_duration
    }

    pub fn last_window(&self) -> Duration {
        self.last_window
    }

    pub fn effect(&self) -> Option<Effect> {
        self.affliction.map(|a| a.effect)
    }

    /// Commit to an action and return its commit window.
    ///
    /// Effect tags are rejected. While stunned or exhausted the call changes nothing and
    /// hands back the window already stored.
    pub fn set_action(&mut self, requested: Status) -> Result<Duration, DuelError> {
        let action = requested
            .as_action()
            .ok_or_else(|| DuelError::InvalidAction(requested.name().to_string()))?;

        if self.is_helpless() {
            return Ok(self.last_window);
        }

        let units = match action {
            Action::Guard => 0,
            Action::Defend => 1,
            Action::Attack | Action::Dodge => self.vitals.fatigue_units(),
        };
        self.action = action;
        self.pending_duration = self.time_unit.saturating_mul(units);
        self.last_window = self.pending_duration;
        Ok(self.pending_duration)
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            action: self.action,
            effect: self.effect(),
        }
    }

    pub fn is_on_status(&self, status: Status) -> bool {
        match (status.as_action(), status.as_effect()) {
            (Some(action), _) => self.action == action,
            (None, Some(effect)) => self.effect() == Some(effect),
            (None, None) => false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.vitals.is_dead()
    }

    /// An active effect overrides whatever was chosen.
    pub fn is_helpless(&self) -> bool {
        self.affliction.is_some()
    }

    /// The effect when one is active, the committed action otherwise.
    pub fn displayed_status(&self) -> Status {
        self.effect()
            .map(Status::from)
            .unwrap_or_else(|| self.action.into())
    }

    /// Ready means this round's behaviour is settled: a real commitment, or a forced idle.
    pub fn is_ready(&self) -> bool {
        self.action != Action::Guard || self.is_helpless()
    }

    pub fn stance(&self) -> Stance {
        match (self.effect(), self.action) {
            (Some(Effect::Stunned), _) => Stance::Stunned,
            (Some(Effect::Exhausted), _) => Stance::Exhausted,
            (None, Action::Attack) => Stance::Attack,
            (None, Action::Defend) => Stance::Defend,
            (None, Action::Dodge) => Stance::Dodge,
            (None, Action::Guard) => Stance::Guard,
        }
    }

    /// What the enemy sees this creature doing: forced idles look like guarding.
    pub(crate) fn effective_action(&self) -> Action {
        if self.is_helpless() {
            Action::Guard
        } else {
            self.action
        }
    }

    /// Burn a point of stamina, or become exhausted when the tank is already empty.
    pub(crate) fn spend_energy(&mut self, response: &mut InvokeResult) {
        if self.vitals.drain() {
            response.stamina_delta -= 1;
        } else {
            response.gained_effect = Some(Effect::Exhausted);
        }
    }

    pub(crate) fn restore_energy(&mut self, response: &mut InvokeResult) {
        if self.vitals.recover() {
            response.stamina_delta += 1;
        }
    }

    pub(crate) fn take_hit(&mut self, amount: u32, response: &mut InvokeResult) {
        response.life_delta += self.vitals.take_damage(amount);
    }

    pub(crate) fn afflict(&mut self, effect: Effect) {
        self.affliction = Some(Affliction::one_round(effect));
    }

    pub(crate) fn reset_action(&mut self) {
        self.action = Action::Guard;
        self.pending_duration = Duration::ZERO;
    }
}
