use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DuelError;

/// What a creature can choose to do in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Neutral default. Watching, not shielding.
    #[default]
    Guard,
    Attack,
    Defend,
    Dodge,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Guard, Action::Attack, Action::Defend, Action::Dodge];

    /// Attack and dodge burn stamina and their window grows as stamina drains.
    pub fn is_intensive(self) -> bool {
        matches!(self, Action::Attack | Action::Dodge)
    }
}

/// Transient forced-idle conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Stunned,
    Exhausted,
}

/// Single tag space shared by actions (positive tags) and effects (negative tags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Guard,
    Attack,
    Defend,
    Dodge,
    Stunned,
    Exhausted,
}

impl Status {
    pub fn tag(self) -> i8 {
        match self {
            Status::Guard => 1,
            Status::Attack => 2,
            Status::Defend => 3,
            Status::Dodge => 4,
            Status::Stunned => -1,
            Status::Exhausted => -2,
        }
    }

    pub fn from_tag(tag: i8) -> Option<Status> {
        Some(match tag {
            1 => Status::Guard,
            2 => Status::Attack,
            3 => Status::Defend,
            4 => Status::Dodge,
            -1 => Status::Stunned,
            -2 => Status::Exhausted,
            _ => return None,
        })
    }

    pub fn is_effect(self) -> bool {
        self.tag() < 0
    }

    pub fn as_action(self) -> Option<Action> {
        match self {
            Status::Guard => Some(Action::Guard),
            Status::Attack => Some(Action::Attack),
            Status::Defend => Some(Action::Defend),
            Status::Dodge => Some(Action::Dodge),
            Status::Stunned | Status::Exhausted => None,
        }
    }

    pub fn as_effect(self) -> Option<Effect> {
        match self {
            Status::Stunned => Some(Effect::Stunned),
            Status::Exhausted => Some(Effect::Exhausted),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Status::Guard => "GUARD",
            Status::Attack => "ATTACK",
            Status::Defend => "DEFEND",
            Status::Dodge => "DODGE",
            Status::Stunned => "STUNNED",
            Status::Exhausted => "EXHAUSTED",
        }
    }
}

impl From<Action> for Status {
    fn from(action: Action) -> Self {
        match action {
            Action::Guard => Status::Guard,
            Action::Attack => Status::Attack,
            Action::Defend => Status::Defend,
            Action::Dodge => Status::Dodge,
        }
    }
}

impl From<Effect> for Status {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::Stunned => Status::Stunned,
            Effect::Exhausted => Status::Exhausted,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Status::from(*self).fmt(f)
    }
}

impl FromStr for Status {
    type Err = DuelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GUARD" => Ok(Status::Guard),
            "ATTACK" => Ok(Status::Attack),
            "DEFEND" => Ok(Status::Defend),
            "DODGE" => Ok(Status::Dodge),
            "STUNNED" => Ok(Status::Stunned),
            "EXHAUSTED" => Ok(Status::Exhausted),
            _ => Err(DuelError::InvalidAction(s.to_string())),
        }
    }
}

/// Only the four action names parse; effect names are rejected like any other word.
impl FromStr for Action {
    type Err = DuelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Status>()
            .ok()
            .and_then(Status::as_action)
            .ok_or_else(|| DuelError::InvalidAction(s.to_string()))
    }
}

/// An effect currently held by a creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affliction {
    pub effect: Effect,
    /// Rounds the effect still overrides the creature's action.
    pub remaining_turns: u8,
}

impl Affliction {
    pub fn one_round(effect: Effect) -> Self {
        Self {
            effect,
            remaining_turns: 1,
        }
    }
}

/// Count down an effect slot after it forced a round. Returns the effect that was consumed.
pub fn consume_affliction(slot: &mut Option<Affliction>) -> Option<Effect> {
    let current = slot.as_mut()?;
    let effect = current.effect;
    current.remaining_turns = current.remaining_turns.saturating_sub(1);
    if current.remaining_turns == 0 {
        *slot = None;
    }
    Some(effect)
}
