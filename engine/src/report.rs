use serde::{Deserialize, Serialize};

use crate::conditions::{Effect, Status};

/// Which side of a pairing a creature sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    pub fn other(self) -> Slot {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

/// One creature's side of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeResult {
    pub life_delta: i32,
    pub stamina_delta: i32,
    pub gained_effect: Option<Effect>,
    pub performed: Status,
    pub success: bool,
}

impl InvokeResult {
    pub fn new(performed: Status) -> Self {
        Self {
            life_delta: 0,
            stamina_delta: 0,
            gained_effect: None,
            performed,
            success: false,
        }
    }

    /// The tag a presentation layer should lead with: a freshly gained effect beats the move.
    pub fn headline(&self) -> Status {
        self.gained_effect.map(Status::from).unwrap_or(self.performed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinnerSlot {
    #[default]
    None,
    Draw,
    First,
    Second,
}

impl WinnerSlot {
    /// Termination check after a round. Both down is a draw.
    pub fn from_deaths(first_dead: bool, second_dead: bool) -> Self {
        match (first_dead, second_dead) {
            (false, false) => WinnerSlot::None,
            (true, true) => WinnerSlot::Draw,
            (true, false) => WinnerSlot::Second,
            (false, true) => WinnerSlot::First,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, WinnerSlot::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelReport {
    pub round: u32,
    pub results: [InvokeResult; 2],
    pub match_ended: bool,
    pub winner: WinnerSlot,
}

impl DuelReport {
    pub fn new(round: u32, results: [InvokeResult; 2], winner: WinnerSlot) -> Self {
        Self {
            round,
            results,
            match_ended: winner.is_terminal(),
            winner,
        }
    }

    pub fn result(&self, slot: Slot) -> &InvokeResult {
        &self.results[slot.index()]
    }

    /// The same report seen from one participant's side.
    pub fn perspective(&self, slot: Slot) -> Perspective<'_> {
        let outcome = match self.winner {
            WinnerSlot::None => Outcome::Ongoing,
            WinnerSlot::Draw => Outcome::Draw,
            WinnerSlot::First if slot == Slot::First => Outcome::Won,
            WinnerSlot::Second if slot == Slot::Second => Outcome::Won,
            WinnerSlot::First | WinnerSlot::Second => Outcome::Lost,
        };
        Perspective {
            own: self.result(slot),
            enemy: self.result(slot.other()),
            outcome,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ongoing,
    Won,
    Lost,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perspective<'a> {
    pub own: &'a InvokeResult,
    pub enemy: &'a InvokeResult,
    pub outcome: Outcome,
}

impl Perspective<'_> {
    /// Life the enemy lost this round, as a positive number.
    pub fn damage_dealt(&self) -> i32 {
        -self.enemy.life_delta.min(0)
    }
}
