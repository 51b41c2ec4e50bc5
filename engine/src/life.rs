use serde::{Deserialize, Serialize};

/// Hit points and stamina of a creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    /// No floor is enforced; anything at or below zero is dead.
    pub health: i32,
    pub stamina: u32, // 0..=max_stamina
    pub max_stamina: u32,
}

impl Vitals {
    pub fn new(health: i32, stamina: u32, max_stamina: u32) -> Self {
        Self {
            health,
            stamina: stamina.min(max_stamina),
            max_stamina,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Apply a hit and return the (non-positive) life delta.
    pub fn take_damage(&mut self, amount: u32) -> i32 {
        let delta = -i32::try_from(amount).unwrap_or(i32::MAX);
        self.health = self.health.saturating_add(delta);
        delta
    }

    /// Burn one point of stamina. Returns false when there was nothing left to burn.
    pub(crate) fn drain(&mut self) -> bool {
        if self.stamina == 0 {
            return false;
        }
        self.stamina -= 1;
        true
    }

    /// Regain one point of stamina. Returns false when already at the cap.
    pub(crate) fn recover(&mut self) -> bool {
        if self.stamina >= self.max_stamina {
            return false;
        }
        self.stamina += 1;
        true
    }

    /// Window units an intensive action needs: the emptier the tank, the slower the move.
    pub fn fatigue_units(&self) -> u32 {
        self.max_stamina
            .saturating_sub(self.stamina)
            .saturating_add(1)
    }
}
