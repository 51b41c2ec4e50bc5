//! Deterministic two-creature duel resolution.
//!
//! Both sides commit an action, each with a commit window. The arena resolves the two
//! actions simultaneously and hands back a [`DuelReport`] of structured deltas.

pub mod api;
pub mod arena;
pub mod checks;
pub mod combat;
pub mod conditions;
pub mod config;
pub mod content;
pub mod creature;
pub mod duel;
pub mod error;
pub mod life;
pub mod registry;
pub mod report;

pub use arena::{ActionOutcome, Arena, Resolution};
pub use conditions::{Action, Affliction, Effect, Status};
pub use config::ArenaConfig;
pub use creature::{Creature, CreatureProfile, Stance, StatusSnapshot};
pub use duel::{Commit, Duel, DuelPhase};
pub use error::DuelError;
pub use life::Vitals;
pub use registry::{PairingId, Registry, SessionId};
pub use report::{DuelReport, InvokeResult, Outcome, Perspective, Slot, WinnerSlot};
