use std::{fs, time::Duration};

use anyhow::{Context, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conditions::Action;
use crate::content::builtin_profile;
use crate::creature::CreatureProfile;
use crate::duel::Duel;
use crate::report::{DuelReport, Slot, WinnerSlot};

const DEFAULT_MAX_ROUNDS: u32 = 100;

/// Relative odds of each action for a scripted opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Policy {
    #[serde(default)]
    pub guard: u32,
    #[serde(default)]
    pub attack: u32,
    #[serde(default)]
    pub defend: u32,
    #[serde(default)]
    pub dodge: u32,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            guard: 1,
            attack: 1,
            defend: 1,
            dodge: 1,
        }
    }
}

impl Policy {
    /// Always the same action.
    pub fn only(action: Action) -> Self {
        let mut policy = Self {
            guard: 0,
            attack: 0,
            defend: 0,
            dodge: 0,
        };
        *policy.weight_mut(action) = 1;
        policy
    }

    fn weight_mut(&mut self, action: Action) -> &mut u32 {
        match action {
            Action::Guard => &mut self.guard,
            Action::Attack => &mut self.attack,
            Action::Defend => &mut self.defend,
            Action::Dodge => &mut self.dodge,
        }
    }

    fn weights(&self) -> [u32; 4] {
        [self.guard, self.attack, self.defend, self.dodge]
    }
}

struct Chooser {
    dist: WeightedIndex<u32>,
}

impl Chooser {
    fn new(policy: &Policy) -> Result<Self> {
        let dist = WeightedIndex::new(policy.weights())
            .with_context(|| format!("policy has no usable weight: {:?}", policy))?;
        Ok(Self { dist })
    }

    fn pick(&self, rng: &mut ChaCha8Rng) -> Action {
        Action::ALL[self.dist.sample(rng)]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationConfig {
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub first: Policy,
    #[serde(default)]
    pub second: Policy,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            profile_id: None,
            profile_path: None,
            first: Policy::default(),
            second: Policy::default(),
            seed: 0,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationResult {
    pub winner: WinnerSlot,
    pub rounds: u32,
    pub first_health_end: i32,
    pub second_health_end: i32,
    pub reports: Vec<DuelReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationStats {
    pub samples: u32,
    pub first_wins: u32,
    pub second_wins: u32,
    pub draws: u32,
    /// Duels still going when `max_rounds` ran out.
    pub unfinished: u32,
    pub avg_rounds: f64,
}

/// Play a whole duel offline, both sides drawing actions from their policy.
///
/// Commit windows are irrelevant here: both sides always commit before the round resolves.
pub fn simulate_duel(cfg: &SimulationConfig) -> Result<SimulationResult> {
    let profile = resolve_profile(cfg)?;
    let first = Chooser::new(&cfg.first)?;
    let second = Chooser::new(&cfg.second)?;
    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);

    let mut duel = Duel::new(profile, Duration::from_secs(1));
    let mut reports = Vec::new();

    while duel.is_open() && duel.round() < cfg.max_rounds {
        duel.commit(Slot::First, first.pick(&mut rng))?;
        duel.commit(Slot::Second, second.pick(&mut rng))?;
        reports.push(duel.resolve());
    }

    let winner = reports.last().map(|r| r.winner).unwrap_or_default();
    debug!(seed = cfg.seed, rounds = duel.round(), ?winner, "[SIM] duel finished");

    Ok(SimulationResult {
        winner,
        rounds: duel.round(),
        first_health_end: duel.creature(Slot::First).health(),
        second_health_end: duel.creature(Slot::Second).health(),
        reports,
    })
}

/// Run `samples` duels, seeding sample `i` with `seed + i`.
pub fn simulate_duel_many(cfg: &SimulationConfig, samples: u32) -> Result<SimulationStats> {
    let mut stats = SimulationStats {
        samples,
        first_wins: 0,
        second_wins: 0,
        draws: 0,
        unfinished: 0,
        avg_rounds: 0.0,
    };
    let mut total_rounds = 0u64;

    for i in 0..samples {
        let sample = SimulationConfig {
            seed: cfg.seed.wrapping_add(i as u64),
            ..cfg.clone()
        };
        let res = simulate_duel(&sample)?;
        total_rounds += res.rounds as u64;
        match res.winner {
            WinnerSlot::First => stats.first_wins += 1,
            WinnerSlot::Second => stats.second_wins += 1,
            WinnerSlot::Draw => stats.draws += 1,
            WinnerSlot::None => stats.unfinished += 1,
        }
    }

    if samples > 0 {
        stats.avg_rounds = total_rounds as f64 / samples as f64;
    }
    Ok(stats)
}

fn resolve_profile(cfg: &SimulationConfig) -> Result<CreatureProfile> {
    if let Some(path) = cfg.profile_path.as_deref() {
        return load_profile(path);
    }
    match cfg.profile_id.as_deref() {
        Some(id) => builtin_profile(id),
        None => Ok(CreatureProfile::default()),
    }
}

pub fn load_profile(path: &str) -> Result<CreatureProfile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read profile JSON: {}", path))?;
    let data = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse profile JSON: {}", path))?;
    Ok(data)
}
