use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::creature::CreatureProfile;

const DEFAULT_TIME_UNIT_MS: u64 = 1000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Tunables of an arena. Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ArenaConfig {
    /// Stats both creatures start every duel with.
    #[serde(default)]
    pub profile: CreatureProfile,
    /// Length of one commit-window unit.
    #[serde(default = "default_time_unit_ms")]
    pub time_unit_ms: u64,
    /// Upper bound on how long a waiting participant goes without re-checking its opponent.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_time_unit_ms() -> u64 {
    DEFAULT_TIME_UNIT_MS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            profile: CreatureProfile::default(),
            time_unit_ms: DEFAULT_TIME_UNIT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ArenaConfig {
    pub fn with_profile(profile: CreatureProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    /// Never zero: a zero interval would spin.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read arena config: {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Self::from_json(&text)
                .with_context(|| format!("failed to parse arena config JSON: {}", path.display())),
            Some("yaml") | Some("yml") => Self::from_yaml(&text)
                .with_context(|| format!("failed to parse arena config YAML: {}", path.display())),
            _ => bail!("unsupported config format: {}", path.display()),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}
