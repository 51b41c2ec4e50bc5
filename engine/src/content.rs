use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::creature::CreatureProfile;

pub fn builtin_profiles() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        (
            "standard",
            include_str!("../content/creatures/standard.json"),
        ),
        ("brute", include_str!("../content/creatures/brute.json")),
        (
            "skirmisher",
            include_str!("../content/creatures/skirmisher.json"),
        ),
    ])
}

/// Sorted ids of the embedded creature profiles.
pub fn builtin_profile_ids() -> Vec<&'static str> {
    let mut ids: Vec<_> = builtin_profiles().into_keys().collect();
    ids.sort_unstable();
    ids
}

pub fn builtin_profile(id: &str) -> Result<CreatureProfile> {
    let profiles = builtin_profiles();
    let text = profiles
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("profile '{}' not found", id))?;
    serde_json::from_str(text).with_context(|| format!("failed to parse builtin profile: {}", id))
}
