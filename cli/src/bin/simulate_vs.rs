use clap::Parser;
use duel_engine::api::{simulate_duel_many, Policy, SimulationConfig};
use encoding_rs::Encoding;
use serde::Deserialize;
use std::{fs, path::PathBuf};

#[derive(Parser)]
#[command(name = "simulate-vs")]
#[command(about = "Monte Carlo sim: many duels between two action policies")]
struct Args {
    /// Weights of the first side as guard,attack,defend,dodge
    #[arg(long, default_value = "1,1,1,1")]
    first: String,

    /// Weights of the second side as guard,attack,defend,dodge
    #[arg(long, default_value = "1,1,1,1")]
    second: String,

    /// Optional JSON file { "first": {...}, "second": {...} }; overrides --first/--second
    #[arg(long)]
    policies: Option<PathBuf>,

    /// Builtin creature profile
    #[arg(long)]
    profile: Option<String>,

    /// Creature profile JSON file; wins over --profile
    #[arg(long)]
    profile_file: Option<PathBuf>,

    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// Safety cap on rounds per trial
    #[arg(long, default_value_t = 100)]
    max_rounds: u32,

    /// RNG base seed (trial i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

#[derive(Deserialize)]
struct PolicyPair {
    #[serde(default)]
    first: Policy,
    #[serde(default)]
    second: Policy,
}

fn parse_weights(s: &str) -> anyhow::Result<Policy> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()?;
    let [guard, attack, defend, dodge] = parts[..] else {
        anyhow::bail!("expected four weights (guard,attack,defend,dodge), got: {}", s);
    };
    Ok(Policy {
        guard,
        attack,
        defend,
        dodge,
    })
}

fn read_text_auto(path: &std::path::Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn pct(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (first, second) = match args.policies.as_ref() {
        Some(path) => {
            let pair: PolicyPair = serde_json::from_str(&read_text_auto(path)?)?;
            (pair.first, pair.second)
        }
        None => (parse_weights(&args.first)?, parse_weights(&args.second)?),
    };

    let cfg = SimulationConfig {
        profile_id: args.profile.clone(),
        profile_path: args
            .profile_file
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        first,
        second,
        seed: args.seed,
        max_rounds: args.max_rounds,
    };
    let stats = simulate_duel_many(&cfg, args.trials)?;

    let weights = |p: &Policy| format!("{}/{}/{}/{}", p.guard, p.attack, p.defend, p.dodge);

    println!("simulate-vs results");
    println!("-------------------");
    println!("trials:             {}", stats.samples);
    let profile = match (&args.profile_file, &args.profile) {
        (Some(path), _) => path.display().to_string(),
        (None, Some(id)) => id.clone(),
        (None, None) => "standard".to_string(),
    };
    println!("profile:            {}", profile);
    println!("first (g/a/d/d):    {}", weights(&cfg.first));
    println!("second (g/a/d/d):   {}", weights(&cfg.second));
    println!();
    println!("first wins:         {:.1}%", pct(stats.first_wins, stats.samples));
    println!("second wins:        {:.1}%", pct(stats.second_wins, stats.samples));
    println!("draws:              {:.1}%", pct(stats.draws, stats.samples));
    println!("unfinished:         {:.1}%", pct(stats.unfinished, stats.samples));
    println!("avg rounds:         {:.2}", stats.avg_rounds);

    Ok(())
}
