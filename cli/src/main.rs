use clap::{Parser, Subcommand};
use duel_engine::content::{builtin_profile, builtin_profile_ids};
use duel_engine::{
    Action, ActionOutcome, Arena, ArenaConfig, CreatureProfile, Duel, DuelReport, SessionId, Slot,
    Status,
};
use encoding_rs::Encoding;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tokio::time::Instant;

#[derive(Subcommand)]
enum Cmd {
    /// List the builtin creature profiles
    Profiles,
    /// Serialize a builtin creature profile to JSON (stdout)
    ProfileDump {
        /// Builtin profile id
        #[arg(long, default_value = "standard")]
        id: String,
        /// Pretty-print JSON
        #[arg(long, default_value_t = true)]
        pretty: bool,
    },
    /// Resolve a single round between two fresh creatures and print the report
    Round {
        /// Action of the first creature
        #[arg(long, default_value = "guard")]
        first: Action,
        /// Action of the second creature
        #[arg(long, default_value = "guard")]
        second: Action,
        /// Builtin profile both creatures start with
        #[arg(long, default_value = "standard")]
        profile: String,
    },
    /// Play scripted rounds from a JSON file until someone drops
    Script {
        /// JSON file: { "profile": {...}, "rounds": [["attack", "defend"], ...] }
        #[arg(long)]
        file: PathBuf,
    },
    /// Drive the timed arena: both sides submit, the second one after a delay
    Race {
        #[arg(long)]
        first: Action,
        #[arg(long)]
        second: Action,
        /// How long the second side hesitates before submitting
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        /// Length of one commit-window unit
        #[arg(long, default_value_t = 100)]
        time_unit_ms: u64,
        /// Arena config (.json/.yaml); overrides --time-unit-ms
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Parser)]
#[command(name = "duel-cli")]
#[command(about = "Duel engine CLI harness")]
struct Cli {
    /// Log engine events to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Deserialize)]
struct Script {
    #[serde(default)]
    profile: CreatureProfile,
    rounds: Vec<[Action; 2]>,
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn print_report(report: &DuelReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(report)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Profiles => {
            for id in builtin_profile_ids() {
                let p = builtin_profile(id)?;
                println!(
                    "{:<12} health={} damage={} stamina={}/{}",
                    id, p.health, p.damage, p.stamina, p.max_stamina
                );
            }
        }
        Cmd::ProfileDump { id, pretty } => {
            let profile = builtin_profile(&id)?;
            if pretty {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                println!("{}", serde_json::to_string(&profile)?);
            }
        }
        Cmd::Round {
            first,
            second,
            profile,
        } => {
            let mut duel = Duel::new(builtin_profile(&profile)?, Duration::from_secs(1));
            duel.commit(Slot::First, first)?;
            duel.commit(Slot::Second, second)?;
            print_report(&duel.resolve())?;
        }
        Cmd::Script { file } => {
            let text = read_text_auto(&file)?;
            let script: Script = serde_json::from_str(&text)?;
            let mut duel = Duel::new(script.profile, Duration::from_secs(1));
            for [first, second] in script.rounds {
                if !duel.is_open() {
                    break;
                }
                duel.commit(Slot::First, first)?;
                duel.commit(Slot::Second, second)?;
                print_report(&duel.resolve())?;
            }
            println!(
                "health first={} second={} phase={:?}",
                duel.creature(Slot::First).health(),
                duel.creature(Slot::Second).health(),
                duel.phase()
            );
        }
        Cmd::Race {
            first,
            second,
            delay_ms,
            time_unit_ms,
            config,
        } => {
            let config = match config {
                Some(path) => ArenaConfig::load(path)?,
                None => ArenaConfig {
                    time_unit_ms,
                    ..ArenaConfig::default()
                },
            };
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(race(config, first, second, Duration::from_millis(delay_ms)))?;
        }
    }
    Ok(())
}

async fn race(
    config: ArenaConfig,
    first: Action,
    second: Action,
    delay: Duration,
) -> anyhow::Result<()> {
    const FIRST: SessionId = SessionId(1);
    const SECOND: SessionId = SessionId(2);

    let arena = Arc::new(Arena::new(config));
    arena.register(FIRST, "first");
    arena.register(SECOND, "second");
    arena.engage(FIRST, SECOND)?;

    let started = Instant::now();
    let leading = {
        let arena = arena.clone();
        tokio::spawn(async move {
            let outcome = arena.submit_action(FIRST, first).await;
            (outcome, started.elapsed())
        })
    };
    tokio::time::sleep(delay).await;
    let trailing = arena.submit_action(SECOND, second).await?;
    let trailing_at = started.elapsed();
    let (leading, leading_at) = leading.await?;

    println!("first:  {} after {}ms", describe(&leading?), leading_at.as_millis());
    println!("second: {} after {}ms", describe(&trailing), trailing_at.as_millis());
    Ok(())
}

fn describe(outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::Unchanged => "unchanged".to_string(),
        ActionOutcome::Suppressed { effect, duration } => {
            format!("held by {} ({}ms)", Status::from(*effect), duration.as_millis())
        }
        ActionOutcome::Deferred { duration } => format!("deferred ({}ms)", duration.as_millis()),
        ActionOutcome::Aborted => "aborted".to_string(),
        ActionOutcome::Superseded => "superseded".to_string(),
        ActionOutcome::Cancelled => "cancelled".to_string(),
        ActionOutcome::Resolved(res) => {
            let [a, b] = &res.report.results;
            format!(
                "resolved round {} ({} {:+}hp vs {} {:+}hp)",
                res.report.round,
                a.headline(),
                a.life_delta,
                b.headline(),
                b.life_delta
            )
        }
    }
}
