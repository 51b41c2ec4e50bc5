use duel_engine::api::{simulate_duel, simulate_duel_many, Policy, SimulationConfig};
use duel_engine::{Action, WinnerSlot};

#[test]
fn duel_api_smoke() {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let profile_path = manifest
        .join("content/creatures/brute.json")
        .to_string_lossy()
        .into_owned();

    let cfg = SimulationConfig {
        profile_path: Some(profile_path),
        seed: 2025,
        ..SimulationConfig::default()
    };
    let res = simulate_duel(&cfg).expect("duel ran");
    assert!(res.rounds > 0);
    assert_eq!(res.reports.len(), res.rounds as usize);
    assert_eq!(res.reports.last().map(|r| r.winner), Some(res.winner));
}

#[test]
fn same_seed_same_duel() {
    let cfg = SimulationConfig {
        seed: 7,
        ..SimulationConfig::default()
    };
    let a = simulate_duel(&cfg).unwrap();
    let b = simulate_duel(&cfg).unwrap();
    assert_eq!(a.reports, b.reports);
    assert_eq!(a.winner, b.winner);
}

#[test]
fn relentless_attacker_beats_a_passive_opponent() {
    let cfg = SimulationConfig {
        first: Policy::only(Action::Attack),
        second: Policy::only(Action::Guard),
        ..SimulationConfig::default()
    };
    let res = simulate_duel(&cfg).unwrap();

    // Guard offers no protection: four clean hits and the attacker is never touched.
    assert_eq!(res.winner, WinnerSlot::First);
    assert_eq!(res.first_health_end, 20);
    assert!(res.second_health_end <= 0);
    assert_eq!(res.rounds, 4);
}

#[test]
fn passive_duel_runs_out_of_rounds() {
    let cfg = SimulationConfig {
        first: Policy::only(Action::Guard),
        second: Policy::only(Action::Guard),
        max_rounds: 12,
        ..SimulationConfig::default()
    };
    let res = simulate_duel(&cfg).unwrap();
    assert_eq!(res.winner, WinnerSlot::None);
    assert_eq!(res.rounds, 12);
    assert_eq!(res.first_health_end, 20);
}

#[test]
fn policy_without_weight_is_rejected() {
    let cfg = SimulationConfig {
        first: Policy {
            guard: 0,
            attack: 0,
            defend: 0,
            dodge: 0,
        },
        ..SimulationConfig::default()
    };
    let err = simulate_duel(&cfg).unwrap_err();
    assert!(err.to_string().contains("no usable weight"));
}

#[test]
fn many_duels_account_for_every_sample() {
    let cfg = SimulationConfig {
        seed: 1,
        ..SimulationConfig::default()
    };
    let stats = simulate_duel_many(&cfg, 50).unwrap();
    assert_eq!(stats.samples, 50);
    assert_eq!(
        stats.first_wins + stats.second_wins + stats.draws + stats.unfinished,
        50
    );
    assert!(stats.avg_rounds > 0.0);
}
