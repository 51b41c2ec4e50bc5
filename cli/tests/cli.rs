use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn duel_cli() -> Command {
    Command::cargo_bin("duel-cli").unwrap()
}

#[test]
fn profiles_lists_every_builtin() {
    duel_cli()
        .arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("brute"))
        .stdout(predicate::str::contains("skirmisher"))
        .stdout(predicate::str::contains("standard     health=20 damage=5 stamina=6/10"));
}

#[test]
fn profile_dump_prints_json() {
    duel_cli()
        .args(["profile-dump", "--id", "brute"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"health\": 30"));
}

#[test]
fn round_reports_a_defended_attack() {
    duel_cli()
        .args(["round", "--first", "attack", "--second", "DEFEND"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"life_delta\":-2"))
        .stdout(predicate::str::contains("\"winner\":\"none\""));
}

#[test]
fn round_rejects_effects_as_actions() {
    duel_cli()
        .args(["round", "--first", "stunned"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid action"));
}

#[test]
fn script_with_bom_plays_until_knockout() {
    duel_cli()
        .arg("script")
        .arg("--file")
        .arg(fixture("script_bom.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"round\":3"))
        .stdout(predicate::str::contains("\"round\":4").not())
        .stdout(predicate::str::contains(
            "health first=10 second=-2 phase=Finished(First)",
        ));
}

#[test]
fn race_lets_the_second_commit_resolve_the_round() {
    duel_cli()
        .args([
            "race",
            "--first",
            "attack",
            "--second",
            "attack",
            "--delay-ms",
            "100",
            "--time-unit-ms",
            "100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("first:  superseded"))
        .stdout(predicate::str::contains("second: resolved round 1"));
}

#[test]
fn race_against_an_idle_side_waits_out_the_window() {
    duel_cli()
        .args(["race", "--first", "attack", "--second", "guard", "--time-unit-ms", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("first:  resolved round 1 (ATTACK +0hp vs GUARD -5hp)"))
        .stdout(predicate::str::contains("second: unchanged"));
}

#[test]
fn simulate_vs_summarises_policies_from_file() {
    Command::cargo_bin("simulate-vs")
        .unwrap()
        .arg("--policies")
        .arg(fixture("policies.json"))
        .args(["--trials", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("first wins:         100.0%"))
        .stdout(predicate::str::contains("avg rounds:         4.00"));
}

#[test]
fn simulate_vs_rejects_malformed_weights() {
    Command::cargo_bin("simulate-vs")
        .unwrap()
        .args(["--first", "1,2,3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected four weights"));
}
