use std::sync::Arc;
use std::time::Duration;

use duel_engine::{
    Action, ActionOutcome, Arena, ArenaConfig, CreatureProfile, DuelError, DuelPhase, Effect,
    SessionId, Slot, Status, WinnerSlot,
};
use tokio::time::{sleep, Instant};

const A: SessionId = SessionId(1);
const B: SessionId = SessionId(2);
const UNIT: Duration = Duration::from_secs(1);

fn arena_with(profile: CreatureProfile) -> Arc<Arena> {
    let arena = Arena::new(ArenaConfig::with_profile(profile));
    arena.register(A, "alice");
    arena.register(B, "bob");
    arena.engage(A, B).unwrap();
    Arc::new(arena)
}

fn arena() -> Arc<Arena> {
    arena_with(CreatureProfile::default())
}

fn resolved(outcome: ActionOutcome) -> duel_engine::Resolution {
    match outcome {
        ActionOutcome::Resolved(res) => res,
        other => panic!("expected a resolution, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn attack_waits_out_its_window_against_an_idle_opponent() {
    let arena = arena();
    let started = Instant::now();

    let res = resolved(arena.submit_action(A, Action::Attack).await.unwrap());

    // Stamina 6 of 10: five units.
    let waited = started.elapsed();
    assert!(waited >= 5 * UNIT && waited < 6 * UNIT, "waited {:?}", waited);
    assert_eq!(res.slot_of(A), Some(Slot::First));
    assert_eq!(res.report.round, 1);
    assert_eq!(res.report.result(Slot::Second).life_delta, -5);
    assert_eq!(arena.creature(B).unwrap().health(), 15);
}

#[tokio::test(start_paused = true)]
async fn committed_opponent_resolves_immediately() {
    let arena = arena();
    let waiting = {
        let arena = arena.clone();
        tokio::spawn(async move { arena.submit_action(A, Action::Attack).await })
    };
    sleep(UNIT).await;

    let started = Instant::now();
    let res = resolved(arena.submit_action(B, Action::Attack).await.unwrap());
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(res.report.result(Slot::First).life_delta, -5);
    assert_eq!(res.report.result(Slot::Second).life_delta, -5);

    // The first window learns the round is gone and does not resolve it again.
    assert_eq!(waiting.await.unwrap(), Ok(ActionOutcome::Superseded));
    assert_eq!(arena.creature(A).unwrap().health(), 15);
    assert_eq!(arena.phase(A), Ok(DuelPhase::AwaitingActions));
}

#[tokio::test(start_paused = true)]
async fn switching_action_aborts_the_open_window() {
    let arena = arena();
    let waiting = {
        let arena = arena.clone();
        tokio::spawn(async move { arena.submit_action(A, Action::Attack).await })
    };
    sleep(UNIT).await;

    let switched = {
        let arena = arena.clone();
        tokio::spawn(async move { arena.submit_action(A, Action::Dodge).await })
    };
    assert_eq!(waiting.await.unwrap(), Ok(ActionOutcome::Aborted));

    let res = resolved(switched.await.unwrap().unwrap());
    assert_eq!(res.report.result(Slot::First).performed, Status::Dodge);
}

#[tokio::test(start_paused = true)]
async fn defend_is_deferred_until_the_opponent_commits() {
    let arena = arena();

    assert_eq!(
        arena.submit_action(A, Action::Defend).await,
        Ok(ActionOutcome::Deferred { duration: UNIT })
    );
    assert_eq!(arena.phase(A), Ok(DuelPhase::AwaitingActions));
    assert!(arena.is_ready(A).unwrap());
    assert!(!arena.is_ready(B).unwrap());

    let started = Instant::now();
    let res = resolved(arena.submit_action(B, Action::Attack).await.unwrap());
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(res.report.result(Slot::First).life_delta, -2);
    assert!(res.report.result(Slot::First).success);
}

#[tokio::test(start_paused = true)]
async fn guard_against_a_committed_defender_resolves_at_once() {
    let arena = arena();
    arena.set_player_action(A, Action::Defend).unwrap();
    arena.set_player_action(B, Action::Dodge).unwrap();

    // Backing out of the dodge leaves B passive against a committed defender.
    let res = resolved(arena.submit_action(B, Action::Guard).await.unwrap());
    let seen_by_b = res.report.perspective(Slot::Second);
    assert_eq!(seen_by_b.own.gained_effect, Some(Effect::Stunned));
    assert_eq!(arena.displayed_status(B), Ok(Status::Stunned));
}

#[tokio::test(start_paused = true)]
async fn resubmitting_the_same_action_is_a_no_op() {
    let arena = arena();
    assert!(matches!(
        arena.submit_action(A, Action::Defend).await,
        Ok(ActionOutcome::Deferred { .. })
    ));
    assert_eq!(
        arena.submit_action(A, Action::Defend).await,
        Ok(ActionOutcome::Unchanged)
    );
}

#[tokio::test(start_paused = true)]
async fn forfeit_cancels_an_open_window() {
    let arena = arena();
    let waiting = {
        let arena = arena.clone();
        tokio::spawn(async move { arena.submit_action(A, Action::Attack).await })
    };
    sleep(UNIT).await;

    let id = arena.forfeit(B).unwrap();
    assert_eq!(waiting.await.unwrap(), Ok(ActionOutcome::Cancelled));
    assert_eq!(arena.end_duel(id), Err(DuelError::AlreadyEnded(id)));
    assert!(!arena.is_busy(A));
    assert!(!arena.is_busy(B));
    assert_eq!(arena.opponent_of(A), Err(DuelError::NotPaired(A)));
}

#[tokio::test(start_paused = true)]
async fn stunned_player_is_told_what_holds_it() {
    let arena = arena();
    arena.set_player_action(B, Action::Defend).unwrap();
    let res = resolved(arena.submit_action(A, Action::Dodge).await.unwrap());
    assert_eq!(res.report.result(Slot::First).gained_effect, Some(Effect::Stunned));

    // The window of the dodge is reported back, not a new one.
    assert_eq!(
        arena.submit_action(A, Action::Attack).await,
        Ok(ActionOutcome::Suppressed {
            effect: Effect::Stunned,
            duration: 5 * UNIT,
        })
    );
    assert_eq!(arena.status(A).unwrap().action, Action::Guard);
    assert!(arena.is_ready(A).unwrap());
}

#[tokio::test(start_paused = true)]
async fn lethal_round_releases_both_sessions() {
    let arena = arena_with(CreatureProfile {
        health: 5,
        ..CreatureProfile::default()
    });
    arena.set_player_action(A, Action::Attack).unwrap();
    let res = resolved(arena.submit_action(B, Action::Attack).await.unwrap());

    assert!(res.report.match_ended);
    assert_eq!(res.report.winner, WinnerSlot::Draw);
    assert!(!arena.is_busy(A));
    assert!(!arena.is_busy(B));
    assert_eq!(
        arena.submit_action(A, Action::Attack).await,
        Err(DuelError::NotPaired(A))
    );
    assert_eq!(arena.end_duel(res.pairing), Err(DuelError::AlreadyEnded(res.pairing)));
}

#[tokio::test(start_paused = true)]
async fn resolving_an_idle_round_rests_both_sides() {
    let arena = arena();
    let report = arena.resolve_round(A).unwrap();

    assert_eq!(report.round, 1);
    for slot in [Slot::First, Slot::Second] {
        assert_eq!(report.result(slot).stamina_delta, 1);
        assert_eq!(report.result(slot).performed, Status::Guard);
    }
    assert_eq!(arena.creature(B).unwrap().stamina(), 7);
}

#[tokio::test(start_paused = true)]
async fn sessions_must_be_known_and_paired() {
    let arena = arena();
    let stranger = SessionId(77);
    assert_eq!(
        arena.submit_action(stranger, Action::Guard).await,
        Err(DuelError::UnknownSession(stranger))
    );

    arena.register(SessionId(3), "carol");
    assert_eq!(
        arena.set_player_action(SessionId(3), Action::Attack),
        Err(DuelError::NotPaired(SessionId(3)))
    );
    assert_eq!(arena.name_of(SessionId(3)), Ok("carol".to_string()));
    assert_eq!(arena.opponent_of(A), Ok(B));
    assert_eq!(
        arena.engage(SessionId(3), A),
        Err(DuelError::AlreadyPaired(A))
    );
}

#[tokio::test(start_paused = true)]
async fn forced_idles_on_both_sides_still_resolve() {
    let arena = arena_with(CreatureProfile {
        stamina: 0,
        ..CreatureProfile::default()
    });
    arena.set_player_action(A, Action::Attack).unwrap();
    let res = resolved(arena.submit_action(B, Action::Attack).await.unwrap());
    for slot in [Slot::First, Slot::Second] {
        assert_eq!(res.report.result(slot).gained_effect, Some(Effect::Exhausted));
    }
    assert_eq!(arena.phase(A), Ok(DuelPhase::ResolutionReady));

    let started = Instant::now();
    let res = resolved(arena.submit_action(A, Action::Attack).await.unwrap());
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(res.report.round, 2);
    for slot in [Slot::First, Slot::Second] {
        assert_eq!(res.report.result(slot).performed, Status::Exhausted);
        assert_eq!(res.report.result(slot).stamina_delta, 1);
    }
    assert_eq!(arena.phase(B), Ok(DuelPhase::AwaitingActions));
}

#[tokio::test(start_paused = true)]
async fn stunned_player_resolves_against_a_committed_opponent() {
    let arena = arena();
    arena.set_player_action(B, Action::Defend).unwrap();
    resolved(arena.submit_action(A, Action::Dodge).await.unwrap());
    assert_eq!(arena.displayed_status(A), Ok(Status::Stunned));

    arena.set_player_action(B, Action::Attack).unwrap();
    let res = resolved(arena.submit_action(A, Action::Defend).await.unwrap());
    let seen_by_a = res.report.perspective(Slot::First);
    assert_eq!(seen_by_a.own.performed, Status::Stunned);
    assert_eq!(seen_by_a.own.life_delta, -5);
    assert_eq!(arena.status(A).unwrap().effect, None);
}

#[tokio::test(start_paused = true)]
async fn huge_time_units_do_not_overflow_the_deadline() {
    let arena = Arc::new(Arena::new(ArenaConfig {
        time_unit_ms: u64::MAX,
        ..ArenaConfig::default()
    }));
    arena.register(A, "alice");
    arena.register(B, "bob");
    arena.engage(A, B).unwrap();

    let waiting = {
        let arena = arena.clone();
        tokio::spawn(async move { arena.submit_action(A, Action::Attack).await })
    };
    sleep(UNIT).await;

    resolved(arena.submit_action(B, Action::Attack).await.unwrap());
    assert_eq!(waiting.await.unwrap(), Ok(ActionOutcome::Superseded));
}
