use crate::checks::settle;
use crate::conditions::{consume_affliction, Action, Effect, Status};
use crate::creature::{Creature, Stance};
use crate::report::InvokeResult;

/// Attacking never protects: two attackers trade full blows.
pub fn attack(attacking: &mut Creature, enemy: &Creature) -> InvokeResult {
    let mut response = InvokeResult::new(Status::Attack);
    attacking.spend_energy(&mut response);

    if enemy.effective_action() == Action::Attack {
        attacking.take_hit(enemy.damage(), &mut response);
    }
    response
}

/// Halves an incoming blow; otherwise it is the recovery move.
pub fn defend(defending: &mut Creature, enemy: &Creature) -> InvokeResult {
    let mut response = InvokeResult::new(Status::Defend);

    if enemy.effective_action() == Action::Attack {
        defending.take_hit(enemy.damage() / 2, &mut response);
        return response;
    }
    defending.restore_energy(&mut response);
    response
}

/// Only a strictly shorter window than the enemy's gets out of the way.
pub fn dodge(dodging: &mut Creature, enemy: &Creature) -> InvokeResult {
    let mut response = InvokeResult::new(Status::Dodge);

    if dodging.pending_duration() >= enemy.pending_duration() {
        match enemy.effective_action() {
            Action::Attack => dodging.take_hit(enemy.damage(), &mut response),
            Action::Defend => response.gained_effect = Some(Effect::Stunned),
            Action::Guard | Action::Dodge => {}
        }
    }

    // Running dry overrides a stun: either way next round is lost.
    dodging.spend_energy(&mut response);
    response
}

/// Guarding, or idling under an effect. Takes everything and recovers a point of stamina.
pub fn idle(sleeping: &mut Creature, enemy: &Creature) -> InvokeResult {
    let mut response = InvokeResult::new(Status::Guard);

    match enemy.effective_action() {
        Action::Attack => sleeping.take_hit(enemy.damage(), &mut response),
        Action::Defend if !sleeping.is_on_status(Status::Stunned) => {
            response.gained_effect = Some(Effect::Stunned);
        }
        Action::Defend | Action::Guard | Action::Dodge => {}
    }
    sleeping.restore_energy(&mut response);
    response
}

/// Resolve one creature against a snapshot of its enemy taken before the round.
pub fn perform(creature: &mut Creature, enemy: &Creature) -> InvokeResult {
    let mut response = match creature.stance() {
        Stance::Attack => attack(creature, enemy),
        Stance::Defend => defend(creature, enemy),
        Stance::Dodge => dodge(creature, enemy),
        Stance::Guard | Stance::Stunned | Stance::Exhausted => idle(creature, enemy),
    };

    if let Some(consumed) = consume_affliction(&mut creature.affliction) {
        response.performed = consumed.into();
    }
    if let Some(gained) = response.gained_effect {
        creature.afflict(gained);
    }
    response
}

/// Resolve both creatures simultaneously, settle success flags and clear both action slots.
pub fn resolve_pair(first: &mut Creature, second: &mut Creature) -> [InvokeResult; 2] {
    let first_before = first.clone();
    let second_before = second.clone();

    let mut results = [
        perform(first, &second_before),
        perform(second, &first_before),
    ];
    settle(&mut results);

    first.reset_action();
    second.reset_action();
    results
}
