use crate::conditions::Status;
use crate::report::InvokeResult;

/// Whether a move achieved anything, judged against what the other side ended up with.
pub fn succeeded(own: &InvokeResult, enemy: &InvokeResult) -> bool {
    match own.performed {
        Status::Attack => enemy.life_delta < 0,
        // Punished the opponent, or soaked a hit that would have been worse.
        Status::Defend => enemy.gained_effect.is_some() || own.life_delta < 0,
        Status::Dodge => own.life_delta == 0,
        Status::Guard | Status::Stunned | Status::Exhausted => false,
    }
}

/// Fill in both success flags once both sides have resolved.
pub fn settle(results: &mut [InvokeResult; 2]) {
    let [first, second] = *results;
    results[0].success = succeeded(&first, &second);
    results[1].success = succeeded(&second, &first);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::Effect;

    #[test]
    fn effect_results_never_succeed() {
        let mut stunned = InvokeResult::new(Status::Stunned);
        stunned.life_delta = 0;
        let enemy = InvokeResult::new(Status::Attack);
        assert!(!succeeded(&stunned, &enemy));
    }

    #[test]
    fn defend_succeeds_by_punishing() {
        let own = InvokeResult::new(Status::Defend);
        let mut enemy = InvokeResult::new(Status::Dodge);
        enemy.gained_effect = Some(Effect::Stunned);
        assert!(succeeded(&own, &enemy));
    }

    #[test]
    fn idle_defend_is_not_a_success() {
        let mut own = InvokeResult::new(Status::Defend);
        own.stamina_delta = 1;
        let enemy = InvokeResult::new(Status::Guard);
        assert!(!succeeded(&own, &enemy));
    }
}
