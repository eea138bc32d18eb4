use std::sync::Arc;
use std::time::Duration;

use combat_core::{
    ActionDefinition, ActionId, ActionPriority, ActionRegistry, ActionStateMachine,
    InteractionFlags,
};

const JAB: ActionId = ActionId(0);
const QUICK: ActionId = ActionId(1);
const KICK: ActionId = ActionId(2);
const DASH: ActionId = ActionId(3);
const SMASH: ActionId = ActionId(4);

fn frames(n: u64) -> Duration {
    Duration::from_nanos((n * 1_000_000_000).div_ceil(60))
}

fn machine() -> ActionStateMachine {
    let registry = ActionRegistry::with_definitions(
        [
            ActionDefinition::builder(JAB, "jab")
                .frames(6, 6, 12)
                .cancel_window(8, 14)
                .cancel_into([SMASH])
                .build(),
            ActionDefinition::builder(QUICK, "quick")
                .frames(2, 2, 2)
                .cancel_window(3, 5)
                .build(),
            ActionDefinition::builder(KICK, "kick").build(),
            ActionDefinition::builder(DASH, "dash")
                .frames(2, 6, 4)
                .cancel_window(4, 8)
                .priority(ActionPriority::Dash)
                .blocked_by(InteractionFlags::STUNNED)
                .build(),
            ActionDefinition::builder(SMASH, "smash")
                .priority(ActionPriority::Heavy)
                .build(),
        ],
        [],
    );
    ActionStateMachine::new(Arc::new(registry))
}

#[test]
fn rejected_request_replays_inside_window() {
    let mut machine = machine();
    machine.try_start_action(QUICK);
    machine.update(frames(1));

    assert!(!machine.try_start_action(KICK));
    assert_eq!(machine.buffered_inputs().len(), 1);

    // quick ends at frame 6, roughly 83 ms after the request.
    machine.update(frames(5));
    assert_eq!(machine.current_action(), Some(KICK));
    assert!(!machine.has_buffered_input());
}

#[test]
fn stale_request_is_discarded() {
    let mut machine = machine();
    machine.try_start_action(JAB);
    machine.update(frames(2));

    assert!(!machine.try_start_action(KICK));
    assert!(machine.has_buffered_input());

    // jab ends at frame 24, about 367 ms after the request.
    machine.update(frames(22));
    assert!(machine.is_idle());
    assert!(!machine.has_buffered_input());
}

#[test]
fn buffered_cancel_fires_when_window_opens() {
    let mut machine = machine();
    machine.try_start_action(JAB);
    machine.update(frames(3));

    assert!(!machine.try_start_action(SMASH));
    machine.update(frames(4));
    assert_eq!(machine.current_action(), Some(JAB));

    machine.update(frames(1));
    assert_eq!(machine.current_action(), Some(SMASH));
    assert!(machine.combo_chain()[1].perfect);
}

#[test]
fn newest_request_wins_and_clears_the_rest() {
    let mut machine = machine();
    machine.try_start_action(QUICK);

    assert!(!machine.try_start_action(KICK));
    assert!(!machine.try_start_action(DASH));
    assert_eq!(machine.buffered_inputs().len(), 2);

    machine.update(frames(6));
    assert_eq!(machine.current_action(), Some(DASH));
    assert!(!machine.has_buffered_input());

    let chain: Vec<_> = machine.combo_chain().iter().map(|link| link.action).collect();
    assert_eq!(chain, vec![QUICK, DASH]);
}

#[test]
fn blocked_start_waits_in_buffer_until_context_clears() {
    let mut machine = machine();
    machine.set_interaction_context(InteractionFlags::STUNNED);

    assert!(!machine.try_start_action(DASH));
    assert!(!machine.can_start_action(DASH));
    machine.update(frames(3));
    assert!(machine.is_idle());

    machine.set_interaction_context(InteractionFlags::empty());
    machine.update(frames(1));
    assert_eq!(machine.current_action(), Some(DASH));
}

#[test]
fn unknown_actions_are_not_buffered() {
    let mut machine = machine();
    assert!(!machine.try_start_action(ActionId(42)));
    assert!(!machine.has_buffered_input());

    machine.try_start_action(JAB);
    assert!(!machine.try_start_action(ActionId(42)));
    assert!(!machine.has_buffered_input());
}

#[test]
fn clear_input_buffer_drops_pending_requests() {
    let mut machine = machine();
    machine.try_start_action(QUICK);
    machine.try_start_action(KICK);
    machine.clear_input_buffer();

    machine.update(frames(6));
    assert!(machine.is_idle());
}
