use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use combat_core::{
    ActionDefinition, ActionId, ActionPhase, ActionRegistry, ActionStateMachine, EventLog,
    FrameClock,
};

const SLASH: ActionId = ActionId(0);
const KICK: ActionId = ActionId(1);

fn frames(n: u64) -> Duration {
    Duration::from_nanos((n * 1_000_000_000).div_ceil(60))
}

fn registry() -> Arc<ActionRegistry> {
    Arc::new(ActionRegistry::with_definitions(
        [
            ActionDefinition::builder(SLASH, "slash")
                .frames(6, 6, 12)
                .cancel_window(8, 14)
                .build(),
            ActionDefinition::builder(KICK, "kick").build(),
        ],
        [],
    ))
}

#[test]
fn frame_count_is_independent_of_delta_split() {
    let total = Duration::from_millis(2_345);
    let expected = (total.as_nanos() * 60 / 1_000_000_000) as u64;

    let splits: [&[u64]; 3] = [&[2_345], &[1; 2_345], &[7, 13, 500, 1_000, 825]];
    for split in splits {
        let mut clock = FrameClock::new(60);
        let emitted: u64 = split
            .iter()
            .map(|&ms| clock.advance(Duration::from_millis(ms)))
            .sum();
        assert_eq!(emitted, expected, "split {:?}", &split[..split.len().min(5)]);
    }
}

#[test]
fn machines_fed_the_same_time_agree() {
    let mut coarse = ActionStateMachine::new(registry());
    let mut fine = ActionStateMachine::new(registry());
    let coarse_log = EventLog::shared();
    let fine_log = EventLog::shared();
    coarse.add_observer(Rc::clone(&coarse_log));
    fine.add_observer(Rc::clone(&fine_log));

    coarse.try_start_action(SLASH);
    fine.try_start_action(SLASH);

    coarse.update(Duration::from_millis(250));
    for _ in 0..250 {
        fine.update(Duration::from_millis(1));
    }

    assert_eq!(coarse.clock().frames(), 15);
    assert_eq!(fine.clock().frames(), 15);
    assert_eq!(coarse.state(), fine.state());
    assert_eq!(coarse_log.borrow().events(), fine_log.borrow().events());
}

#[test]
fn phases_change_on_exact_frame_boundaries() {
    let mut machine = ActionStateMachine::new(registry());
    assert!(machine.try_start_action(SLASH));
    assert_eq!(machine.current_phase(), ActionPhase::Startup);

    for frame in 1..=24u32 {
        machine.update(frames(1));
        let expected = match frame {
            0..6 => ActionPhase::Startup,
            6..12 => ActionPhase::Active,
            12..24 => ActionPhase::Recovery,
            _ => ActionPhase::Idle,
        };
        assert_eq!(machine.current_phase(), expected, "frame {frame}");
    }

    assert!(machine.is_idle());
    assert_eq!(machine.current_frame(), 0);
}

#[test]
fn stalled_host_catches_up_in_one_update() {
    let mut machine = ActionStateMachine::new(registry());
    machine.try_start_action(SLASH);

    machine.update(Duration::from_secs(1));

    assert_eq!(machine.clock().frames(), 60);
    assert!(machine.is_idle());
}

/// Starts a slash, requests a kick after frame 21 and feeds the remaining
/// `frames_after` frames as `chunk`-frame updates.
fn kick_after_slash(frames_after: u64, chunk: u64) -> ActionStateMachine {
    let mut machine = ActionStateMachine::new(registry());
    machine.try_start_action(SLASH);
    machine.update(frames(21));
    assert!(!machine.try_start_action(KICK));

    let mut remaining = frames_after;
    while remaining > 0 {
        let step = remaining.min(chunk);
        machine.update(frames(step));
        remaining -= step;
    }
    machine
}

#[test]
fn buffered_request_replays_the_same_under_any_split() {
    // slash ends at frame 24, 50 ms after the request.
    for frames_after in [18, 60] {
        let fine = kick_after_slash(frames_after, 1);
        let stalled = kick_after_slash(frames_after, frames_after);

        assert_eq!(fine.combo_count(), 2, "{frames_after} frames");
        assert_eq!(stalled.combo_count(), 2, "{frames_after} frames");
        assert_eq!(fine.combo_chain(), stalled.combo_chain());
        assert_eq!(fine.state(), stalled.state());
        assert_eq!(fine.combo_time_remaining(), stalled.combo_time_remaining());
    }

    let stalled = kick_after_slash(18, 18);
    assert_eq!(stalled.current_action(), Some(KICK));
}

#[test]
fn combo_timer_expires_on_the_same_frame_under_any_split() {
    let mut fine = ActionStateMachine::new(registry());
    let mut stalled = ActionStateMachine::new(registry());
    fine.try_start_action(SLASH);
    stalled.try_start_action(SLASH);

    // 2 s of idle time is exactly 120 frames; the reset needs one more.
    for _ in 0..120 {
        fine.update(frames(1));
    }
    stalled.update(frames(120));
    assert_eq!(fine.combo_count(), 1);
    assert_eq!(stalled.combo_count(), 1);

    fine.update(frames(1));
    stalled.update(frames(1));
    assert_eq!(fine.combo_count(), 0);
    assert_eq!(stalled.combo_count(), 0);
}
