//! Collaborator notifications.
//!
//! Execution, animation, UI, and effects systems implement [`ActionObserver`]
//! and are called synchronously, in registration order, from inside the state
//! machine. All methods default to no-ops so an observer only overrides what it
//! cares about.

use std::cell::RefCell;
use std::rc::Rc;

use crate::action::{ActionDefinition, ActionId, ActionPhase, HiddenComboDefinition};
use crate::combo::ComboLink;

pub trait ActionObserver {
    /// The execution collaborator should begin the action's trajectory/hitbox behavior.
    fn on_action_started(&mut self, _action: ActionId, _definition: &ActionDefinition) {}

    /// The direct action owner should stop. Persistent effects already spawned
    /// (area damage, projectiles) are not ended by this call.
    fn on_action_ended(&mut self, _action: ActionId, _was_canceled: bool) {}

    fn on_phase_changed(&mut self, _old: ActionPhase, _new: ActionPhase, _action: Option<ActionId>) {}

    fn on_perfect_cancel(&mut self, _canceled_into: ActionId) {}

    fn on_combo_updated(&mut self, _count: usize, _chain: &[ComboLink]) {}

    fn on_hidden_combo_executed(&mut self, _combo: &HiddenComboDefinition) {}
}

impl<O: ActionObserver + ?Sized> ActionObserver for Rc<RefCell<O>> {
    fn on_action_started(&mut self, action: ActionId, definition: &ActionDefinition) {
        self.borrow_mut().on_action_started(action, definition);
    }

    fn on_action_ended(&mut self, action: ActionId, was_canceled: bool) {
        self.borrow_mut().on_action_ended(action, was_canceled);
    }

    fn on_phase_changed(&mut self, old: ActionPhase, new: ActionPhase, action: Option<ActionId>) {
        self.borrow_mut().on_phase_changed(old, new, action);
    }

    fn on_perfect_cancel(&mut self, canceled_into: ActionId) {
        self.borrow_mut().on_perfect_cancel(canceled_into);
    }

    fn on_combo_updated(&mut self, count: usize, chain: &[ComboLink]) {
        self.borrow_mut().on_combo_updated(count, chain);
    }

    fn on_hidden_combo_executed(&mut self, combo: &HiddenComboDefinition) {
        self.borrow_mut().on_hidden_combo_executed(combo);
    }
}

/// Owned record of a single notification.
#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    ActionStarted {
        action: ActionId,
    },
    ActionEnded {
        action: ActionId,
        was_canceled: bool,
    },
    PhaseChanged {
        old: ActionPhase,
        new: ActionPhase,
        action: Option<ActionId>,
    },
    PerfectCancel {
        canceled_into: ActionId,
    },
    ComboUpdated {
        count: usize,
        chain: Vec<ActionId>,
    },
    HiddenComboExecuted {
        name: String,
    },
}

/// Observer that records every notification in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a fresh log in the shared handle machines accept as an observer.
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn count_where(&self, predicate: impl Fn(&CombatEvent) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }
}

impl ActionObserver for EventLog {
    fn on_action_started(&mut self, action: ActionId, _definition: &ActionDefinition) {
        self.events.push(CombatEvent::ActionStarted { action });
    }

    fn on_action_ended(&mut self, action: ActionId, was_canceled: bool) {
        self.events.push(CombatEvent::ActionEnded {
            action,
            was_canceled,
        });
    }

    fn on_phase_changed(&mut self, old: ActionPhase, new: ActionPhase, action: Option<ActionId>) {
        self.events
            .push(CombatEvent::PhaseChanged { old, new, action });
    }

    fn on_perfect_cancel(&mut self, canceled_into: ActionId) {
        self.events.push(CombatEvent::PerfectCancel { canceled_into });
    }

    fn on_combo_updated(&mut self, count: usize, chain: &[ComboLink]) {
        self.events.push(CombatEvent::ComboUpdated {
            count,
            chain: chain.iter().map(|link| link.action).collect(),
        });
    }

    fn on_hidden_combo_executed(&mut self, combo: &HiddenComboDefinition) {
        self.events.push(CombatEvent::HiddenComboExecuted {
            name: combo.name.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_handle_forwards_to_inner_log() {
        let log = EventLog::shared();
        let mut handle: Box<dyn ActionObserver> = Box::new(Rc::clone(&log));

        handle.on_perfect_cancel(ActionId(3));
        handle.on_action_ended(ActionId(1), true);

        assert_eq!(
            log.borrow().events(),
            &[
                CombatEvent::PerfectCancel {
                    canceled_into: ActionId(3)
                },
                CombatEvent::ActionEnded {
                    action: ActionId(1),
                    was_canceled: true
                },
            ]
        );
        assert_eq!(log.borrow_mut().take().len(), 2);
        assert!(log.borrow().events().is_empty());
    }
}
