//! Read-only action and hidden-combo tables.
//!
//! Populated once before the simulation starts and then shared (usually behind
//! an `Arc`) by every state machine that reads it. Nothing here is mutated
//! while frames are being stepped.

use std::collections::HashMap;

use crate::action::{ActionDefinition, ActionId, HiddenComboDefinition};

/// Lookup table for action and hidden-combo definitions.
#[derive(Clone, Debug, Default)]
pub struct ActionRegistry {
    actions: HashMap<ActionId, ActionDefinition>,
    names: HashMap<String, ActionId>,
    /// Kept in load order; the matcher reports the first hit in this order.
    hidden_combos: Vec<HiddenComboDefinition>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from both tables.
    pub fn with_definitions(
        actions: impl IntoIterator<Item = ActionDefinition>,
        hidden_combos: impl IntoIterator<Item = HiddenComboDefinition>,
    ) -> Self {
        let mut registry = Self::new();
        registry.load(actions, hidden_combos);
        registry
    }

    /// Replaces both tables.
    pub fn load(
        &mut self,
        actions: impl IntoIterator<Item = ActionDefinition>,
        hidden_combos: impl IntoIterator<Item = HiddenComboDefinition>,
    ) {
        self.load_actions(actions);
        self.load_hidden_combos(hidden_combos);
    }

    /// Replaces the action table. The new table is built before the old one is dropped.
    ///
    /// Malformed frame data is logged and kept; progress queries degrade gracefully.
    pub fn load_actions(&mut self, actions: impl IntoIterator<Item = ActionDefinition>) {
        let mut table = HashMap::new();
        let mut names = HashMap::new();

        for definition in actions {
            if let Err(error) = definition.validate() {
                tracing::warn!("Loading malformed action definition: {}", error);
            }
            names.insert(definition.name.clone(), definition.id);
            if let Some(previous) = table.insert(definition.id, definition) {
                tracing::warn!(
                    "Action {} ('{}') registered twice; keeping the later definition",
                    previous.id,
                    previous.name
                );
            }
        }

        tracing::debug!("Loaded {} combat actions", table.len());
        self.actions = table;
        self.names = names;
    }

    /// Replaces the hidden-combo table. Definitions with empty sequences are skipped.
    pub fn load_hidden_combos(
        &mut self,
        hidden_combos: impl IntoIterator<Item = HiddenComboDefinition>,
    ) {
        let combos: Vec<_> = hidden_combos
            .into_iter()
            .filter(|combo| match combo.validate() {
                Ok(()) => true,
                Err(error) => {
                    tracing::warn!("Skipping hidden combo: {}", error);
                    false
                }
            })
            .collect();

        tracing::debug!("Loaded {} hidden combos", combos.len());
        self.hidden_combos = combos;
    }

    #[inline]
    pub fn get(&self, id: ActionId) -> Option<&ActionDefinition> {
        self.actions.get(&id)
    }

    #[inline]
    pub fn has(&self, id: ActionId) -> bool {
        self.actions.contains_key(&id)
    }

    pub fn id_of(&self, name: &str) -> Option<ActionId> {
        self.names.get(name).copied()
    }

    /// Priority value of a registered action.
    pub fn priority_of(&self, id: ActionId) -> Option<i32> {
        self.get(id).map(|def| def.priority.value())
    }

    /// Returns true if `from` lists `to` in its cancel routes.
    pub fn is_valid_cancel(&self, from: ActionId, to: ActionId) -> bool {
        self.get(from).is_some_and(|def| def.can_cancel_into(to))
    }

    /// Registered action ids in ascending order.
    pub fn action_ids(&self) -> Vec<ActionId> {
        let mut ids: Vec<_> = self.actions.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionDefinition> + '_ {
        self.actions.values()
    }

    pub fn hidden_combos(&self) -> &[HiddenComboDefinition] {
        &self.hidden_combos
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionPriority;

    fn light() -> ActionDefinition {
        ActionDefinition::builder(ActionId(0), "Attack.Light")
            .cancel_into([ActionId(1)])
            .build()
    }

    fn heavy() -> ActionDefinition {
        ActionDefinition::builder(ActionId(1), "Attack.Heavy")
            .priority(ActionPriority::Heavy)
            .build()
    }

    #[test]
    fn lookup_by_id_and_name() {
        let registry = ActionRegistry::with_definitions([light(), heavy()], []);

        assert!(registry.has(ActionId(0)));
        assert!(!registry.has(ActionId(9)));
        assert_eq!(registry.get(ActionId(1)).map(|d| d.name.as_str()), Some("Attack.Heavy"));
        assert_eq!(registry.id_of("Attack.Light"), Some(ActionId(0)));
        assert_eq!(registry.priority_of(ActionId(1)), Some(1));
        assert_eq!(registry.action_ids(), vec![ActionId(0), ActionId(1)]);
    }

    #[test]
    fn load_replaces_the_whole_table() {
        let mut registry = ActionRegistry::with_definitions([light(), heavy()], []);
        registry.load_actions([heavy()]);

        assert_eq!(registry.len(), 1);
        assert!(!registry.has(ActionId(0)));
        assert_eq!(registry.id_of("Attack.Light"), None);
    }

    #[test]
    fn malformed_actions_are_tolerated() {
        let broken = ActionDefinition::builder(ActionId(4), "Broken")
            .frames(0, 0, 0)
            .build();
        let registry = ActionRegistry::with_definitions([broken], []);
        assert!(registry.has(ActionId(4)));
    }

    #[test]
    fn empty_hidden_combos_are_skipped_and_order_kept() {
        let registry = ActionRegistry::with_definitions(
            [light(), heavy()],
            [
                HiddenComboDefinition::new("first", [ActionId(0), ActionId(1)]),
                HiddenComboDefinition::new("empty", []),
                HiddenComboDefinition::new("second", [ActionId(1)]),
            ],
        );

        let names: Vec<_> = registry
            .hidden_combos()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn cancel_routes() {
        let registry = ActionRegistry::with_definitions([light(), heavy()], []);
        assert!(registry.is_valid_cancel(ActionId(0), ActionId(1)));
        assert!(!registry.is_valid_cancel(ActionId(1), ActionId(0)));
        assert!(!registry.is_valid_cancel(ActionId(5), ActionId(0)));
    }
}
