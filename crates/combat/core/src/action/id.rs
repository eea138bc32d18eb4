use std::collections::HashMap;
use std::fmt;

/// Interned identifier for a registered action.
///
/// Ids are handed out by [`ActionSymbols`]; the simulation never compares
/// action names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionId(pub u32);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

/// Name ↔ id mapping table.
///
/// Content is authored with names such as `"Attack.Light"`; loaders intern
/// them once and the core only sees [`ActionId`]s afterwards.
#[derive(Clone, Debug, Default)]
pub struct ActionSymbols {
    ids: HashMap<String, ActionId>,
    names: Vec<String>,
}

impl ActionSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `name`, allocating the next one on first sight.
    pub fn intern(&mut self, name: &str) -> ActionId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = ActionId(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<ActionId> {
        self.ids.get(name).copied()
    }

    pub fn resolve(&self, id: ActionId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
