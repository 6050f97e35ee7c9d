//! Named parameterless actions

use std::collections::HashMap;

use tracing::warn;

use crate::error::{HubError, HubResult};

type Action = Box<dyn Fn() + Send + Sync>;

/// Registry mapping action names to callables
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Action>,
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .finish()
    }
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action` under `name`; an existing entry is kept
    pub fn register<F>(&mut self, name: &str, action: F) -> HubResult<()>
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.actions.contains_key(name) {
            warn!(action = name, "Action already registered");
            return Err(HubError::DuplicateAction(name.to_string()));
        }
        self.actions.insert(name.to_string(), Box::new(action));
        Ok(())
    }

    pub fn call(&self, name: &str) -> HubResult<()> {
        match self.actions.get(name) {
            Some(action) => {
                action();
                Ok(())
            }
            None => Err(unknown(name)),
        }
    }

    pub fn remove(&mut self, name: &str) -> HubResult<()> {
        self.actions.remove(name).map(|_| ()).ok_or_else(|| unknown(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

fn unknown(name: &str) -> HubError {
    warn!(action = name, "Action not found");
    HubError::UnknownAction(name.to_string())
}
