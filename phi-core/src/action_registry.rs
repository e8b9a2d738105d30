// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use crate::actions;
use crate::view::View;
use std::sync::{Arc, OnceLock};

// Action name constants
pub const ACTION_SAVE: &str = "save";
pub const ACTION_CLOSE_BUFFER: &str = "close_buffer";
pub const ACTION_NEW_BUFFER: &str = "new_buffer";
pub const ACTION_OPEN: &str = "open";
pub const ACTION_TOGGLE_PALETTE: &str = "toggle_palette";
pub const ACTION_FOCUS_NEXT: &str = "focus_next";
pub const ACTION_FOCUS_PREV: &str = "focus_prev";
pub const ACTION_EXIT: &str = "exit";

/// Behaviour of an action. Receives the view and the arguments typed after the action
/// name in the palette (empty when invoked from a shortcut). Returns whether the view
/// needs a redraw.
pub type ActionProc = fn(&mut View, &[String]) -> bool;

/// A single named action
pub struct Action {
    /// Name used in the shortcut table and typed into the palette
    pub name: String,
    /// Human-readable description
    pub description: String,
    proc: ActionProc,
}

impl Action {
    pub fn new(name: impl Into<String>, description: impl Into<String>, proc: ActionProc) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            proc,
        }
    }

    /// Execute this action against the view
    pub fn invoke(&self, view: &mut View, args: &[String]) -> bool {
        (self.proc)(view, args)
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Registry of all available actions. Built once at startup, read-only afterwards.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<Action>,
}

impl ActionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Register an action, replacing any existing action with the same name
    pub fn register_action(&mut self, action: Action) {
        self.actions.retain(|a| a.name != action.name);
        self.actions.push(action);
    }

    /// Get a specific action by exact name
    pub fn get_action(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// Find all actions whose name starts with `prefix`, sorted by name
    pub fn find_actions(&self, prefix: &str) -> Vec<&Action> {
        let prefix_lower = prefix.to_lowercase();
        let mut matches: Vec<&Action> = self
            .actions
            .iter()
            .filter(|a| a.name.to_lowercase().starts_with(&prefix_lower))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The process-wide registry of built-in actions, created on first use.
    pub fn global() -> Arc<ActionRegistry> {
        static GLOBAL: OnceLock<Arc<ActionRegistry>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(create_default_registry()))
            .clone()
    }
}

/// Build a registry holding every built-in action
pub fn create_default_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();

    registry.register_action(Action::new(
        ACTION_SAVE,
        "Save the focused buffer",
        actions::save,
    ));
    registry.register_action(Action::new(
        ACTION_CLOSE_BUFFER,
        "Close the focused buffer",
        actions::close_buffer,
    ));
    registry.register_action(Action::new(
        ACTION_NEW_BUFFER,
        "Open a scratch buffer in a new pane",
        actions::new_buffer,
    ));
    registry.register_action(Action::new(
        ACTION_OPEN,
        "Open a file in a new pane",
        actions::open,
    ));
    registry.register_action(Action::new(
        ACTION_TOGGLE_PALETTE,
        "Show or hide the command palette",
        actions::toggle_palette,
    ));
    registry.register_action(Action::new(
        ACTION_FOCUS_NEXT,
        "Focus the pane to the right",
        actions::focus_next,
    ));
    registry.register_action(Action::new(
        ACTION_FOCUS_PREV,
        "Focus the pane to the left",
        actions::focus_prev,
    ));
    registry.register_action(Action::new(ACTION_EXIT, "Exit the editor", actions::exit));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_view: &mut View, _args: &[String]) -> bool {
        false
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ActionRegistry::new();
        registry.register_action(Action::new("thing", "first", noop));
        registry.register_action(Action::new("thing", "second", noop));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_action("thing").unwrap().description, "second");
    }

    #[test]
    fn test_find_actions_by_prefix() {
        let registry = create_default_registry();
        let names: Vec<&str> = registry
            .find_actions("FOCUS")
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec![ACTION_FOCUS_NEXT, ACTION_FOCUS_PREV]);
        assert!(registry.find_actions("nothing-like-this").is_empty());
    }

    #[test]
    fn test_default_registry_has_builtins() {
        let registry = create_default_registry();
        for name in [
            ACTION_SAVE,
            ACTION_CLOSE_BUFFER,
            ACTION_NEW_BUFFER,
            ACTION_OPEN,
            ACTION_TOGGLE_PALETTE,
            ACTION_FOCUS_NEXT,
            ACTION_FOCUS_PREV,
            ACTION_EXIT,
        ] {
            assert!(registry.get_action(name).is_some(), "missing {name}");
        }
        assert!(registry.get_action("delete_everything").is_none());
    }

    #[test]
    fn test_global_is_shared() {
        let a = ActionRegistry::global();
        let b = ActionRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
