//! Command registry: name to ordered handler list.

use std::collections::HashMap;
use std::rc::Rc;

use devcon_types::{ConsoleError, Result};

use crate::handler::HandlerRef;

struct Slot {
    /// Spelling used when the name was first registered.
    name: String,
    handlers: Vec<HandlerRef>,
}

/// Registry of command handlers.
///
/// Names are case-insensitive. Each name maps to the handlers registered
/// under it, in registration order. A generation counter is bumped whenever
/// the set of names may have changed so completion indexes know to rebuild.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Slot>,
    generation: u64,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the list for `name`, creating the list if needed.
    ///
    /// Fails if `name` is blank or contains whitespace, since the tokenizer
    /// could never produce it.
    pub fn register(&mut self, name: &str, handler: HandlerRef) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ConsoleError::InvalidArgument(
                "command name must not be empty".to_string(),
            ));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ConsoleError::InvalidArgument(format!(
                "command name '{name}' must not contain whitespace"
            )));
        }
        self.commands
            .entry(name.to_lowercase())
            .or_insert_with(|| Slot {
                name: name.to_string(),
                handlers: Vec::new(),
            })
            .handlers
            .push(handler);
        self.generation += 1;
        log::debug!("Registered handler for '{name}'");
        Ok(())
    }

    /// Remove `name` and every handler under it. Returns whether it existed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.commands.remove(&name.to_lowercase()).is_some();
        if removed {
            self.generation += 1;
            log::debug!("Unregistered command '{name}'");
        }
        removed
    }

    /// Remove `handler` from every name it is registered under. Names whose
    /// list becomes empty stay registered. Returns how many registrations
    /// were removed.
    pub fn unregister_handler(&mut self, handler: &HandlerRef) -> usize {
        let mut removed = 0;
        for slot in self.commands.values_mut() {
            let before = slot.handlers.len();
            slot.handlers.retain(|h| !Rc::ptr_eq(h, handler));
            removed += before - slot.handlers.len();
        }
        if removed > 0 {
            log::debug!("Unregistered handler from {removed} registration(s)");
        }
        removed
    }

    /// Handlers registered under `name`, case-insensitively. The list may
    /// be empty if its handlers were unregistered individually.
    pub fn lookup(&self, name: &str) -> Option<&[HandlerRef]> {
        self.commands
            .get(&name.to_lowercase())
            .map(|slot| slot.handlers.as_slice())
    }

    /// Whether `name` is registered (possibly with an empty list).
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_lowercase())
    }

    /// Registered names as first spelled, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.values().map(|slot| slot.name.as_str())
    }

    /// Registered names with their handler lists, sorted case-insensitively.
    pub fn list_commands(&self) -> Vec<(&str, &[HandlerRef])> {
        let mut cmds: Vec<(&str, &[HandlerRef])> = self
            .commands
            .iter()
            .map(|(key, slot)| (key.as_str(), slot.handlers.as_slice()))
            .collect();
        cmds.sort_by_key(|(key, _)| *key);
        cmds.into_iter()
            .map(|(key, handlers)| (self.commands[key].name.as_str(), handlers))
            .collect()
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` when no names are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.generation += 1;
        log::debug!("Command registry cleared");
    }

    /// Counter bumped by every change that may alter the set of names.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
