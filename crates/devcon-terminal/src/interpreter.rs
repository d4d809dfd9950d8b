//! Interpreter contract and the registry-backed implementation.

use devcon_types::{ConsoleConfig, InputBuffer, OutputSink, Result};

use crate::autocomplete::AutocompleteEngine;
use crate::builtins;
use crate::handler::{CommandResult, HandlerRef};
use crate::registry::CommandRegistry;

/// What a console host needs from an interpreter.
pub trait Interpreter {
    /// Run one input line, reporting everything into `output`.
    fn execute(&mut self, output: &mut dyn OutputSink, input: &str);

    /// Rotate `input` to the next (`forward`) or previous completion.
    fn autocomplete(&mut self, input: &mut InputBuffer, forward: bool);

    /// Drop all registrations and cached completion state.
    fn reset(&mut self);

    /// Whether executed lines are echoed to the output first.
    fn echo_enabled(&self) -> bool;

    fn set_echo_enabled(&mut self, enabled: bool);
}

/// Split a line on spaces, discarding blank tokens.
pub fn tokenize(input: &str) -> Vec<&str> {
    input
        .split(' ')
        .filter(|token| !token.trim().is_empty())
        .collect()
}

/// Interpreter dispatching to every handler registered under a name.
#[derive(Default)]
pub struct CommandInterpreter {
    registry: CommandRegistry,
    completion: AutocompleteEngine,
    echo_enabled: bool,
    builtins_enabled: bool,
}

impl CommandInterpreter {
    /// Create an interpreter with echo and built-ins disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an interpreter with echo and built-ins taken from `config`.
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self {
            echo_enabled: config.echo_enabled,
            builtins_enabled: config.builtins_enabled,
            ..Self::default()
        }
    }

    /// Register `handler` under `name`. See [`CommandRegistry::register`].
    pub fn register(&mut self, name: &str, handler: HandlerRef) -> Result<()> {
        self.registry.register(name, handler)?;
        self.completion.invalidate();
        Ok(())
    }

    /// Remove `name` and all its handlers.
    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.registry.unregister(name);
        if removed {
            self.completion.invalidate();
        }
        removed
    }

    /// Remove `handler` from every name. Names stay registered.
    pub fn unregister_handler(&mut self, handler: &HandlerRef) -> usize {
        self.registry.unregister_handler(handler)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn builtins_enabled(&self) -> bool {
        self.builtins_enabled
    }

    pub fn set_builtins_enabled(&mut self, enabled: bool) {
        self.builtins_enabled = enabled;
    }

    fn report(name: &str, result: CommandResult, output: &mut dyn OutputSink) {
        if result.is_faulted {
            let message = result.message.unwrap_or_default();
            output.append(&format!("Command '{name}' failed. {message}"));
            return;
        }
        match result.message {
            Some(message) if !message.trim().is_empty() => output.append(&message),
            _ => {},
        }
    }
}

impl Interpreter for CommandInterpreter {
    /// Echo (if enabled), tokenize, and fan out to every handler registered
    /// under the first token, in registration order.
    ///
    /// A blank line does nothing beyond the echo. A faulting handler is
    /// reported and the remaining handlers still run.
    fn execute(&mut self, output: &mut dyn OutputSink, input: &str) {
        if self.echo_enabled {
            output.append(input);
        }

        let tokens = tokenize(input);
        let Some((&name, args)) = tokens.split_first() else {
            return;
        };

        if self.builtins_enabled && builtins::dispatch(name, args, &self.registry, output) {
            return;
        }

        let handlers = match self.registry.lookup(name) {
            Some(handlers) if !handlers.is_empty() => handlers,
            _ => {
                output.append(&format!("Command '{name}' not found."));
                return;
            },
        };

        for handler in handlers {
            let result = match handler.execute(args) {
                Ok(result) => result,
                Err(e) => CommandResult::fault(e.to_string()),
            };
            if result.is_faulted {
                log::warn!(
                    "Command '{name}' failed: {}",
                    result.message.as_deref().unwrap_or("")
                );
            }
            Self::report(name, result, output);
        }
    }

    fn autocomplete(&mut self, input: &mut InputBuffer, forward: bool) {
        self.completion.autocomplete(&self.registry, input, forward);
    }

    fn reset(&mut self) {
        self.registry.clear();
        self.completion.invalidate();
        log::debug!("Interpreter reset");
    }

    fn echo_enabled(&self) -> bool {
        self.echo_enabled
    }

    fn set_echo_enabled(&mut self, enabled: bool) {
        self.echo_enabled = enabled;
    }
}
