//! Command interpreter for the devcon console.
//!
//! The interpreter is a registry-based dispatch system. Handlers implement
//! the [`Handler`] trait (or come from one of the closure adapters in
//! [`handler`]) and are registered by name; several handlers may share a
//! name and all of them run on dispatch. The interpreter tokenizes input
//! lines, resolves the command name case-insensitively, fans out to every
//! handler, and reports results into an [`OutputSink`].
//!
//! [`Console`] composes the interpreter with a scrollback buffer and an
//! input line the way a host application embeds it.

pub mod autocomplete;
pub mod builtins;
pub mod console;
pub mod handler;
pub mod interpreter;
pub mod registry;

/// Cyclic command-name completion.
pub use autocomplete::AutocompleteEngine;
/// Host composition of interpreter, scrollback, and input line.
pub use console::{BackgroundJob, BackgroundSlot, Console, OutputSender};
/// Result type and trait for command handlers.
pub use handler::{CommandResult, Handler, HandlerRef};
/// Interpreter contract and the registry-backed implementation.
pub use interpreter::{CommandInterpreter, Interpreter, tokenize};
/// Name to handler-list mapping.
pub use registry::CommandRegistry;

pub use devcon_types::{ConsoleConfig, ConsoleError, InputBuffer, OutputSink, Result};
