//! Command handlers and closure adapters.

use std::fmt::Display;
use std::rc::Rc;

use devcon_types::Result;

/// Outcome of one handler invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// The handler failed.
    pub is_faulted: bool,
    /// Text to show. `None` or blank means no output.
    pub message: Option<String>,
}

impl CommandResult {
    /// Success with nothing to display.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Success with a message.
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            is_faulted: false,
            message: Some(message.into()),
        }
    }

    /// Failure with a description.
    pub fn fault(message: impl Into<String>) -> Self {
        Self {
            is_faulted: true,
            message: Some(message.into()),
        }
    }
}

/// A unit of executable logic bound to one or more command names.
///
/// Returning `Err` is treated exactly like returning a faulted result whose
/// message is the error's display text.
pub trait Handler {
    /// Run with the positional arguments that followed the command name.
    fn execute(&self, args: &[&str]) -> Result<CommandResult>;

    /// One-line description for `help`.
    fn description(&self) -> &str {
        ""
    }
}

/// Shared handle to a registered handler. The same handle may be
/// registered under several names.
pub type HandlerRef = Rc<dyn Handler>;

impl<F> Handler for F
where
    F: Fn(&[&str]) -> Result<CommandResult>,
{
    fn execute(&self, args: &[&str]) -> Result<CommandResult> {
        self(args)
    }
}

struct FnHandler<F> {
    f: F,
    description: String,
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&[&str]) -> Result<CommandResult>,
{
    fn execute(&self, args: &[&str]) -> Result<CommandResult> {
        (self.f)(args)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Wrap a closure with the full handler signature.
pub fn from_fn<F>(f: F) -> HandlerRef
where
    F: Fn(&[&str]) -> Result<CommandResult> + 'static,
{
    Rc::new(FnHandler {
        f,
        description: String::new(),
    })
}

/// Wrap a closure with the full handler signature and a `help` description.
pub fn described<F>(description: impl Into<String>, f: F) -> HandlerRef
where
    F: Fn(&[&str]) -> Result<CommandResult> + 'static,
{
    Rc::new(FnHandler {
        f,
        description: description.into(),
    })
}

/// Wrap a closure that builds its own [`CommandResult`].
pub fn from_result<F>(f: F) -> HandlerRef
where
    F: Fn(&[&str]) -> CommandResult + 'static,
{
    from_fn(move |args| Ok(f(args)))
}

/// Wrap a closure that always succeeds and returns text to display.
pub fn from_text<F, S>(f: F) -> HandlerRef
where
    F: Fn(&[&str]) -> S + 'static,
    S: Into<String>,
{
    from_fn(move |args| Ok(CommandResult::text(f(args))))
}

/// Wrap a closure that may fail with any displayable error.
pub fn from_fallible<F, S, E>(f: F) -> HandlerRef
where
    F: Fn(&[&str]) -> std::result::Result<S, E> + 'static,
    S: Into<String>,
    E: Display,
{
    from_fn(move |args| {
        Ok(match f(args) {
            Ok(text) => CommandResult::text(text),
            Err(e) => CommandResult::fault(e.to_string()),
        })
    })
}
