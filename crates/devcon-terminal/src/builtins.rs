//! Built-in commands that need interpreter state.
//!
//! When enabled these are intercepted before registry lookup, so they take
//! precedence over handlers registered under the same names.

use devcon_types::OutputSink;

use crate::registry::CommandRegistry;

/// Names handled here.
pub const BUILTIN_NAMES: &[&str] = &["clear", "help"];

/// Run `name` if it is a built-in. Returns `false` for anything else.
pub(crate) fn dispatch(
    name: &str,
    args: &[&str],
    registry: &CommandRegistry,
    output: &mut dyn OutputSink,
) -> bool {
    match name.to_lowercase().as_str() {
        "help" => {
            help(args, registry, output);
            true
        },
        "clear" => {
            output.clear();
            true
        },
        _ => false,
    }
}

fn help(args: &[&str], registry: &CommandRegistry, output: &mut dyn OutputSink) {
    if let Some(topic) = args.first() {
        match registry.lookup(topic) {
            Some(handlers) if !handlers.is_empty() => {
                for h in handlers {
                    let desc = h.description();
                    if desc.is_empty() {
                        output.append(&format!("{topic}: no description"));
                    } else {
                        output.append(&format!("{topic}: {desc}"));
                    }
                }
            },
            _ => output.append(&format!("Command '{topic}' not found.")),
        }
        return;
    }

    let cmds = registry.list_commands();
    if cmds.is_empty() {
        output.append("No commands registered.");
        return;
    }
    output.append("Available commands:");
    for (name, handlers) in cmds {
        let desc = handlers
            .iter()
            .map(|h| h.description())
            .find(|d| !d.is_empty())
            .unwrap_or("");
        if desc.is_empty() {
            output.append(&format!("  {name}"));
        } else {
            output.append(&format!("  {name:<16} {desc}"));
        }
    }
}
