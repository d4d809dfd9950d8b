//! Cyclic command-name completion.
//!
//! Each request rotates the input line to the next registered name that
//! starts with the anchor prefix: the text the user actually typed when the
//! rotation began. The anchor lives on the [`InputBuffer`] so that typing
//! resets it, while the rewrite done here keeps it.

use devcon_types::InputBuffer;

use crate::registry::CommandRegistry;

/// Sorted name index plus the registry generation it was built from.
#[derive(Debug, Default)]
pub struct AutocompleteEngine {
    /// `(lowercase, display)` pairs sorted by the lowercase form.
    index: Vec<(String, String)>,
    built_for: Option<u64>,
}

impl AutocompleteEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a rebuild on the next request.
    pub fn invalidate(&mut self) {
        self.built_for = None;
    }

    /// Whether the index is stale for `registry`.
    pub fn is_stale(&self, registry: &CommandRegistry) -> bool {
        self.built_for != Some(registry.generation())
    }

    /// Names in completion order, as of the last rebuild.
    pub fn sorted_names(&self) -> impl Iterator<Item = &str> {
        self.index.iter().map(|(_, name)| name.as_str())
    }

    /// Rotate `input` to the next (or previous) matching name.
    ///
    /// Returns `true` when the input was rewritten. With no match, or an
    /// empty registry, the input is left untouched.
    pub fn autocomplete(
        &mut self,
        registry: &CommandRegistry,
        input: &mut InputBuffer,
        forward: bool,
    ) -> bool {
        if self.is_stale(registry) {
            self.rebuild(registry);
        }
        let count = self.index.len();
        if count == 0 {
            return false;
        }

        let typed = input.value().to_lowercase();
        let found = self.index.iter().position(|(lower, _)| *lower == typed);
        if found.is_none() || input.autocomplete_anchor().is_none() {
            input.set_autocomplete_anchor(Some(input.value().to_string()));
        }
        let anchor = input
            .autocomplete_anchor()
            .map(str::to_lowercase)
            .unwrap_or_default();

        let start = match (found, forward) {
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
            (None, true) => 0,
            (None, false) => count - 1,
        };
        let hit = (0..count)
            .map(|step| {
                if forward {
                    (start + step) % count
                } else {
                    (start + count - step) % count
                }
            })
            .find(|&i| self.index[i].0.starts_with(&anchor));

        match hit {
            Some(i) => {
                input.clear();
                input.write(&self.index[i].1);
                true
            },
            None => false,
        }
    }

    fn rebuild(&mut self, registry: &CommandRegistry) {
        self.index = registry
            .names()
            .map(|name| (name.to_lowercase(), name.to_string()))
            .collect();
        self.index.sort();
        self.built_for = Some(registry.generation());
        log::debug!("Rebuilt autocomplete index ({} names)", self.index.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler;

    fn registry(names: &[&str]) -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        for name in names {
            reg.register(name, handler::from_text(|_| "")).unwrap();
        }
        reg
    }

    fn typed(text: &str) -> InputBuffer {
        let mut input = InputBuffer::new();
        for ch in text.chars() {
            input.insert(ch);
        }
        input
    }

    #[test]
    fn cycles_matching_names_alphabetically() {
        let reg = registry(&["Set-X", "Set-Y", "Get-Z"]);
        let mut engine = AutocompleteEngine::new();
        let mut input = typed("Set-");
        assert!(engine.autocomplete(&reg, &mut input, true));
        assert_eq!(input.value(), "Set-X");
        assert!(engine.autocomplete(&reg, &mut input, true));
        assert_eq!(input.value(), "Set-Y");
        assert!(engine.autocomplete(&reg, &mut input, true));
        assert_eq!(input.value(), "Set-X");
        assert_eq!(input.autocomplete_anchor(), Some("Set-"));
    }

    #[test]
    fn backward_rotation() {
        let reg = registry(&["Set-X", "Set-Y", "Get-Z"]);
        let mut engine = AutocompleteEngine::new();
        let mut input = typed("set");
        engine.autocomplete(&reg, &mut input, false);
        assert_eq!(input.value(), "Set-Y");
        engine.autocomplete(&reg, &mut input, false);
        assert_eq!(input.value(), "Set-X");
        engine.autocomplete(&reg, &mut input, false);
        assert_eq!(input.value(), "Set-Y");
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let reg = registry(&["Echo", "exit"]);
        let mut engine = AutocompleteEngine::new();
        let mut input = typed("E");
        engine.autocomplete(&reg, &mut input, true);
        assert_eq!(input.value(), "Echo");
        engine.autocomplete(&reg, &mut input, true);
        assert_eq!(input.value(), "exit");
    }

    #[test]
    fn empty_input_cycles_everything() {
        let reg = registry(&["b", "a", "c"]);
        let mut engine = AutocompleteEngine::new();
        let mut input = InputBuffer::new();
        let mut seen = Vec::new();
        for _ in 0..4 {
            engine.autocomplete(&reg, &mut input, true);
            seen.push(input.value().to_string());
        }
        assert_eq!(seen, vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn no_match_leaves_input_unchanged() {
        let reg = registry(&["alpha"]);
        let mut engine = AutocompleteEngine::new();
        let mut input = typed("zz");
        assert!(!engine.autocomplete(&reg, &mut input, true));
        assert_eq!(input.value(), "zz");
    }

    #[test]
    fn empty_registry_is_noop() {
        let reg = CommandRegistry::new();
        let mut engine = AutocompleteEngine::new();
        let mut input = typed("x");
        assert!(!engine.autocomplete(&reg, &mut input, true));
        assert_eq!(input.value(), "x");
        assert!(input.autocomplete_anchor().is_none());
    }

    #[test]
    fn typing_restarts_rotation_from_new_prefix() {
        let reg = registry(&["cat", "cd", "clear"]);
        let mut engine = AutocompleteEngine::new();
        let mut input = typed("c");
        engine.autocomplete(&reg, &mut input, true);
        assert_eq!(input.value(), "cat");
        input.backspace();
        input.backspace();
        input.insert('l');
        engine.autocomplete(&reg, &mut input, true);
        assert_eq!(input.value(), "clear");
    }

    #[test]
    fn exact_name_without_anchor_becomes_anchor() {
        let reg = registry(&["list", "listen"]);
        let mut engine = AutocompleteEngine::new();
        let mut input = typed("list");
        engine.autocomplete(&reg, &mut input, true);
        assert_eq!(input.value(), "listen");
        engine.autocomplete(&reg, &mut input, true);
        assert_eq!(input.value(), "list");
    }

    #[test]
    fn rebuilds_after_registry_change() {
        let mut reg = registry(&["alpha"]);
        let mut engine = AutocompleteEngine::new();
        let mut input = typed("a");
        engine.autocomplete(&reg, &mut input, true);
        assert!(!engine.is_stale(&reg));

        reg.register("apple", handler::from_text(|_| "")).unwrap();
        assert!(engine.is_stale(&reg));
        engine.autocomplete(&reg, &mut input, true);
        assert_eq!(input.value(), "apple");
        assert_eq!(engine.sorted_names().collect::<Vec<_>>(), vec!["alpha", "apple"]);
    }

    #[test]
    fn invalidate_forces_rebuild() {
        let reg = registry(&["x"]);
        let mut engine = AutocompleteEngine::new();
        engine.autocomplete(&reg, &mut InputBuffer::new(), true);
        engine.invalidate();
        assert!(engine.is_stale(&reg));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeSet;

        proptest! {
            #[test]
            fn full_rotation_returns_to_first_match(
                names in proptest::collection::btree_set("[a-c]{1,4}", 1..12),
                prefix in "[a-c]{0,2}",
            ) {
                let names: BTreeSet<String> = names;
                let matching = names.iter().filter(|n| n.starts_with(&prefix)).count();
                prop_assume!(matching > 0);
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                let reg = registry(&refs);
                let mut engine = AutocompleteEngine::new();
                let mut input = typed(&prefix);

                engine.autocomplete(&reg, &mut input, true);
                let first = input.value().to_string();
                prop_assert!(first.starts_with(&prefix));
                for _ in 0..matching {
                    engine.autocomplete(&reg, &mut input, true);
                    prop_assert!(input.value().starts_with(&prefix));
                }
                prop_assert_eq!(input.value(), first.as_str());
            }
        }
    }
}
