//! Console configuration.
//!
//! Loaded from a `console.toml` file. Every key is optional; missing keys
//! fall back to the values in [`ConsoleConfig::default`].

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConsoleError, Result};

/// Layout and behavior settings for one console instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Replacement for `\t` in appended output.
    pub tab_symbol: String,
    /// Separator for logical lines in output and for joined command batches.
    pub newline_symbol: String,
    /// Number of wrapped rows visible in the viewport.
    pub max_rows: usize,
    /// Evict history entries that have scrolled completely out of view.
    pub evict_overflow: bool,
    /// Echo each executed line to the output before dispatching it.
    pub echo_enabled: bool,
    /// Intercept `help` and `clear` before registry lookup.
    pub builtins_enabled: bool,
    /// Prompt drawn in front of the input line and submitted commands.
    pub input_prefix: String,
    /// Maximum idle line entries kept for reuse.
    pub pool_capacity: usize,
    /// Glyph advance used by the built-in monospace measurer.
    pub char_width: f32,
    /// Initial wrap width, in the same units as `char_width`.
    pub available_width: f32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            tab_symbol: "    ".to_string(),
            newline_symbol: "\n".to_string(),
            max_rows: 24,
            evict_overflow: true,
            echo_enabled: false,
            builtins_enabled: false,
            input_prefix: "] ".to_string(),
            pool_capacity: 64,
            char_width: 1.0,
            available_width: 80.0,
        }
    }
}

impl ConsoleConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&source)?;
        log::info!("Loaded console config from {}", path.display());
        Ok(config)
    }

    /// Reject settings the layout engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_rows == 0 {
            return Err(ConsoleError::Config("max_rows must be positive".to_string()));
        }
        if self.newline_symbol.is_empty() {
            return Err(ConsoleError::Config(
                "newline_symbol must not be empty".to_string(),
            ));
        }
        if self.char_width.is_nan() || self.char_width <= 0.0 {
            return Err(ConsoleError::Config(format!(
                "char_width must be positive, got {}",
                self.char_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sensible() {
        let cfg = ConsoleConfig::default();
        assert_eq!(cfg.tab_symbol, "    ");
        assert_eq!(cfg.newline_symbol, "\n");
        assert_eq!(cfg.max_rows, 24);
        assert!(cfg.evict_overflow);
        assert!(!cfg.echo_enabled);
        assert!(!cfg.builtins_enabled);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = ConsoleConfig::from_toml("").unwrap();
        assert_eq!(cfg, ConsoleConfig::default());
    }

    #[test]
    fn partial_document_overrides_keys() {
        let cfg = ConsoleConfig::from_toml(
            r#"
            max_rows = 10
            echo_enabled = true
            tab_symbol = "  "
            "#,
        )
        .unwrap();
        assert_eq!(cfg.max_rows, 10);
        assert!(cfg.echo_enabled);
        assert_eq!(cfg.tab_symbol, "  ");
        assert_eq!(cfg.input_prefix, "] ");
    }

    #[test]
    fn zero_rows_rejected() {
        let err = ConsoleConfig::from_toml("max_rows = 0").unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }

    #[test]
    fn empty_newline_rejected() {
        let err = ConsoleConfig::from_toml("newline_symbol = \"\"").unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }

    #[test]
    fn non_positive_char_width_rejected() {
        let err = ConsoleConfig::from_toml("char_width = 0.0").unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = ConsoleConfig::from_toml("max_rows = [").unwrap_err();
        assert!(matches!(err, ConsoleError::TomlParse(_)));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = ConsoleConfig::load("/nonexistent/devcon/console.toml").unwrap_err();
        assert!(matches!(err, ConsoleError::Io(_)));
    }
}
