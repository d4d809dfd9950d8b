//! Error types for devcon.

use std::io;

/// Errors produced by the devcon console.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("console busy: {0}")]
    Busy(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_display() {
        let e = ConsoleError::InvalidArgument("name is empty".into());
        assert_eq!(format!("{e}"), "invalid argument: name is empty");
    }

    #[test]
    fn command_error_display() {
        let e = ConsoleError::Command("bad input".into());
        assert_eq!(format!("{e}"), "command error: bad input");
    }

    #[test]
    fn config_error_display() {
        let e = ConsoleError::Config("max_rows must be positive".into());
        assert_eq!(format!("{e}"), "config error: max_rows must be positive");
    }

    #[test]
    fn busy_error_display() {
        let e = ConsoleError::Busy("script running".into());
        assert_eq!(format!("{e}"), "console busy: script running");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: ConsoleError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: ConsoleError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn error_is_debug() {
        let e = ConsoleError::Command("test".into());
        assert!(format!("{e:?}").contains("Command"));
    }
}
