//! Foundation types for devcon.
//!
//! This crate contains the engine-agnostic types shared by all devcon
//! crates: the error type, console configuration, the editable input line,
//! and the output sink contract commands write into.

pub mod config;
pub mod error;
pub mod input;
pub mod sink;

pub use config::ConsoleConfig;
pub use error::{ConsoleError, Result};
pub use input::InputBuffer;
pub use sink::OutputSink;
