//! Scrollback engine for the devcon console.
//!
//! Output is kept as a bounded history of [`TextLayoutEntry`] values stored
//! in a [`CircularArray`]. Each entry is wrapped against the available width
//! using a [`TextMeasure`] collaborator, and the buffer keeps a running count
//! of wrapped rows so entries that scroll completely out of view can be
//! evicted. Entries are recycled through a [`Pool`].

pub mod buffer;
pub mod circular;
pub mod entry;
pub mod measure;
pub mod pool;

pub use buffer::{ScrollbackBuffer, VisibleRow};
pub use circular::CircularArray;
pub use entry::{LineLayout, TextLayoutEntry};
pub use measure::{CachedMeasure, Monospace, TextMeasure};
pub use pool::{Pool, Poolable};
