//! Bounded, line-wrapped scrollback buffer.
//!
//! The buffer keeps two groups of entries:
//!
//! - **history**: finalized output in a [`CircularArray`], each entry
//!   wrapped against the available width;
//! - **staged**: command lines still being composed, each counted as
//!   exactly one row and never wrapped.
//!
//! `num_rows` is the sum of every history entry's wrapped row count plus
//! the number of staged entries. Every mutating path keeps it exact.

use devcon_types::{ConsoleConfig, OutputSink};

use crate::circular::CircularArray;
use crate::entry::{LineLayout, TextLayoutEntry};
use crate::measure::{CachedMeasure, Monospace, TextMeasure};
use crate::pool::Pool;

/// One row of the visible viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow<'a> {
    /// Row text.
    pub text: &'a str,
    /// The prompt is drawn in front of this row.
    pub prompt: bool,
}

/// Scrollback history plus staged command entries.
pub struct ScrollbackBuffer {
    entries: CircularArray<TextLayoutEntry>,
    staged: Vec<TextLayoutEntry>,
    pool: Pool<TextLayoutEntry>,
    measure: Box<dyn TextMeasure>,
    tab_symbol: String,
    newline_symbol: String,
    input_prefix: String,
    width: f32,
    prefix_width: f32,
    max_rows: usize,
    evict_overflow: bool,
    num_rows: usize,
}

impl ScrollbackBuffer {
    /// Create a buffer using the built-in monospace measurer from `config`.
    pub fn from_config(config: &ConsoleConfig) -> Self {
        let measure = CachedMeasure::new(Monospace::new(config.char_width));
        Self::new(config, Box::new(measure))
    }

    /// Create a buffer that wraps text with `measure`.
    pub fn new(config: &ConsoleConfig, measure: Box<dyn TextMeasure>) -> Self {
        let prefix_width = measure.text_width(&config.input_prefix);
        Self {
            entries: CircularArray::with_capacity(config.max_rows),
            staged: Vec::new(),
            pool: Pool::new(config.pool_capacity),
            measure,
            tab_symbol: config.tab_symbol.clone(),
            newline_symbol: config.newline_symbol.clone(),
            input_prefix: config.input_prefix.clone(),
            width: config.available_width,
            prefix_width,
            max_rows: config.max_rows,
            evict_overflow: config.evict_overflow,
            num_rows: 0,
        }
    }

    /// Total rows held: wrapped history rows plus one per staged entry.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of history entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when neither history nor staging holds anything.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.staged.is_empty()
    }

    /// Number of staged command entries.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// History entries, oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &TextLayoutEntry> {
        self.entries.iter()
    }

    /// Staged command entries, in the order they were added.
    pub fn staged(&self) -> impl Iterator<Item = &TextLayoutEntry> {
        self.staged.iter()
    }

    /// Visible row budget.
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Current wrap width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Prompt text drawn before prefixed rows.
    pub fn input_prefix(&self) -> &str {
        &self.input_prefix
    }

    /// Whether entries scrolled out of view are evicted.
    pub fn evict_overflow(&self) -> bool {
        self.evict_overflow
    }

    pub fn set_evict_overflow(&mut self, enabled: bool) {
        self.evict_overflow = enabled;
        self.remove_overflown_entries();
    }

    /// Append one output entry to history.
    pub fn append(&mut self, text: &str) {
        self.push_history(text, false);
    }

    /// Append a submitted command line to history. Its first row shares the
    /// screen row with the prompt and is narrowed accordingly.
    pub fn append_prefixed(&mut self, text: &str) {
        self.push_history(text, true);
    }

    /// Stage a line of the command currently being composed. Staged entries
    /// are not wrapped and always count as one row.
    pub fn add_command_entry(&mut self, text: &str) {
        let mut entry = self.pool.fetch();
        entry.set_raw(text);
        self.staged.push(entry);
        self.num_rows += 1;
        self.remove_overflown_entries();
    }

    /// Collapse the staged entries into one string, each line followed by
    /// the newline symbol, and release them.
    pub fn dequeue_command_entry(&mut self) -> String {
        let mut joined = String::new();
        self.num_rows -= self.staged.len();
        for entry in self.staged.drain(..) {
            joined.push_str(entry.value());
            joined.push_str(&self.newline_symbol);
            self.pool.release(entry);
        }
        joined
    }

    /// Release every entry, history and staged.
    pub fn clear(&mut self) {
        let pool = &mut self.pool;
        self.entries.drain_with(|entry| pool.release(entry));
        for entry in self.staged.drain(..) {
            pool.release(entry);
        }
        self.num_rows = 0;
    }

    /// Re-wrap against a new available width.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
        self.relayout();
    }

    /// Set the wrap width and prompt width together, as a host does when
    /// its font or viewport changes.
    pub fn set_layout(&mut self, width: f32, prefix_width: f32) {
        self.width = width;
        self.prefix_width = prefix_width;
        self.relayout();
    }

    /// Change the prompt. Its width narrows the first row of prefixed
    /// entries.
    pub fn set_input_prefix(&mut self, prefix: &str) {
        self.input_prefix = prefix.to_string();
        self.prefix_width = self.measure.text_width(prefix);
        self.relayout();
    }

    /// Swap the font metrics and re-wrap everything.
    pub fn set_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.measure = measure;
        self.prefix_width = self.measure.text_width(&self.input_prefix);
        self.relayout();
    }

    /// Change the visible row budget.
    pub fn set_max_rows(&mut self, max_rows: usize) {
        self.max_rows = max_rows;
        self.remove_overflown_entries();
    }

    /// Re-wrap every history entry, recount rows from scratch, and evict.
    pub fn relayout(&mut self) {
        let layout = LineLayout {
            width: self.width,
            prefix_width: self.prefix_width,
            newline: &self.newline_symbol,
        };
        let measure = self.measure.as_ref();
        let mut rows = 0;
        for entry in self.entries.iter_mut() {
            rows += entry.wrap(measure, &layout);
        }
        self.num_rows = rows + self.staged.len();
        self.remove_overflown_entries();
    }

    /// The last `max_rows` rows, oldest first: wrapped history followed by
    /// staged entries.
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        let mut rows: Vec<VisibleRow<'_>> = Vec::with_capacity(self.max_rows);
        for entry in self.staged.iter().rev() {
            if rows.len() == self.max_rows {
                break;
            }
            rows.push(VisibleRow {
                text: entry.value(),
                prompt: true,
            });
        }
        'history: for entry in self.entries.iter().rev() {
            for (i, line) in entry.lines().enumerate().rev() {
                if rows.len() == self.max_rows {
                    break 'history;
                }
                rows.push(VisibleRow {
                    text: line,
                    prompt: entry.is_prefixed() && i == 0,
                });
            }
        }
        rows.reverse();
        rows
    }

    /// Evict history entries that lie completely above the visible window.
    ///
    /// Stops at the first entry that is still at least partly visible, even
    /// if the buffer remains over budget.
    fn remove_overflown_entries(&mut self) {
        if !self.evict_overflow {
            return;
        }
        let mut evicted = 0usize;
        while self.num_rows > self.max_rows {
            let Some(oldest) = self.entries.peek() else {
                break;
            };
            let rows = oldest.line_count();
            if self.num_rows - rows < self.max_rows {
                break;
            }
            if let Some(entry) = self.entries.dequeue() {
                self.pool.release(entry);
            }
            self.num_rows -= rows;
            evicted += 1;
        }
        if evicted > 0 {
            log::debug!(
                "Evicted {evicted} scrollback entries ({} rows retained)",
                self.num_rows
            );
        }
    }

    fn push_history(&mut self, text: &str, prefixed: bool) {
        let mut entry = self.pool.fetch();
        entry.set_value(text, &self.tab_symbol);
        entry.set_prefixed(prefixed);
        let layout = LineLayout {
            width: self.width,
            prefix_width: self.prefix_width,
            newline: &self.newline_symbol,
        };
        self.num_rows += entry.wrap(self.measure.as_ref(), &layout);
        self.entries.enqueue(entry);
        self.remove_overflown_entries();
    }

    #[cfg(test)]
    fn recount(&self) -> usize {
        let history: usize = self.entries.iter().map(TextLayoutEntry::line_count).sum();
        history + self.staged.len()
    }
}

impl OutputSink for ScrollbackBuffer {
    fn append(&mut self, message: &str) {
        ScrollbackBuffer::append(self, message);
    }

    fn clear(&mut self) {
        ScrollbackBuffer::clear(self);
    }
}
