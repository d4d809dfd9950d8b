//! One logical output line and its wrapped rows.

use std::ops::Range;

use crate::measure::TextMeasure;
use crate::pool::Poolable;

/// Wrapping parameters shared by every entry of a buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLayout<'a> {
    /// Width available for one row. Non-positive disables wrapping.
    pub width: f32,
    /// Width of the prompt drawn in front of the first row of prefixed
    /// entries.
    pub prefix_width: f32,
    /// Logical line separator inside an entry's text.
    pub newline: &'a str,
}

/// A logical output line plus the rows it wraps into.
///
/// Rows are stored as byte ranges into the entry's own text so a pooled
/// entry keeps both allocations across reuse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayoutEntry {
    value: String,
    lines: Vec<Range<usize>>,
    prefixed: bool,
}

impl TextLayoutEntry {
    /// The entry text, with tabs already expanded.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the text, expanding every tab to `tab_symbol`. Rows are
    /// invalidated until the next [`wrap`](Self::wrap).
    pub fn set_value(&mut self, text: &str, tab_symbol: &str) {
        self.value.clear();
        for (i, part) in text.split('\t').enumerate() {
            if i > 0 {
                self.value.push_str(tab_symbol);
            }
            self.value.push_str(part);
        }
        self.lines.clear();
    }

    /// Replace the text verbatim.
    pub fn set_raw(&mut self, text: &str) {
        self.value.clear();
        self.value.push_str(text);
        self.lines.clear();
    }

    /// Whether the first row shares the screen row with the prompt.
    pub fn is_prefixed(&self) -> bool {
        self.prefixed
    }

    pub fn set_prefixed(&mut self, prefixed: bool) {
        self.prefixed = prefixed;
    }

    /// Number of wrapped rows from the last [`wrap`](Self::wrap).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Wrapped rows from the last [`wrap`](Self::wrap), top to bottom.
    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.lines.iter().map(|r| &self.value[r.clone()])
    }

    /// Recompute the wrapped rows and return how many there are (at
    /// least one).
    ///
    /// Text is split on `layout.newline` first; each logical line is then
    /// broken at the last character that fits. A row always takes at least
    /// one character, so glyphs wider than the viewport still make progress.
    pub fn wrap(&mut self, measure: &dyn TextMeasure, layout: &LineLayout<'_>) -> usize {
        self.lines.clear();
        let width = if layout.width > 0.0 {
            layout.width
        } else {
            f32::INFINITY
        };
        let mut offset = if self.prefixed {
            layout.prefix_width
        } else {
            0.0
        };

        let mut seg_start = 0;
        loop {
            let seg_end = if layout.newline.is_empty() {
                None
            } else {
                self.value[seg_start..]
                    .find(layout.newline)
                    .map(|i| seg_start + i)
            };
            let end = seg_end.unwrap_or(self.value.len());
            self.wrap_segment(seg_start..end, offset, width, measure);
            offset = 0.0;
            match seg_end {
                Some(i) => seg_start = i + layout.newline.len(),
                None => break,
            }
        }
        self.lines.len()
    }

    fn wrap_segment(
        &mut self,
        segment: Range<usize>,
        offset: f32,
        width: f32,
        measure: &dyn TextMeasure,
    ) {
        let mut line_start = segment.start;
        let mut used = offset;
        for (i, ch) in self.value[segment.clone()].char_indices() {
            let pos = segment.start + i;
            let w = measure.char_width(ch);
            if used + w > width && pos > line_start {
                self.lines.push(line_start..pos);
                line_start = pos;
                used = 0.0;
            }
            used += w;
        }
        self.lines.push(line_start..segment.end);
    }
}

impl Poolable for TextLayoutEntry {
    fn reset(&mut self) {
        self.value.clear();
        self.lines.clear();
        self.prefixed = false;
    }
}
