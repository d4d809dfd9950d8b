//! Text measurement.
//!
//! The scrollback wraps text using glyph advances supplied by the host's
//! font system. Wrapping asks for every character's width on every
//! re-layout, so hosts usually wrap their measurer in [`CachedMeasure`].

use std::cell::RefCell;
use std::collections::HashMap;

/// Supplies glyph advances for the current console font.
pub trait TextMeasure {
    /// Horizontal advance of one character.
    fn char_width(&self, ch: char) -> f32;

    /// Sum of the advances of every character in `text`.
    fn text_width(&self, text: &str) -> f32 {
        text.chars().map(|ch| self.char_width(ch)).sum()
    }
}

/// Fixed advance for every character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Monospace {
    advance: f32,
}

impl Monospace {
    /// Measurer where every glyph is `advance` wide.
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl TextMeasure for Monospace {
    fn char_width(&self, _ch: char) -> f32 {
        self.advance
    }
}

/// Memoizes another measurer per character.
pub struct CachedMeasure<M> {
    inner: M,
    cache: RefCell<HashMap<char, f32>>,
}

impl<M: TextMeasure> CachedMeasure<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Swap the underlying font. Cached widths are discarded.
    pub fn replace(&mut self, inner: M) {
        self.inner = inner;
        self.cache.get_mut().clear();
    }

    /// Number of memoized characters.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<M: TextMeasure> TextMeasure for CachedMeasure<M> {
    fn char_width(&self, ch: char) -> f32 {
        if let Some(w) = self.cache.borrow().get(&ch) {
            return *w;
        }
        let w = self.inner.char_width(ch);
        self.cache.borrow_mut().insert(ch, w);
        w
    }
}
