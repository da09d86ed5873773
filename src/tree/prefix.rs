//! The indentation prefix shared down the recursion.

use crate::render::GlyphSet;

/// Accumulated branch-continuation text for the current descent path.
///
/// One stack is reused for a whole run. `extend` and `truncate` pair around
/// every descent; the mark is consumed by value, so a frame cannot pop twice.
#[derive(Debug, Default)]
pub struct PrefixStack {
    buf: String,
}

/// Restore point returned by [`PrefixStack::extend`].
#[derive(Debug)]
#[must_use = "dropping the mark leaves the prefix extended"]
pub struct PrefixMark(usize);

impl PrefixStack {
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    /// The current prefix text.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Append one indentation level: four spaces under a last sibling,
    /// otherwise the column glyph and three spaces.
    pub fn extend(&mut self, is_last: bool, glyphs: GlyphSet) -> PrefixMark {
        let mark = PrefixMark(self.buf.len());
        if is_last {
            self.buf.push_str("    ");
        } else {
            self.buf.push_str(glyphs.column);
            self.buf.push_str("   ");
        }
        mark
    }

    /// Drop exactly the bytes appended by the matching `extend`.
    pub fn truncate(&mut self, mark: PrefixMark) {
        self.buf.truncate(mark.0);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
