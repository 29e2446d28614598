//! Source spans as character offsets.

use serde::{Deserialize, Serialize};

/// A half-open range `[pos, end)` of character offsets into a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub pos: u32,
    pub end: u32,
}

impl TextRange {
    pub const EMPTY: TextRange = TextRange { pos: 0, end: 0 };

    #[inline]
    pub fn new(pos: u32, end: u32) -> TextRange {
        TextRange { pos, end }
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.end.saturating_sub(self.pos)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.end <= self.pos
    }

    #[inline]
    pub fn contains(self, offset: u32) -> bool {
        offset >= self.pos && offset < self.end
    }
}
