use std::ops::Range;

use log::warn;

use crate::types::Position;

/// The cursor and the column it tries to return to on vertical motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    position: Position,
    preferred_col: Option<usize>,
}

impl Cursor {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn row(&self) -> usize {
        self.position.row
    }

    pub fn col(&self) -> usize {
        self.position.col
    }

    /// Callers pass coordinates that are already clamped to the buffer.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn preferred_col(&self) -> Option<usize> {
        self.preferred_col
    }

    pub fn set_preferred_col(&mut self, col: Option<usize>) {
        self.preferred_col = col;
    }
}

/// A selection as byte offsets into the document, `anchor <= extent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub extent: usize,
}

impl Selection {
    fn ordered(a: usize, b: usize) -> Self {
        Self {
            anchor: a.min(b),
            extent: a.max(b),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.extent
    }

    pub fn range(&self) -> Range<usize> {
        self.anchor..self.extent
    }
}

/// Selection state for visual mode and shift-motions.
///
/// A selection grows from a fixed border: each extension moves whichever
/// border the motion started on and leaves the other one alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    current: Option<Selection>,
}

impl SelectionModel {
    /// The selection, including an empty one anchored at the cursor.
    pub fn current(&self) -> Option<Selection> {
        self.current
    }

    /// The selection if it covers at least one byte.
    pub fn active(&self) -> Option<Selection> {
        self.current.filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_none()
    }

    /// Starts an empty selection at `offset`.
    pub fn start_at(&mut self, offset: usize) {
        self.current = Some(Selection::ordered(offset, offset));
    }

    /// Extends the selection by a motion from offset `start` to offset `end`.
    ///
    /// An empty selection becomes `[min, max]` of the two offsets. Otherwise a
    /// motion starting at or past the extent moves the extent, and one
    /// starting at or before the anchor moves the anchor. Borders that cross
    /// are swapped back into order.
    pub fn toggle(&mut self, start: usize, end: usize) {
        let next = match self.active() {
            None => Selection::ordered(start, end),
            Some(sel) if start >= sel.extent => Selection::ordered(sel.anchor, end),
            Some(sel) if start <= sel.anchor => Selection::ordered(end, sel.extent),
            Some(sel) => {
                // Only reachable when the cursor was moved inside the
                // selection by something other than a selecting motion.
                warn!(
                    "selection motion started inside [{}, {}) at {start}; restarting selection",
                    sel.anchor, sel.extent
                );
                Selection::ordered(start, end)
            }
        };
        self.current = Some(next);
    }

    /// Drops the selection, returning what it covered.
    pub fn clear(&mut self) -> Option<Selection> {
        self.current.take()
    }
}
