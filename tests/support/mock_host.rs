use modal_buffer::traits::Host;
use modal_buffer::types::Change;

/// A host with a fixed-height viewport that records what it is told.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    pub top: usize,
    pub height: usize,
    pub changes: Vec<Change>,
    pub scrolls: Vec<usize>,
}

impl RecordingHost {
    pub fn new(height: usize) -> Self {
        Self {
            top: 0,
            height,
            changes: Vec::new(),
            scrolls: Vec::new(),
        }
    }

    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }

    /// Whether any notification since the last take asks to redraw `row`.
    pub fn redraws(&self, row: usize) -> bool {
        self.changes.iter().any(|c| c.covers(row))
    }
}

impl Host for RecordingHost {
    fn first_visible_line(&self) -> usize {
        self.top
    }

    fn last_visible_line(&self) -> usize {
        self.top + self.height - 1
    }

    fn scroll_to(&mut self, top: usize) {
        self.top = top;
        self.scrolls.push(top);
    }

    fn changed(&mut self, change: &Change) {
        self.changes.push(change.clone());
    }
}
