/// Whole-document undo history.
///
/// Holds full text snapshots taken before destructive multi-line edits.
/// There is no redo: popping a snapshot discards it.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    snapshots: Vec<String>,
    limit: Option<usize>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most `limit` snapshots, dropping the oldest first.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn push(&mut self, snapshot: impl Into<String>) {
        if self.limit == Some(0) {
            return;
        }
        self.snapshots.push(snapshot.into());
        if let Some(limit) = self.limit
            && self.snapshots.len() > limit
        {
            let excess = self.snapshots.len() - limit;
            self.snapshots.drain(..excess);
        }
    }

    pub fn pop(&mut self) -> Option<String> {
        self.snapshots.pop()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
