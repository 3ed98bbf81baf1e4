use crate::types::Change;

/// The single register that holds the last yanked or deleted text.
pub trait Clipboard {
    fn get(&mut self) -> Option<String>;
    fn set(&mut self, text: String);
}

/// The render collaborator that owns the viewport.
///
/// The session asks it which lines are visible, scrolls it when the cursor
/// leaves that range, and tells it which lines to redraw.
pub trait Host {
    /// First visible row.
    fn first_visible_line(&self) -> usize {
        0
    }

    /// Last visible row.
    fn last_visible_line(&self) -> usize {
        usize::MAX
    }

    /// Make `top` the first visible row.
    fn scroll_to(&mut self, top: usize) {
        let _ = top;
    }

    /// Called once per discrete mutation.
    fn changed(&mut self, change: &Change);
}

/// A host without a viewport that ignores notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl Host for NullHost {
    fn changed(&mut self, _change: &Change) {}
}
