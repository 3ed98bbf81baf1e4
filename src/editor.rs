//! The motion engine.
//!
//! [`Editor`] owns the document, cursor, selection, register and undo
//! history. Every motion and range edit funnels through
//! [`Editor::execute_command`], which clamps the target into the document
//! before anything touches the buffer. Mutations queue [`Change`]
//! notifications that the session hands to its host.

use log::{debug, trace};
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::buffer::TextBuffer;
use crate::clipboard::Register;
use crate::cursor::{Cursor, Selection, SelectionModel};
use crate::error::{EditError, Result};
use crate::motion::{first_non_blank, matching_bracket, scan_word_end, scan_word_start};
use crate::traits::Clipboard;
use crate::types::{
    Change, Direction, Heading, Motion, MotionParams, Operator, Position, Target, WordKind,
};
use crate::undo::UndoStack;

/// Upper bound on the bytes a single counted paste may insert. Larger
/// pastes are dropped.
pub const MAX_PASTE_LEN: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Editor<C = Register> {
    buffer: TextBuffer,
    cursor: Cursor,
    selection: SelectionModel,
    clipboard: C,
    undo: UndoStack,
    highlight: Option<Regex>,
    changes: Vec<Change>,
}

impl Editor<Register> {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_parts(text, Register::new(), UndoStack::new())
    }
}

fn signed(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

impl<C: Clipboard> Editor<C> {
    pub fn with_parts(text: impl Into<String>, clipboard: C, undo: UndoStack) -> Self {
        Self {
            buffer: TextBuffer::new(text),
            cursor: Cursor::default(),
            selection: SelectionModel::default(),
            clipboard,
            undo,
            highlight: None,
            changes: Vec::new(),
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn cursor(&self) -> Position {
        self.cursor.position()
    }

    pub fn preferred_col(&self) -> Option<usize> {
        self.cursor.preferred_col()
    }

    /// The non-empty selection, as document offsets.
    pub fn selection(&self) -> Option<Selection> {
        self.selection.active()
    }

    /// The non-empty selection, as positions.
    pub fn selection_range(&self) -> Option<(Position, Position)> {
        let sel = self.selection.active()?;
        let start = self.buffer.line_and_col_of(sel.anchor).ok()?;
        let end = self.buffer.line_and_col_of(sel.extent).ok()?;
        Some((start, end))
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut C {
        &mut self.clipboard
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    pub fn highlight(&self) -> Option<&Regex> {
        self.highlight.as_ref()
    }

    /// Drains the notifications queued since the last call.
    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }

    fn notify(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Loads a new document. The cursor is pulled back inside it.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.selection.clear();
        self.buffer.set_text(text);
        self.reclamp_cursor();
        self.notify(Change::All);
    }

    fn reclamp_cursor(&mut self) {
        let pos = self.buffer.clamp(self.cursor.position().into());
        self.cursor.set_position(pos);
        self.cursor.set_preferred_col(None);
    }

    /// Moves the cursor to an already clamped position.
    pub fn set_cursor(&mut self, pos: Position) {
        let old = self.cursor.row();
        self.cursor.set_position(pos);
        self.cursor.set_preferred_col(None);
        let rows = if old == pos.row {
            vec![old]
        } else {
            vec![old, pos.row]
        };
        self.notify(Change::Lines(rows));
    }

    /// The single entry point for motions and range edits.
    ///
    /// The target is clamped into the document first. Delete, yank and
    /// change then work on the end-exclusive text between the endpoints in
    /// document order; visual extends the selection; move just places the
    /// cursor.
    pub fn execute_command(&mut self, from: Position, to: Target, params: MotionParams) -> Result<()> {
        let to = self.buffer.clamp(to);
        debug!(
            "execute {:?} from {:?} to {:?}",
            params.operator, from, to
        );
        match params.operator {
            Operator::Delete | Operator::Yank | Operator::Change => {
                let (start, end) = if from <= to { (from, to) } else { (to, from) };
                let text = self.buffer.get_range(start, end)?.to_owned();
                if !text.is_empty() {
                    self.clipboard.set(text);
                }
                if params.operator != Operator::Yank {
                    self.remove_span(start, end)?;
                }
            }
            Operator::Visual => {
                self.toggle_selection(from, to)?;
                self.set_cursor(to);
            }
            Operator::Move | Operator::None => self.set_cursor(to),
        }
        Ok(())
    }

    fn remove_span(&mut self, start: Position, end: Position) -> Result<()> {
        if start == end {
            return Ok(());
        }
        if start.row != end.row {
            self.undo.push(self.buffer.text());
        }
        self.clear_selection();
        self.buffer.remove_range(start, end)?;
        self.notify(if start.row == end.row {
            Change::Lines(vec![start.row])
        } else {
            Change::From(start.row)
        });
        self.set_cursor(start);
        Ok(())
    }

    fn selection_change(&self, selections: &[Selection]) -> Change {
        let rows: Option<Vec<usize>> = selections
            .iter()
            .flat_map(|s| [s.anchor, s.extent])
            .map(|ix| self.buffer.line_and_col_of(ix).ok().map(|p| p.row))
            .collect();
        match rows {
            Some(rows) if !rows.is_empty() => Change::Span {
                first: rows.iter().copied().min().unwrap_or(0),
                last: rows.iter().copied().max().unwrap_or(0),
            },
            _ => Change::All,
        }
    }

    /// Extends the selection by a motion from `from` to `to`.
    pub fn toggle_selection(&mut self, from: Position, to: Position) -> Result<()> {
        let start = self.buffer.index_of_position(from)?;
        let end = self.buffer.index_of_position(to)?;
        let before = self.selection.current();
        self.selection.toggle(start, end);
        let touched: Vec<Selection> = [before, self.selection.current()]
            .into_iter()
            .flatten()
            .collect();
        let change = self.selection_change(&touched);
        self.notify(change);
        Ok(())
    }

    /// Starts an empty selection at the cursor, as entering visual mode does.
    pub fn start_selection(&mut self) -> Result<()> {
        let offset = self.buffer.index_of_position(self.cursor.position())?;
        self.selection.start_at(offset);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        if let Some(sel) = self.selection.clear()
            && !sel.is_empty()
        {
            let change = self.selection_change(&[sel]);
            self.notify(change);
        }
    }

    /// Resolves `motion` from the cursor and runs it with `params`. `count`
    /// is the explicitly typed count, which `G` treats as a line number.
    pub fn apply_motion(
        &mut self,
        motion: Motion,
        params: MotionParams,
        count: Option<usize>,
    ) -> Result<()> {
        let from = self.cursor.position();
        let row = signed(from.row);
        let col = signed(from.col);
        let n = signed(params.multiplier);
        match motion {
            Motion::Char(Direction::Left) => {
                self.execute_command(from, Target::new(row, col.saturating_sub(n)), params)
            }
            Motion::Char(Direction::Right) => {
                self.execute_command(from, Target::new(row, col.saturating_add(n)), params)
            }
            Motion::Char(Direction::Up) => self.move_vertically(row.saturating_sub(n), params),
            Motion::Char(Direction::Down) => self.move_vertically(row.saturating_add(n), params),
            Motion::LineStart => self.execute_command(from, Target::new(row, 0), params),
            Motion::FirstNonBlank => {
                let Some(c) = first_non_blank(self.buffer.line(from.row)?) else {
                    return Ok(());
                };
                self.execute_command(from, Target::new(row, signed(c)), params)
            }
            Motion::LineEnd => {
                let len = self.buffer.line_len(from.row)?;
                self.execute_command(from, Target::new(row, signed(len)), params)
            }
            Motion::WordStart(kind, heading) => self.move_cursor_by_word(kind, heading, params),
            Motion::WordEnd(kind) => self.move_cursor_to_word_end(kind, params),
            Motion::MatchingBracket => self.move_cursor_to_matching_bracket(params),
            Motion::LastLine => {
                let line = count
                    .filter(|&n| n > 0)
                    .unwrap_or(self.buffer.num_lines());
                self.go_to_line(line, params)
            }
        }
    }

    fn move_vertically(&mut self, target_row: isize, params: MotionParams) -> Result<()> {
        let from = self.cursor.position();
        let col = self.cursor.preferred_col().unwrap_or(from.col);
        self.execute_command(from, Target::new(target_row, signed(col)), params)?;
        if !params.operator.takes_range() {
            self.cursor.set_preferred_col(Some(col));
        }
        Ok(())
    }

    /// Moves to the `multiplier`-th word start in `heading`, never leaving
    /// the current line.
    pub fn move_cursor_by_word(
        &mut self,
        kind: WordKind,
        heading: Heading,
        params: MotionParams,
    ) -> Result<()> {
        let from = self.cursor.position();
        let line = self.buffer.line(from.row)?;
        let len = signed(self.buffer.line_len(from.row)?);
        let mut col = from.col;
        for _ in 0..params.multiplier {
            let next = scan_word_start(line, col, kind, heading).clamp(0, len) as usize;
            if next == col {
                break;
            }
            col = next;
        }
        self.execute_command(from, Target::new(signed(from.row), signed(col)), params)
    }

    fn move_cursor_to_word_end(&mut self, kind: WordKind, params: MotionParams) -> Result<()> {
        let from = self.cursor.position();
        let line = self.buffer.line(from.row)?;
        let len = self.buffer.line_len(from.row)?;
        let mut col = from.col;
        for _ in 0..params.multiplier {
            let next = (scan_word_end(line, col, kind).max(0) as usize).min(len);
            if next == col {
                break;
            }
            col = next;
        }
        // The last character of the word belongs to the range.
        if params.operator.takes_range() && col < len {
            col += 1;
        }
        self.execute_command(from, Target::new(signed(from.row), signed(col)), params)
    }

    fn move_cursor_to_matching_bracket(&mut self, params: MotionParams) -> Result<()> {
        let from = self.cursor.position();
        let from_ix = self.buffer.index_of_position(from)?;
        let line_end = Position::new(from.row, self.buffer.line_len(from.row)?);
        let line_end_ix = self.buffer.index_of_position(line_end)?;
        let Some(partner) = matching_bracket(self.buffer.text(), from_ix, line_end_ix) else {
            trace!("no bracket pair from {from:?}");
            return Ok(());
        };
        let mut to = self.buffer.line_and_col_of(partner)?;
        if params.operator.takes_range() && to >= from {
            to.col += 1;
        }
        self.execute_command(from, to.into(), params)
    }

    /// Goes to 1-based line `line`, keeping the column where it fits.
    pub fn go_to_line(&mut self, line: usize, params: MotionParams) -> Result<()> {
        let from = self.cursor.position();
        let target = Target::new(signed(line).saturating_sub(1), signed(from.col));
        self.execute_command(from, target, params)
    }

    /// Inserts `s` at the cursor and leaves the cursor after it.
    pub fn insert_at_cursor(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return Ok(());
        }
        self.clear_selection();
        let at = self.cursor.position();
        let index = self.buffer.index_of_position(at)?;
        self.buffer.insert_text(at, s)?;
        let after = self.buffer.line_and_col_of(index + s.len())?;
        self.notify(if s.contains('\n') {
            Change::From(at.row)
        } else {
            Change::Lines(vec![at.row])
        });
        self.set_cursor(after);
        Ok(())
    }

    /// Deletes the selection, or the grapheme before the cursor. At the
    /// start of a line this joins it onto the previous one.
    pub fn backspace(&mut self) -> Result<()> {
        if self.delete_selection()? {
            return Ok(());
        }
        let at = self.cursor.position();
        if at.col > 0 {
            let prev = Position::new(at.row, at.col - 1);
            self.buffer.remove_range(prev, at)?;
            self.notify(Change::Lines(vec![at.row]));
            self.set_cursor(prev);
        } else if at.row > 0 {
            let prev = Position::new(at.row - 1, self.buffer.line_len(at.row - 1)?);
            self.buffer.remove_range(prev, at)?;
            self.notify(Change::From(prev.row));
            self.set_cursor(prev);
        }
        Ok(())
    }

    /// Deletes the selection, or the grapheme under the cursor. At the end
    /// of a line this pulls the next line up.
    pub fn delete_forward(&mut self) -> Result<()> {
        if self.delete_selection()? {
            return Ok(());
        }
        let at = self.cursor.position();
        let len = self.buffer.line_len(at.row)?;
        if at.col < len {
            self.buffer.remove_range(at, Position::new(at.row, at.col + 1))?;
            self.notify(Change::Lines(vec![at.row]));
        } else if at.row < self.buffer.last_row() {
            self.buffer.remove_range(at, Position::new(at.row + 1, 0))?;
            self.notify(Change::From(at.row));
        }
        Ok(())
    }

    /// `x`: deletes the selection, or `count` graphemes from the cursor into
    /// the register.
    pub fn delete_chars(&mut self, count: usize) -> Result<()> {
        if self.delete_selection()? {
            return Ok(());
        }
        let from = self.cursor.position();
        let len = self.buffer.line_len(from.row)?;
        let end = from.col.saturating_add(count).min(len);
        self.execute_command(
            from,
            Target::new(signed(from.row), signed(end)),
            MotionParams::new(1, Operator::Delete),
        )
    }

    /// `D`
    pub fn delete_to_line_end(&mut self) -> Result<()> {
        let from = self.cursor.position();
        let len = self.buffer.line_len(from.row)?;
        self.execute_command(
            from,
            Target::new(signed(from.row), signed(len)),
            MotionParams::new(1, Operator::Delete),
        )
    }

    /// `J`: `count` lines become one (at least one join). The next line's
    /// leading whitespace is replaced by a single space.
    pub fn join_lines(&mut self, count: usize) -> Result<()> {
        self.clear_selection();
        let row = self.cursor.row();
        let joins = count.saturating_sub(1).max(1);
        let mut joined_at = None;
        for _ in 0..joins {
            if row >= self.buffer.last_row() {
                break;
            }
            let len = self.buffer.line_len(row)?;
            let next = self.buffer.line(row + 1)?;
            let next_len = next.graphemes(true).count();
            let lead = first_non_blank(next).unwrap_or(next_len);
            let join_at = Position::new(row, len);
            self.buffer
                .remove_range(join_at, Position::new(row + 1, lead))?;
            if len > 0 && lead < next_len {
                self.buffer.insert_text(join_at, " ")?;
            }
            joined_at = Some(join_at);
        }
        if let Some(pos) = joined_at {
            self.notify(Change::From(row));
            self.set_cursor(pos);
        }
        Ok(())
    }

    /// `p`: inserts the register `count` times at the cursor. An empty
    /// register, or a paste longer than [`MAX_PASTE_LEN`], is a no-op.
    pub fn paste(&mut self, count: usize) -> Result<()> {
        let Some(text) = self.clipboard.get().filter(|t| !t.is_empty()) else {
            trace!("paste with empty register");
            return Ok(());
        };
        match text.len().checked_mul(count) {
            Some(len) if len <= MAX_PASTE_LEN => {}
            _ => {
                trace!("paste of {} bytes x{count} exceeds limit", text.len());
                return Ok(());
            }
        }
        self.insert_at_cursor(&text.repeat(count))
    }

    /// Restores the most recent snapshot. No-op when there is none.
    pub fn undo(&mut self) {
        match self.undo.pop() {
            Some(snapshot) => {
                debug!("undo to snapshot of {} bytes", snapshot.len());
                self.set_text(snapshot);
            }
            None => trace!("nothing to undo"),
        }
    }

    /// `dd`: deletes `count` lines from the cursor row into the register.
    pub fn delete_lines(&mut self, count: usize) -> Result<()> {
        let from = self.cursor.position();
        let last = self.buffer.last_row();
        let end = from.row.saturating_add(count.max(1)).min(last + 1);
        let text = self.buffer.lines(from.row, end - from.row)?.to_owned();

        self.undo.push(self.buffer.text());
        self.clear_selection();
        if end <= last {
            for _ in from.row..end {
                self.buffer.remove_line(from.row)?;
            }
        } else if from.row > 0 {
            // Taking the last line also takes the break in front of it.
            let prev = Position::new(from.row - 1, self.buffer.line_len(from.row - 1)?);
            self.buffer.remove_range(prev, self.buffer.end_position())?;
        } else {
            self.buffer.remove_range(Position::ZERO, self.buffer.end_position())?;
        }
        self.clipboard.set(text);

        let pos = self.buffer.clamp(from.into());
        self.notify(Change::From(pos.row));
        self.set_cursor(pos);
        Ok(())
    }

    /// `yy`: copies `count` lines from the cursor row into the register.
    pub fn yank_lines(&mut self, count: usize) -> Result<()> {
        let row = self.cursor.row();
        let end = row
            .saturating_add(count.max(1))
            .min(self.buffer.last_row() + 1);
        let text = self.buffer.lines(row, end - row)?.to_owned();
        self.clipboard.set(text);
        Ok(())
    }

    /// Deletes the selection into the register. Returns false when there
    /// was nothing selected.
    pub fn delete_selection(&mut self) -> Result<bool> {
        let Some((start, end)) = self.selection_range() else {
            return Ok(false);
        };
        let text = self.buffer.get_range(start, end)?.to_owned();
        self.clipboard.set(text);
        self.remove_span(start, end)?;
        Ok(true)
    }

    /// Copies the selection into the register and drops it.
    pub fn yank_selection(&mut self) -> Result<bool> {
        let Some((start, end)) = self.selection_range() else {
            return Ok(false);
        };
        let text = self.buffer.get_range(start, end)?.to_owned();
        self.clipboard.set(text);
        self.clear_selection();
        self.set_cursor(start);
        Ok(true)
    }

    /// `o`
    pub fn open_line_below(&mut self) -> Result<()> {
        self.apply_motion(Motion::LineEnd, MotionParams::moving(), None)?;
        self.insert_at_cursor("\n")
    }

    /// `O`
    pub fn open_line_above(&mut self) -> Result<()> {
        self.apply_motion(Motion::LineStart, MotionParams::moving(), None)?;
        let at = self.cursor.position();
        self.insert_at_cursor("\n")?;
        self.set_cursor(at);
        Ok(())
    }

    /// Highlights every match of `pattern` in the render spans.
    pub fn set_highlight(&mut self, pattern: &str) -> Result<(), EditError> {
        self.highlight = Some(Regex::new(pattern)?);
        self.notify(Change::All);
        Ok(())
    }

    pub fn clear_highlight(&mut self) {
        if self.highlight.take().is_some() {
            self.notify(Change::All);
        }
    }

    /// Replaces every match of `pattern` in the document. Returns the number
    /// of matches; the document is snapshotted for undo when there are any.
    pub fn substitute(
        &mut self,
        pattern: &str,
        replacement: &str,
    ) -> Result<usize, EditError> {
        let re = Regex::new(pattern)?;
        let matches = re.find_iter(self.buffer.text()).count();
        if matches == 0 {
            return Ok(0);
        }
        let replaced = re.replace_all(self.buffer.text(), replacement).into_owned();
        self.undo.push(self.buffer.text());
        self.set_text(replaced);
        Ok(matches)
    }
}
