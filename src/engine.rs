use log::{debug, error, trace};

use crate::buffer::TextBuffer;
use crate::clipboard::Register;
use crate::editor::Editor;
use crate::error::{EditError, Result};
use crate::key::{InputEvent, KeyCode, KeyEvent, parse_sequence};
use crate::keymap;
use crate::pending::PendingCommand;
use crate::render::RenderSpan;
use crate::traits::{Clipboard, Host, NullHost};
use crate::types::{
    Action, Change, Direction, Edit, InsertEdit, Mode, ModeEntry, Motion, MotionParams, Operator,
    Position,
};
use crate::undo::UndoStack;

/// A modal editing session over one document.
///
/// Keys go in through [`Session::handle_key`] and friends; after each key
/// the session scrolls the host if the cursor left the visible lines and
/// forwards the change notifications the key produced.
#[derive(Debug, Clone)]
pub struct Session<H = NullHost, C = Register> {
    editor: Editor<C>,
    mode: Mode,
    pending: PendingCommand,
    host: H,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub cursor: Position,
    pub preferred_col: Option<usize>,
    pub pending_keys: String,
    pub pending_count: Option<usize>,
    pub awaiting_composite: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    text: String,
    mode: Mode,
    cursor: Position,
    undo_limit: Option<usize>,
}

impl SessionBuilder {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Initial cursor; clamped into the document on build.
    pub fn cursor(mut self, cursor: Position) -> Self {
        self.cursor = cursor;
        self
    }

    /// Keep at most `limit` undo snapshots.
    pub fn undo_limit(mut self, limit: usize) -> Self {
        self.undo_limit = Some(limit);
        self
    }

    pub fn build(self) -> Session {
        self.build_with(NullHost, Register::new())
    }

    pub fn build_with<H: Host, C: Clipboard>(self, host: H, clipboard: C) -> Session<H, C> {
        let undo = match self.undo_limit {
            Some(limit) => UndoStack::with_limit(limit),
            None => UndoStack::new(),
        };
        let mut editor = Editor::with_parts(self.text, clipboard, undo);
        let cursor = editor.buffer().clamp(self.cursor.into());
        editor.set_cursor(cursor);
        if self.mode == Mode::Visual
            && let Err(err) = editor.start_selection()
        {
            error!("cannot start selection at {:?}: {err}", editor.cursor());
        }
        editor.take_changes();
        Session {
            editor,
            mode: self.mode,
            pending: PendingCommand::new(),
            host,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        SessionBuilder::default().build()
    }
}

impl Session {
    pub fn new(text: impl Into<String>) -> Self {
        SessionBuilder::default().text(text).build()
    }
}

impl<H: Host, C: Clipboard> Session<H, C> {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cursor(&self) -> Position {
        self.editor.cursor()
    }

    pub fn text(&self) -> &str {
        self.editor.text()
    }

    pub fn buffer(&self) -> &TextBuffer {
        self.editor.buffer()
    }

    /// The selection as document positions, start first.
    pub fn selection(&self) -> Option<(Position, Position)> {
        self.editor.selection_range()
    }

    pub fn pending_keys(&self) -> &str {
        self.pending.keys()
    }

    pub fn editor(&self) -> &Editor<C> {
        &self.editor
    }

    /// Direct access to the motion engine. Notifications it queues reach the
    /// host on the next key or [`Session::flush`].
    pub fn editor_mut(&mut self) -> &mut Editor<C> {
        &mut self.editor
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            cursor: self.editor.cursor(),
            preferred_col: self.editor.preferred_col(),
            pending_keys: self.pending.keys().to_owned(),
            pending_count: self.pending.count(),
            awaiting_composite: self.pending.is_awaiting(),
        }
    }

    pub fn render_spans(&self, row: usize) -> Result<Vec<RenderSpan>> {
        self.editor.render_spans(row)
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.editor.set_text(text);
        self.flush();
    }

    pub fn set_highlight(&mut self, pattern: &str) -> Result<(), EditError> {
        self.editor.set_highlight(pattern)?;
        self.flush();
        Ok(())
    }

    pub fn clear_highlight(&mut self) {
        self.editor.clear_highlight();
        self.flush();
    }

    /// Replaces every match of `pattern` with `replacement`.
    pub fn substitute(
        &mut self,
        pattern: &str,
        replacement: &str,
    ) -> Result<usize, EditError> {
        let count = self.editor.substitute(pattern, replacement)?;
        self.flush();
        Ok(count)
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::ReceivedChar(c) if self.mode == Mode::Insert => {
                trace!("received {c:?}");
                let mut buf = [0u8; 4];
                if let Err(err) = self.editor.insert_at_cursor(c.encode_utf8(&mut buf)) {
                    error!("abandoning received char {c:?}: {err}");
                }
                self.flush();
            }
            InputEvent::ReceivedChar(c) => self.handle_key(KeyEvent::char(c)),
        }
    }

    /// Handles a symbolic key name. Returns false if the name is unknown.
    pub fn handle_symbol(&mut self, symbol: &str) -> bool {
        match KeyEvent::from_symbol(symbol) {
            Some(key) => {
                self.handle_key(key);
                true
            }
            None => {
                trace!("unknown key symbol {symbol:?}");
                false
            }
        }
    }

    /// Handles every key of a sequence such as `"3dd"` or `"ihi<esc>"`.
    pub fn feed(&mut self, keys: &str) {
        for key in parse_sequence(keys) {
            self.handle_key(key);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        trace!("key {}", key.symbol());
        let result = match self.mode {
            Mode::Insert => self.handle_insert_key(key),
            Mode::Command | Mode::Visual => self.handle_command_key(key),
        };
        if let Err(err) = result {
            error!("abandoning key {}: {err}", key.symbol());
            self.pending.clear();
        }
        self.flush();
    }

    /// Scrolls the host to the cursor if needed and forwards queued changes.
    pub fn flush(&mut self) {
        let changes = self.editor.take_changes();
        let row = self.editor.cursor().row;
        let first = self.host.first_visible_line();
        let last = self.host.last_visible_line();
        let top = if row < first {
            Some(row)
        } else if row > last {
            Some(row - last.saturating_sub(first))
        } else {
            None
        };
        match top {
            Some(top) => {
                debug!("cursor row {row} outside [{first}, {last}], scrolling to {top}");
                self.host.scroll_to(top);
                self.host.changed(&Change::All);
            }
            None => {
                for change in &changes {
                    self.host.changed(change);
                }
            }
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        debug!("mode {:?} -> {:?}", self.mode, mode);
        if mode != Mode::Visual {
            self.editor.clear_selection();
        }
        self.mode = mode;
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> Result<()> {
        let symbol = key.symbol();
        let counting = self.pending.is_count_only();
        self.pending.push(&symbol);

        // A digit extends the count; 0 outside a count is the line-start motion.
        if let KeyCode::Char(c) = key.code
            && key.mods.is_empty()
            && c.is_ascii_digit()
            && (c != '0' || counting)
        {
            return Ok(());
        }

        let Some(action) = keymap::lookup(self.mode, &key) else {
            trace!("unbound key {symbol}, pending {:?}", self.pending.keys());
            return Ok(());
        };

        if let Action::Composite(letter) = action {
            return self.handle_composite(letter, &symbol);
        }

        let count = self.pending.count();
        let params = self.pending.params(self.mode, &symbol);
        debug!(
            "{:?} via {:?} x{} {:?}",
            action,
            self.pending.keys(),
            params.multiplier,
            params.operator
        );
        self.pending.clear();
        self.perform(action, params, count)
    }

    fn handle_composite(&mut self, letter: char, symbol: &str) -> Result<()> {
        if !self.pending.completes(letter) {
            trace!("holding {:?}", self.pending.keys());
            self.pending.hold();
            return Ok(());
        }
        let count = self.pending.count();
        let params = self.pending.params(self.mode, symbol);
        debug!(
            "composite {:?} x{} {:?}",
            self.pending.keys(),
            params.multiplier,
            params.operator
        );
        self.pending.clear();
        match letter {
            'g' => {
                let line = count.filter(|&n| n > 0).unwrap_or(1);
                self.editor.go_to_line(line, params)?;
                if params.operator == Operator::Change {
                    self.set_mode(Mode::Insert);
                }
            }
            'd' => self.editor.delete_lines(params.multiplier)?,
            'y' => self.editor.yank_lines(params.multiplier)?,
            _ => trace!("no composite for {letter}"),
        }
        Ok(())
    }

    fn perform(&mut self, action: Action, params: MotionParams, count: Option<usize>) -> Result<()> {
        match action {
            Action::Motion(motion) => {
                self.editor.apply_motion(motion, params, count)?;
                if params.operator == Operator::Change {
                    self.set_mode(Mode::Insert);
                }
            }
            Action::Edit(edit) => self.apply_edit(edit, params.multiplier)?,
            Action::Enter(entry) => self.enter(entry)?,
            Action::Escape => self.set_mode(Mode::Command),
            Action::Composite(_) | Action::Insert(_) | Action::Select(_) => {
                trace!("{action:?} not performed from the pending buffer");
            }
        }
        Ok(())
    }

    fn apply_edit(&mut self, edit: Edit, multiplier: usize) -> Result<()> {
        match edit {
            Edit::DeleteChar => self.editor.delete_chars(multiplier)?,
            Edit::DeleteToLineEnd => self.editor.delete_to_line_end()?,
            Edit::JoinLines => self.editor.join_lines(multiplier)?,
            Edit::Paste => self.editor.paste(multiplier)?,
            Edit::Undo => self.editor.undo(),
            Edit::DeleteSelection => {
                self.editor.delete_selection()?;
                self.set_mode(Mode::Command);
            }
            Edit::YankSelection => {
                self.editor.yank_selection()?;
                self.set_mode(Mode::Command);
            }
            Edit::ChangeSelection => {
                self.editor.delete_selection()?;
                self.set_mode(Mode::Insert);
            }
        }
        Ok(())
    }

    fn enter(&mut self, entry: ModeEntry) -> Result<()> {
        let moving = MotionParams::moving();
        match entry {
            ModeEntry::Insert => {}
            ModeEntry::Append => {
                self.editor
                    .apply_motion(Motion::Char(Direction::Right), moving, None)?;
            }
            ModeEntry::AppendLineEnd => {
                self.editor.apply_motion(Motion::LineEnd, moving, None)?;
            }
            ModeEntry::OpenBelow => self.editor.open_line_below()?,
            ModeEntry::OpenAbove => self.editor.open_line_above()?,
            ModeEntry::Visual => {
                self.editor.start_selection()?;
                self.set_mode(Mode::Visual);
                return Ok(());
            }
        }
        self.set_mode(Mode::Insert);
        Ok(())
    }

    fn handle_insert_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(action) = keymap::lookup(Mode::Insert, &key) else {
            trace!("unbound insert key {}", key.symbol());
            return Ok(());
        };
        match action {
            Action::Insert(InsertEdit::Text(c)) => {
                let mut buf = [0u8; 4];
                self.editor.insert_at_cursor(c.encode_utf8(&mut buf))?;
            }
            Action::Insert(InsertEdit::Newline) => self.editor.insert_at_cursor("\n")?,
            Action::Insert(InsertEdit::Backspace) => self.editor.backspace()?,
            Action::Insert(InsertEdit::Delete) => self.editor.delete_forward()?,
            Action::Insert(InsertEdit::Exit) => self.set_mode(Mode::Command),
            Action::Motion(motion) => {
                self.editor.clear_selection();
                self.editor
                    .apply_motion(motion, MotionParams::moving(), None)?;
            }
            Action::Select(motion) => {
                self.editor
                    .apply_motion(motion, MotionParams::new(1, Operator::Visual), None)?;
            }
            other => trace!("{other:?} ignored in insert mode"),
        }
        Ok(())
    }
}
