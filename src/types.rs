/// A position within a text buffer.
///
/// Positions are zero-indexed and column values are counted in grapheme clusters,
/// not bytes or chars. This ensures correct handling of emoji and combining characters.
/// Ordering is document order: by row, then by column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Zero-based line number.
    pub row: usize,
    /// Zero-based column position in grapheme clusters.
    pub col: usize,
}

impl Position {
    /// The origin position (0, 0).
    pub const ZERO: Position = Position { row: 0, col: 0 };

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// An unclamped motion target.
///
/// Motions compute targets with plain arithmetic and may land before the
/// start of the document or past the end of a line; the motion engine clamps
/// a target before it touches the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub row: isize,
    pub col: isize,
}

impl Target {
    pub const fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }
}

impl From<Position> for Target {
    fn from(pos: Position) -> Self {
        Self {
            row: pos.row as isize,
            col: pos.col as isize,
        }
    }
}

/// The current mode of the modal engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Command mode - for navigation and operators.
    #[default]
    Command,
    /// Insert mode - for typing text.
    Insert,
    /// Visual mode - motions grow a selection.
    Visual,
}

/// What a resolved motion does with the range it describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Operator {
    /// No operator was typed; behaves like [`Operator::Move`].
    #[default]
    None,
    Move,
    Delete,
    Yank,
    /// Delete the range and continue in insert mode.
    Change,
    /// Extend the selection.
    Visual,
}

impl Operator {
    /// Whether the operator acts on the text between the two endpoints.
    pub fn takes_range(self) -> bool {
        matches!(self, Operator::Delete | Operator::Yank | Operator::Change)
    }
}

/// Parameters handed from the dispatcher to the motion engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionParams {
    pub multiplier: usize,
    pub operator: Operator,
}

impl MotionParams {
    pub const fn new(multiplier: usize, operator: Operator) -> Self {
        Self {
            multiplier,
            operator,
        }
    }

    /// A single plain move, used for the implicit motions of mode-entry keys.
    pub const fn moving() -> Self {
        Self::new(1, Operator::Move)
    }
}

impl Default for MotionParams {
    fn default() -> Self {
        Self::new(1, Operator::None)
    }
}

/// Lines the host needs to redraw after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A specific set of lines, in the order they were touched.
    Lines(Vec<usize>),
    /// An inclusive span of lines.
    Span { first: usize, last: usize },
    /// Everything from `first` to the end of the document.
    From(usize),
    /// Redraw everything.
    All,
}

impl Change {
    /// Whether this notification covers `row`.
    pub fn covers(&self, row: usize) -> bool {
        match self {
            Change::Lines(rows) => rows.contains(&row),
            Change::Span { first, last } => (*first..=*last).contains(&row),
            Change::From(first) => row >= *first,
            Change::All => true,
        }
    }
}

/// Direction of a character-wise motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Scan direction of a word motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Forward,
    Backward,
}

impl Heading {
    pub fn step(self) -> isize {
        match self {
            Heading::Forward => 1,
            Heading::Backward => -1,
        }
    }
}

/// Short words split on punctuation, long words only on whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKind {
    Short,
    Long,
}

/// A cursor motion resolved from a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Char(Direction),
    LineStart,
    FirstNonBlank,
    LineEnd,
    WordStart(WordKind, Heading),
    WordEnd(WordKind),
    MatchingBracket,
    /// `G`: the counted line, or the last one.
    LastLine,
}

/// A single-shot edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    DeleteChar,
    DeleteToLineEnd,
    JoinLines,
    Paste,
    Undo,
    DeleteSelection,
    YankSelection,
    ChangeSelection,
}

/// Keys that switch mode, with their implicit motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEntry {
    /// `i`
    Insert,
    /// `a`
    Append,
    /// `A`
    AppendLineEnd,
    /// `o`
    OpenBelow,
    /// `O`
    OpenAbove,
    /// `v`
    Visual,
}

/// Edits available in insert mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertEdit {
    Text(char),
    Backspace,
    Delete,
    Newline,
    Exit,
}

/// What a key resolves to once it reaches the end of the pending buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Motion(Motion),
    Edit(Edit),
    Enter(ModeEntry),
    /// First or second half of `gg`, `dd`, `yy`.
    Composite(char),
    /// Insert-mode table only.
    Insert(InsertEdit),
    /// Insert-mode table only: a motion that extends the selection.
    Select(Motion),
    /// Drop the pending buffer; leave visual mode.
    Escape,
}
