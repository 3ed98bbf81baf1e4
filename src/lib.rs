pub mod buffer;
pub mod clipboard;
pub mod cursor;
pub mod editor;
pub mod engine;
pub mod error;
pub mod key;
pub mod keymap;
pub mod motion;
pub mod pending;
pub mod render;
pub mod traits;
pub mod types;
pub mod undo;

pub use crate::buffer::TextBuffer;
#[cfg(feature = "clipboard")]
pub use crate::clipboard::SystemClipboard;
pub use crate::clipboard::Register;
pub use crate::cursor::Selection;
pub use crate::editor::Editor;
pub use crate::engine::{Session, SessionBuilder, SessionSnapshot};
pub use crate::error::{BufferError, EditError};
pub use crate::key::{InputEvent, KeyCode, KeyEvent, Modifiers, parse_sequence};
pub use crate::render::{Highlight, RenderSpan};
pub use crate::traits::{Clipboard, Host, NullHost};
pub use crate::types::{Change, Mode, MotionParams, Operator, Position, Target};
pub use crate::undo::UndoStack;
