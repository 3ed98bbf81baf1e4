#![allow(dead_code)]

pub mod invariants;
pub mod mock_clipboard;
pub mod mock_host;
pub mod rope_model;

use modal_buffer::{KeyEvent, Session};

/// A session over `text` with the cursor at `(row, col)`.
pub fn session_at(text: &str, row: usize, col: usize) -> Session {
    modal_buffer::SessionBuilder::default()
        .text(text)
        .cursor(modal_buffer::Position::new(row, col))
        .build()
}

pub fn key(c: char) -> KeyEvent {
    KeyEvent::char(c)
}
