use modal_buffer::traits::{Clipboard, Host};
use modal_buffer::{Session, TextBuffer};
use unicode_segmentation::UnicodeSegmentation;

/// Line index matches the text exactly.
pub fn check_buffer(buffer: &TextBuffer) -> Result<(), String> {
    let text = buffer.text();
    let breaks: Vec<usize> = text.match_indices('\n').map(|(i, _)| i).collect();
    if buffer.line_indices() != breaks.as_slice() {
        return Err(format!(
            "line_indices {:?} != breaks {:?} in {:?}",
            buffer.line_indices(),
            breaks,
            text
        ));
    }
    if buffer.num_lines() != breaks.len() + 1 {
        return Err(format!("num_lines {} for {} breaks", buffer.num_lines(), breaks.len()));
    }
    Ok(())
}

/// Cursor row and column are inside the document.
pub fn check_cursor<H: Host, C: Clipboard>(session: &Session<H, C>) -> Result<(), String> {
    let cursor = session.cursor();
    let buffer = session.buffer();
    if cursor.row >= buffer.num_lines() {
        return Err(format!("cursor row {} >= {} lines", cursor.row, buffer.num_lines()));
    }
    let len = buffer
        .line(cursor.row)
        .map_err(|e| e.to_string())?
        .graphemes(true)
        .count();
    if cursor.col > len {
        return Err(format!("cursor col {} past line length {len}", cursor.col));
    }
    Ok(())
}

/// Selection is ordered and inside the document.
pub fn check_selection<H: Host, C: Clipboard>(session: &Session<H, C>) -> Result<(), String> {
    if let Some(sel) = session.editor().selection() {
        if sel.anchor > sel.extent {
            return Err(format!("selection {sel:?} out of order"));
        }
        if sel.extent > session.text().len() {
            return Err(format!("selection {sel:?} past end of document"));
        }
    }
    Ok(())
}

pub fn check_session<H: Host, C: Clipboard>(session: &Session<H, C>) -> Result<(), String> {
    check_buffer(session.buffer())?;
    check_cursor(session)?;
    check_selection(session)
}
