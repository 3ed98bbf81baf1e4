//! Character classes and the line scans behind word and bracket motions.
//!
//! All scans work on grapheme columns of a single line and return an
//! unclamped column; none of them wrap onto another line.

use unicode_segmentation::UnicodeSegmentation;

use crate::types::{Heading, WordKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Whitespace,
    Word,
    Punctuation,
}

/// Classifies a grapheme by its first char.
pub fn classify(grapheme: &str) -> CharClass {
    match grapheme.chars().next() {
        None => CharClass::Whitespace,
        Some(c) if c.is_whitespace() => CharClass::Whitespace,
        Some(c) if c.is_alphanumeric() || c == '_' => CharClass::Word,
        Some(_) => CharClass::Punctuation,
    }
}

/// `curr` starts a short word after `prev`.
pub fn is_short_word_boundary(curr: CharClass, prev: CharClass) -> bool {
    curr != CharClass::Whitespace && (curr != prev || prev == CharClass::Whitespace)
}

/// `curr` starts a long word after `prev`; punctuation does not split.
pub fn is_long_word_boundary(curr: CharClass, prev: CharClass) -> bool {
    curr != CharClass::Whitespace && prev == CharClass::Whitespace
}

fn classes(line: &str) -> Vec<CharClass> {
    line.graphemes(true).map(classify).collect()
}

fn class_at(classes: &[CharClass], idx: isize) -> CharClass {
    usize::try_from(idx)
        .ok()
        .and_then(|i| classes.get(i).copied())
        .unwrap_or(CharClass::Whitespace)
}

fn is_word_start(classes: &[CharClass], idx: usize, kind: WordKind) -> bool {
    if idx == classes.len() {
        return true;
    }
    let curr = classes[idx];
    let prev = class_at(classes, idx as isize - 1);
    match kind {
        WordKind::Short => is_short_word_boundary(curr, prev),
        WordKind::Long => is_long_word_boundary(curr, prev),
    }
}

fn is_word_end(classes: &[CharClass], idx: usize, kind: WordKind) -> bool {
    let curr = classes[idx];
    let next = class_at(classes, idx as isize + 1);
    match kind {
        WordKind::Short => is_short_word_boundary(next, curr) || next == CharClass::Whitespace,
        WordKind::Long => next == CharClass::Whitespace,
    }
}

/// Scans from `col` one grapheme at a time until a word start is found or
/// the line's bounds are left. The end of the line counts as a word start.
pub fn scan_word_start(line: &str, col: usize, kind: WordKind, heading: Heading) -> isize {
    let classes = classes(line);
    let len = classes.len() as isize;
    let step = heading.step();
    let mut idx = col as isize + step;
    while (0..=len).contains(&idx) && !is_word_start(&classes, idx as usize, kind) {
        idx += step;
    }
    idx
}

/// Scans forward from `col` to the last grapheme of a word.
pub fn scan_word_end(line: &str, col: usize, kind: WordKind) -> isize {
    let classes = classes(line);
    let len = classes.len() as isize;
    let mut idx = col as isize + 1;
    while idx < len
        && (classes[idx as usize] == CharClass::Whitespace
            || !is_word_end(&classes, idx as usize, kind))
    {
        idx += 1;
    }
    idx
}

/// Column of the first non-blank grapheme.
pub fn first_non_blank(line: &str) -> Option<usize> {
    line.graphemes(true)
        .position(|g| classify(g) != CharClass::Whitespace)
}

fn bracket_pair(c: char) -> Option<(char, char, bool)> {
    match c {
        '(' => Some(('(', ')', true)),
        '[' => Some(('[', ']', true)),
        '{' => Some(('{', '}', true)),
        ')' => Some(('(', ')', false)),
        ']' => Some(('[', ']', false)),
        '}' => Some(('{', '}', false)),
        _ => None,
    }
}

/// Finds the bracket partner for `%`.
///
/// `from` is the byte offset of the cursor and `line_end` the byte offset
/// where its line ends. The first bracket in `text[from..line_end]` is
/// matched against the whole document, honouring nesting. Returns the byte
/// offset of the partner.
pub fn matching_bracket(text: &str, from: usize, line_end: usize) -> Option<usize> {
    let (start, bracket) = text
        .get(from..line_end)?
        .char_indices()
        .find(|(_, c)| bracket_pair(*c).is_some())
        .map(|(i, c)| (from + i, c))?;
    let (open, close, forward) = bracket_pair(bracket)?;

    let mut depth = 0usize;
    if forward {
        for (i, c) in text[start..].char_indices() {
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i);
                }
            }
        }
    } else {
        for (i, c) in text[..=start].char_indices().rev() {
            if c == close {
                depth += 1;
            } else if c == open {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
    }
    None
}
