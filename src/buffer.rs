//! Line-indexed document storage.
//!
//! [`TextBuffer`] keeps the whole document as one UTF-8 string together with
//! the byte offsets of every `'\n'` in it. Rows are found through that index,
//! so every mutation has to keep it in step with the text:
//!
//! * offsets are strictly increasing,
//! * each offset points at a line break,
//! * there is exactly one offset per line break.
//!
//! Columns are counted in grapheme clusters. The buffer checks every
//! coordinate it is given and refuses to mutate on a bad one; clamping user
//! motions into range is the motion engine's job.

use std::fmt;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{BufferError, Result};
use crate::types::{Position, Target};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    line_indices: Vec<usize>,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let mut buffer = Self::default();
        buffer.set_text(text);
        buffer
    }

    /// Replaces the whole document and rebuilds the line index.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.line_indices = self.text.match_indices('\n').map(|(i, _)| i).collect();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offsets of the line breaks, in document order.
    pub fn line_indices(&self) -> &[usize] {
        &self.line_indices
    }

    /// Always at least one: an empty document has a single empty line.
    pub fn num_lines(&self) -> usize {
        self.line_indices.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn last_row(&self) -> usize {
        self.line_indices.len()
    }

    fn line_start(&self, row: usize) -> Option<usize> {
        match row {
            0 => Some(0),
            r => self.line_indices.get(r - 1).map(|i| i + 1),
        }
    }

    fn line_end(&self, row: usize) -> Option<usize> {
        match self.line_indices.get(row) {
            Some(&i) => Some(i),
            None if row == self.line_indices.len() => Some(self.text.len()),
            None => None,
        }
    }

    fn bounds(&self, row: usize) -> Result<(usize, usize)> {
        self.line_start(row)
            .zip(self.line_end(row))
            .ok_or(BufferError::CoordinateOutOfRange { row, col: 0 })
    }

    /// The content of `row`, without its line break.
    pub fn line(&self, row: usize) -> Result<&str> {
        let (start, end) = self.bounds(row)?;
        Ok(&self.text[start..end])
    }

    /// Length of `row` in grapheme clusters.
    pub fn line_len(&self, row: usize) -> Result<usize> {
        Ok(self.line(row)?.graphemes(true).count())
    }

    /// `count` rows starting at `start`, joined by their line breaks and
    /// without the break after the last one.
    pub fn lines(&self, start: usize, count: usize) -> Result<&str> {
        if count == 0 {
            self.bounds(start)?;
            return Ok("");
        }
        let (from, _) = self.bounds(start)?;
        let last = start + count - 1;
        let (_, to) = self
            .bounds(last)
            .map_err(|_| BufferError::CoordinateOutOfRange { row: last, col: 0 })?;
        Ok(&self.text[from..to])
    }

    /// Byte offset of `(row, col)`: the offset just after the row's preceding
    /// line break plus the column.
    pub fn index_of_position(&self, pos: Position) -> Result<usize> {
        let out_of_range = BufferError::CoordinateOutOfRange {
            row: pos.row,
            col: pos.col,
        };
        let (start, end) = self.bounds(pos.row).map_err(|_| out_of_range.clone())?;
        let line = &self.text[start..end];
        column_to_byte(line, pos.col)
            .map(|offset| start + offset)
            .ok_or(out_of_range)
    }

    /// The row and column of a byte offset produced by
    /// [`TextBuffer::index_of_position`].
    pub fn line_and_col_of(&self, index: usize) -> Result<Position> {
        if index > self.text.len() || !self.text.is_char_boundary(index) {
            return Err(BufferError::OffsetOutOfRange { offset: index });
        }
        let row = self.line_indices.partition_point(|&i| i < index);
        let start = self.line_start(row).unwrap_or(0);
        let col = self.text[start..index].graphemes(true).count();
        Ok(Position { row, col })
    }

    /// Inserts `s` before column `at.col` of row `at.row`. Line breaks inside
    /// `s` become new rows.
    pub fn insert_text(&mut self, at: Position, s: &str) -> Result<()> {
        let index = self.index_of_position(at)?;
        if s.is_empty() {
            return Ok(());
        }
        self.text.insert_str(index, s);

        let split = self.line_indices.partition_point(|&i| i < index);
        for i in &mut self.line_indices[split..] {
            *i += s.len();
        }
        let added = s.match_indices('\n').map(|(i, _)| index + i);
        self.line_indices.splice(split..split, added);
        Ok(())
    }

    /// Removes `row` together with its trailing line break. The last row has
    /// no trailing break, so removing it only empties it.
    pub fn remove_line(&mut self, row: usize) -> Result<()> {
        let (start, end) = self.bounds(row)?;
        if row < self.line_indices.len() {
            let removed = end + 1 - start;
            self.text.replace_range(start..=end, "");
            self.line_indices.remove(row);
            for i in &mut self.line_indices[row..] {
                *i -= removed;
            }
        } else {
            self.text.replace_range(start..end, "");
        }
        Ok(())
    }

    /// Removes the text in `[from, to)`.
    pub fn remove_range(&mut self, from: Position, to: Position) -> Result<()> {
        let start = self.index_of_position(from)?;
        let end = self.index_of_position(to)?;
        if start > end {
            return Err(BufferError::InvertedRange { start, end });
        }
        if start == end {
            return Ok(());
        }

        let removed = end - start;
        self.text.replace_range(start..end, "");
        self.line_indices.retain(|&i| i < start || i >= end);
        for i in self.line_indices.iter_mut().filter(|i| **i >= end) {
            *i -= removed;
        }
        Ok(())
    }

    /// The text in `[from, to)`.
    pub fn get_range(&self, from: Position, to: Position) -> Result<&str> {
        let start = self.index_of_position(from)?;
        let end = self.index_of_position(to)?;
        if start > end {
            return Err(BufferError::InvertedRange { start, end });
        }
        Ok(&self.text[start..end])
    }

    /// Replaces the content of `row`. Line breaks have to go through
    /// [`TextBuffer::insert_text`] and [`TextBuffer::remove_range`].
    pub fn change_line(&mut self, row: usize, text: &str) -> Result<()> {
        if text.contains('\n') {
            return Err(BufferError::MalformedLineMutation { row });
        }
        let (start, end) = self.bounds(row)?;
        self.text.replace_range(start..end, text);

        let old_len = end - start;
        for i in &mut self.line_indices[row..] {
            *i = *i + text.len() - old_len;
        }
        Ok(())
    }

    /// Pulls an unclamped target into the document: the row into
    /// `[0, num_lines - 1]`, then the column into `[0, line_len(row)]`.
    pub fn clamp(&self, target: Target) -> Position {
        let row = target.row.clamp(0, self.last_row() as isize) as usize;
        let len = self.line_len(row).unwrap_or(0);
        let col = target.col.clamp(0, len as isize) as usize;
        Position { row, col }
    }

    /// The position just past the last character of the document.
    pub fn end_position(&self) -> Position {
        let row = self.last_row();
        Position {
            row,
            col: self.line_len(row).unwrap_or(0),
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Byte offset of grapheme column `col` in `line`; `col == len` maps to the
/// end of the line.
pub(crate) fn column_to_byte(line: &str, col: usize) -> Option<usize> {
    line.grapheme_indices(true)
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()))
        .nth(col)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn assert_invariants(buffer: &TextBuffer) {
        let text = buffer.text();
        let breaks = text.matches('\n').count();
        assert_eq!(breaks, buffer.line_indices().len(), "text = {text:?}");
        assert!(buffer.line_indices().windows(2).all(|w| w[0] < w[1]));
        for &i in buffer.line_indices() {
            assert_eq!(&text[i..=i], "\n", "line index {i} in {text:?}");
        }
    }

    #[test]
    fn set_text_builds_index() {
        let mut t = TextBuffer::default();
        assert_invariants(&t);
        assert!(t.line_indices().is_empty());
        assert_eq!(t.num_lines(), 1);

        t.set_text("hello\nbello\ncello");
        assert_invariants(&t);
        assert_eq!(t.line_indices(), &[5, 11]);

        t.set_text("\n\n\n");
        assert_invariants(&t);
        assert_eq!(t.line_indices(), &[0, 1, 2]);
        assert_eq!(t.num_lines(), 4);

        t.set_text("");
        assert_invariants(&t);
        assert!(t.line_indices().is_empty());
    }

    #[test]
    fn remove_line_shrinks_document() {
        let mut t = TextBuffer::new("hello\nbello\ncello");
        t.remove_line(0).unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "bello\ncello");

        t.remove_line(0).unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "cello");

        t.remove_line(0).unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "");

        t.set_text("\n\n\n");
        t.remove_line(1).unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "\n\n");
    }

    #[test]
    fn remove_last_line_keeps_preceding_break() {
        let mut t = TextBuffer::new("hello this is longer\nwith three lines\nthis is the third line");
        t.remove_line(2).unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "hello this is longer\nwith three lines\n");

        t.remove_line(1).unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "hello this is longer\n");

        t.remove_line(0).unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "");

        t.set_text("now we remove\nfrom the middle line\nof three lines");
        t.remove_line(1).unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "now we remove\nof three lines");
    }

    #[test]
    fn insert_text_splits_rows() {
        let mut t = TextBuffer::new("here is some\ntext with some\nnewlines in it");
        t.insert_text(pos(0, 0), "\n").unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "\nhere is some\ntext with some\nnewlines in it");

        t.insert_text(pos(1, 5), "\n").unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "\nhere \nis some\ntext with some\nnewlines in it");

        t.insert_text(pos(4, 5), "\n").unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "\nhere \nis some\ntext with some\nnewli\nnes in it");

        t.insert_text(pos(3, 3), "b").unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "\nhere \nis some\ntexbt with some\nnewli\nnes in it");

        t.insert_text(pos(3, 7), "").unwrap();
        assert_eq!(t.text(), "\nhere \nis some\ntexbt with some\nnewli\nnes in it");

        t.set_text("something nicer\nbut not that nice");
        t.insert_text(pos(0, 5), "some text\nwith a newline in").unwrap();
        assert_invariants(&t);
        assert_eq!(
            t.text(),
            "sometsome text\nwith a newline inhing nicer\nbut not that nice"
        );
    }

    #[test]
    fn change_line_replaces_content() {
        let mut t = TextBuffer::new("hello bro\nwe have three lines\nagain");
        t.change_line(0, "bye bye bro").unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "bye bye bro\nwe have three lines\nagain");

        t.change_line(1, "").unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "bye bye bro\n\nagain");
    }

    #[test]
    fn change_line_rejects_line_breaks() {
        let mut t = TextBuffer::new("one\ntwo");
        let err = t.change_line(1, "t\nwo").unwrap_err();
        assert_eq!(err, BufferError::MalformedLineMutation { row: 1 });
        assert_eq!(t.text(), "one\ntwo");
    }

    #[test]
    fn remove_range_across_rows() {
        let mut t = TextBuffer::new("we are going to\nremove a range\nfrom this text");
        t.remove_range(pos(0, 5), pos(2, 9)).unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "we ar text");

        t.remove_range(pos(0, 0), pos(0, 0)).unwrap();
        assert_eq!(t.text(), "we ar text");

        t.remove_range(pos(0, 0), pos(0, 1)).unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "e ar text");

        t.set_text("just try removing stuff but\nnot any lines");
        t.remove_range(pos(0, 3), pos(0, 8)).unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "jus removing stuff but\nnot any lines");
    }

    #[test]
    fn remove_range_ending_on_break_keeps_it() {
        let mut t = TextBuffer::new("abc\ndef\nghi");
        t.remove_range(pos(0, 1), pos(0, 3)).unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "a\ndef\nghi");

        t.remove_range(pos(0, 1), pos(1, 0)).unwrap();
        assert_invariants(&t);
        assert_eq!(t.text(), "adef\nghi");
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut t = TextBuffer::new("abc");
        assert!(matches!(
            t.remove_range(pos(0, 2), pos(0, 1)),
            Err(BufferError::InvertedRange { .. })
        ));
        assert_eq!(t.text(), "abc");
    }

    #[test]
    fn index_round_trips() {
        let t = TextBuffer::new("hello and you are a head\nof a cheese and beef\nthis is nonsense");
        assert_eq!(t.index_of_position(pos(0, 0)).unwrap(), 0);
        assert_eq!(t.line_and_col_of(0).unwrap(), pos(0, 0));
        assert_eq!(t.index_of_position(pos(0, 1)).unwrap(), 1);
        assert_eq!(t.line_and_col_of(1).unwrap(), pos(0, 1));
        assert_eq!(t.index_of_position(pos(1, 0)).unwrap(), 25);
        assert_eq!(t.line_and_col_of(24).unwrap(), pos(0, 24));
        assert_eq!(t.line_and_col_of(25).unwrap(), pos(1, 0));
        assert_eq!(t.line_and_col_of(t.text().len()).unwrap(), pos(2, 16));
    }

    #[test]
    fn out_of_range_coordinates_fail() {
        let mut t = TextBuffer::new("ab\ncd");
        assert_eq!(
            t.index_of_position(pos(0, 3)),
            Err(BufferError::CoordinateOutOfRange { row: 0, col: 3 })
        );
        assert!(t.line(2).is_err());
        assert!(t.insert_text(pos(5, 0), "x").is_err());
        assert!(t.remove_line(2).is_err());
        assert!(t.line_and_col_of(6).is_err());
        assert_eq!(t.text(), "ab\ncd");
    }

    #[test]
    fn lines_joins_rows() {
        let t = TextBuffer::new("one\ntwo\nthree\nfour");
        assert_eq!(t.lines(1, 2).unwrap(), "two\nthree");
        assert_eq!(t.lines(3, 1).unwrap(), "four");
        assert_eq!(t.lines(0, 0).unwrap(), "");
        assert!(t.lines(2, 3).is_err());
    }

    #[test]
    fn columns_count_graphemes() {
        let mut t = TextBuffer::new("a\u{1F44D}b\n\u{E9}\u{1F1FA}\u{1F1F8}f");
        assert_eq!(t.line_len(0).unwrap(), 3);
        assert_eq!(t.line_len(1).unwrap(), 3);
        let ix = t.index_of_position(pos(1, 2)).unwrap();
        assert_eq!(t.line_and_col_of(ix).unwrap(), pos(1, 2));

        t.remove_range(pos(0, 1), pos(0, 2)).unwrap();
        assert_invariants(&t);
        assert_eq!(t.line(0).unwrap(), "ab");
    }

    #[test]
    fn clamp_pulls_targets_inside() {
        let t = TextBuffer::new("abc\n\nxy");
        assert_eq!(t.clamp(Target::new(-3, -1)), pos(0, 0));
        assert_eq!(t.clamp(Target::new(0, 10)), pos(0, 3));
        assert_eq!(t.clamp(Target::new(1, 2)), pos(1, 0));
        assert_eq!(t.clamp(Target::new(9, 9)), pos(2, 2));
    }
}
