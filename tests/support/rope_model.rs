use ropey::Rope;

/// Reference document for buffer property tests.
///
/// Positions are (row, char column); tests only generate text where every
/// char is its own grapheme and `\n` is the only line break.
pub struct RopeModel {
    rope: Rope,
}

impl RopeModel {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn num_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn line_len(&self, row: usize) -> usize {
        let line = self.rope.line(row);
        let len = line.len_chars();
        if row + 1 < self.num_lines() { len - 1 } else { len }
    }

    fn char_index(&self, row: usize, col: usize) -> usize {
        self.rope.line_to_char(row) + col
    }

    pub fn insert(&mut self, row: usize, col: usize, s: &str) {
        let at = self.char_index(row, col);
        self.rope.insert(at, s);
    }

    pub fn remove(&mut self, from: (usize, usize), to: (usize, usize)) {
        let start = self.char_index(from.0, from.1);
        let end = self.char_index(to.0, to.1);
        self.rope.remove(start..end);
    }

    pub fn remove_line(&mut self, row: usize) {
        let start = self.rope.line_to_char(row);
        if row + 1 < self.num_lines() {
            let end = self.rope.line_to_char(row + 1);
            self.rope.remove(start..end);
        } else {
            let end = start + self.line_len(row);
            self.rope.remove(start..end);
        }
    }

    pub fn change_line(&mut self, row: usize, text: &str) {
        let start = self.rope.line_to_char(row);
        let end = start + self.line_len(row);
        self.rope.remove(start..end);
        self.rope.insert(start, text);
    }
}
