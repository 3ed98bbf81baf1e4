//! The pending key buffer of command and visual mode.
//!
//! Keys accumulate here until a bound key resolves them. The buffer reads as
//! `[count][operator]...terminal`: a leading digit run gives the multiplier,
//! a `d`, `y` or `c` right after it gives the operator, and the last key
//! typed decides what happens.

use crate::types::{Mode, MotionParams, Operator};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingCommand {
    keys: String,
    awaiting: bool,
}

impl PendingCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &str {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn push(&mut self, symbol: &str) {
        self.keys.push_str(symbol);
    }

    /// Keep the buffer for the second half of a composite key.
    pub fn hold(&mut self) {
        self.awaiting = true;
    }

    /// Whether a composite key is waiting for its second half.
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.awaiting = false;
    }

    /// True when only count digits have been typed so far.
    pub fn is_count_only(&self) -> bool {
        !self.keys.is_empty() && self.keys.bytes().all(|b| b.is_ascii_digit())
    }

    fn digit_run(&self) -> &str {
        let end = self
            .keys
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.keys.len());
        &self.keys[..end]
    }

    /// The typed count, if any.
    pub fn count(&self) -> Option<usize> {
        let digits = self.digit_run();
        if digits.is_empty() {
            return None;
        }
        Some(digits.bytes().fold(0usize, |n, b| {
            n.saturating_mul(10).saturating_add(usize::from(b - b'0'))
        }))
    }

    /// The count, at least 1.
    pub fn multiplier(&self) -> usize {
        self.count().unwrap_or(1).max(1)
    }

    /// The operator in effect for the key `terminal` that was just pushed.
    pub fn operator(&self, mode: Mode, terminal: &str) -> Operator {
        if mode == Mode::Visual {
            return Operator::Visual;
        }
        let prefix = self.keys.strip_suffix(terminal).unwrap_or(&self.keys);
        let after_count = &prefix[self.digit_run().len().min(prefix.len())..];
        match after_count.chars().next() {
            Some('d') => Operator::Delete,
            Some('y') => Operator::Yank,
            Some('c') => Operator::Change,
            _ => Operator::None,
        }
    }

    pub fn params(&self, mode: Mode, terminal: &str) -> MotionParams {
        MotionParams::new(self.multiplier(), self.operator(mode, terminal))
    }

    /// Whether the buffer spells a finished composite for `letter`: an
    /// optional count followed by the doubled letter. The go-to composite
    /// also takes an operator letter before `gg`.
    pub fn completes(&self, letter: char) -> bool {
        let rest = &self.keys[self.digit_run().len()..];
        let mut chars = rest.chars();
        match (chars.next(), chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), None, _) => a == letter && b == letter,
            (Some(op), Some(a), Some(b), None) => {
                letter == 'g' && matches!(op, 'd' | 'y' | 'c') && a == 'g' && b == 'g'
            }
            _ => false,
        }
    }
}
