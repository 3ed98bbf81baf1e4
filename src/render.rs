//! Per-line render spans for hosts.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::editor::Editor;
use crate::error::Result;
use crate::traits::Clipboard;
use crate::types::Position;

/// How a run of text should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    Normal,
    Selection,
    /// Matched by the highlight pattern.
    Match,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSpan {
    pub tag: Highlight,
    pub text: String,
}

impl RenderSpan {
    pub fn new(tag: Highlight, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}

/// Splits `line` into runs of equal highlight. `selected` and `matches` are
/// byte ranges relative to the line; the selection wins where both apply.
/// An empty line yields a single empty `Normal` span.
pub fn line_spans(line: &str, selected: Option<Range<usize>>, matches: &[Range<usize>]) -> Vec<RenderSpan> {
    let mut spans: Vec<RenderSpan> = Vec::new();
    for (offset, grapheme) in line.grapheme_indices(true) {
        let tag = if selected.as_ref().is_some_and(|r| r.contains(&offset)) {
            Highlight::Selection
        } else if matches.iter().any(|r| r.contains(&offset)) {
            Highlight::Match
        } else {
            Highlight::Normal
        };
        match spans.last_mut() {
            Some(span) if span.tag == tag => span.text.push_str(grapheme),
            _ => spans.push(RenderSpan::new(tag, grapheme)),
        }
    }
    if spans.is_empty() {
        spans.push(RenderSpan::new(Highlight::Normal, ""));
    }
    spans
}

impl<C: Clipboard> Editor<C> {
    /// The spans of `row`, reflecting the selection and the highlight
    /// pattern.
    pub fn render_spans(&self, row: usize) -> Result<Vec<RenderSpan>> {
        let line = self.buffer().line(row)?;
        let start = self.buffer().index_of_position(Position::new(row, 0))?;
        let selected = self
            .selection()
            .map(|s| s.anchor.saturating_sub(start)..s.extent.saturating_sub(start));
        let matches: Vec<Range<usize>> = self
            .highlight()
            .map(|re| {
                re.find_iter(line)
                    .filter(|m| !m.is_empty())
                    .map(|m| m.range())
                    .collect()
            })
            .unwrap_or_default();
        Ok(line_spans(line, selected, &matches))
    }
}
