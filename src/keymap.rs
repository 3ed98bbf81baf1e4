//! Key bindings for each mode.
//!
//! Lookup is by the terminal key only; counts and operator letters are
//! parsed from the pending buffer by the session.

use crate::key::{KeyCode, KeyEvent, Modifiers};
use crate::types::{
    Action, Direction, Edit, Heading, InsertEdit, Mode, ModeEntry, Motion, WordKind,
};

/// The action bound to `key` in `mode`, if any.
pub fn lookup(mode: Mode, key: &KeyEvent) -> Option<Action> {
    match mode {
        Mode::Command => command_action(key),
        Mode::Visual => visual_action(key),
        Mode::Insert => insert_action(key),
    }
}

fn plain_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .mods
                .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::META) =>
        {
            Some(c)
        }
        _ => None,
    }
}

/// Motions shared by command and visual mode.
fn motion(key: &KeyEvent) -> Option<Motion> {
    if let Some(c) = plain_char(key) {
        let motion = match c {
            'h' => Motion::Char(Direction::Left),
            'j' => Motion::Char(Direction::Down),
            'k' => Motion::Char(Direction::Up),
            'l' => Motion::Char(Direction::Right),
            '0' => Motion::LineStart,
            '^' => Motion::FirstNonBlank,
            '$' => Motion::LineEnd,
            'w' => Motion::WordStart(WordKind::Short, Heading::Forward),
            'W' => Motion::WordStart(WordKind::Long, Heading::Forward),
            'b' => Motion::WordStart(WordKind::Short, Heading::Backward),
            'B' => Motion::WordStart(WordKind::Long, Heading::Backward),
            'e' => Motion::WordEnd(WordKind::Short),
            'E' => Motion::WordEnd(WordKind::Long),
            '%' => Motion::MatchingBracket,
            'G' => Motion::LastLine,
            _ => return None,
        };
        return Some(motion);
    }
    if !key.mods.is_empty() {
        return None;
    }
    navigation(key.code)
}

/// Arrow, home and end keys.
fn navigation(code: KeyCode) -> Option<Motion> {
    match code {
        KeyCode::Left => Some(Motion::Char(Direction::Left)),
        KeyCode::Right => Some(Motion::Char(Direction::Right)),
        KeyCode::Up => Some(Motion::Char(Direction::Up)),
        KeyCode::Down => Some(Motion::Char(Direction::Down)),
        KeyCode::Home => Some(Motion::LineStart),
        KeyCode::End => Some(Motion::LineEnd),
        _ => None,
    }
}

fn command_action(key: &KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Esc {
        return Some(Action::Escape);
    }
    if let Some(m) = motion(key) {
        return Some(Action::Motion(m));
    }
    let action = match plain_char(key)? {
        'x' => Action::Edit(Edit::DeleteChar),
        'D' => Action::Edit(Edit::DeleteToLineEnd),
        'J' => Action::Edit(Edit::JoinLines),
        'p' => Action::Edit(Edit::Paste),
        'u' => Action::Edit(Edit::Undo),
        'i' => Action::Enter(ModeEntry::Insert),
        'a' => Action::Enter(ModeEntry::Append),
        'A' => Action::Enter(ModeEntry::AppendLineEnd),
        'o' => Action::Enter(ModeEntry::OpenBelow),
        'O' => Action::Enter(ModeEntry::OpenAbove),
        'v' => Action::Enter(ModeEntry::Visual),
        c @ ('g' | 'd' | 'y') => Action::Composite(c),
        _ => return None,
    };
    Some(action)
}

fn visual_action(key: &KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Esc {
        return Some(Action::Escape);
    }
    if let Some(m) = motion(key) {
        return Some(Action::Motion(m));
    }
    let action = match plain_char(key)? {
        'd' | 'x' => Action::Edit(Edit::DeleteSelection),
        'y' => Action::Edit(Edit::YankSelection),
        'c' => Action::Edit(Edit::ChangeSelection),
        'v' => Action::Escape,
        'g' => Action::Composite('g'),
        _ => return None,
    };
    Some(action)
}

fn insert_action(key: &KeyEvent) -> Option<Action> {
    let shifted = key.mods.contains(Modifiers::SHIFT);
    let action = match key.code {
        KeyCode::Esc => Action::Insert(InsertEdit::Exit),
        KeyCode::Backspace => Action::Insert(InsertEdit::Backspace),
        KeyCode::Delete => Action::Insert(InsertEdit::Delete),
        KeyCode::Enter => Action::Insert(InsertEdit::Newline),
        KeyCode::Tab => Action::Insert(InsertEdit::Text('\t')),
        KeyCode::Char(_) => Action::Insert(InsertEdit::Text(key.printable()?)),
        code if shifted => Action::Select(navigation(code)?),
        code => Action::Motion(navigation(code)?),
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> KeyEvent {
        KeyEvent::from_symbol(s).unwrap()
    }

    #[test]
    fn command_bindings() {
        assert_eq!(
            lookup(Mode::Command, &sym("w")),
            Some(Action::Motion(Motion::WordStart(WordKind::Short, Heading::Forward)))
        );
        assert_eq!(
            lookup(Mode::Command, &sym("<left>")),
            Some(Action::Motion(Motion::Char(Direction::Left)))
        );
        assert_eq!(lookup(Mode::Command, &sym("d")), Some(Action::Composite('d')));
        assert_eq!(lookup(Mode::Command, &sym("u")), Some(Action::Edit(Edit::Undo)));
        assert_eq!(lookup(Mode::Command, &sym("<esc>")), Some(Action::Escape));
    }

    #[test]
    fn digits_and_operator_prefixes_are_unbound() {
        assert_eq!(lookup(Mode::Command, &sym("3")), None);
        assert_eq!(lookup(Mode::Command, &sym("c")), None);
        assert_eq!(lookup(Mode::Command, &sym("q")), None);
        assert_eq!(lookup(Mode::Command, &sym("<c-h>")), None);
    }

    #[test]
    fn visual_overrides() {
        assert_eq!(
            lookup(Mode::Visual, &sym("d")),
            Some(Action::Edit(Edit::DeleteSelection))
        );
        assert_eq!(
            lookup(Mode::Visual, &sym("c")),
            Some(Action::Edit(Edit::ChangeSelection))
        );
        assert_eq!(lookup(Mode::Visual, &sym("i")), None);
        assert_eq!(
            lookup(Mode::Visual, &sym("$")),
            Some(Action::Motion(Motion::LineEnd))
        );
    }

    #[test]
    fn insert_bindings() {
        assert_eq!(
            lookup(Mode::Insert, &sym("x")),
            Some(Action::Insert(InsertEdit::Text('x')))
        );
        assert_eq!(
            lookup(Mode::Insert, &sym("<tab>")),
            Some(Action::Insert(InsertEdit::Text('\t')))
        );
        assert_eq!(
            lookup(Mode::Insert, &sym("<s-left>")),
            Some(Action::Select(Motion::Char(Direction::Left)))
        );
        assert_eq!(
            lookup(Mode::Insert, &sym("<s-end>")),
            Some(Action::Select(Motion::LineEnd))
        );
        assert_eq!(
            lookup(Mode::Insert, &sym("<home>")),
            Some(Action::Motion(Motion::LineStart))
        );
        assert_eq!(lookup(Mode::Insert, &sym("<c-a>")), None);
    }
}
