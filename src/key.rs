/// Key codes representing individual keys on the keyboard.
///
/// This enum provides a platform-agnostic representation of keys.
/// Hosts should map their platform-specific key events to these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key. Hosts deliver the character as typed: 'A' for shift+a.
    Char(char),
    /// The Escape key, used to exit modes and cancel pending commands.
    Esc,
    /// The Enter/Return key.
    Enter,
    /// The Backspace key.
    Backspace,
    /// The forward Delete key.
    Delete,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

bitflags::bitflags! {
    /// Keyboard modifier flags.
    ///
    /// These can be combined to represent multiple modifiers held simultaneously.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("esc", KeyCode::Esc),
    ("escape", KeyCode::Esc),
    ("enter", KeyCode::Enter),
    ("cr", KeyCode::Enter),
    ("return", KeyCode::Enter),
    ("backspace", KeyCode::Backspace),
    ("bs", KeyCode::Backspace),
    ("del", KeyCode::Delete),
    ("delete", KeyCode::Delete),
    ("tab", KeyCode::Tab),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("space", KeyCode::Char(' ')),
    ("lt", KeyCode::Char('<')),
];

const MODIFIER_PREFIXES: &[(&str, Modifiers)] = &[
    ("c-", Modifiers::CTRL),
    ("a-", Modifiers::ALT),
    ("m-", Modifiers::META),
    ("s-", Modifiers::SHIFT),
];

/// A key press event with optional modifiers.
///
/// This represents a single key press, including any modifier keys held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifier keys held during the key press.
    pub mods: Modifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }
    }

    /// An unmodified character key.
    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::empty())
    }

    /// Parses a normalized symbolic key name such as `"h"`, `"<esc>"` or
    /// `"<s-left>"`. Returns `None` for names the engine does not know.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let mut chars = symbol.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(Self::char(c));
        }

        let inner = symbol.strip_prefix('<')?.strip_suffix('>')?;
        let mut rest = inner;
        let mut mods = Modifiers::empty();
        'prefixes: loop {
            for (prefix, flag) in MODIFIER_PREFIXES {
                if rest.len() > prefix.len()
                    && let Some(stripped) = strip_prefix_ignore_case(rest, prefix)
                {
                    mods |= *flag;
                    rest = stripped;
                    continue 'prefixes;
                }
            }
            break;
        }

        let mut chars = rest.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(Self::new(KeyCode::Char(c), mods));
        }

        let name = rest.to_ascii_lowercase();
        NAMED_KEYS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, code)| Self::new(*code, mods))
    }

    /// The normalized symbolic name of this key, the inverse of
    /// [`KeyEvent::from_symbol`].
    pub fn symbol(&self) -> String {
        let mods = self.mods - Modifiers::SHIFT;
        let name = match self.code {
            KeyCode::Char('<') => "lt".to_string(),
            KeyCode::Char(c) if self.mods.is_empty() || self.mods == Modifiers::SHIFT => {
                return c.to_string();
            }
            KeyCode::Char(c) => c.to_string(),
            code => NAMED_KEYS
                .iter()
                .find(|(_, k)| *k == code)
                .map(|(n, _)| n.to_string())
                .unwrap_or_default(),
        };

        let mut out = String::from("<");
        for (prefix, flag) in MODIFIER_PREFIXES {
            let held = if *flag == Modifiers::SHIFT {
                self.mods.contains(Modifiers::SHIFT) && !matches!(self.code, KeyCode::Char(_))
            } else {
                mods.contains(*flag)
            };
            if held {
                out.push_str(prefix);
            }
        }
        out.push_str(&name);
        out.push('>');
        out
    }

    /// A character that insert mode should put into the text, if any.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c)
                if !self
                    .mods
                    .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::META)
                    && !c.is_control() =>
            {
                Some(c)
            }
            _ => None,
        }
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Input events that can be processed by the engine.
///
/// This enum distinguishes between key presses (used for commands)
/// and text input (used in insert mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key press event, typically used for commands and navigation.
    Key(KeyEvent),
    /// A character received in text input mode.
    /// This allows hosts to handle composed characters and IME input.
    ReceivedChar(char),
}

impl From<KeyEvent> for InputEvent {
    fn from(key: KeyEvent) -> Self {
        InputEvent::Key(key)
    }
}

/// Splits a key sequence such as `"3dd"` or `"ihello<esc>"` into key events.
///
/// A `<` that does not open a known key name is taken literally.
pub fn parse_sequence(keys: &str) -> Vec<KeyEvent> {
    let mut events = Vec::new();
    let mut rest = keys;
    while let Some(c) = rest.chars().next() {
        if c == '<'
            && let Some(close) = rest.find('>')
            && let Some(key) = KeyEvent::from_symbol(&rest[..=close])
            && close > 1
        {
            events.push(key);
            rest = &rest[close + 1..];
            continue;
        }
        events.push(KeyEvent::char(c));
        rest = &rest[c.len_utf8()..];
    }
    events
}
