use std::fmt;
use std::str::FromStr;

use crate::core::error::KeyParseError;

/// Key as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key; letters may arrive in either case
    Char(char),
    F(u8),
    Esc,
    Enter,
    Backspace,
    Tab,
    BackTab,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    Insert,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(' ') => write!(f, "Space"),
            Key::Char(c) => write!(f, "{}", c),
            Key::F(n) => write!(f, "F{}", n),
            Key::Esc => write!(f, "Esc"),
            Key::Enter => write!(f, "CR"),
            Key::Backspace => write!(f, "BS"),
            Key::Tab => write!(f, "Tab"),
            Key::BackTab => write!(f, "S-Tab"),
            Key::Delete => write!(f, "Del"),
            Key::Home => write!(f, "Home"),
            Key::End => write!(f, "End"),
            Key::PageUp => write!(f, "PageUp"),
            Key::PageDown => write!(f, "PageDown"),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Insert => write!(f, "Insert"),
        }
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ESC" | "ESCAPE" => Ok(Key::Esc),
            "CR" | "ENTER" | "RETURN" | "RET" => Ok(Key::Enter),
            "BS" | "BACKSPACE" => Ok(Key::Backspace),
            "TAB" => Ok(Key::Tab),
            "DEL" | "DELETE" => Ok(Key::Delete),
            "HOME" => Ok(Key::Home),
            "END" => Ok(Key::End),
            "PAGEUP" | "PGUP" => Ok(Key::PageUp),
            "PAGEDOWN" | "PGDN" => Ok(Key::PageDown),
            "UP" => Ok(Key::Up),
            "DOWN" => Ok(Key::Down),
            "LEFT" => Ok(Key::Left),
            "RIGHT" => Ok(Key::Right),
            "INSERT" | "INS" => Ok(Key::Insert),
            "SPACE" => Ok(Key::Char(' ')),
            "LT" => Ok(Key::Char('<')),
            "GT" => Ok(Key::Char('>')),
            "BAR" => Ok(Key::Char('|')),
            "MINUS" => Ok(Key::Char('-')),
            "PLUS" => Ok(Key::Char('+')),
            upper => {
                // Function keys F1-F24
                if let Some(num) = upper.strip_prefix('F') {
                    if let Ok(n) = num.parse::<u8>() {
                        if (1..=24).contains(&n) {
                            return Ok(Key::F(n));
                        }
                    }
                }
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    // Preserve case for raw chars
                    (Some(c), None) => Ok(Key::Char(c)),
                    _ => Err(KeyParseError::UnknownKey(s.to_string())),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// A discrete key press with the host's timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub timestamp_ms: u64,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            timestamp_ms: 0,
        }
    }

    pub fn key(key: Key) -> Self {
        Self::new(key, Modifiers::default())
    }

    /// A typed char; uppercase letters carry shift
    pub fn char(c: char) -> Self {
        Self::new(
            Key::Char(c),
            Modifiers {
                shift: c.is_uppercase(),
                ..Modifiers::default()
            },
        )
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(
            Key::Char(c),
            Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        )
    }

    pub fn alt(c: char) -> Self {
        Self::new(
            Key::Char(c),
            Modifiers {
                alt: true,
                ..Modifiers::default()
            },
        )
    }

    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// The char this press would type, with letter case taken from shift
    pub fn typed_char(&self) -> Option<char> {
        if self.modifiers.ctrl || self.modifiers.alt {
            return None;
        }
        match self.key {
            Key::Char(c) if c.is_alphabetic() => Some(if self.modifiers.shift {
                c.to_uppercase().next().unwrap_or(c)
            } else {
                c.to_lowercase().next().unwrap_or(c)
            }),
            Key::Char(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_ctrl_char(&self, c: char) -> bool {
        self.modifiers.ctrl && matches!(self.key, Key::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        match self.key {
            Key::Char(c) if !m.ctrl && !m.alt && c != ' ' && c != '<' => {
                write!(f, "{}", self.typed_char().unwrap_or(c))
            }
            key => {
                write!(f, "<")?;
                if m.ctrl {
                    write!(f, "C-")?;
                }
                if m.alt {
                    write!(f, "A-")?;
                }
                if m.shift && !matches!(key, Key::Char(_) | Key::BackTab) {
                    write!(f, "S-")?;
                }
                match key {
                    Key::Char('<') => write!(f, "lt>"),
                    other => write!(f, "{}>", other),
                }
            }
        }
    }
}

/// Parse one `<...>` key name such as `C-d`, `S-Tab`, `A-1`, `Esc`
pub fn parse_key_name(name: &str) -> Result<KeyEvent, KeyParseError> {
    let mut modifiers = Modifiers::default();
    let mut rest = name;
    loop {
        let lower = rest.get(..2).map(str::to_ascii_uppercase);
        match lower.as_deref() {
            Some("C-") if rest.len() > 2 => modifiers.ctrl = true,
            Some("A-") | Some("M-") if rest.len() > 2 => modifiers.alt = true,
            Some("S-") if rest.len() > 2 => modifiers.shift = true,
            _ => break,
        }
        rest = &rest[2..];
    }
    let mut key: Key = rest.parse()?;
    if modifiers.shift && key == Key::Tab {
        key = Key::BackTab;
    }
    if let Key::Char(c) = key {
        if c.is_uppercase() {
            modifiers.shift = true;
        }
    }
    Ok(KeyEvent::new(key, modifiers))
}

/// Parse vim-style key notation: `3dw`, `ihello<Esc>`, `<C-d>`, `<S-Tab>`.
///
/// A `<` that does not start a `<name>` is the literal key, so `<<` and
/// `>>` work as typed. `<wait:N>` advances the event clock by N ms
/// instead of producing a key. Events are spaced 10 ms apart.
pub fn parse_keys(notation: &str) -> Result<Vec<KeyEvent>, KeyParseError> {
    const STEP_MS: u64 = 10;
    let mut events = Vec::new();
    let mut clock = 0u64;
    let mut rest = notation;

    while let Some(c) = rest.chars().next() {
        if c == '<' {
            if let Some(close) = rest[1..].find('>') {
                let name = &rest[1..1 + close];
                if !name.is_empty() && !name.contains(['<', ' ']) {
                    rest = &rest[close + 2..];
                    if let Some(ms) = name.strip_prefix("wait:") {
                        let ms = ms
                            .parse::<u64>()
                            .map_err(|_| KeyParseError::UnknownKey(name.to_string()))?;
                        clock += ms;
                        continue;
                    }
                    clock += STEP_MS;
                    events.push(parse_key_name(name)?.at(clock));
                    continue;
                }
            }
        }
        rest = &rest[c.len_utf8()..];
        clock += STEP_MS;
        let event = match c {
            '\n' => KeyEvent::key(Key::Enter),
            '\t' => KeyEvent::key(Key::Tab),
            c => KeyEvent::char(c),
        };
        events.push(event.at(clock));
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_str() {
        assert_eq!("Esc".parse::<Key>(), Ok(Key::Esc));
        assert_eq!("cr".parse::<Key>(), Ok(Key::Enter));
        assert_eq!("F12".parse::<Key>(), Ok(Key::F(12)));
        assert_eq!("x".parse::<Key>(), Ok(Key::Char('x')));
        assert!("Bogus".parse::<Key>().is_err());
    }

    #[test]
    fn test_typed_char_follows_shift() {
        let lower = KeyEvent::new(
            Key::Char('d'),
            Modifiers {
                shift: true,
                ..Modifiers::default()
            },
        );
        assert_eq!(lower.typed_char(), Some('D'));
        assert_eq!(KeyEvent::char('D').typed_char(), Some('D'));
        assert_eq!(KeyEvent::char('$').typed_char(), Some('$'));
        assert_eq!(KeyEvent::ctrl('d').typed_char(), None);
    }

    #[test]
    fn test_parse_plain_and_named() {
        let events = parse_keys("3dw<Esc>").unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].key, Key::Char('3'));
        assert_eq!(events[3].key, Key::Esc);
        assert!(events[3].timestamp_ms > events[0].timestamp_ms);
    }

    #[test]
    fn test_parse_modifiers() {
        let events = parse_keys("<C-d><S-Tab><A-2><C-CR>").unwrap();
        assert!(events[0].is_ctrl_char('d'));
        assert_eq!(events[1].key, Key::BackTab);
        assert!(events[2].modifiers.alt);
        assert_eq!(events[3].key, Key::Enter);
        assert!(events[3].modifiers.ctrl);
    }

    #[test]
    fn test_literal_angle_brackets() {
        let events = parse_keys("<<>>").unwrap();
        let chars: Vec<_> = events.iter().filter_map(|e| e.typed_char()).collect();
        assert_eq!(chars, vec!['<', '<', '>', '>']);
    }

    #[test]
    fn test_wait_advances_clock() {
        let events = parse_keys(",<wait:1500>c").unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[1].timestamp_ms - events[0].timestamp_ms >= 1500);
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        assert_eq!(
            parse_keys("<Nope>"),
            Err(KeyParseError::UnknownKey("Nope".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_names() {
        assert_eq!(KeyEvent::ctrl('d').to_string(), "<C-d>");
        assert_eq!(KeyEvent::char('G').to_string(), "G");
        assert_eq!(KeyEvent::key(Key::Esc).to_string(), "<Esc>");
    }
}
