//! Key tables
//!
//! A chord is up to five fragments, so the dispatcher holds at most four
//! keys before the last one resolves it. Bindings keep insertion order:
//! when several chords could match the next key, the first one bound wins.

use std::fmt;
use std::str::FromStr;

use crate::core::command::Action;
use crate::core::error::KeyParseError;
use crate::core::input::{Key, KeyEvent};
use crate::core::mode::Mode;

/// Fragments in the longest chord (`ysiw?`)
pub const MAX_CHORD_LEN: usize = 5;

/// One position of a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment {
    /// A plain key; letters are case sensitive
    Key(char),
    /// The key with Ctrl held
    Ctrl(char),
    /// Any printable key, captured as an argument
    Any,
}

impl Fragment {
    /// If `event` fits this fragment, the char it stands for
    pub fn matches(&self, event: &KeyEvent) -> Option<char> {
        let mods = event.modifiers;
        match *self {
            Fragment::Ctrl(c) => match event.key {
                Key::Char(k) if mods.ctrl && !mods.alt && k.to_ascii_lowercase() == c => Some(c),
                _ => None,
            },
            Fragment::Key(c) if c.is_alphabetic() => match event.key {
                Key::Char(k)
                    if !mods.ctrl
                        && !mods.alt
                        && k.to_lowercase().eq(c.to_lowercase())
                        && mods.shift == c.is_uppercase() =>
                {
                    Some(c)
                }
                _ => None,
            },
            Fragment::Key(c) => (event.typed_char() == Some(c)).then_some(c),
            Fragment::Any => event.typed_char(),
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Key(c) => write!(f, "{}", c),
            Fragment::Ctrl(c) => write!(f, "ctrl+{}", c),
            Fragment::Any => write!(f, "?"),
        }
    }
}

/// A key sequence such as `dw`, `df?`, `ysiw?` or `ctrl+d`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord(Vec<Fragment>);

impl Chord {
    pub fn fragments(&self) -> &[Fragment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Chord {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("ctrl+") {
            let mut chars = rest.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Chord(vec![Fragment::Ctrl(c.to_ascii_lowercase())])),
                _ => Err(KeyParseError::UnknownKey(s.to_string())),
            };
        }
        let fragments: Vec<Fragment> = s
            .chars()
            .map(|c| match c {
                '?' => Fragment::Any,
                c => Fragment::Key(c),
            })
            .collect();
        match fragments.len() {
            0 => Err(KeyParseError::EmptyChord),
            n if n > MAX_CHORD_LEN => Err(KeyParseError::TooLong(s.to_string())),
            _ => Ok(Chord(fragments)),
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in &self.0 {
            write!(f, "{}", fragment)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub chord: Chord,
    pub action: Action,
}

/// Ordered chord table for one mode
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<Binding>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a chord; rebinding an existing chord keeps its position
    pub fn bind(&mut self, chord: &str, action: Action) -> Result<(), KeyParseError> {
        let chord: Chord = chord.parse()?;
        match self.bindings.iter_mut().find(|b| b.chord == chord) {
            Some(existing) => existing.action = action,
            None => self.bindings.push(Binding { chord, action }),
        }
        Ok(())
    }

    pub fn unbind(&mut self, chord: &str) -> Result<bool, KeyParseError> {
        let chord: Chord = chord.parse()?;
        let before = self.bindings.len();
        self.bindings.retain(|b| b.chord != chord);
        Ok(self.bindings.len() != before)
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn get(&self, chord: &str) -> Option<Action> {
        let chord: Chord = chord.parse().ok()?;
        self.bindings
            .iter()
            .find(|b| b.chord == chord)
            .map(|b| b.action)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyTable {
    Normal,
    Visual,
    LeaderNormal,
    LeaderVisual,
}

impl KeyTable {
    /// Table consulted in `mode`, with or without the leader armed
    pub fn for_mode(mode: Mode, leader: bool) -> Self {
        match (mode.is_visual(), leader) {
            (false, false) => KeyTable::Normal,
            (true, false) => KeyTable::Visual,
            (false, true) => KeyTable::LeaderNormal,
            (true, true) => KeyTable::LeaderVisual,
        }
    }
}

/// All chord tables of a session
#[derive(Debug, Clone, Default)]
pub struct Keymaps {
    pub normal: Keymap,
    pub visual: Keymap,
    pub leader_normal: Keymap,
    pub leader_visual: Keymap,
}

impl Keymaps {
    pub fn table(&self, table: KeyTable) -> &Keymap {
        match table {
            KeyTable::Normal => &self.normal,
            KeyTable::Visual => &self.visual,
            KeyTable::LeaderNormal => &self.leader_normal,
            KeyTable::LeaderVisual => &self.leader_visual,
        }
    }

    pub fn table_mut(&mut self, table: KeyTable) -> &mut Keymap {
        match table {
            KeyTable::Normal => &mut self.normal,
            KeyTable::Visual => &mut self.visual,
            KeyTable::LeaderNormal => &mut self.leader_normal,
            KeyTable::LeaderVisual => &mut self.leader_visual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::Modifiers;
    use crate::core::motion::Motion;

    #[test]
    fn test_chord_parsing() {
        let chord: Chord = "df?".parse().unwrap();
        assert_eq!(
            chord.fragments(),
            &[Fragment::Key('d'), Fragment::Key('f'), Fragment::Any]
        );
        let ctrl: Chord = "ctrl+d".parse().unwrap();
        assert_eq!(ctrl.fragments(), &[Fragment::Ctrl('d')]);
        let plus: Chord = "ctrl++".parse().unwrap();
        assert_eq!(plus.fragments(), &[Fragment::Ctrl('+')]);
        assert_eq!("ysiw?".parse::<Chord>().unwrap().len(), 5);
        assert!(matches!("abcdef".parse::<Chord>(), Err(KeyParseError::TooLong(_))));
        assert!(matches!("".parse::<Chord>(), Err(KeyParseError::EmptyChord)));
    }

    #[test]
    fn test_letter_case_follows_shift() {
        let upper = Fragment::Key('D');
        let lower = Fragment::Key('d');
        let shifted_d = KeyEvent::new(
            Key::Char('d'),
            Modifiers {
                shift: true,
                ..Modifiers::default()
            },
        );
        assert_eq!(upper.matches(&shifted_d), Some('D'));
        assert_eq!(lower.matches(&shifted_d), None);
        assert_eq!(lower.matches(&KeyEvent::char('d')), Some('d'));
        assert_eq!(upper.matches(&KeyEvent::char('d')), None);
    }

    #[test]
    fn test_symbols_ignore_shift_and_ctrl_needs_ctrl() {
        let dollar = KeyEvent::new(
            Key::Char('$'),
            Modifiers {
                shift: true,
                ..Modifiers::default()
            },
        );
        assert_eq!(Fragment::Key('$').matches(&dollar), Some('$'));
        assert_eq!(Fragment::Ctrl('d').matches(&KeyEvent::ctrl('d')), Some('d'));
        assert_eq!(Fragment::Key('d').matches(&KeyEvent::ctrl('d')), None);
        assert_eq!(Fragment::Any.matches(&KeyEvent::char('(')), Some('('));
        assert_eq!(Fragment::Any.matches(&KeyEvent::key(Key::Esc)), None);
    }

    #[test]
    fn test_rebinding_keeps_order() {
        let mut map = Keymap::new();
        map.bind("dd", Action::DeleteLines).unwrap();
        map.bind("dw", Action::Delete(Motion::WordForward)).unwrap();
        map.bind("dd", Action::YankLines).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.bindings()[0].action, Action::YankLines);
        assert!(map.unbind("dw").unwrap());
        assert_eq!(map.get("dw"), None);
    }

    #[test]
    fn test_table_for_mode() {
        assert_eq!(KeyTable::for_mode(Mode::Normal, true), KeyTable::LeaderNormal);
        assert_eq!(KeyTable::for_mode(Mode::VisualLine, false), KeyTable::Visual);
    }
}
