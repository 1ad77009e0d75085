//! Chord dispatcher
//!
//! Turns a stream of key events into resolved actions. The dispatcher only
//! tracks pending chord state; it never touches the buffer.

use tracing::{debug, trace};

use crate::core::command::{Action, CommandContext};
use crate::core::input::KeyEvent;
use crate::core::keymap::{Fragment, KeyTable, Keymaps, MAX_CHORD_LEN};
use crate::core::mode::Mode;

/// Largest repeat count the numeric prefix accumulates
pub const MAX_COUNT: usize = 9999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherSettings {
    pub leader_key: char,
    /// How long an armed leader stays armed
    pub leader_timeout_ms: u64,
    /// Held keys older than this are dropped; 0 disables the timeout
    pub chord_timeout_ms: u64,
    /// Feed an unmatched key again from Idle after a failed chord
    pub redeliver_unmatched: bool,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            leader_key: ',',
            leader_timeout_ms: 1000,
            chord_timeout_ms: 0,
            redeliver_unmatched: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub action: Action,
    pub context: CommandContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// Key consumed, chord or count still incomplete
    Pending,
    /// Leader key consumed, leader tables armed
    LeaderArmed,
    Resolved(Resolved),
    /// Nothing bound; the caller decides what the key means
    Unresolved,
}

enum Lookup {
    Leaf(Action, Fragment, char),
    Deeper(Fragment, char),
    Miss,
}

#[derive(Debug, Clone, Default)]
pub struct ChordDispatcher {
    settings: DispatcherSettings,
    held: Vec<Fragment>,
    literals: Vec<char>,
    typed: String,
    count: usize,
    leader_since: Option<u64>,
    last_key_ms: Option<u64>,
}

impl ChordDispatcher {
    pub fn new(settings: DispatcherSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &DispatcherSettings {
        &self.settings
    }

    /// Keys typed towards the current chord, count and leader included
    pub fn pending(&self) -> String {
        let mut out = String::new();
        if self.count > 0 {
            out.push_str(&self.count.to_string());
        }
        if self.leader_since.is_some() {
            out.push(self.settings.leader_key);
        }
        out.push_str(&self.typed);
        out
    }

    pub fn is_idle(&self) -> bool {
        self.held.is_empty() && self.count == 0 && self.leader_since.is_none()
    }

    pub fn depth(&self) -> usize {
        self.held.len()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn leader_armed(&self) -> bool {
        self.leader_since.is_some()
    }

    /// Back to Idle: held keys, count and leader all cleared
    pub fn reset(&mut self) {
        self.held.clear();
        self.literals.clear();
        self.typed.clear();
        self.count = 0;
        self.leader_since = None;
    }

    pub fn feed(&mut self, event: &KeyEvent, keymaps: &Keymaps, mode: Mode) -> DispatchResult {
        self.expire(event.timestamp_ms);
        self.last_key_ms = Some(event.timestamp_ms);

        match self.step(event, keymaps, mode) {
            Some(result) => result,
            None => {
                let was_pending = !self.held.is_empty() || self.leader_since.is_some();
                trace!(key = %event, pending = %self.pending(), "chord miss");
                self.reset();
                if was_pending && self.settings.redeliver_unmatched {
                    debug!(key = %event, "redelivering unmatched key");
                    self.step(event, keymaps, mode).unwrap_or_else(|| {
                        self.reset();
                        DispatchResult::Unresolved
                    })
                } else {
                    DispatchResult::Unresolved
                }
            }
        }
    }

    fn expire(&mut self, now: u64) {
        let leader_expired = self
            .leader_since
            .is_some_and(|since| now.saturating_sub(since) > self.settings.leader_timeout_ms);
        if leader_expired {
            trace!("leader expired");
            self.leader_since = None;
            self.held.clear();
            self.literals.clear();
            self.typed.clear();
        }
        let chord_stale = self.settings.chord_timeout_ms > 0
            && !self.held.is_empty()
            && self
                .last_key_ms
                .is_some_and(|last| now.saturating_sub(last) > self.settings.chord_timeout_ms);
        if chord_stale {
            trace!("chord timed out");
            self.reset();
        }
    }

    /// One dispatch attempt; `None` means the key matched nothing
    fn step(&mut self, event: &KeyEvent, keymaps: &Keymaps, mode: Mode) -> Option<DispatchResult> {
        let typed = event.typed_char();
        let table = KeyTable::for_mode(mode, self.leader_since.is_some());

        if let Some(digit) = typed.and_then(|c| c.to_digit(10)) {
            if let Some(result) = self.digit(digit as usize, event, keymaps, table) {
                return Some(result);
            }
        }

        if self.held.is_empty()
            && self.leader_since.is_none()
            && typed == Some(self.settings.leader_key)
        {
            self.leader_since = Some(event.timestamp_ms);
            return Some(DispatchResult::LeaderArmed);
        }

        match self.lookup(event, keymaps, table) {
            Lookup::Leaf(action, fragment, c) => {
                if fragment == Fragment::Any {
                    self.literals.push(c);
                }
                Some(DispatchResult::Resolved(self.resolve(action)))
            }
            Lookup::Deeper(fragment, c) => {
                self.hold(fragment, c);
                Some(DispatchResult::Pending)
            }
            Lookup::Miss => None,
        }
    }

    /// Digit handling: a count digit returns `Pending`, a bound digit
    /// resolves, anything else falls through to the normal lookup
    fn digit(
        &mut self,
        digit: usize,
        event: &KeyEvent,
        keymaps: &Keymaps,
        table: KeyTable,
    ) -> Option<DispatchResult> {
        if self.leader_since.is_some() && self.held.is_empty() {
            return None;
        }
        if self.held.is_empty() {
            if digit == 0 && self.count == 0 {
                return None;
            }
        } else {
            let bound = match self.lookup(event, keymaps, table) {
                Lookup::Leaf(_, fragment, _) | Lookup::Deeper(fragment, _) => {
                    fragment == Fragment::Any || (fragment == Fragment::Key('0') && self.count == 0)
                }
                Lookup::Miss => false,
            };
            if bound {
                return None;
            }
        }
        self.count = (self.count * 10 + digit).min(MAX_COUNT);
        Some(DispatchResult::Pending)
    }

    fn lookup(&self, event: &KeyEvent, keymaps: &Keymaps, table: KeyTable) -> Lookup {
        let depth = self.held.len();
        if depth >= MAX_CHORD_LEN {
            return Lookup::Miss;
        }
        for binding in keymaps.table(table).bindings() {
            let fragments = binding.chord.fragments();
            if fragments.len() <= depth || fragments[..depth] != self.held[..] {
                continue;
            }
            let fragment = fragments[depth];
            if let Some(c) = fragment.matches(event) {
                return if fragments.len() == depth + 1 {
                    Lookup::Leaf(binding.action, fragment, c)
                } else {
                    Lookup::Deeper(fragment, c)
                };
            }
        }
        Lookup::Miss
    }

    fn hold(&mut self, fragment: Fragment, c: char) {
        if fragment == Fragment::Any {
            self.literals.push(c);
        }
        self.typed.push(c);
        self.held.push(fragment);
    }

    fn resolve(&mut self, action: Action) -> Resolved {
        let context = CommandContext {
            count: self.count.max(1),
            explicit_count: self.count > 0,
            literals: std::mem::take(&mut self.literals),
        };
        debug!(action = action.name(), count = context.count, "resolved chord");
        self.reset();
        Resolved { action, context }
    }
}
