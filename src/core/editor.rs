//! This module defines `Editor`, one editing session: the buffer and its
//! cursor, the register, the chord dispatcher, and the highlight cache of
//! the loaded text source.

use std::ops::RangeInclusive;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::core::buffer::Buffer;
use crate::core::command::{Action, CommandContext};
use crate::core::command_line::{CommandLine, parse_command};
use crate::core::commands::{self, navigation::JumpList};
use crate::core::cursor::Cursor;
use crate::core::cursor_memory::CursorMemory;
use crate::core::definition::DefinitionLocators;
use crate::core::dispatcher::{ChordDispatcher, DispatchResult, Resolved};
use crate::core::error::{EngineError, GrammarError};
use crate::core::grammar::{Grammar, GrammarRegistry};
use crate::core::input::{Key, KeyEvent};
use crate::core::insert;
use crate::core::keymap::Keymaps;
use crate::core::mode::Mode;
use crate::core::motion::Motion;
use crate::core::register::Register;
use crate::core::search::SearchState;
use crate::core::syntax::{self, HighlightCache, HighlightSpan, HighlightState};
use crate::core::window::Window;

/// Requests the host has to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    Save,
    /// Leave the editing context (Escape in Normal mode, `:q`)
    ExitContext,
    /// Switch to page n (1-based)
    SwitchPage(u8),
    NextPage,
    PreviousPage,
    NewPage,
    ClosePage,
    CloseOtherPages,
    ExecuteCurrent,
    ClearOutput,
    ZoomIn,
    ZoomOut,
    /// Point the user at a line (1-based) that failed to parse
    ReportLineError(usize),
}

/// What one key event did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// The key meant something to the editor
    pub handled: bool,
    /// New mode, when the event changed it
    pub mode_changed: Option<Mode>,
    pub host_actions: Vec<HostAction>,
    /// Lines whose highlighting must be redrawn
    pub changed_lines: Option<RangeInclusive<usize>>,
    pub message: Option<String>,
    pub buffer_changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    /// Spaces per indent unit
    pub tab_width: usize,
    pub jump_lines: usize,
    pub scroll_lines: usize,
}

impl EditorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tab_width: config.tab_width().max(1),
            jump_lines: config.jump_lines().max(1),
            scroll_lines: config.scroll_lines().max(1),
        }
    }

    pub fn indent_unit(&self) -> String {
        " ".repeat(self.tab_width)
    }
}

/// An editing session over one text source at a time
pub struct Editor {
    pub(crate) buffer: Buffer,
    pub(crate) window: Window,
    /// Survives source swaps
    pub(crate) register: Register,
    pub(crate) mode: Mode,
    pub(crate) settings: EditorSettings,
    pub(crate) search: SearchState,
    pub(crate) jumps: JumpList,
    pub(crate) command_line: Option<CommandLine>,
    pub(crate) grammar: Arc<Grammar>,
    pub(crate) locators: DefinitionLocators,
    /// Accumulates the result of the event being handled
    pub(crate) outcome: EventOutcome,
    dispatcher: ChordDispatcher,
    keymaps: Keymaps,
    grammars: Arc<GrammarRegistry>,
    highlight: HighlightCache,
    cursor_memory: CursorMemory,
    source_id: Option<String>,
    /// The edit group opened by an insert-entering command is still open
    insert_group_open: bool,
}

impl Editor {
    pub fn new(config: &Config) -> Result<Self, EngineError> {
        let grammars = Arc::new(GrammarRegistry::builtin()?);
        Self::with_grammars(config, grammars)
    }

    /// Session sharing an already built grammar registry
    pub fn with_grammars(config: &Config, grammars: Arc<GrammarRegistry>) -> Result<Self, EngineError> {
        let grammar = grammars.get(&config.grammar())?;
        let mut editor = Self {
            buffer: Buffer::new(),
            window: Window::new(config.view_height()),
            register: Register::new(),
            mode: Mode::Normal,
            settings: EditorSettings::from_config(config),
            search: SearchState::new(),
            jumps: JumpList::default(),
            command_line: None,
            grammar,
            locators: DefinitionLocators::builtin(),
            outcome: EventOutcome::default(),
            dispatcher: ChordDispatcher::new(config.dispatcher_settings()),
            keymaps: config.keymaps.clone(),
            grammars,
            highlight: HighlightCache::new(),
            cursor_memory: CursorMemory::new(),
            source_id: None,
            insert_group_open: false,
        };
        editor.highlight.rebuild(&editor.grammar, &editor.buffer);
        Ok(editor)
    }

    pub fn with_text(config: &Config, text: &str) -> Result<Self, EngineError> {
        let mut editor = Self::new(config)?;
        editor.replace_document(text);
        Ok(editor)
    }

    // ==================== Accessors ====================

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn cursor(&self) -> Cursor {
        self.window.cursor
    }

    /// Cursor line and column
    pub fn cursor_position(&self) -> (usize, usize) {
        self.window.line_col(&self.buffer)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn register(&self) -> &Register {
        &self.register
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Keys of the chord being typed, for a status line
    pub fn pending_keys(&self) -> String {
        self.dispatcher.pending()
    }

    pub fn search_matches(&self) -> &[std::ops::Range<usize>] {
        self.search.matches()
    }

    pub fn scroll_offset(&self) -> usize {
        self.window.scroll_offset
    }

    /// Visible command line, prefix included
    pub fn command_line_text(&self) -> Option<String> {
        self.command_line.as_ref().map(CommandLine::display)
    }

    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    pub fn cursor_memory(&self) -> &CursorMemory {
        &self.cursor_memory
    }

    pub fn locators_mut(&mut self) -> &mut DefinitionLocators {
        &mut self.locators
    }

    // ==================== Highlighting ====================

    pub fn set_grammar(&mut self, name: &str) -> Result<(), GrammarError> {
        self.grammar = self.grammars.get(name)?;
        debug!(grammar = %self.grammar.name, "grammar set");
        self.highlight.rebuild(&self.grammar, &self.buffer);
        Ok(())
    }

    /// Spans of one line, using the cached carry state of the line above
    pub fn highlight_line(&self, line: usize) -> Vec<HighlightSpan> {
        let text = self.buffer.line_text(line);
        syntax::highlight_line(&self.grammar, &text, self.highlight.state_before(line)).0
    }

    /// Carry state leaving `line`
    pub fn line_state(&self, line: usize) -> HighlightState {
        self.highlight.state_after(line)
    }

    // ==================== Sources ====================

    /// Swap in another text source, remembering where the cursor was in
    /// the current one
    pub fn load_source(&mut self, identifier: &str, text: &str) {
        if let Some(old) = self.source_id.take() {
            self.cursor_memory.remember(&old, self.window.position());
        }
        self.replace_document(text);
        if let Some(offset) = self.cursor_memory.recall(identifier) {
            self.window.set_cursor(&self.buffer, offset);
            self.window.center_on_cursor(&self.buffer);
        }
        debug!(source = identifier, "source loaded");
        self.source_id = Some(identifier.to_string());
    }

    fn replace_document(&mut self, text: &str) {
        self.buffer = Buffer::from_string(text);
        self.window = Window::new(self.window.height);
        self.mode = Mode::Normal;
        self.insert_group_open = false;
        self.command_line = None;
        self.dispatcher.reset();
        self.jumps.clear();
        self.search.refresh(&self.buffer);
        self.highlight.rebuild(&self.grammar, &self.buffer);
    }

    // ==================== Events ====================

    pub fn handle_key(&mut self, event: KeyEvent) -> EventOutcome {
        self.outcome = EventOutcome::default();
        let mode_before = self.mode;
        let handled = self.route(&event);
        self.finish_event(mode_before, handled)
    }

    /// Run a command line as if typed after `:`
    pub fn submit_command_line(&mut self, input: &str) -> EventOutcome {
        self.outcome = EventOutcome::default();
        let mode_before = self.mode;
        self.command_line = None;
        self.execute_command_line(input);
        self.finish_event(mode_before, true)
    }

    /// Run one action directly, outside of chord dispatch
    pub fn execute(&mut self, action: Action, context: &CommandContext) -> EventOutcome {
        self.outcome = EventOutcome::default();
        let mode_before = self.mode;
        self.run(action, context);
        self.finish_event(mode_before, true)
    }

    fn route(&mut self, event: &KeyEvent) -> bool {
        if self.global_key(event) {
            return true;
        }
        if self.command_line.is_some() {
            return self.command_line_key(event);
        }
        let is_escape = event.key == Key::Esc
            || (self.mode != Mode::Normal && event.is_ctrl_char('['));
        if is_escape {
            self.escape();
            return true;
        }
        if self.mode == Mode::Insert {
            return insert::handle_key(self, event);
        }
        self.dispatch(event)
    }

    fn global_key(&mut self, event: &KeyEvent) -> bool {
        let mods = event.modifiers;
        let action = match event.key {
            Key::Enter if mods.ctrl => HostAction::ExecuteCurrent,
            Key::Char('m') | Key::Char('M') if mods.ctrl && !mods.alt => HostAction::ExecuteCurrent,
            Key::Backspace if mods.ctrl => HostAction::ClearOutput,
            Key::Char(c) if mods.alt && !mods.ctrl => match c.to_digit(10) {
                Some(n @ 1..=9) => HostAction::SwitchPage(n as u8),
                _ => return false,
            },
            _ => return false,
        };
        self.request(action);
        true
    }

    fn escape(&mut self) {
        self.dispatcher.reset();
        if self.mode == Mode::Normal {
            self.request(HostAction::ExitContext);
            return;
        }
        if let Err(err) = self.strip_trailing_whitespace() {
            warn!(error = %err, "could not strip trailing whitespace");
        }
        self.close_insert_group();
        self.set_mode(Mode::Normal);
    }

    fn strip_trailing_whitespace(&mut self) -> Result<(), crate::core::error::EditError> {
        let line = self.buffer.line_of(self.window.position());
        let text = self.buffer.line_text(line);
        let kept = text.trim_end().chars().count();
        let total = text.chars().count();
        if kept < total {
            let start = self.buffer.line_start(line);
            self.buffer.delete(start + kept..start + total)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, event: &KeyEvent) -> bool {
        if let Some(motion) = navigation_key(event.key) {
            self.dispatcher.reset();
            self.run(Action::Move(motion), &CommandContext::default());
            return true;
        }
        match self.dispatcher.feed(event, &self.keymaps, self.mode) {
            DispatchResult::Pending | DispatchResult::LeaderArmed => true,
            DispatchResult::Resolved(Resolved { action, context }) => {
                self.run(action, &context);
                true
            }
            DispatchResult::Unresolved => false,
        }
    }

    fn command_line_key(&mut self, event: &KeyEvent) -> bool {
        let Some(line) = self.command_line.as_mut() else {
            return false;
        };
        match event.key {
            Key::Esc => self.command_line = None,
            Key::Enter => {
                let input = line.submission();
                self.command_line = None;
                self.execute_command_line(&input);
            }
            Key::Backspace => {
                if !line.backspace() {
                    self.command_line = None;
                }
            }
            Key::Delete => line.delete(),
            Key::Left => line.move_left(),
            Key::Right => line.move_right(),
            Key::Home => line.move_home(),
            Key::End => line.move_end(),
            _ if event.is_ctrl_char('[') => self.command_line = None,
            _ => match event.typed_char() {
                Some(c) => line.insert(c),
                None => return false,
            },
        }
        true
    }

    fn execute_command_line(&mut self, input: &str) {
        let command = parse_command(input);
        debug!(?command, "command line");
        self.buffer.begin_group("command-line");
        match commands::ex::execute(self, command) {
            Ok(()) => self.buffer.commit_group(),
            Err(err) => {
                warn!(input, error = %err, "command line failed, rolling back");
                self.buffer.rollback_group();
                self.message(format!("{}: {}", input, err));
            }
        }
    }

    /// Run one action inside its own edit group; a failure restores the
    /// buffer, cursor, register and mode it started from
    fn run(&mut self, action: Action, context: &CommandContext) {
        let window = self.window.clone();
        let register = self.register.clone();
        let mode = self.mode;

        self.buffer.begin_group(action.name());
        match commands::execute(self, action, context) {
            Ok(()) => {
                if self.mode == Mode::Insert && !self.insert_group_open {
                    self.insert_group_open = true;
                } else {
                    self.buffer.commit_group();
                }
            }
            Err(err) => {
                warn!(action = action.name(), error = %err, "command failed, rolling back");
                self.buffer.rollback_group();
                self.window = window;
                self.register = register;
                self.mode = mode;
                self.message(format!("{}: {}", action.name(), err));
            }
        }
    }

    fn finish_event(&mut self, mode_before: Mode, handled: bool) -> EventOutcome {
        self.window.ensure_cursor_valid(&self.buffer);
        self.window.ensure_cursor_visible(&self.buffer);
        if let Some(dirty) = self.buffer.take_dirty() {
            let lines = self.highlight.update(&self.grammar, &self.buffer, dirty);
            self.outcome.changed_lines = Some(lines);
            self.outcome.buffer_changed = true;
        }
        if self.search.is_stale(&self.buffer) {
            self.search.refresh(&self.buffer);
        }
        if self.mode != mode_before {
            self.outcome.mode_changed = Some(self.mode);
        }
        self.outcome.handled |= handled;
        std::mem::take(&mut self.outcome)
    }

    // ==================== Command helpers ====================

    pub(crate) fn request(&mut self, action: HostAction) {
        debug!(?action, "host action");
        self.outcome.host_actions.push(action);
    }

    pub(crate) fn message(&mut self, message: impl Into<String>) {
        self.outcome.message = Some(message.into());
    }

    pub(crate) fn position(&self) -> usize {
        self.window.position()
    }

    pub(crate) fn current_line(&self) -> usize {
        self.buffer.line_of(self.window.position())
    }

    /// Place the cursor, dropping any selection
    pub(crate) fn set_cursor(&mut self, pos: usize) {
        self.window.set_cursor(&self.buffer, pos);
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        if mode.is_visual() {
            if !self.mode.is_visual() {
                self.window.cursor.collapse();
            }
        } else {
            self.window.cursor.collapse();
        }
        debug!(from = %self.mode, to = %mode, "mode change");
        self.mode = mode;
    }

    pub(crate) fn open_command_line(&mut self, line: CommandLine) {
        self.command_line = Some(line);
    }

    fn close_insert_group(&mut self) {
        if self.insert_group_open {
            self.buffer.commit_group();
            self.insert_group_open = false;
        }
    }
}

/// Motions for keys that are not part of any chord table
fn navigation_key(key: Key) -> Option<Motion> {
    match key {
        Key::Left => Some(Motion::Left),
        Key::Right => Some(Motion::Right),
        Key::Up => Some(Motion::Up),
        Key::Down => Some(Motion::Down),
        Key::Home => Some(Motion::LineStart),
        Key::End => Some(Motion::LineEnd),
        Key::PageDown => Some(Motion::JumpDown),
        Key::PageUp => Some(Motion::JumpUp),
        _ => None,
    }
}
