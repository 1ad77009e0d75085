//! The `:` / `/` input line and the commands it understands

use crate::core::command::Prompt;

/// Line being typed after `:` or `/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub prompt: Prompt,
    text: String,
    /// Cursor as a char index into `text`
    cursor: usize,
}

impl CommandLine {
    pub fn new(prompt: Prompt) -> Self {
        Self {
            prompt,
            text: String::new(),
            cursor: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Prompt prefix followed by the typed text
    pub fn display(&self) -> String {
        format!("{}{}", self.prompt.prefix(), self.text)
    }

    pub fn insert(&mut self, c: char) {
        let byte = self.byte_index(self.cursor);
        self.text.insert(byte, c);
        self.cursor += 1;
    }

    /// Delete before the cursor; `false` once there was nothing left to delete
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return !self.text.is_empty();
        }
        self.cursor -= 1;
        let byte = self.byte_index(self.cursor);
        self.text.remove(byte);
        true
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let byte = self.byte_index(self.cursor);
            self.text.remove(byte);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Full command text as submitted, prompt prefix included for `/`
    pub fn submission(&self) -> String {
        match self.prompt {
            Prompt::Command => self.text.clone(),
            Prompt::Search => format!("/{}", self.text),
        }
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    Empty,
    Write,
    Quit,
    WriteQuit,
    TabNew,
    TabClose,
    TabOnly,
    Retab,
    /// 1-based line number
    GotoLine(usize),
    Search(String),
    Substitute {
        pattern: String,
        replacement: String,
        whole_document: bool,
        global: bool,
    },
    Unknown(String),
}

/// Parse command-line input (without the leading `:`)
pub fn parse_command(input: &str) -> ExCommand {
    let input = input.trim();
    if input.is_empty() {
        return ExCommand::Empty;
    }
    if let Some(term) = input.strip_prefix('/') {
        return ExCommand::Search(term.to_string());
    }
    if let Ok(line) = input.parse::<usize>() {
        return ExCommand::GotoLine(line);
    }
    match input {
        "w" | "write" => return ExCommand::Write,
        "q" | "quit" => return ExCommand::Quit,
        "wq" | "x" => return ExCommand::WriteQuit,
        "tabnew" => return ExCommand::TabNew,
        "tabclose" | "tabc" => return ExCommand::TabClose,
        "tabo" | "tabonly" => return ExCommand::TabOnly,
        "retab" => return ExCommand::Retab,
        _ => {}
    }
    let (whole_document, rest) = match input.strip_prefix('%') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    if let Some(body) = rest.strip_prefix("s/") {
        if let Some(command) = parse_substitute(body, whole_document) {
            return command;
        }
    }
    ExCommand::Unknown(input.to_string())
}

/// `a/b/flags` with `\/` standing for a literal slash
fn parse_substitute(body: &str, whole_document: bool) -> Option<ExCommand> {
    let mut parts = vec![String::new()];
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('/') => parts.last_mut()?.push('/'),
                Some(other) => {
                    let part = parts.last_mut()?;
                    part.push('\\');
                    part.push(other);
                }
                None => parts.last_mut()?.push('\\'),
            },
            '/' => parts.push(String::new()),
            c => parts.last_mut()?.push(c),
        }
    }
    if parts.len() < 2 || parts.len() > 3 || parts[0].is_empty() {
        return None;
    }
    let flags = parts.get(2).cloned().unwrap_or_default();
    if !flags.chars().all(|c| c == 'g') {
        return None;
    }
    Some(ExCommand::Substitute {
        pattern: parts[0].clone(),
        replacement: parts[1].clone(),
        whole_document,
        global: flags.contains('g'),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("w"), ExCommand::Write);
        assert_eq!(parse_command(" wq "), ExCommand::WriteQuit);
        assert_eq!(parse_command("tabo"), ExCommand::TabOnly);
        assert_eq!(parse_command("42"), ExCommand::GotoLine(42));
        assert_eq!(parse_command(""), ExCommand::Empty);
        assert_eq!(parse_command("/foo bar"), ExCommand::Search("foo bar".into()));
        assert_eq!(parse_command("frobnicate"), ExCommand::Unknown("frobnicate".into()));
    }

    #[test]
    fn test_parse_substitute() {
        assert_eq!(
            parse_command("%s/a/b/g"),
            ExCommand::Substitute {
                pattern: "a".into(),
                replacement: "b".into(),
                whole_document: true,
                global: true,
            }
        );
        assert_eq!(
            parse_command(r"s/a\/b/c"),
            ExCommand::Substitute {
                pattern: "a/b".into(),
                replacement: "c".into(),
                whole_document: false,
                global: false,
            }
        );
        assert!(matches!(parse_command("%s//b/g"), ExCommand::Unknown(_)));
        assert!(matches!(parse_command("%s/a/b/q"), ExCommand::Unknown(_)));
    }

    #[test]
    fn test_line_editing() {
        let mut line = CommandLine::new(Prompt::Search);
        for c in "hélo".chars() {
            line.insert(c);
        }
        line.move_left();
        line.insert('l');
        assert_eq!(line.text(), "héllo");
        assert_eq!(line.display(), "/héllo");
        assert_eq!(line.submission(), "/héllo");
        line.move_home();
        line.delete();
        assert_eq!(line.text(), "éllo");
        line.move_end();
        assert!(line.backspace());
        assert_eq!(line.text(), "éll");
    }

    #[test]
    fn test_backspace_on_empty_line_cancels() {
        let mut line = CommandLine::new(Prompt::Command);
        assert!(!line.backspace());
        line.insert('q');
        assert!(line.backspace());
        assert!(!line.backspace());
    }
}
