//! Raw-mode line editor for the interactive loop.
//!
//! Gives the prompt basic editing: cursor movement, backspace,
//! kill-to-end, and recall of the previous line. Enter submits, Escape
//! ends the session. Raw mode is enabled only for the duration of one
//! read, so fatal-error diagnostics always land on a sane terminal.
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::io::{stdout, Write};

const PROMPT: &str = "charm> ";

#[derive(Debug)]
pub struct LineEditor {
    buffer: Vec<char>,
    cursor: usize,
    previous_line: Option<String>,
}

impl LineEditor {
    pub fn new() -> LineEditor {
        LineEditor {
            buffer: Vec::new(),
            cursor: 0,
            previous_line: None,
        }
    }

    fn redraw_from_cursor(&self) {
        print!("\x1b[K");
        for c in &self.buffer[self.cursor..] {
            print!("{}", c);
        }
        for _ in self.cursor..self.buffer.len() {
            print!("\x1b[D");
        }
    }

    /// Read one line. None means the user ended the session (Escape).
    pub fn get_line(&mut self) -> Option<String> {
        self.buffer.clear();
        self.cursor = 0;

        enable_raw_mode().ok()?;
        print!("{}", PROMPT);
        stdout().flush().ok()?;

        let result = loop {
            let Ok(Event::Key(key)) = event::read() else {
                continue;
            };
            match key.code {
                KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    while self.cursor > 0 {
                        self.cursor -= 1;
                        print!("\x1b[D");
                    }
                    stdout().flush().ok()?;
                }
                KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    while self.cursor < self.buffer.len() {
                        self.cursor += 1;
                        print!("\x1b[C");
                    }
                    stdout().flush().ok()?;
                }
                KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.buffer.truncate(self.cursor);
                    print!("\x1b[K");
                    stdout().flush().ok()?;
                }
                KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    print!("\r\n");
                    stdout().flush().ok()?;
                    break None;
                }
                KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
                    self.buffer.insert(self.cursor, c);
                    self.cursor += 1;
                    print!("{}", c);
                    self.redraw_from_cursor();
                    stdout().flush().ok()?;
                }
                KeyCode::Backspace => {
                    if self.cursor > 0 {
                        self.cursor -= 1;
                        self.buffer.remove(self.cursor);
                        print!("\x08");
                        self.redraw_from_cursor();
                        stdout().flush().ok()?;
                    }
                }
                KeyCode::Left => {
                    if self.cursor > 0 {
                        self.cursor -= 1;
                        print!("\x1b[D");
                        stdout().flush().ok()?;
                    }
                }
                KeyCode::Right => {
                    if self.cursor < self.buffer.len() {
                        self.cursor += 1;
                        print!("\x1b[C");
                        stdout().flush().ok()?;
                    }
                }
                KeyCode::Up => {
                    if let Some(prev) = &self.previous_line {
                        print!("\r\x1b[K{}{}", PROMPT, prev);
                        self.buffer = prev.chars().collect();
                        self.cursor = self.buffer.len();
                        stdout().flush().ok()?;
                    }
                }
                KeyCode::Enter => {
                    let line: String = self.buffer.iter().collect();
                    self.previous_line = Some(line.clone());
                    print!("\r\n");
                    stdout().flush().ok()?;
                    break Some(line);
                }
                KeyCode::Esc => {
                    print!("\r\n");
                    stdout().flush().ok()?;
                    break None;
                }
                _ => {}
            }
        };

        disable_raw_mode().ok()?;
        result
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        LineEditor::new()
    }
}
