//! Console words and the I/O seam.
//!
//! The interpreter's I/O contract is deliberately thin: write a byte
//! string, read one line without its trailing newline. Everything the
//! language can observe goes through the `Console` trait, so a
//! graphical skin (or a test) can swap the standard streams out
//! without touching the operators.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::error::CharmError;
use crate::runner::Runner;
use crate::term::Term;

pub trait Console {
    /// Write a byte string to the output.
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Read one line of bytes, without the trailing newline. None
    /// means the input is exhausted. No encoding is assumed: whatever
    /// bytes arrive are the line.
    fn read_line(&mut self) -> Option<Vec<u8>>;
}

/// The default console: standard output and standard input.
pub struct StdConsole;

impl Console for StdConsole {
    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut out = io::stdout();
        out.write_all(bytes).ok();
        out.flush().ok();
    }

    fn read_line(&mut self) -> Option<Vec<u8>> {
        let mut line = Vec::new();
        match io::stdin().lock().read_until(b'\n', &mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                while matches!(line.last(), Some(b'\n' | b'\r')) {
                    line.pop();
                }
                Some(line)
            }
        }
    }
}

/// A console over in-memory buffers: scripted input lines and a shared
/// output sink the caller keeps a handle to. The tests run programs
/// through this; it doubles as a template for alternative skins.
pub struct BufferConsole {
    input: VecDeque<Vec<u8>>,
    output: Rc<RefCell<Vec<u8>>>,
}

impl BufferConsole {
    pub fn new() -> (BufferConsole, Rc<RefCell<Vec<u8>>>) {
        BufferConsole::with_input(&[])
    }

    pub fn with_input(lines: &[&str]) -> (BufferConsole, Rc<RefCell<Vec<u8>>>) {
        let bytes: Vec<&[u8]> = lines.iter().map(|l| l.as_bytes()).collect();
        BufferConsole::with_byte_input(&bytes)
    }

    /// Input lines as raw bytes, for exercising the no-encoding
    /// contract of `read_line`.
    pub fn with_byte_input(lines: &[&[u8]]) -> (BufferConsole, Rc<RefCell<Vec<u8>>>) {
        let output = Rc::new(RefCell::new(Vec::new()));
        (
            BufferConsole {
                input: lines.iter().map(|l| l.to_vec()).collect(),
                output: Rc::clone(&output),
            },
            output,
        )
    }
}

impl Console for BufferConsole {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.output.borrow_mut().extend_from_slice(bytes);
    }

    fn read_line(&mut self) -> Option<Vec<u8>> {
        self.input.pop_front()
    }
}

impl Runner {
    /// p ( t -- ) Print one term through the canonical printer.
    pub fn f_p(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("p")?;
        self.console.write_bytes(&f1.canonical_bytes());
        Ok(())
    }

    /// pstring ( s -- ) Print a string's raw bytes, no quotes.
    pub fn f_pstring(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("pstring")?;
        match f1 {
            Term::String(s) => {
                self.console.write_bytes(&s);
                Ok(())
            }
            _ => Err(CharmError::TypeError(
                "non string passed to `pstring`".to_string(),
            )),
        }
    }

    /// newline ( -- ) Print a newline.
    pub fn f_newline(&mut self) -> Result<(), CharmError> {
        self.console.write_bytes(b"\n");
        Ok(())
    }

    /// getline ( -- s ) Read one line and push it. Exhausted input
    /// reads as the empty string.
    pub fn f_getline(&mut self) -> Result<(), CharmError> {
        let line = self.console.read_line().unwrap_or_default();
        self.push_term(Term::String(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_console_captures_writes() {
        let (mut console, output) = BufferConsole::new();
        console.write_bytes(b"ab");
        console.write_bytes(b"c");
        assert_eq!(&*output.borrow(), b"abc");
    }

    #[test]
    fn test_buffer_console_serves_lines_in_order() {
        let (mut console, _) = BufferConsole::with_input(&["one", "two"]);
        assert_eq!(console.read_line(), Some(b"one".to_vec()));
        assert_eq!(console.read_line(), Some(b"two".to_vec()));
        assert_eq!(console.read_line(), None);
    }

    #[test]
    fn test_read_line_keeps_arbitrary_bytes() {
        let (mut console, _) = BufferConsole::with_byte_input(&[&[0xff, 0x00, b'a']]);
        assert_eq!(console.read_line(), Some(vec![0xff, 0x00, b'a']));
    }
}
