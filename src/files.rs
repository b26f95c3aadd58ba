// Line-oriented input sources for the front-end.
//
// The interactive loop and `--file` execution both consume one source
// line at a time; this is the switch between plain stdin, the raw-mode
// line editor, and a buffered script file.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::internals::tui::LineEditor;

pub enum Input {
    Stdin,
    Editor(LineEditor),
    Script(BufReader<File>),
}

impl Input {
    pub fn open_script(path: &Path) -> io::Result<Input> {
        Ok(Input::Script(BufReader::new(File::open(path)?)))
    }

    /// Whether the front-end should print its own prompt before
    /// reading. The editor draws one itself.
    pub fn wants_prompt(&self) -> bool {
        matches!(self, Input::Stdin)
    }

    /// The next source line, without its trailing newline. None means
    /// the source is exhausted (or the editor session ended).
    pub fn get_line(&mut self) -> Option<String> {
        match self {
            Input::Editor(editor) => editor.get_line(),
            Input::Stdin => read_trimmed_line(&mut io::stdin().lock()),
            Input::Script(reader) => read_trimmed_line(reader),
        }
    }
}

// Source is read as bytes and rendered lossily: a stray non-UTF-8 byte
// mangles one token instead of ending the whole script early.
fn read_trimmed_line(reader: &mut impl BufRead) -> Option<String> {
    let mut line = Vec::new();
    match reader.read_until(b'\n', &mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            while matches!(line.last(), Some(b'\n' | b'\r')) {
                line.pop();
            }
            Some(String::from_utf8_lossy(&line).into_owned())
        }
    }
}
