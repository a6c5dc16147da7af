//! Line-oriented terminal I/O.
//!
//! Input comes either from a `rustyline` editor (interactive terminals) or
//! from any [`BufRead`] (piped input and tests). Output goes to any [`Write`].

use std::io::{BufRead, Write};

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::{IoContext, Result, ShellError};

enum Input<R> {
    Lines(R),
    Editor(Box<DefaultEditor>),
}

pub struct Console<R, W> {
    input: Input<R>,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Console reading plain lines from `input`.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Input::Lines(input),
            output,
        }
    }

    /// Console reading through a line editor with history.
    pub fn interactive(editor: DefaultEditor, output: W) -> Self {
        Self {
            input: Input::Editor(Box::new(editor)),
            output,
        }
    }

    /// Give back the output sink (used by tests to inspect the transcript).
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print one line.
    pub fn say(&mut self, line: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", line.as_ref()).io_context(|| "Failed to write output".into())
    }

    /// Show `label`, then read one line without its line ending.
    ///
    /// Bytes that are not UTF-8 are replaced rather than rejected. Fails with
    /// [`ShellError::InputClosed`] at end of input or on Ctrl-C/Ctrl-D.
    fn read_prompted(&mut self, label: &str) -> Result<String> {
        match &mut self.input {
            Input::Lines(input) => {
                write!(self.output, "{label}").io_context(|| "Failed to write output".into())?;
                self.output
                    .flush()
                    .io_context(|| "Failed to flush output".into())?;

                let mut buf = Vec::new();
                let read = input
                    .read_until(b'\n', &mut buf)
                    .io_context(|| "Failed to read input".into())?;
                if read == 0 {
                    return Err(ShellError::InputClosed);
                }
                let mut line = String::from_utf8_lossy(&buf).into_owned();
                while line.ends_with(['\n', '\r']) {
                    line.pop();
                }
                Ok(line)
            }
            Input::Editor(editor) => {
                self.output
                    .flush()
                    .io_context(|| "Failed to flush output".into())?;
                match editor.readline(label) {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            let _ = editor.add_history_entry(line.as_str());
                        }
                        Ok(line)
                    }
                    Err(ReadlineError::Eof | ReadlineError::Interrupted) => {
                        Err(ShellError::InputClosed)
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    /// Read one line without its line ending.
    pub fn read_line(&mut self) -> Result<String> {
        self.read_prompted("")
    }

    /// Show `label` and return the trimmed answer.
    pub fn prompt(&mut self, label: &str) -> Result<String> {
        Ok(self.read_prompted(label)?.trim().to_owned())
    }

    /// Ask a yes/no question; only `y` (any case) counts as yes.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.prompt(&format!("{question} (y/n): "))?;
        Ok(answer.eq_ignore_ascii_case("y"))
    }

    /// Ask for a number; `None` when the answer is not a number.
    pub fn prompt_number(&mut self, label: &str) -> Result<Option<usize>> {
        Ok(self.prompt(label)?.parse().ok())
    }

    /// Collect non-blank lines until a blank line follows at least one of them.
    ///
    /// Lines are trimmed when `trim` is set, otherwise kept as typed.
    pub fn read_block(&mut self, trim: bool) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        loop {
            let line = self.read_line()?;
            if line.trim().is_empty() {
                if lines.is_empty() {
                    continue;
                }
                return Ok(lines);
            }
            lines.push(if trim { line.trim().to_owned() } else { line });
        }
    }
}
