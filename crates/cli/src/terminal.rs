//! Terminal implementation of the prompt surface.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};

use runtime::{HostError, Prompt};

/// Asks questions on a line-oriented terminal.
pub struct TerminalPrompt<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stderr> {
    /// Read answers from stdin; write prompts and alerts to stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output.into_inner()
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn confirm(&self, title: &str, message: &str) -> Result<bool, HostError> {
        let mut out = self.output.borrow_mut();
        writeln!(out, "== {title} ==\n{message}\n")?;
        write!(out, "Proceed? [y/N] ")?;
        out.flush()?;

        let mut line = String::new();
        if self.input.borrow_mut().read_line(&mut line)? == 0 {
            // EOF
            return Ok(false);
        }
        Ok(is_yes(&line))
    }

    fn alert(&self, title: &str, message: &str) {
        let mut out = self.output.borrow_mut();
        // Nowhere left to report a failing terminal.
        let _ = writeln!(out, "== {title} ==\n{message}\n");
        let _ = out.flush();
    }
}
