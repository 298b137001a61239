use std::fs;
use std::io::{self, BufRead, IsTerminal, StdinLock, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Returns `true` if stdin is a terminal (interactive).
pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Line-oriented command input from stdin.
///
/// The prompt is only written when stdin is a terminal, so piped command
/// scripts produce clean output.
pub struct Console {
    input: StdinLock<'static>,
    show_prompt: bool,
    line: String,
}

impl Console {
    pub fn new() -> Self {
        Self {
            input: io::stdin().lock(),
            show_prompt: stdin_is_tty(),
            line: String::new(),
        }
    }

    /// Next trimmed line, or `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<&str>> {
        if self.show_prompt {
            let mut stderr = io::stderr().lock();
            let _ = write!(stderr, "{prompt}");
            let _ = stderr.flush();
        }
        self.line.clear();
        let n = self
            .input
            .read_line(&mut self.line)
            .context("Failed to read a command from stdin")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(self.line.trim()))
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_console_starts_with_empty_line() {
        let console = Console::default();
        assert!(console.line.is_empty());
        assert_eq!(console.show_prompt, stdin_is_tty());
    }
}
