//! Line-oriented prompt/response boundary.
//!
//! Generic over reader and writer so interactive routines can be driven by
//! canned input in tests.

use crate::error::ConsoleError;
use std::io::{self, BufRead, Write};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes `prompt` and reads one line, without its line terminator.
    /// Bytes that are not valid UTF-8 are replaced, so they fail validation
    /// downstream instead of ending the session.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InputClosed`] at end of input.
    pub fn ask(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Err(ConsoleError::InputClosed);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Asks a yes/no question; only "yes" (any case) counts as yes.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool, ConsoleError> {
        let answer = self.ask(prompt)?;
        Ok(answer.trim().eq_ignore_ascii_case("yes"))
    }

    pub fn say(&mut self, line: &str) -> Result<(), ConsoleError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Direct access to the output stream for multi-line renderers.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_ask_strips_line_ending() {
        let mut c = console("Chicago\r\nnext\n");
        assert_eq!(c.ask("city? ").unwrap(), "Chicago");
        assert_eq!(c.ask("again? ").unwrap(), "next");
        let out = String::from_utf8(c.into_output()).unwrap();
        assert_eq!(out, "city? again? ");
    }

    #[test]
    fn test_ask_at_eof_is_input_closed() {
        let mut c = console("");
        assert!(matches!(c.ask("> "), Err(ConsoleError::InputClosed)));
    }

    #[test]
    fn test_confirm_only_accepts_yes() {
        let mut c = console("YES\ny\nno\n yes \n");
        assert!(c.confirm("").unwrap());
        assert!(!c.confirm("").unwrap());
        assert!(!c.confirm("").unwrap());
        assert!(c.confirm("").unwrap());
    }

    #[test]
    fn test_invalid_utf8_line_is_replaced() {
        let mut c = Console::new(Cursor::new(b"\xff\xfe\r\nchicago\n".to_vec()), Vec::new());
        assert_eq!(c.ask("").unwrap(), "\u{FFFD}\u{FFFD}");
        assert_eq!(c.ask("").unwrap(), "chicago");
    }

    #[test]
    fn test_last_line_without_newline() {
        let mut c = console("washington");
        assert_eq!(c.ask("").unwrap(), "washington");
        assert!(matches!(c.ask(""), Err(ConsoleError::InputClosed)));
    }
}
