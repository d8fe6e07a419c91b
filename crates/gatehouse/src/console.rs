//! Interactive I/O used while logging in.
//!
//! The bootstrap only ever needs two things from the terminal: read a password
//! without showing it, and tell the user a login was rejected. Both go to
//! stderr so a task's stdout stays clean.

use crate::secret::Secret;
use console::{Key, Term};
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal};

const MASK: char = '*';

/// Prompt shown when asking for a password, with the username as a hint.
pub fn password_prompt(username: &str) -> String {
    format!("Password [{}]: ", username)
}

pub trait Console {
    /// Show `prompt` and read one line of secret input.
    fn read_secret(&mut self, prompt: &str) -> io::Result<Secret>;

    fn warn(&mut self, message: &str);
}

/// Terminal console. Echoes `*` for each typed character when attached to a
/// terminal and reads a plain line from stdin otherwise.
pub struct TermConsole {
    term: Term,
}

impl Default for TermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl TermConsole {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn read_masked(&self) -> io::Result<String> {
        let mut input = String::new();
        loop {
            match self.term.read_key()? {
                Key::Enter => {
                    self.term.write_line("")?;
                    return Ok(input);
                }
                Key::Backspace => {
                    if input.pop().is_some() {
                        self.term.clear_chars(1)?;
                    }
                }
                Key::Escape | Key::Char('\u{3}') => {
                    self.term.write_line("")?;
                    return Err(io::Error::new(
                        io::ErrorKind::Interrupted,
                        "password entry cancelled",
                    ));
                }
                Key::Char(c) if !c.is_control() => {
                    input.push(c);
                    self.term.write_str(&MASK.to_string())?;
                }
                _ => {}
            }
        }
    }

    fn read_piped() -> io::Result<String> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no password available on stdin",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Console for TermConsole {
    fn read_secret(&mut self, prompt: &str) -> io::Result<Secret> {
        self.term.write_str(prompt)?;
        let value = if self.term.is_term() && io::stdin().is_terminal() {
            self.read_masked()?
        } else {
            let value = Self::read_piped()?;
            self.term.write_line("")?;
            value
        };
        Ok(Secret::from(value))
    }

    fn warn(&mut self, message: &str) {
        let _ = self.term.write_line(message);
    }
}

/// Console that answers prompts from a fixed list.
///
/// Useful for tests and for driving tasks non-interactively. Once the answers
/// run out, `read_secret` fails with `UnexpectedEof`.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<Secret>,
    pub prompts: Vec<String>,
    pub warnings: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Secret::new).collect(),
            prompts: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.len()
    }
}

impl Console for ScriptedConsole {
    fn read_secret(&mut self, prompt: &str) -> io::Result<Secret> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left")
        })
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_prompt_shows_username() {
        assert_eq!(password_prompt("admin"), "Password [admin]: ");
    }

    #[test]
    fn test_scripted_answers_in_order() {
        let mut console = ScriptedConsole::new(["first", "second"]);
        assert_eq!(console.read_secret("a: ").unwrap().expose(), "first");
        assert_eq!(console.read_secret("b: ").unwrap().expose(), "second");
        assert_eq!(console.prompts, vec!["a: ", "b: "]);
    }

    #[test]
    fn test_scripted_exhaustion_is_eof() {
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let err = console.read_secret("Password: ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(console.prompt_count(), 1);
    }

    #[test]
    fn test_scripted_records_warnings() {
        let mut console = ScriptedConsole::default();
        console.warn("careful");
        assert_eq!(console.warnings, vec!["careful"]);
    }
}
