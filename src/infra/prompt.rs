//! Terminal answers for reset and restore confirmations.

use std::io::{BufRead, IsTerminal, Write};

use crate::core::mode::Confirm;

/// How a confirmation gets answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Answer without asking.
    Fixed(bool),
    /// Ask on an interactive terminal; otherwise use the fallback.
    Interactive { fallback: bool },
}

impl Confirm for Prompt {
    fn confirm(&mut self, question: &str) -> bool {
        match *self {
            Prompt::Fixed(answer) => answer,
            Prompt::Interactive { fallback } => {
                let stdin = std::io::stdin();
                if !stdin.is_terminal() {
                    return fallback;
                }
                ask(question, &mut stdin.lock()).unwrap_or(fallback)
            }
        }
    }
}

/// `[y/N]` question on stderr; `None` on EOF or read failure.
fn ask(question: &str, input: &mut impl BufRead) -> Option<bool> {
    eprint!("{question} [y/N] ");
    std::io::stderr().flush().ok();

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(is_yes(&line)),
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_answers() {
        assert_eq!(ask("q?", &mut "yes\n".as_bytes()), Some(true));
        assert_eq!(ask("q?", &mut "Y\n".as_bytes()), Some(true));
        assert_eq!(ask("q?", &mut "\n".as_bytes()), Some(false));
        assert_eq!(ask("q?", &mut "".as_bytes()), None);
    }

    #[test]
    fn fixed_never_reads() {
        assert!(Prompt::Fixed(true).confirm("q?"));
        assert!(!Prompt::Fixed(false).confirm("q?"));
    }
}
