//! Interactive review of suggested values

use std::io::{BufRead, Write};

use colored::Colorize;

use crate::errors::{DocSyncError, Result};

/// Source of human decisions in interactive mode
pub trait Prompter {
    /// Present a suggestion for one field
    ///
    /// Returns `Some(suggested)` when accepted, `Some(edited)` when the user
    /// typed a replacement, and `None` when the field should be skipped.
    ///
    /// # Errors
    ///
    /// Returns `Prompt` if the terminal cannot be read or written.
    fn ask(&mut self, node_label: &str, field_key: &str, suggested: &str)
        -> Result<Option<String>>;
}

/// Classified answer to a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Accept,
    Skip,
    Edit(String),
}

impl PromptResponse {
    /// Classify one line of user input
    ///
    /// Classification sees the line with only its terminator removed: an
    /// empty line accepts, `s`/`S` skips, anything else (whitespace
    /// included) is an edit kept verbatim.
    pub fn parse(line: &str) -> Self {
        let text = line.trim_end_matches(['\n', '\r']);
        if text.is_empty() {
            PromptResponse::Accept
        } else if text.eq_ignore_ascii_case("s") {
            PromptResponse::Skip
        } else {
            PromptResponse::Edit(text.to_string())
        }
    }

    pub fn resolve(self, suggested: &str) -> Option<String> {
        match self {
            PromptResponse::Accept => Some(suggested.to_string()),
            PromptResponse::Skip => None,
            PromptResponse::Edit(text) => Some(text),
        }
    }
}

/// Line-oriented prompter over any reader/writer pair
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn write_prompt(&mut self, node_label: &str, field_key: &str, suggested: &str) -> std::io::Result<()> {
        writeln!(
            self.output,
            "{}",
            format!("Suggestion for '{}' on {}:", field_key, node_label).cyan()
        )?;
        writeln!(self.output, "  {}", format!("AI: \"{}\"", suggested).green())?;
        write!(
            self.output,
            "  [Enter] to accept, type to edit, or [s] + [Enter] to skip: "
        )?;
        self.output.flush()
    }
}

impl LinePrompter<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompter reading stdin and writing to stderr
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(
        &mut self,
        node_label: &str,
        field_key: &str,
        suggested: &str,
    ) -> Result<Option<String>> {
        self.write_prompt(node_label, field_key, suggested)
            .map_err(|e| DocSyncError::Prompt {
                message: e.to_string(),
            })?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| DocSyncError::Prompt {
                message: e.to_string(),
            })?;

        if read == 0 {
            tracing::warn!(node = node_label, field = field_key, "prompt input closed; skipping");
            return Ok(None);
        }

        let response = PromptResponse::parse(&line);
        tracing::debug!(node = node_label, field = field_key, response = ?response, "prompt answered");
        Ok(response.resolve(suggested))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask_with(input: &str) -> (Option<String>, String) {
        let mut prompter = LinePrompter::new(Cursor::new(input.to_string()), Vec::new());
        let answer = prompter
            .ask("column 'customers.customer_id'", "description", "Primary key")
            .unwrap();
        let output = String::from_utf8(prompter.into_output()).unwrap();
        (answer, output)
    }

    #[test]
    fn test_empty_line_accepts() {
        let (answer, output) = ask_with("\n");
        assert_eq!(answer.as_deref(), Some("Primary key"));
        assert!(output.contains("Suggestion for 'description' on column 'customers.customer_id':"));
        assert!(output.contains("Primary key"));
    }

    #[test]
    fn test_crlf_empty_line_accepts() {
        assert_eq!(ask_with("\r\n").0.as_deref(), Some("Primary key"));
    }

    #[test]
    fn test_whitespace_is_an_edit() {
        assert_eq!(ask_with("   \r\n").0.as_deref(), Some("   "));
        assert_eq!(ask_with(" s \n").0.as_deref(), Some(" s "));
        assert_eq!(PromptResponse::parse("\t\n"), PromptResponse::Edit("\t".to_string()));
    }

    #[test]
    fn test_skip_either_case() {
        assert_eq!(ask_with("s\n").0, None);
        assert_eq!(ask_with("S\n").0, None);
    }

    #[test]
    fn test_edit_is_verbatim() {
        assert_eq!(ask_with("  Surrogate key \n").0.as_deref(), Some("  Surrogate key "));
    }

    #[test]
    fn test_end_of_input_skips() {
        assert_eq!(ask_with("").0, None);
    }
}
