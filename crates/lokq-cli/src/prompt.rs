//! Terminal-backed prompter: plain stdin/stdout for free text, an `fzf`
//! child process for fuzzy picking.

use lokq_core::builder::Prompter;
use lokq_core::error::QueryError;
use std::io::{self, Write};
use std::process::{Command, Stdio};

pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn say(&mut self, line: &str) {
        println!("{line}");
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, QueryError> {
        if !prompt.is_empty() {
            print!("{prompt}");
            io::stdout().flush()?;
        }
        let mut buf = String::new();
        io::stdin().read_line(&mut buf)?;
        Ok(buf.trim().to_string())
    }

    /// Feed the candidates to fzf newline-separated and take its single
    /// output line. Cancellation (non-zero exit) and empty output both count
    /// as no selection; fzf draws its UI on the inherited stderr.
    fn pick_one(&mut self, prompt: &str, candidates: &[String]) -> Result<String, QueryError> {
        if candidates.is_empty() {
            return Err(QueryError::NoCandidates(prompt.to_string()));
        }

        let mut child = Command::new("fzf")
            .args(["--prompt", prompt])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // fzf may exit with input still unread (quick cancel); the exit
            // status decides the outcome, not the broken pipe.
            match stdin.write_all(candidates.join("\n").as_bytes()) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e.into()),
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(QueryError::NoSelection);
        }

        let choice = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if choice.is_empty() {
            return Err(QueryError::NoSelection);
        }
        Ok(choice)
    }
}
