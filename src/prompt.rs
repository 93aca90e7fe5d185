use std::io::{self, BufRead, Write};

use crate::errors::Result;

/// The interactive boundary: ask a question, print a line.
pub trait Prompt {
    /// Ask a free text question and return the trimmed answer.
    /// End of input reads as an empty answer.
    fn ask(&mut self, question: &str) -> Result<String>;

    fn say(&mut self, line: &str);

    /// Yes/no question; an empty answer means yes.
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(&format!("{} [Y/n] ", question))?;
        Ok(!matches!(answer.to_lowercase().as_str(), "n" | "no"))
    }
}

pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }
}

impl Prompt for Terminal {
    fn ask(&mut self, question: &str) -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", question)?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn say(&mut self, line: &str) {
        println!("{}", line);
    }
}
