//! Console dialogue.
//!
//! All interactive input flows through [`prompt`]: empty answers re-prompt,
//! any non-empty answer is accepted as-is and only fails downstream. Menus
//! and status messages go to stdout; operational logging stays on `tracing`.

use anyhow::{Result, bail};
use std::io::{self, BufRead, Write};

/// Ask `message` on stdout and read one non-empty line from stdin.
pub fn prompt(message: &str) -> Result<String> {
    let stdin = io::stdin();
    prompt_from(&mut stdin.lock(), &mut io::stdout(), message)
}

/// [`prompt`] over explicit streams, so dialogue is testable.
///
/// Re-prompts until a non-empty line arrives; a closed input stream is an
/// error rather than an infinite loop.
pub fn prompt_from<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> Result<String> {
    loop {
        write!(output, "{message}")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input stream closed while waiting for {message:?}");
        }
        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

/// Print a message for the user.
pub fn output(message: &str) {
    println!("{message}");
}
