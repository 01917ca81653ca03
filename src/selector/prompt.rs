use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};
use std::path::PathBuf;

use tracing::warn;

use crate::selector::{Selection, SelectionError, SelectionKind, Selector};

/// Asks for the selection on a line-oriented terminal.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Returns the trimmed answer, or `None` on EOF or an empty line.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }
}

impl<R: BufRead, W: Write> Selector for TerminalPrompt<R, W> {
    fn select(&mut self) -> Result<Option<Selection>, SelectionError> {
        let Some(answer) = self.ask("Do you want to process a file or a folder? [file/folder]: ")?
        else {
            return Ok(None);
        };
        let Some(kind) = SelectionKind::parse(&answer) else {
            warn!(answer = %answer, "Unrecognised choice");
            return Ok(None);
        };

        let question = match kind {
            SelectionKind::File => "Select a file: ",
            SelectionKind::Folder => "Select a folder: ",
        };
        Ok(self.ask(question)?.map(|path| kind.with_path(PathBuf::from(path))))
    }
}
