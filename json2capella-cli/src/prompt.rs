//! Interactive conflict resolution.

use json2capella_model::{Conflict, ConflictResolver, Resolution};
use std::io::{self, BufRead, Write};

/// Asks on `output` and reads the answer from `input`, one line per conflict.
///
/// Unrecognized answers are asked again; end of input aborts the import.
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn ask(&mut self, conflict: &Conflict<'_>) -> io::Result<Resolution> {
        writeln!(
            self.output,
            "{} {} already exists (incoming {}).",
            conflict.existing.kind(),
            conflict.path,
            conflict.incoming.kind()
        )?;
        loop {
            write!(
                self.output,
                "Overwrite? [y]es / [Y]es to all / [n]o / [N]o to all / [a]bort: "
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Resolution::Abort);
            }
            match line.trim() {
                "y" => return Ok(Resolution::Replace),
                "Y" => return Ok(Resolution::ReplaceAll),
                "n" => return Ok(Resolution::Skip),
                "N" => return Ok(Resolution::SkipAll),
                "a" | "A" => return Ok(Resolution::Abort),
                other => writeln!(self.output, "Unrecognized answer '{other}'.")?,
            }
        }
    }
}

impl PromptResolver<io::StdinLock<'static>, io::Stderr> {
    /// Prompts on the terminal.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> ConflictResolver for PromptResolver<R, W> {
    fn resolve(&mut self, conflict: &Conflict<'_>) -> Resolution {
        self.ask(conflict).unwrap_or(Resolution::Abort)
    }
}
