use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// The output streams a UI writes to, plus whether prompting is possible.
///
/// Interactivity is decided once here and never re-checked.
pub struct Streams {
    pub out: Box<dyn Write>,
    pub err: Box<dyn Write>,
    interactive: bool,
}

impl Streams {
    /// Process stdio. Prompts need a terminal on stdin to read from and on stderr to draw on.
    pub fn stdio() -> Self {
        let interactive = io::stdin().is_terminal() && io::stderr().is_terminal();
        Self {
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
            interactive,
        }
    }

    /// Arbitrary writers with no terminal behind them. Always non-interactive.
    pub fn detached(out: impl Write + 'static, err: impl Write + 'static) -> Self {
        Self {
            out: Box::new(out),
            err: Box::new(err),
            interactive: false,
        }
    }

    /// Replace the normal output stream, keeping the error stream and interactivity.
    pub fn with_output(mut self, out: impl Write + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    /// Redirect normal output to a file, created or truncated.
    pub fn with_output_file(self, path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| {
            Error::internal_io(
                e.to_string(),
                Some(format!("open output target {}", path.display())),
            )
        })?;
        Ok(self.with_output(file))
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}
