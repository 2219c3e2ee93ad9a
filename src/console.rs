//! Line-oriented terminal I/O shared by the menu and the one-shot commands.

use bookshelf_catalog::Book;
use bookshelf_catalog::error::{Error as CatalogError, ErrorKind as CatalogErrorKind};
use std::io::{BufRead, Result, Write};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Print `label`, then read one line without its line ending. Returns
    /// `None` once input is exhausted.
    pub fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Only `y`/`Y` confirms; anything else, including end of input, declines.
    pub fn confirm(&mut self, label: &str) -> Result<bool> {
        Ok(self.prompt(label)?.is_some_and(|answer| answer.trim().eq_ignore_ascii_case("y")))
    }

    pub fn line(&mut self, text: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{text}")
    }

    pub fn heading(&mut self, title: &str) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "--- {title} ---")
    }

    pub fn books<'a>(&mut self, books: impl IntoIterator<Item = &'a Book>) -> Result<()> {
        for book in books {
            writeln!(self.output, "{book}")?;
        }
        Ok(())
    }

    /// Longer form used when asking the user to confirm a removal.
    pub fn book_details(&mut self, book: &Book) -> Result<()> {
        writeln!(self.output, "ID:     {}", book.id)?;
        writeln!(self.output, "Title:  《{}》", book.title)?;
        writeln!(self.output, "Author: {}", book.author)
    }

    /// Present a catalog error. The full error tree goes to the debug log.
    pub fn error(&mut self, err: &CatalogError) -> Result<()> {
        tracing::debug!("{err:?}");
        match &**err {
            CatalogErrorKind::Persistence(path) => writeln!(
                self.output,
                "Could not write {}. The change is kept for this session but is not on disk yet.",
                path.display()
            ),
            kind => writeln!(self.output, "{kind}"),
        }
    }
}
