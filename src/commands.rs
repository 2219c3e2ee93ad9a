//! One-shot commands. Unlike the menu, any catalog error ends the command.

use crate::cli::Command;
use crate::console::Console;
use crate::error::{Error, ErrorKind, Result};
use crate::menu;
use bookshelf_catalog::Manager;
use bookshelf_catalog::error::{Error as CatalogError, ErrorKind as CatalogErrorKind};
use exn::ResultExt;
use std::io::{BufRead, Write};

pub fn run<R: BufRead, W: Write>(command: Command, manager: &mut Manager, console: &mut Console<R, W>) -> Result<()> {
    match command {
        Command::Menu => menu::run(manager, console).or_raise(|| ErrorKind::Console),
        Command::Add { title, author } => add(manager, console, &title, &author),
        Command::Remove { id, yes } => remove(manager, console, id, yes),
        Command::List => list(manager, console),
        Command::Search { keyword } => search(manager, console, &keyword),
    }
}

fn add<R: BufRead, W: Write>(manager: &mut Manager, console: &mut Console<R, W>, title: &str, author: &str) -> Result<()> {
    let book = manager.add(title, author).map_err(catalog)?;
    console.line(format!("Saved {book}")).or_raise(|| ErrorKind::Console)
}

fn remove<R: BufRead, W: Write>(manager: &mut Manager, console: &mut Console<R, W>, id: u32, yes: bool) -> Result<()> {
    let book = manager
        .find(id)
        .ok_or_else(|| catalog(exn::Exn::from(CatalogErrorKind::NotFound(id))))?;
    if !yes {
        console.book_details(book).or_raise(|| ErrorKind::Console)?;
        let confirmed = console
            .confirm("Remove this book? Enter Y to confirm, anything else to cancel: ")
            .or_raise(|| ErrorKind::Console)?;
        if !confirmed {
            return console.line("Cancelled.").or_raise(|| ErrorKind::Console);
        }
    }
    let book = manager.remove(id).map_err(catalog)?;
    console.line(format!("Removed {book}")).or_raise(|| ErrorKind::Console)
}

fn list<R: BufRead, W: Write>(manager: &Manager, console: &mut Console<R, W>) -> Result<()> {
    match manager.is_empty() {
        true => console.line("No books yet."),
        false => console.books(manager.list()),
    }
    .or_raise(|| ErrorKind::Console)
}

fn search<R: BufRead, W: Write>(manager: &Manager, console: &mut Console<R, W>, keyword: &str) -> Result<()> {
    let results = manager.search(keyword);
    match results.is_empty() {
        true => console.line(format!("No books match '{keyword}'.")),
        false => console.books(results),
    }
    .or_raise(|| ErrorKind::Console)
}

fn catalog(err: CatalogError) -> Error {
    tracing::debug!("{err:?}");
    exn::Exn::from(ErrorKind::Catalog(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_catalog::{Book, CatalogStore};
    use bookshelf_storage::backend::MockBackend;
    use rstest::rstest;
    use std::io::Cursor;
    use std::sync::Arc;

    const SHELF: &str = r#"[
        {"id": 1, "title": "Dune", "author": "Frank Herbert"},
        {"id": 2, "title": "1984", "author": "George Orwell"}
    ]"#;

    struct Harness {
        backend: Arc<MockBackend>,
        manager: Manager,
    }
    impl Harness {
        fn new() -> Self {
            let backend = Arc::new(MockBackend::with_files([("books.json", SHELF)]));
            let (manager, _) = Manager::initialize(CatalogStore::new(backend.clone()), "books.json");
            Self { backend, manager }
        }

        fn run(&mut self, command: Command, input: &str) -> (Result<()>, String) {
            let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
            let result = run(command, &mut self.manager, &mut console);
            let (_, output) = console.into_parts();
            (result, String::from_utf8(output).unwrap())
        }
    }

    #[test]
    fn test_add() {
        let mut harness = Harness::new();
        let command = Command::Add { title: " Emma ".to_string(), author: "Jane Austen".to_string() };
        let (result, output) = harness.run(command, "");
        result.unwrap();
        assert_eq!(output, "Saved [3] 《Emma》|Jane Austen\n");
        assert!(harness.backend.contents("books.json").unwrap().contains("\"Emma\""));
    }

    #[rstest]
    #[case("", "Frank Herbert")]
    #[case("dune", "frank herbert")]
    fn test_add_rejected(#[case] title: &str, #[case] author: &str) {
        let mut harness = Harness::new();
        let command = Command::Add { title: title.to_string(), author: author.to_string() };
        let (result, output) = harness.run(command, "");
        assert!(matches!(&*result.unwrap_err(), ErrorKind::Catalog(_)));
        assert!(output.is_empty());
        assert_eq!(harness.manager.len(), 2);
    }

    #[test]
    fn test_add_that_cannot_be_saved_fails() {
        let mut harness = Harness::new();
        harness.backend.fail_writes(true);
        let command = Command::Add { title: "Emma".to_string(), author: "Jane Austen".to_string() };
        let (result, _) = harness.run(command, "");
        assert!(matches!(&*result.unwrap_err(), ErrorKind::Catalog(_)));
        assert!(harness.manager.is_dirty());
    }

    #[rstest]
    #[case("y\n", true)]
    #[case("n\n", false)]
    #[case("", false)]
    fn test_remove_asks_for_confirmation(#[case] input: &str, #[case] removed: bool) {
        let mut harness = Harness::new();
        let (result, output) = harness.run(Command::Remove { id: 1, yes: false }, input);
        result.unwrap();
        assert!(output.contains("Title:  《Dune》"));
        assert_eq!(harness.manager.find(1).is_none(), removed);
        assert_eq!(output.contains("Cancelled."), !removed);
    }

    #[test]
    fn test_remove_without_confirmation() {
        let mut harness = Harness::new();
        let (result, output) = harness.run(Command::Remove { id: 2, yes: true }, "");
        result.unwrap();
        assert_eq!(output, "Removed [2] 《1984》|George Orwell\n");
        assert_eq!(harness.manager.list(), [Book::new(1, "Dune", "Frank Herbert")]);
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut harness = Harness::new();
        let (result, _) = harness.run(Command::Remove { id: 9, yes: true }, "");
        assert!(matches!(&*result.unwrap_err(), ErrorKind::Catalog(_)));
        assert_eq!(harness.manager.len(), 2);
    }

    #[test]
    fn test_list() {
        let mut harness = Harness::new();
        let (result, output) = harness.run(Command::List, "");
        result.unwrap();
        assert_eq!(output, "[1] 《Dune》|Frank Herbert\n[2] 《1984》|George Orwell\n");
    }

    #[rstest]
    #[case("ORWELL", "[2] 《1984》|George Orwell\n")]
    #[case("tolkien", "No books match 'tolkien'.\n")]
    fn test_search(#[case] keyword: &str, #[case] expected: &str) {
        let mut harness = Harness::new();
        let (result, output) = harness.run(Command::Search { keyword: keyword.to_string() }, "");
        result.unwrap();
        assert_eq!(output, expected);
    }
}
