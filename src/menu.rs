//! Interactive menu loop.
//!
//! Every catalog error is printed and the loop carries on; only console I/O
//! failures end the session early.

use crate::console::Console;
use bookshelf_catalog::Manager;
use bookshelf_catalog::error::ErrorKind as CatalogErrorKind;
use std::io::{BufRead, Result, Write};

const MENU: &str = "\
┌─────────────────┐
│    Bookshelf    │
└─────────────────┘
1. Add books
2. Remove books
3. List books
4. Search books
5. Exit";

enum Choice {
    Add,
    Remove,
    List,
    Search,
    Exit,
}
impl Choice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Add),
            "2" => Some(Self::Remove),
            "3" => Some(Self::List),
            "4" => Some(Self::Search),
            "5" => Some(Self::Exit),
            _ => None,
        }
    }
}

pub fn run<R: BufRead, W: Write>(manager: &mut Manager, console: &mut Console<R, W>) -> Result<()> {
    loop {
        console.line("")?;
        console.line(MENU)?;
        let Some(input) = console.prompt("Choose an option (1-5): ")? else {
            break;
        };
        match Choice::parse(&input) {
            Some(Choice::Add) => add(manager, console)?,
            Some(Choice::Remove) => remove(manager, console)?,
            Some(Choice::List) => list(manager, console)?,
            Some(Choice::Search) => search(manager, console)?,
            Some(Choice::Exit) => break,
            None => console.line("Invalid choice, please enter a number from 1 to 5.")?,
        }
    }
    if manager.is_dirty() {
        console.line(format!("Warning: the latest changes could not be written to {}.", manager.path().display()))?;
    }
    console.line("Thanks for using Bookshelf. Goodbye!")
}

fn add<R: BufRead, W: Write>(manager: &mut Manager, console: &mut Console<R, W>) -> Result<()> {
    loop {
        console.heading("Add a book (leave blank to return)")?;
        let Some(title) = console.prompt("Title: ")?.filter(|title| !title.trim().is_empty()) else {
            return Ok(());
        };
        let Some(author) = console.prompt("Author: ")?.filter(|author| !author.trim().is_empty()) else {
            return Ok(());
        };
        match manager.add(&title, &author) {
            Ok(book) => console.line(format!("Saved {book}"))?,
            Err(err) => console.error(&err)?,
        }
    }
}

fn remove<R: BufRead, W: Write>(manager: &mut Manager, console: &mut Console<R, W>) -> Result<()> {
    loop {
        console.heading("Remove a book (leave blank to return)")?;
        if manager.is_empty() {
            return console.line("There are no books to remove.");
        }
        let Some(input) = console.prompt("Book id: ")?.filter(|input| !input.trim().is_empty()) else {
            return Ok(());
        };
        let Ok(id) = input.trim().parse::<u32>() else {
            console.line(format!("Invalid id {:?}: ids are whole numbers.", input.trim()))?;
            continue;
        };
        let Some(book) = manager.find(id) else {
            console.line(CatalogErrorKind::NotFound(id))?;
            continue;
        };
        console.book_details(book)?;
        if !console.confirm("Remove this book? Enter Y to confirm, anything else to cancel: ")? {
            console.line("Cancelled.")?;
            continue;
        }
        match manager.remove(id) {
            Ok(book) => console.line(format!("Removed {book}"))?,
            Err(err) => console.error(&err)?,
        }
    }
}

fn list<R: BufRead, W: Write>(manager: &Manager, console: &mut Console<R, W>) -> Result<()> {
    console.heading("All books")?;
    if manager.is_empty() {
        return console.line("No books yet.");
    }
    console.books(manager.list())
}

fn search<R: BufRead, W: Write>(manager: &Manager, console: &mut Console<R, W>) -> Result<()> {
    loop {
        console.heading("Search by title or author (leave blank to return)")?;
        let Some(keyword) = console.prompt("Keyword: ")?.filter(|keyword| !keyword.trim().is_empty()) else {
            return Ok(());
        };
        let results = manager.search(&keyword);
        if results.is_empty() {
            console.line(format!("No books match '{keyword}'."))?;
        } else {
            console.books(results)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_catalog::{Book, CatalogStore};
    use bookshelf_storage::backend::MockBackend;
    use std::io::Cursor;
    use std::sync::Arc;

    fn session(backend: &Arc<MockBackend>, script: &str) -> (Manager, String) {
        let (mut manager, _) = Manager::initialize(CatalogStore::new(backend.clone()), "books.json");
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        run(&mut manager, &mut console).unwrap();
        let (_, output) = console.into_parts();
        (manager, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_add_list_and_exit() {
        let backend = Arc::new(MockBackend::default());
        let (manager, output) = session(&backend, "1\nDune\nFrank Herbert\n1984\nGeorge Orwell\n\n3\n5\n");
        assert_eq!(manager.list(), [Book::new(1, "Dune", "Frank Herbert"), Book::new(2, "1984", "George Orwell")]);
        assert!(output.contains("Saved [1] 《Dune》|Frank Herbert"));
        assert!(output.contains("[2] 《1984》|George Orwell\n"));
        assert!(output.ends_with("Goodbye!\n"));
        assert!(backend.contents("books.json").unwrap().contains("George Orwell"));
    }

    #[test]
    fn test_add_reports_duplicates_and_continues() {
        let backend = Arc::new(MockBackend::default());
        let (manager, output) = session(&backend, "1\nDune\nFrank Herbert\ndune\nFRANK HERBERT\n\n5\n");
        assert_eq!(manager.len(), 1);
        assert!(output.contains("《dune》 by FRANK HERBERT is already in the catalog"));
    }

    #[test]
    fn test_remove_flow() {
        let backend = Arc::new(MockBackend::with_files([(
            "books.json",
            r#"[{"id": 1, "title": "Dune", "author": "Frank Herbert"}, {"id": 2, "title": "1984", "author": "George Orwell"}]"#,
        )]));
        let (manager, output) = session(&backend, "2\nabc\n9\n1\nn\n1\ny\n\n5\n");
        assert!(output.contains("Invalid id \"abc\""));
        assert!(output.contains("no book with id [9]"));
        assert!(output.contains("Title:  《Dune》"));
        assert!(output.contains("Cancelled."));
        assert!(output.contains("Removed [1] 《Dune》|Frank Herbert"));
        assert_eq!(manager.list(), [Book::new(2, "1984", "George Orwell")]);
    }

    #[test]
    fn test_remove_from_empty_catalog() {
        let backend = Arc::new(MockBackend::default());
        let (_, output) = session(&backend, "2\n5\n");
        assert!(output.contains("There are no books to remove."));
    }

    #[test]
    fn test_search_flow() {
        let backend = Arc::new(MockBackend::default());
        let (_, output) = session(&backend, "1\nDune\nFrank Herbert\n1984\nGeorge Orwell\n\n4\nherb\ntolkien\n\n5\n");
        let results = output.split("Keyword: ").nth(1).unwrap();
        assert!(results.contains("[1] 《Dune》|Frank Herbert"));
        assert!(!results.contains("1984"));
        assert!(output.contains("No books match 'tolkien'."));
    }

    #[test]
    fn test_invalid_choice_and_end_of_input() {
        let backend = Arc::new(MockBackend::default());
        let (_, output) = session(&backend, "7\n");
        assert!(output.contains("Invalid choice"));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_failed_save_is_reported() {
        let backend = Arc::new(MockBackend::default());
        let (mut manager, _) = Manager::initialize(CatalogStore::new(backend.clone()), "books.json");
        backend.fail_writes(true);
        let mut console = Console::new(Cursor::new(b"1\nDune\nFrank Herbert\n\n3\n5\n".to_vec()), Vec::new());
        run(&mut manager, &mut console).unwrap();
        let (_, output) = console.into_parts();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Could not write books.json"));
        assert!(output.contains("[1] 《Dune》|Frank Herbert"));
        assert!(output.contains("Warning: the latest changes could not be written to books.json."));
        assert_eq!(backend.contents("books.json").as_deref(), Some("[]\n"));
    }
}
