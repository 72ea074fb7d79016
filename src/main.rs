// Menu-driven console front-end
// Thin layer over the catalog: prompts, calls an operation, prints the
// outcome, saves after every mutation. No business rules live here.

use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};

use library_ledger::{borrow_activity, Book, Catalog, FlatFileStore, LedgerReport, Member};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "report" {
        let as_json = args.iter().any(|a| a == "--json");
        let data_dir = args
            .iter()
            .skip(2)
            .find(|a| !a.starts_with("--"))
            .map(String::as_str)
            .unwrap_or("data");
        run_report(data_dir, as_json)
    } else {
        let data_dir = args.get(1).map(String::as_str).unwrap_or("data");
        run_menu(data_dir)
    }
}

// ============================================================================
// MENU MODE
// ============================================================================

fn run_menu(data_dir: &str) -> Result<()> {
    let store = FlatFileStore::new(data_dir);
    let mut catalog = Catalog::with_history(Box::new(store.history_log()));
    catalog.load(&store)?;

    println!(
        "Library ledger v{} - {} book(s), {} member(s) loaded",
        library_ledger::VERSION,
        catalog.book_count(),
        catalog.member_count()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_menu();
        let choice = match prompt(&mut lines, "Choose an option (1-7): ")? {
            Some(line) => line,
            None => break, // EOF
        };

        match choice.trim() {
            "1" => {
                let isbn = prompt_required(&mut lines, "ISBN: ")?;
                let title = prompt_required(&mut lines, "Title: ")?;
                let author = prompt_required(&mut lines, "Author: ")?;
                let year = prompt_required(&mut lines, "Year: ")?;
                let genre = prompt_required(&mut lines, "Genre: ")?;

                match catalog.add_book(Book::new(isbn, title, author, year, genre)) {
                    Ok(()) => {
                        println!("Book added.");
                        catalog.save(&store)?;
                    }
                    Err(err) => println!("Error: {err}"),
                }
            }
            "2" => {
                let id = prompt_required(&mut lines, "Member ID: ")?;
                let name = prompt_required(&mut lines, "Name: ")?;

                match catalog.register_member(Member::new(id, name)) {
                    Ok(()) => {
                        println!("Member registered.");
                        catalog.save(&store)?;
                    }
                    Err(err) => println!("Error: {err}"),
                }
            }
            "3" => {
                let isbn = prompt_required(&mut lines, "ISBN to borrow: ")?;
                let member_id = prompt_required(&mut lines, "Member ID: ")?;

                match catalog.borrow_book(&isbn, &member_id) {
                    Ok(()) => {
                        println!("Borrowed.");
                        catalog.save(&store)?;
                    }
                    Err(err) => println!("Error: {err}"),
                }
            }
            "4" => {
                let isbn = prompt_required(&mut lines, "ISBN to return: ")?;
                let member_id = prompt_required(&mut lines, "Member ID: ")?;

                match catalog.return_book(&isbn, &member_id) {
                    Ok(()) => {
                        println!("Returned.");
                        catalog.save(&store)?;
                    }
                    Err(err) => println!("Error: {err}"),
                }
            }
            "5" => {
                if catalog.book_count() == 0 {
                    println!("No books registered.");
                }
                for book in catalog.list_books() {
                    println!("{book}");
                }
            }
            "6" => {
                print_report(&catalog, &store)?;
            }
            "7" => {
                catalog.save(&store)?;
                println!("Saved. Goodbye!");
                break;
            }
            other => println!("Invalid option {other:?}. Try again."),
        }
    }

    Ok(())
}

fn print_menu() {
    println!("\n=== LIBRARY LEDGER ===");
    println!("1. Add a book");
    println!("2. Register a member");
    println!("3. Borrow a book");
    println!("4. Return a book");
    println!("5. List all books");
    println!("6. Report");
    println!("7. Quit");
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;

    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}

fn prompt_required(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> Result<String> {
    loop {
        match prompt(lines, label)? {
            Some(line) if !line.trim().is_empty() => return Ok(line.trim().to_string()),
            Some(_) => println!("A value is required."),
            None => anyhow::bail!("input closed"),
        }
    }
}

// ============================================================================
// REPORT MODE
// ============================================================================

fn run_report(data_dir: &str, as_json: bool) -> Result<()> {
    let store = FlatFileStore::new(data_dir);
    let mut catalog = Catalog::new();
    catalog.load(&store)?;

    if as_json {
        let report = LedgerReport::build(&catalog);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&catalog, &store)?;
    Ok(())
}

fn print_report(catalog: &Catalog, store: &FlatFileStore) -> Result<()> {
    let report = LedgerReport::build(catalog);

    println!("\n--- Report ---");
    println!(
        "Books: {} ({} available), Members: {}, Active loans: {}",
        report.total_books, report.available_books, report.total_members, report.active_loans
    );

    println!("\nBooks per genre:");
    for (genre, count) in &report.genres {
        println!("  {genre}: {count}");
    }

    println!("\nTop authors:");
    for (author, count) in &report.top_authors {
        println!("  {author}: {count}");
    }

    let entries = store.history_log().read_all()?;
    let activity = borrow_activity(&entries, 30);
    let total: usize = activity.iter().map(|(_, n)| n).sum();
    println!("\nBorrows over the last 30 days: {total}");
    for (day, count) in activity.iter().filter(|(_, n)| *n > 0) {
        println!("  {day}: {count}");
    }

    Ok(())
}
