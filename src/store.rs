// Flat-file persistence adapter
// Whole-collection rewrite on save, line-per-record, `;`-delimited.
// No escaping: a `;` inside a field corrupts the record. Known limitation
// of the format, kept for compatibility with existing data files.

use crate::entities::{Book, Member};
use crate::error::{CatalogError, Result};
use crate::history::FileActivityLog;
use std::fs;
use std::path::{Path, PathBuf};

pub const BOOKS_FILE: &str = "books.txt";
pub const MEMBERS_FILE: &str = "members.txt";
pub const HISTORY_FILE: &str = "history.csv";

// ============================================================================
// STORE ABSTRACTION
// ============================================================================

/// Record storage the catalog saves to and loads from. One production
/// implementation (flat files); tests may substitute their own.
pub trait RecordStore {
    fn load_books(&self) -> Result<Vec<Book>>;
    fn load_members(&self) -> Result<Vec<Member>>;
    fn save_books(&self, books: &[Book]) -> Result<()>;
    fn save_members(&self, members: &[Member]) -> Result<()>;
}

// ============================================================================
// FLAT-FILE STORE
// ============================================================================

/// Keeps the three data files under one directory:
///
/// - `books.txt`    - `isbn;title;author;year;genre;True|False`
/// - `members.txt`  - `id;name;comma_joined_isbns`
/// - `history.csv`  - `timestamp;action;member_id;isbn` (append-only)
///
/// A missing record file on load means an empty collection, so a fresh
/// data directory works without any setup step.
pub struct FlatFileStore {
    data_dir: PathBuf,
}

impl FlatFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        FlatFileStore {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(BOOKS_FILE)
    }

    pub fn members_path(&self) -> PathBuf {
        self.data_dir.join(MEMBERS_FILE)
    }

    /// Activity log living next to the record files
    pub fn history_log(&self) -> FileActivityLog {
        FileActivityLog::new(self.data_dir.join(HISTORY_FILE))
    }

    fn read_lines(path: &Path) -> Result<Vec<String>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(path)?;
        Ok(contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    fn write_lines(&self, file: &str, lines: &[String]) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;

        let mut contents = lines.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }

        fs::write(self.data_dir.join(file), contents)?;
        Ok(())
    }
}

impl RecordStore for FlatFileStore {
    fn load_books(&self) -> Result<Vec<Book>> {
        let path = self.books_path();
        let mut books = Vec::new();

        for (number, line) in Self::read_lines(&path)?.iter().enumerate() {
            books.push(parse_book_line(line).map_err(|reason| {
                CatalogError::MalformedRecord {
                    file: BOOKS_FILE.to_string(),
                    line: number + 1,
                    reason,
                }
            })?);
        }

        tracing::debug!(count = books.len(), path = %path.display(), "loaded books");
        Ok(books)
    }

    fn load_members(&self) -> Result<Vec<Member>> {
        let path = self.members_path();
        let mut members = Vec::new();

        for (number, line) in Self::read_lines(&path)?.iter().enumerate() {
            members.push(parse_member_line(line).map_err(|reason| {
                CatalogError::MalformedRecord {
                    file: MEMBERS_FILE.to_string(),
                    line: number + 1,
                    reason,
                }
            })?);
        }

        tracing::debug!(count = members.len(), path = %path.display(), "loaded members");
        Ok(members)
    }

    fn save_books(&self, books: &[Book]) -> Result<()> {
        let lines: Vec<String> = books.iter().map(book_line).collect();
        self.write_lines(BOOKS_FILE, &lines)?;

        tracing::debug!(count = books.len(), "saved books");
        Ok(())
    }

    fn save_members(&self, members: &[Member]) -> Result<()> {
        let lines: Vec<String> = members.iter().map(member_line).collect();
        self.write_lines(MEMBERS_FILE, &lines)?;

        tracing::debug!(count = members.len(), "saved members");
        Ok(())
    }
}

// ============================================================================
// LINE CODECS
// ============================================================================

fn book_line(book: &Book) -> String {
    format!(
        "{};{};{};{};{};{}",
        book.isbn,
        book.title,
        book.author,
        book.year,
        book.genre,
        if book.available { "True" } else { "False" }
    )
}

fn parse_book_line(line: &str) -> std::result::Result<Book, String> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() != 6 {
        return Err(format!("expected 6 fields, found {}", fields.len()));
    }

    let available = match fields[5] {
        "True" => true,
        "False" => false,
        other => return Err(format!("invalid availability flag {:?}", other)),
    };

    let mut book = Book::new(fields[0], fields[1], fields[2], fields[3], fields[4]);
    book.available = available;
    Ok(book)
}

fn member_line(member: &Member) -> String {
    format!("{};{};{}", member.id, member.name, member.borrowed.join(","))
}

fn parse_member_line(line: &str) -> std::result::Result<Member, String> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() < 2 || fields.len() > 3 {
        return Err(format!("expected 2 or 3 fields, found {}", fields.len()));
    }

    let mut member = Member::new(fields[0], fields[1]);
    if let Some(joined) = fields.get(2) {
        if !joined.is_empty() {
            member.borrowed = joined.split(',').map(str::to_string).collect();
        }
    }
    Ok(member)
}

// ============================================================================
// TESTS
// ============================================================================
