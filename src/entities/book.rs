// Book entity - identified by its ISBN (natural key)

use serde::{Deserialize, Serialize};

/// A catalogued book.
///
/// The ISBN is the identity and never changes once the book is registered;
/// every other field is a plain value. `year` is kept as text because the
/// record files carry it unvalidated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique natural key (ISBN-like string)
    pub isbn: String,

    pub title: String,

    pub author: String,

    /// Publication year, stored as text and never validated
    pub year: String,

    /// Free-text category
    pub genre: String,

    /// True when no member currently holds this book
    pub available: bool,
}

impl Book {
    /// Create a new book record. New books start available.
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        year: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Book {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            year: year.into(),
            genre: genre.into(),
            available: true,
        }
    }

    /// Human-readable availability label
    pub fn status_label(&self) -> &'static str {
        if self.available {
            "available"
        } else {
            "borrowed"
        }
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) - {} [{}] - {}",
            self.title,
            self.year,
            self.author,
            self.genre,
            self.status_label()
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_is_available() {
        let book = Book::new("001", "Dune", "Herbert", "1965", "SF");

        assert_eq!(book.isbn, "001");
        assert_eq!(book.title, "Dune");
        assert!(book.available);
        assert_eq!(book.status_label(), "available");
    }

    #[test]
    fn test_display_includes_status() {
        let mut book = Book::new("001", "Dune", "Herbert", "1965", "SF");
        assert_eq!(book.to_string(), "Dune (1965) - Herbert [SF] - available");

        book.available = false;
        assert_eq!(book.to_string(), "Dune (1965) - Herbert [SF] - borrowed");
    }
}
