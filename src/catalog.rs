// Catalog - book/member registry and borrowing-rule engine
// Single authority for existence, availability, and the loan quota.
// Persistence is explicit: mutations touch memory only, callers decide
// when to save.

use crate::entities::{Book, Member};
use crate::error::{CatalogError, Result};
use crate::history::{Action, ActivityEntry, ActivitySink, MemoryActivityLog};
use crate::store::RecordStore;
use indexmap::IndexMap;

/// Maximum simultaneous loans per member
pub const LOAN_QUOTA: usize = 3;

/// In-memory registry of books and members.
///
/// Maps are insertion-ordered so listing and save order are deterministic.
/// Cross-entity invariant: a book is unavailable iff exactly one member's
/// borrowed list holds its ISBN; every mutation below preserves it.
pub struct Catalog {
    books: IndexMap<String, Book>,
    members: IndexMap<String, Member>,
    history: Box<dyn ActivitySink>,
}

impl Catalog {
    /// Catalog with an in-memory activity sink (history is discarded
    /// unless the caller kept a clone of the sink)
    pub fn new() -> Self {
        Self::with_history(Box::new(MemoryActivityLog::new()))
    }

    /// Catalog recording activity to the given sink
    pub fn with_history(history: Box<dyn ActivitySink>) -> Self {
        Catalog {
            books: IndexMap::new(),
            members: IndexMap::new(),
            history,
        }
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    /// Add a book to the catalog. New entries are always available,
    /// whatever the flag on the incoming record says.
    pub fn add_book(&mut self, mut book: Book) -> Result<()> {
        if self.books.contains_key(&book.isbn) {
            return Err(CatalogError::BookAlreadyExists(book.isbn));
        }

        book.available = true;
        tracing::info!(isbn = %book.isbn, title = %book.title, "book added");
        self.books.insert(book.isbn.clone(), book);
        Ok(())
    }

    pub fn register_member(&mut self, member: Member) -> Result<()> {
        if self.members.contains_key(&member.id) {
            return Err(CatalogError::MemberAlreadyExists(member.id));
        }

        tracing::info!(member_id = %member.id, name = %member.name, "member registered");
        self.members.insert(member.id.clone(), member);
        Ok(())
    }

    // ========================================================================
    // LOANS
    // ========================================================================

    /// Borrow a book for a member.
    ///
    /// Checks run in a fixed order so the most specific failure is
    /// reported first: book existence, member existence, availability,
    /// quota. A failed check leaves the catalog untouched.
    pub fn borrow_book(&mut self, isbn: &str, member_id: &str) -> Result<()> {
        if !self.books.contains_key(isbn) {
            return Err(CatalogError::BookNotFound(isbn.to_string()));
        }
        if !self.members.contains_key(member_id) {
            return Err(CatalogError::MemberNotFound(member_id.to_string()));
        }

        let book = &self.books[isbn];
        if !book.available {
            return Err(CatalogError::BookUnavailable(isbn.to_string()));
        }

        let member = &self.members[member_id];
        if member.loan_count() >= LOAN_QUOTA {
            return Err(CatalogError::QuotaExceeded {
                member_id: member_id.to_string(),
                quota: LOAN_QUOTA,
            });
        }

        self.books[isbn].available = false;
        self.members[member_id].record_loan(isbn);

        tracing::info!(isbn, member_id, "book borrowed");
        self.history
            .record(&ActivityEntry::now(Action::Borrow, member_id, isbn))
    }

    /// Return a borrowed book. Same existence checks as borrowing; a book
    /// the member never borrowed is refused without any state change.
    pub fn return_book(&mut self, isbn: &str, member_id: &str) -> Result<()> {
        if !self.books.contains_key(isbn) {
            return Err(CatalogError::BookNotFound(isbn.to_string()));
        }
        if !self.members.contains_key(member_id) {
            return Err(CatalogError::MemberNotFound(member_id.to_string()));
        }

        if !self.members[member_id].has_borrowed(isbn) {
            return Err(CatalogError::NotBorrowedByMember {
                member_id: member_id.to_string(),
                isbn: isbn.to_string(),
            });
        }

        self.books[isbn].available = true;
        self.members[member_id].clear_loan(isbn);

        tracing::info!(isbn, member_id, "book returned");
        self.history
            .record(&ActivityEntry::now(Action::Return, member_id, isbn))
    }

    // ========================================================================
    // UPDATES & REMOVAL
    // ========================================================================

    /// Replace a book's value fields. The ISBN is identity and cannot
    /// change; availability is owned by the loan operations.
    pub fn update_book(
        &mut self,
        isbn: &str,
        title: String,
        author: String,
        year: String,
        genre: String,
    ) -> Result<()> {
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| CatalogError::BookNotFound(isbn.to_string()))?;

        book.title = title;
        book.author = author;
        book.year = year;
        book.genre = genre;
        Ok(())
    }

    /// Rename a member
    pub fn update_member(&mut self, member_id: &str, name: String) -> Result<()> {
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| CatalogError::MemberNotFound(member_id.to_string()))?;

        member.name = name;
        Ok(())
    }

    /// Remove a book. Refused while some member holds it, so no member is
    /// left with a dangling ISBN.
    pub fn remove_book(&mut self, isbn: &str) -> Result<Book> {
        let book = self
            .books
            .get(isbn)
            .ok_or_else(|| CatalogError::BookNotFound(isbn.to_string()))?;

        if !book.available {
            return Err(CatalogError::BookCurrentlyBorrowed(isbn.to_string()));
        }

        tracing::info!(isbn, "book removed");
        Ok(self.books.shift_remove(isbn).unwrap())
    }

    /// Remove a member. Refused while they have active loans, so no book
    /// is stranded unavailable.
    pub fn remove_member(&mut self, member_id: &str) -> Result<Member> {
        let member = self
            .members
            .get(member_id)
            .ok_or_else(|| CatalogError::MemberNotFound(member_id.to_string()))?;

        if member.loan_count() > 0 {
            return Err(CatalogError::MemberHasActiveLoans(member_id.to_string()));
        }

        tracing::info!(member_id, "member removed");
        Ok(self.members.shift_remove(member_id).unwrap())
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn book(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.get(member_id)
    }

    /// All books, in insertion order
    pub fn list_books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// All members, in insertion order
    pub fn list_members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Case-insensitive substring search over member IDs and names
    pub fn find_members(&self, query: &str) -> Vec<&Member> {
        let needle = query.to_lowercase();
        self.members
            .values()
            .filter(|m| {
                m.id.to_lowercase().contains(&needle) || m.name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Flush both collections to the store. Activity entries are appended
    /// as they happen, not here.
    pub fn save(&self, store: &dyn RecordStore) -> Result<()> {
        let books: Vec<Book> = self.books.values().cloned().collect();
        let members: Vec<Member> = self.members.values().cloned().collect();

        store.save_books(&books)?;
        store.save_members(&members)
    }

    /// Replace in-memory state with the store's contents. Clears both maps
    /// first so repeated loads are idempotent; within one file the last
    /// record wins for a duplicated identifier.
    pub fn load(&mut self, store: &dyn RecordStore) -> Result<()> {
        let books = store.load_books()?;
        let members = store.load_members()?;

        self.books.clear();
        self.members.clear();

        for book in books {
            self.books.insert(book.isbn.clone(), book);
        }
        for member in members {
            self.members.insert(member.id.clone(), member);
        }

        tracing::info!(
            books = self.books.len(),
            members = self.members.len(),
            "catalog loaded"
        );
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
