// Member entity - identified by a unique string ID

use serde::{Deserialize, Serialize};

/// A registered library member.
///
/// `borrowed` lists the ISBNs the member currently holds, in the order the
/// loans were taken. The list never contains duplicates; quota enforcement
/// lives in the catalog, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique member identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// ISBNs currently on loan to this member, insertion-ordered
    pub borrowed: Vec<String>,
}

impl Member {
    /// Create a new member with no active loans
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Member {
            id: id.into(),
            name: name.into(),
            borrowed: Vec::new(),
        }
    }

    /// Record a loan. Ignored if the ISBN is already held.
    pub fn record_loan(&mut self, isbn: &str) {
        if !self.has_borrowed(isbn) {
            self.borrowed.push(isbn.to_string());
        }
    }

    /// Clear a loan. Ignored if the ISBN is not held.
    pub fn clear_loan(&mut self, isbn: &str) {
        self.borrowed.retain(|held| held != isbn);
    }

    pub fn has_borrowed(&self, isbn: &str) -> bool {
        self.borrowed.iter().any(|held| held == isbn)
    }

    pub fn loan_count(&self) -> usize {
        self.borrowed.len()
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Member {} (ID: {}) - {} book(s) on loan",
            self.name,
            self.id,
            self.loan_count()
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
