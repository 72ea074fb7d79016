// Error taxonomy for catalog operations and persistence
// One Result convention across borrow and return paths; front-ends decide
// how to surface each kind.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("book {0} does not exist")]
    BookNotFound(String),

    #[error("member {0} does not exist")]
    MemberNotFound(String),

    #[error("book {0} is already borrowed")]
    BookUnavailable(String),

    #[error("member {member_id} has reached the loan quota of {quota}")]
    QuotaExceeded { member_id: String, quota: usize },

    #[error("member {member_id} did not borrow book {isbn}")]
    NotBorrowedByMember { member_id: String, isbn: String },

    #[error("a book with ISBN {0} already exists")]
    BookAlreadyExists(String),

    #[error("a member with ID {0} already exists")]
    MemberAlreadyExists(String),

    #[error("book {0} is currently borrowed and cannot be removed")]
    BookCurrentlyBorrowed(String),

    #[error("member {0} still has active loans and cannot be removed")]
    MemberHasActiveLoans(String),

    #[error("malformed record in {file} at line {line}: {reason}")]
    MalformedRecord {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
