// Library Ledger - Core Library
// Book/member registry, borrowing rules, flat-file persistence, and
// reporting aggregations. Front-ends consume this and render.

pub mod catalog;
pub mod entities;
pub mod error;
pub mod history;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use catalog::{Catalog, LOAN_QUOTA};
pub use entities::{Book, Member};
pub use error::{CatalogError, Result};
pub use history::{
    Action, ActivityEntry, ActivitySink, FileActivityLog, MemoryActivityLog, TIMESTAMP_FORMAT,
};
pub use stats::{borrow_activity, genre_distribution, top_authors, LedgerReport};
pub use store::{FlatFileStore, RecordStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
