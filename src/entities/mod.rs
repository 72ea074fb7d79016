// Entity models: the two record types the catalog manages

pub mod book;
pub mod member;

pub use book::Book;
pub use member::Member;
