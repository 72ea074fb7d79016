// Reporting aggregations over the catalog and the activity log
// Pure counting; rendering (tables, charts) is the front-end's problem.

use crate::catalog::Catalog;
use crate::entities::Book;
use crate::history::{Action, ActivityEntry, TIMESTAMP_FORMAT};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::Serialize;

/// Number of catalogued books per genre, in first-seen order
pub fn genre_distribution<'a>(books: impl IntoIterator<Item = &'a Book>) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for book in books {
        *counts.entry(book.genre.clone()).or_insert(0) += 1;
    }
    counts
}

/// The `n` authors with the most catalogued books, descending. Ties keep
/// first-seen order.
pub fn top_authors<'a>(books: impl IntoIterator<Item = &'a Book>, n: usize) -> Vec<(String, usize)> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for book in books {
        *counts.entry(book.author.clone()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Borrows per day over the trailing `days`-day window ending today,
/// zero-filled. Only `emprunt` events count; entries whose timestamp does
/// not parse are skipped.
pub fn borrow_activity(entries: &[ActivityEntry], days: usize) -> Vec<(NaiveDate, usize)> {
    let end = Local::now().date_naive();
    let start = end - Duration::days(days.saturating_sub(1) as i64);

    let mut per_day: IndexMap<NaiveDate, usize> = IndexMap::new();
    let mut day = start;
    while day <= end {
        per_day.insert(day, 0);
        day = day + Duration::days(1);
    }

    for entry in entries {
        if entry.action != Action::Borrow {
            continue;
        }
        let Ok(parsed) = NaiveDateTime::parse_from_str(&entry.timestamp, TIMESTAMP_FORMAT) else {
            continue;
        };
        if let Some(count) = per_day.get_mut(&parsed.date()) {
            *count += 1;
        }
    }

    per_day.into_iter().collect()
}

// ============================================================================
// LEDGER REPORT
// ============================================================================

/// Aggregate snapshot the `report` front-end mode prints as text or JSON
#[derive(Debug, Serialize)]
pub struct LedgerReport {
    pub total_books: usize,
    pub available_books: usize,
    pub total_members: usize,
    pub active_loans: usize,
    pub genres: IndexMap<String, usize>,
    pub top_authors: Vec<(String, usize)>,
}

impl LedgerReport {
    pub fn build(catalog: &Catalog) -> Self {
        let available_books = catalog.list_books().filter(|b| b.available).count();
        let active_loans = catalog.list_members().map(|m| m.loan_count()).sum();

        LedgerReport {
            total_books: catalog.book_count(),
            available_books,
            total_members: catalog.member_count(),
            active_loans,
            genres: genre_distribution(catalog.list_books()),
            top_authors: top_authors(catalog.list_books(), 10),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Member;

    fn shelf() -> Vec<Book> {
        vec![
            Book::new("001", "Dune", "Herbert", "1965", "SF"),
            Book::new("002", "Dune Messiah", "Herbert", "1969", "SF"),
            Book::new("003", "Foundation", "Asimov", "1951", "SF"),
            Book::new("004", "Murder on the Orient Express", "Christie", "1934", "Crime"),
        ]
    }

    #[test]
    fn test_genre_distribution() {
        let books = shelf();
        let genres = genre_distribution(&books);

        assert_eq!(genres.get("SF"), Some(&3));
        assert_eq!(genres.get("Crime"), Some(&1));
        assert_eq!(genres.len(), 2);
    }

    #[test]
    fn test_top_authors_ranking_and_truncation() {
        let books = shelf();
        let top = top_authors(&books, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0], ("Herbert".to_string(), 2));
        // Asimov and Christie tie at 1; Asimov was seen first
        assert_eq!(top[1], ("Asimov".to_string(), 1));
    }

    #[test]
    fn test_borrow_activity_window() {
        let today = Local::now().date_naive();
        let stamp = |days_ago: i64, time: &str| {
            format!("{} {}", today - Duration::days(days_ago), time)
        };

        let entries = vec![
            ActivityEntry {
                timestamp: stamp(0, "09:00:00"),
                action: Action::Borrow,
                member_id: "M1".to_string(),
                isbn: "001".to_string(),
            },
            ActivityEntry {
                timestamp: stamp(0, "15:00:00"),
                action: Action::Borrow,
                member_id: "M2".to_string(),
                isbn: "002".to_string(),
            },
            // Returns never count
            ActivityEntry {
                timestamp: stamp(0, "16:00:00"),
                action: Action::Return,
                member_id: "M1".to_string(),
                isbn: "001".to_string(),
            },
            ActivityEntry {
                timestamp: stamp(2, "10:00:00"),
                action: Action::Borrow,
                member_id: "M1".to_string(),
                isbn: "003".to_string(),
            },
            // Outside the 7-day window
            ActivityEntry {
                timestamp: stamp(10, "10:00:00"),
                action: Action::Borrow,
                member_id: "M1".to_string(),
                isbn: "004".to_string(),
            },
            // Unparseable timestamp is skipped
            ActivityEntry {
                timestamp: "not a date".to_string(),
                action: Action::Borrow,
                member_id: "M1".to_string(),
                isbn: "005".to_string(),
            },
        ];

        let activity = borrow_activity(&entries, 7);

        assert_eq!(activity.len(), 7);
        assert_eq!(activity[0].0, today - Duration::days(6));
        assert_eq!(activity[6], (today, 2));
        assert_eq!(activity[4].1, 1); // two days ago
        assert_eq!(activity.iter().map(|(_, n)| n).sum::<usize>(), 3);
    }

    #[test]
    fn test_ledger_report_counts() {
        let mut catalog = Catalog::new();
        for book in shelf() {
            catalog.add_book(book).unwrap();
        }
        catalog.register_member(Member::new("M1", "Alice")).unwrap();
        catalog.register_member(Member::new("M2", "Bob")).unwrap();
        catalog.borrow_book("001", "M1").unwrap();
        catalog.borrow_book("003", "M1").unwrap();

        let report = LedgerReport::build(&catalog);

        assert_eq!(report.total_books, 4);
        assert_eq!(report.available_books, 2);
        assert_eq!(report.total_members, 2);
        assert_eq!(report.active_loans, 2);
        assert_eq!(report.genres.get("SF"), Some(&3));
        assert_eq!(report.top_authors[0].0, "Herbert");
    }
}
