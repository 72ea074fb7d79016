// Activity log - append-only record of borrow/return events
// Written once per successful loan mutation; the catalog never reads it
// back, only the reporting side does.

use crate::error::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// On-disk timestamp format, e.g. "2026-08-23 14:07:31"
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// ACTIVITY ENTRY
// ============================================================================

/// Event kind. Serialized with the historical French literals the log
/// format has always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "emprunt")]
    Borrow,

    #[serde(rename = "retour")]
    Return,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Borrow => "emprunt",
            Action::Return => "retour",
        }
    }
}

/// One immutable log line: who did what to which book, and when.
/// Field order matches the on-disk column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: String,
    pub action: Action,
    pub member_id: String,
    pub isbn: String,
}

impl ActivityEntry {
    /// Build an entry timestamped with the current local time
    pub fn now(action: Action, member_id: &str, isbn: &str) -> Self {
        ActivityEntry {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            action,
            member_id: member_id.to_string(),
            isbn: isbn.to_string(),
        }
    }
}

// ============================================================================
// SINKS
// ============================================================================

/// Where the catalog sends activity entries. File-backed in production,
/// in-memory for tests and for catalogs that do not keep history.
pub trait ActivitySink {
    fn record(&self, entry: &ActivityEntry) -> Result<()>;
}

/// Append-only log file, `;`-delimited, one event per line, no header
pub struct FileActivityLog {
    path: PathBuf,
}

impl FileActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileActivityLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every event in the log. A missing file means no activity yet.
    /// Lines that do not parse are skipped, as the reporting side has
    /// always tolerated hand-edited logs.
    pub fn read_all(&self) -> Result<Vec<ActivityEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .from_path(&self.path)?;

        let mut entries = Vec::new();
        for result in reader.deserialize::<ActivityEntry>() {
            match result {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable history line");
                }
            }
        }

        Ok(entries)
    }
}

impl ActivitySink for FileActivityLog {
    fn record(&self, entry: &ActivityEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .from_writer(file);

        writer.serialize(entry)?;
        writer.flush()?;

        tracing::debug!(
            action = entry.action.as_str(),
            member_id = %entry.member_id,
            isbn = %entry.isbn,
            "recorded activity"
        );

        Ok(())
    }
}

/// In-memory sink. Cloning shares the underlying buffer, so a test can keep
/// a handle while the catalog owns another.
#[derive(Clone, Default)]
pub struct MemoryActivityLog {
    entries: Arc<RwLock<Vec<ActivityEntry>>>,
}

impl MemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ActivitySink for MemoryActivityLog {
    fn record(&self, entry: &ActivityEntry) -> Result<()> {
        self.entries.write().unwrap().push(entry.clone());
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
