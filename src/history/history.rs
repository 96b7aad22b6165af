use std::collections::VecDeque;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::element::element_model::Element;
use crate::error::EngineError;
use crate::locator::locator_model::Locator;

pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// One inspected element, as remembered by the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// SHA-1 of the element markup, CSS selector and timestamp
    pub id: String,
    pub element: Element,
    pub locator: Locator,
    pub framework: String,
    pub framework_code: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(
        element: Element,
        locator: Locator,
        framework: &str,
        framework_code: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        let id = entry_id(&element.to_markup(), &locator.css_selector, &created_at);
        HistoryEntry {
            id,
            element,
            locator,
            framework: framework.to_string(),
            framework_code,
            created_at,
        }
    }
}

fn entry_id(markup: &str, css_selector: &str, created_at: &DateTime<Utc>) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(markup.as_bytes());
    hasher.update(b"\n");
    hasher.update(css_selector.as_bytes());
    hasher.update(b"\n");
    hasher.update(created_at.to_rfc3339_opts(SecondsFormat::Millis, true).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Exported shape of a history entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub id: String,
    pub element: String,
    pub css_selector: String,
    pub xpath: String,
    pub framework: String,
    pub timestamp: String,
}

impl From<&HistoryEntry> for ExportRecord {
    fn from(entry: &HistoryEntry) -> Self {
        ExportRecord {
            id: entry.id.clone(),
            element: entry.element.to_markup(),
            css_selector: entry.locator.css_selector.clone(),
            xpath: entry.locator.xpath.clone(),
            framework: entry.framework.clone(),
            timestamp: entry.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Bounded, newest-first list of inspected elements.
///
/// Owned by the calling shell; synthesis never reads or writes it. Inserting
/// into a full history evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct LocatorHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for LocatorHistory {
    fn default() -> Self {
        LocatorHistory::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl LocatorHistory {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        LocatorHistory {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert `entry` as the newest; returns the evicted oldest entry, if any.
    pub fn record(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        self.entries.push_front(entry);
        if self.entries.len() > self.capacity {
            let evicted = self.entries.pop_back();
            if let Some(old) = &evicted {
                debug!(id = %old.id, "evicted oldest history entry");
            }
            evicted
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Immutable copy, newest first.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn export_records(&self) -> Vec<ExportRecord> {
        self.entries.iter().map(ExportRecord::from).collect()
    }

    /// Pretty-printed JSON array of export records.
    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string_pretty(&self.export_records()).map_err(|source| {
            EngineError::JsonSerialize {
                context: "locator history".to_string(),
                source,
            }
        })
    }

    pub fn export(&self, path: &Path) -> Result<(), EngineError> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .map_err(|e| EngineError::io(format!("writing history to {}", path.display()), e))?;
        info!(path = %path.display(), entries = self.len(), "exported locator history");
        Ok(())
    }
}
