//! Recent-items history.
//!
//! A bounded list, newest first, stored as one JSON array. Adding an item
//! whose id is already present moves it to the front instead of duplicating
//! it.

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::kv::KvStore;

/// Key the history list is stored under.
pub const HISTORY_KEY: &str = "history_v1";

/// Default number of items kept.
pub const MAX_ITEMS: usize = 20;

/// Where a history entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryKind {
    Ocr,
    Audio,
    Doc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    /// Unix milliseconds.
    pub date: u64,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    pub summary: String,
    pub full_text: String,
}

impl HistoryItem {
    /// Summary length, in characters.
    pub const SUMMARY_CHARS: usize = 100;

    /// Entry for a piece of text, summarised from its first characters.
    pub fn new(id: impl Into<String>, kind: HistoryKind, full_text: impl Into<String>) -> Self {
        let full_text = full_text.into();
        let summary = full_text.trim().chars().take(Self::SUMMARY_CHARS).collect();
        Self {
            id: id.into(),
            date: folio_types::now_millis(),
            kind,
            preview: None,
            summary,
            full_text,
        }
    }

    pub fn with_date(mut self, date: u64) -> Self {
        self.date = date;
        self
    }
}

#[derive(Debug)]
pub struct History<S> {
    kv: S,
    max_items: usize,
}

impl<S: KvStore> History<S> {
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            max_items: MAX_ITEMS,
        }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// All items, newest first. A corrupt list reads as empty.
    pub fn all(&self) -> StoreResult<Vec<HistoryItem>> {
        let Some(json) = self.kv.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&json) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(error = %e, "history is unreadable, starting fresh");
                Ok(Vec::new())
            }
        }
    }

    /// Put `item` at the front. Returns the updated list.
    pub fn add(&self, item: HistoryItem) -> StoreResult<Vec<HistoryItem>> {
        let mut items = self.all()?;
        items.retain(|existing| existing.id != item.id);
        items.insert(0, item);
        items.truncate(self.max_items);
        self.write(&items)?;
        Ok(items)
    }

    /// Union with items from elsewhere, by id.
    ///
    /// Items already present win over incoming ones with the same id. The
    /// result is ordered by date, newest first, and bounded.
    pub fn merge(&self, incoming: Vec<HistoryItem>) -> StoreResult<Vec<HistoryItem>> {
        let mut items = self.all()?;
        for item in incoming {
            if !items.iter().any(|existing| existing.id == item.id) {
                items.push(item);
            }
        }
        items.sort_by(|a, b| b.date.cmp(&a.date));
        items.truncate(self.max_items);
        self.write(&items)?;
        Ok(items)
    }

    pub fn remove(&self, id: &str) -> StoreResult<bool> {
        let mut items = self.all()?;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.write(&items)?;
        Ok(true)
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.kv.delete(HISTORY_KEY)?;
        Ok(())
    }

    fn write(&self, items: &[HistoryItem]) -> StoreResult<()> {
        let json = serde_json::to_string(items)?;
        self.kv.put(HISTORY_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryKv;
    use crate::sqlite::SqliteKv;

    fn item(id: &str, date: u64) -> HistoryItem {
        HistoryItem::new(id, HistoryKind::Doc, format!("text {id}")).with_date(date)
    }

    #[test]
    fn test_add_is_newest_first_and_bounded() {
        let history = History::new(MemoryKv::new());
        for i in 0..25u64 {
            history.add(item(&i.to_string(), i)).unwrap();
        }

        let items = history.all().unwrap();
        assert_eq!(items.len(), MAX_ITEMS);
        assert_eq!(items[0].id, "24");
        assert_eq!(items[MAX_ITEMS - 1].id, "5");
    }

    #[test]
    fn test_add_same_id_moves_to_front() {
        let history = History::new(MemoryKv::new());
        history.add(item("a", 1)).unwrap();
        history.add(item("b", 2)).unwrap();
        let items = history.add(item("a", 3)).unwrap();

        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_merge_unions_by_id() {
        let history = History::new(MemoryKv::new()).with_max_items(3);
        history.add(item("local", 5)).unwrap();

        let merged = history
            .merge(vec![item("local", 1), item("cloud-new", 9), item("cloud-old", 2), item("ancient", 0)])
            .unwrap();

        let ids: Vec<&str> = merged.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["cloud-new", "local", "cloud-old"]);
        assert_eq!(merged[1].date, 5);
    }

    #[test]
    fn test_remove_and_clear() {
        let history = History::new(SqliteKv::in_memory().unwrap());
        history.add(item("a", 1)).unwrap();
        history.add(item("b", 2)).unwrap();

        assert!(history.remove("a").unwrap());
        assert!(!history.remove("a").unwrap());
        assert_eq!(history.all().unwrap().len(), 1);

        history.clear().unwrap();
        assert!(history.all().unwrap().is_empty());
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(item("x", 7)).unwrap();
        assert_eq!(json["type"], "DOC");
        assert_eq!(json["fullText"], "text x");
        assert_eq!(json["date"], 7);
        assert!(json.get("preview").is_none());
    }

    #[test]
    fn test_summary_is_truncated() {
        let item = HistoryItem::new("long", HistoryKind::Ocr, "z".repeat(500));
        assert_eq!(item.summary.chars().count(), HistoryItem::SUMMARY_CHARS);
    }

    #[test]
    fn test_corrupt_history_reads_empty() {
        let kv = MemoryKv::new();
        kv.put(HISTORY_KEY, "garbage").unwrap();
        let history = History::new(&kv);
        assert!(history.all().unwrap().is_empty());
    }
}
