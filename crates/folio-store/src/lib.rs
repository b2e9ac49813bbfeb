//! Persistence for Folio documents and history.
//!
//! Everything is stored through the [`KvStore`] seam as JSON strings, with
//! an in-memory and a SQLite implementation.

mod error;
pub mod history;
pub mod kv;
pub mod memory;
pub mod repository;
pub mod sqlite;

pub use error::{StoreError, StoreResult};
pub use history::{History, HistoryItem, HistoryKind};
pub use kv::KvStore;
pub use memory::MemoryKv;
pub use repository::{DocumentRepository, StoredDocument};
pub use sqlite::SqliteKv;
