//! Key-value storage seam.
//!
//! Documents and history are persisted as JSON strings under string keys.
//! The document model never sees this trait; only the repositories do.

use crate::error::StoreResult;

pub trait KvStore {
    /// Value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Returns whether it existed.
    fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Keys starting with `prefix`, sorted.
    fn keys(&self, prefix: &str) -> StoreResult<Vec<String>>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        (**self).delete(key)
    }

    fn keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        (**self).keys(prefix)
    }
}
