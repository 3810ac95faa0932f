/// Storage for the persisted strand list: the document type and the
/// string-keyed backends it is written to

use crate::error::StorageError;
use crate::strand::Strand;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Default key the strand list is stored under
pub const STRANDS_KEY: &str = "course_strands";

/// Root storage structure: an ordered JSON array of `{name, value}` records
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct StrandList {
    pub strands: Vec<Strand>,
}

impl StrandList {
    pub fn new() -> Self {
        StrandList {
            strands: Vec::new(),
        }
    }

    /// Replace the strand with the same name in place, or append it.
    pub fn upsert(&mut self, strand: Strand) {
        match self.strands.iter_mut().find(|s| s.name == strand.name) {
            Some(existing) => *existing = strand,
            None => self.strands.push(strand),
        }
    }

    /// Apply `upsert` for each strand in the order given.
    pub fn upsert_all(&mut self, strands: impl IntoIterator<Item = Strand>) {
        for strand in strands {
            self.upsert(strand);
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let original_len = self.strands.len();
        self.strands.retain(|s| s.name != name);
        self.strands.len() < original_len
    }

    pub fn get(&self, name: &str) -> Option<&Strand> {
        self.strands.iter().find(|s| s.name == name)
    }

    /// Parse the stored array entry by entry. Entries that are not
    /// `{name, value}` records are logged and dropped; only a value that is
    /// not an array at all is corrupt.
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;

        let strands = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Strand>(entry) {
                Ok(strand) => Some(strand),
                Err(e) => {
                    log::warn!("Dropping unreadable stored strand: {}", e);
                    None
                }
            })
            .collect();

        Ok(StrandList { strands })
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A simple string-keyed durable store.
///
/// Implementations report every failure as a `StorageError`; callers decide
/// whether to swallow it.
pub trait StrandStorage {
    /// `Ok(None)` when the key has never been written or was removed.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Succeeds even when the key does not exist.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Browser `window.localStorage`, looked up on every call so a missing or
/// disabled storage area surfaces as an error instead of a panic
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn area(&self) -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;

        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))
    }
}

impl StrandStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.area()?.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            message: format!("{:?}", e),
        })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.area()?.set_item(key, value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            message: format!("{:?}", e),
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.area()?.remove_item(key).map_err(|e| StorageError::Write {
            key: key.to_string(),
            message: format!("{:?}", e),
        })
    }
}

/// Which operations an in-memory store should refuse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    Reads,
    Writes,
    Everything,
}

#[derive(Debug, Default)]
struct MemoryInner {
    items: HashMap<String, String>,
    failure: Option<FailureMode>,
}

/// In-process storage. Clones share the same items, so a test can keep a
/// handle to inspect or break the store it handed to a `StrandStore`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent operations fail (`None` restores normal behavior).
    pub fn fail_with(&self, failure: Option<FailureMode>) {
        self.inner.borrow_mut().failure = failure;
    }

    /// Raw stored value, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().items.get(key).cloned()
    }

    fn refuses_reads(&self) -> bool {
        matches!(
            self.inner.borrow().failure,
            Some(FailureMode::Reads | FailureMode::Everything)
        )
    }

    fn refuses_writes(&self) -> bool {
        matches!(
            self.inner.borrow().failure,
            Some(FailureMode::Writes | FailureMode::Everything)
        )
    }
}

impl StrandStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.refuses_reads() {
            return Err(StorageError::Read {
                key: key.to_string(),
                message: "read refused".to_string(),
            });
        }
        Ok(self.inner.borrow().items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.refuses_writes() {
            return Err(StorageError::Write {
                key: key.to_string(),
                message: "quota exceeded".to_string(),
            });
        }
        self.inner
            .borrow_mut()
            .items
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.refuses_writes() {
            return Err(StorageError::Write {
                key: key.to_string(),
                message: "remove refused".to_string(),
            });
        }
        self.inner.borrow_mut().items.remove(key);
        Ok(())
    }
}
