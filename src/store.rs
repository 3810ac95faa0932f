/// The strand store: named strands persisted as one JSON value.
///
/// Every public operation is total. Storage failures are logged and turned
/// into `false`, an empty list or `None`; the `try_*` forms expose the
/// underlying `StorageError` for callers that want it.

use crate::error::StorageError;
use crate::mirror::Mirror;
use crate::storage::{LocalStorage, STRANDS_KEY, StrandList, StrandStorage};
use crate::strand::{Strand, StrandValue};

pub struct StrandStore<S: StrandStorage = LocalStorage> {
    storage: S,
    key: String,
    mirror: Mirror,
}

impl StrandStore<LocalStorage> {
    /// Store over `window.localStorage`, reporting to the global mirror.
    pub fn local(key: &str) -> Self {
        StrandStore::new(LocalStorage, Mirror::global()).with_key(key)
    }
}

impl<S: StrandStorage> StrandStore<S> {
    pub fn new(storage: S, mirror: Mirror) -> Self {
        StrandStore {
            storage,
            key: STRANDS_KEY.to_string(),
            mirror,
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// All stored strands in insertion order; empty on any failure.
    pub fn get_strands(&self) -> Vec<Strand> {
        self.read_or_empty("get strands").strands
    }

    pub fn get_strand(&self, name: &str) -> Option<Strand> {
        self.get_strands().into_iter().find(|s| s.name == name)
    }

    pub fn set_strand(&self, name: &str, value: impl Into<StrandValue>) -> bool {
        let strand = Strand::new(name, value);
        self.report("set strand", self.try_set_strands(vec![strand]))
    }

    pub fn set_strands(&self, strands: Vec<Strand>) -> bool {
        self.report("set strands", self.try_set_strands(strands))
    }

    pub fn clear_strands(&self) -> bool {
        self.report("clear strands", self.try_clear_strands())
    }

    /// Removing a name that is not stored still succeeds.
    pub fn remove_strand(&self, name: &str) -> bool {
        self.report("remove strand", self.try_remove_strand(name))
    }

    pub fn try_get_strands(&self) -> Result<Vec<Strand>, StorageError> {
        let list = self.load()?;
        self.mirror.update(&list.strands);
        Ok(list.strands)
    }

    pub fn try_set_strands(&self, strands: Vec<Strand>) -> Result<(), StorageError> {
        let mut list = self.read_or_empty("read before write");
        list.upsert_all(strands);
        self.save(&list)
    }

    pub fn try_clear_strands(&self) -> Result<(), StorageError> {
        self.storage.remove_item(&self.key)?;
        self.mirror.update(&[]);
        Ok(())
    }

    pub fn try_remove_strand(&self, name: &str) -> Result<(), StorageError> {
        let mut list = self.read_or_empty("read before remove");
        list.remove(name);
        self.save(&list)
    }

    fn load(&self) -> Result<StrandList, StorageError> {
        match self.storage.get_item(&self.key)? {
            Some(json) => StrandList::from_json(&json),
            None => Ok(StrandList::new()),
        }
    }

    fn save(&self, list: &StrandList) -> Result<(), StorageError> {
        self.storage.set_item(&self.key, &list.to_json()?)?;
        self.mirror.update(&list.strands);
        Ok(())
    }

    // A failed read still refreshes the mirror, to the empty state.
    fn read_or_empty(&self, operation: &str) -> StrandList {
        match self.load() {
            Ok(list) => {
                self.mirror.update(&list.strands);
                list
            }
            Err(e) => {
                log::error!("Error on {} ({}): {}", operation, self.key, e);
                self.mirror.update(&[]);
                StrandList::new()
            }
        }
    }

    fn report(&self, operation: &str, result: Result<(), StorageError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error on {} ({}): {}", operation, self.key, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FailureMode, MemoryStorage};

    fn create_test_store() -> (StrandStore<MemoryStorage>, MemoryStorage, Mirror) {
        let storage = MemoryStorage::new();
        let mirror = Mirror::detached();
        let store = StrandStore::new(storage.clone(), mirror.clone());
        (store, storage, mirror)
    }

    #[test]
    fn test_empty_store() {
        let (store, _, _) = create_test_store();

        assert!(store.get_strands().is_empty());
        assert!(store.get_strand("role").is_none());
    }

    #[test]
    fn test_set_then_get() {
        let (store, _, _) = create_test_store();

        assert!(store.set_strand("role", "B"));

        assert_eq!(store.get_strand("role"), Some(Strand::new("role", "B")));
    }

    #[test]
    fn test_set_overwrites_without_duplicate() {
        let (store, _, _) = create_test_store();
        store.set_strand("role", "B");
        let len_before = store.get_strands().len();

        assert!(store.set_strand("role", "C"));

        assert_eq!(store.get_strands().len(), len_before);
        assert_eq!(store.get_strand("role"), Some(Strand::new("role", "C")));
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let (store, _, _) = create_test_store();
        store.set_strand("role", "A");
        store.set_strand("site", "north");

        store.set_strand("role", "C");

        let names: Vec<String> = store.get_strands().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["role", "site"]);
    }

    #[test]
    fn test_persisted_format() {
        let (store, storage, _) = create_test_store();

        store.set_strand("role", vec!["A".to_string(), "B".to_string()]);

        assert_eq!(
            storage.raw(STRANDS_KEY),
            Some(r#"[{"name":"role","value":["A","B"]}]"#.to_string())
        );
    }

    #[test]
    fn test_custom_key() {
        let storage = MemoryStorage::new();
        let store = StrandStore::new(storage.clone(), Mirror::detached()).with_key("other");

        store.set_strand("role", "A");

        assert_eq!(store.key(), "other");
        assert!(storage.raw("other").is_some());
        assert!(storage.raw(STRANDS_KEY).is_none());
    }

    #[test]
    fn test_set_strands_upserts_in_order() {
        let (store, storage, _) = create_test_store();
        store.set_strand("site", "north");

        let ok = store.set_strands(vec![
            Strand::new("role", "A"),
            Strand::new("site", "south"),
            Strand::new("role", "B"),
        ]);

        assert!(ok);
        assert_eq!(
            store.get_strands(),
            vec![Strand::new("site", "south"), Strand::new("role", "B")]
        );
        assert_eq!(
            storage.raw(STRANDS_KEY),
            Some(r#"[{"name":"site","value":"south"},{"name":"role","value":"B"}]"#.to_string())
        );
    }

    #[test]
    fn test_remove_strand() {
        let (store, _, mirror) = create_test_store();
        store.set_strand("role", "A");
        store.set_strand("site", "north");

        assert!(store.remove_strand("role"));

        assert_eq!(store.get_strands(), vec![Strand::new("site", "north")]);
        assert!(!mirror.snapshot().strands.contains_key("role"));
    }

    #[test]
    fn test_remove_missing_strand_succeeds() {
        let (store, _, _) = create_test_store();
        store.set_strand("role", "A");

        assert!(store.remove_strand("nonexistent"));
        assert_eq!(store.get_strands().len(), 1);
    }

    #[test]
    fn test_clear_strands() {
        let (store, storage, mirror) = create_test_store();
        store.set_strand("role", "A");
        store.set_strand("site", "north");

        assert!(store.clear_strands());

        assert!(store.get_strands().is_empty());
        assert!(mirror.snapshot().strands.is_empty());
        assert!(storage.raw(STRANDS_KEY).is_none());
    }

    #[test]
    fn test_mirror_tracks_writes() {
        let (store, _, mirror) = create_test_store();

        store.set_strand("role", "B");

        let state = mirror.snapshot();
        assert_eq!(state.strands["role"], StrandValue::One("B".to_string()));
        assert_eq!(state.vars["role"], serde_json::json!("B"));
    }

    #[test]
    fn test_mirror_refreshed_on_read() {
        let (store, storage, mirror) = create_test_store();
        storage
            .set_item(STRANDS_KEY, r#"[{"name":"role","value":"A"}]"#)
            .unwrap();
        assert!(mirror.snapshot().strands.is_empty());

        store.get_strands();

        assert_eq!(
            mirror.snapshot().strands["role"],
            StrandValue::One("A".to_string())
        );
    }

    #[test]
    fn test_read_failure_returns_empty() {
        let (store, storage, mirror) = create_test_store();
        store.set_strand("role", "A");

        storage.fail_with(Some(FailureMode::Reads));

        assert!(store.get_strands().is_empty());
        assert!(store.get_strand("role").is_none());
        assert!(mirror.snapshot().strands.is_empty());
        assert!(matches!(store.try_get_strands(), Err(StorageError::Read { .. })));
    }

    #[test]
    fn test_corrupt_data_returns_empty() {
        let (store, storage, _) = create_test_store();
        storage.set_item(STRANDS_KEY, "{not json").unwrap();

        assert!(store.get_strands().is_empty());
        assert!(matches!(store.try_get_strands(), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_write_after_corrupt_data_replaces_it() {
        let (store, storage, _) = create_test_store();
        storage.set_item(STRANDS_KEY, r#"{"role":"A"}"#).unwrap();

        assert!(store.set_strand("role", "B"));

        assert_eq!(
            storage.raw(STRANDS_KEY),
            Some(r#"[{"name":"role","value":"B"}]"#.to_string())
        );
    }

    #[test]
    fn test_foreign_values_survive_writes() {
        let (store, storage, mirror) = create_test_store();
        storage
            .set_item(
                STRANDS_KEY,
                r#"[{"name":"site","value":"north"},{"name":"score","value":5}]"#,
            )
            .unwrap();

        assert_eq!(store.get_strands().len(), 2);
        assert!(store.set_strand("role", "A"));

        assert_eq!(
            storage.raw(STRANDS_KEY),
            Some(
                r#"[{"name":"site","value":"north"},{"name":"score","value":5},{"name":"role","value":"A"}]"#
                    .to_string()
            )
        );
        assert_eq!(mirror.snapshot().vars["score"], serde_json::json!(5));
    }

    #[test]
    fn test_write_failure_returns_false() {
        let (store, storage, mirror) = create_test_store();
        store.set_strand("role", "A");

        storage.fail_with(Some(FailureMode::Writes));

        assert!(!store.set_strand("role", "B"));
        assert!(!store.set_strands(vec![Strand::new("site", "north")]));
        assert!(!store.remove_strand("role"));
        assert!(!store.clear_strands());

        storage.fail_with(None);
        assert_eq!(store.get_strands(), vec![Strand::new("role", "A")]);
        assert_eq!(
            mirror.snapshot().strands["role"],
            StrandValue::One("A".to_string())
        );
    }

    #[test]
    fn test_unavailable_storage_is_total() {
        let (store, storage, _) = create_test_store();
        storage.fail_with(Some(FailureMode::Everything));

        assert!(store.get_strands().is_empty());
        assert!(store.get_strand("role").is_none());
        assert!(!store.set_strand("role", "A"));
        assert!(!store.set_strands(Vec::new()));
        assert!(!store.clear_strands());
        assert!(!store.remove_strand("role"));
    }
}
