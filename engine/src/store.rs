//! Store - the in-memory state container.
//!
//! The store holds the ordered list of records and the id counter. Records
//! are only ever created through [`KeyValueStore::add_entry`], which
//! validates the input first.

use crate::{
    error::Result, markup, validate, Error, Field, ListItem, Record, RecordId, StoreSnapshot,
    Value,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The main store holding all records.
///
/// Serializes as a [`StoreSnapshot`]. Deserializing goes through
/// [`KeyValueStore::import_state`], so a store read from JSON holds the same
/// guarantees as one built with [`KeyValueStore::add_entry`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "StoreSnapshot", into = "StoreSnapshot")]
pub struct KeyValueStore {
    /// Last id handed out; zero before the first insertion
    last_id: RecordId,
    /// Records in display order
    records: Vec<Record>,
}

impl KeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a `name=value` string and append it as a new record.
    ///
    /// The name and value are trimmed before validation. A value that reads
    /// as a number is stored as a number. The new record always goes to the
    /// end of the list, even after a sort.
    pub fn add_entry(&mut self, raw: &str) -> Result<Record> {
        let (name, value) = validate::split_pair(raw)?;
        validate::check_pair(name, value)?;

        let id = self.last_id.next();
        let record = Record::new(id, name, Value::from_input(value));

        self.last_id = id;
        self.records.push(record.clone());

        tracing::debug!(id = %record.id, name = %record.name, value = %record.value, "entry added");
        Ok(record)
    }

    /// Remove every record whose id is in `ids`.
    ///
    /// Unknown ids are ignored. Returns the number of records removed.
    pub fn remove_entries<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = RecordId>,
    {
        let ids: HashSet<RecordId> = ids.into_iter().collect();
        if ids.is_empty() {
            return 0;
        }

        let before = self.records.len();
        self.records.retain(|r| !ids.contains(&r.id));
        let removed = before - self.records.len();

        tracing::debug!(requested = ids.len(), removed, "entries removed");
        removed
    }

    /// Reorder the records by a field.
    ///
    /// The sort is stable, so records that compare equal keep their
    /// relative order.
    pub fn sort_by(&mut self, field: Field) {
        self.records.sort_by(|a, b| field.compare(a, b));
        tracing::debug!(%field, count = self.records.len(), "entries sorted");
    }

    /// Get a record by id.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// All records in display order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recently assigned id, if any record was ever added.
    pub fn last_id(&self) -> Option<RecordId> {
        (self.last_id.0 > 0).then_some(self.last_id)
    }

    /// Rows for a selectable list, in display order.
    pub fn list_items(&self) -> Vec<ListItem> {
        self.records.iter().map(ListItem::from).collect()
    }

    /// Markup lines for the whole collection.
    pub fn to_markup(&self) -> Vec<String> {
        markup::to_markup(&self.records)
    }

    /// Export the current store state as a snapshot.
    pub fn export_state(&self) -> StoreSnapshot {
        StoreSnapshot::new(self.last_id.next(), self.records.clone())
    }

    /// Import state from a snapshot.
    ///
    /// This replaces the current state with the snapshot's state. The
    /// snapshot is validated first, so a rejected import leaves the store
    /// untouched.
    pub fn import_state(&mut self, snapshot: StoreSnapshot) -> Result<()> {
        snapshot.validate()?;

        let last_id = snapshot
            .next_id
            .0
            .checked_sub(1)
            .map(RecordId)
            .ok_or_else(|| Error::InvalidSnapshot("next id must be at least 1".into()))?;

        self.last_id = last_id;
        self.records = snapshot.records;

        tracing::debug!(count = self.records.len(), last_id = %self.last_id, "state imported");
        Ok(())
    }
}

impl TryFrom<StoreSnapshot> for KeyValueStore {
    type Error = Error;

    fn try_from(snapshot: StoreSnapshot) -> Result<Self> {
        let mut store = Self::new();
        store.import_state(snapshot)?;
        Ok(store)
    }
}

impl From<KeyValueStore> for StoreSnapshot {
    fn from(store: KeyValueStore) -> Self {
        StoreSnapshot::new(store.last_id.next(), store.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[&str]) -> KeyValueStore {
        let mut store = KeyValueStore::new();
        for entry in entries {
            store.add_entry(entry).unwrap();
        }
        store
    }

    fn names(store: &KeyValueStore) -> Vec<&str> {
        store.records().iter().map(|r| r.name.as_str()).collect()
    }

    fn ids(store: &KeyValueStore) -> Vec<u64> {
        store.records().iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn create_store() {
        let store = KeyValueStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.last_id(), None);
    }

    #[test]
    fn add_numeric_value() {
        let mut store = KeyValueStore::new();
        let record = store.add_entry("ab=12").unwrap();

        assert_eq!(record, Record::new(RecordId(1), "ab", Value::from(12u64)));
        assert_eq!(store.get(RecordId(1)), Some(&record));
        assert_eq!(store.last_id(), Some(RecordId(1)));
    }

    #[test]
    fn add_trims_and_keeps_text() {
        let mut store = KeyValueStore::new();
        let record = store.add_entry("  colour =  red ").unwrap();

        assert_eq!(record.name, "colour");
        assert_eq!(record.value, Value::from("red"));
    }

    #[test]
    fn add_rejects_bad_input() {
        let mut store = KeyValueStore::new();

        assert!(matches!(
            store.add_entry("12=ab"),
            Err(Error::NameIsNumeric { .. })
        ));
        assert!(matches!(store.add_entry("a!=1"), Err(Error::Charset(_))));
        assert!(matches!(store.add_entry("noequals"), Err(Error::Format(_))));
        assert!(matches!(store.add_entry("a="), Err(Error::Format(_))));
        assert!(matches!(store.add_entry("a = "), Err(Error::Charset(_))));

        assert!(store.is_empty());
        assert_eq!(store.last_id(), None);
    }

    #[test]
    fn failed_add_does_not_consume_an_id() {
        let mut store = KeyValueStore::new();
        store.add_entry("a=1").unwrap();
        assert!(store.add_entry("b!=2").is_err());
        let record = store.add_entry("c=3").unwrap();
        assert_eq!(record.id, RecordId(2));
    }

    #[test]
    fn ids_increase_and_are_never_reused() {
        let mut store = store_with(&["a=1", "b=2", "c=3"]);
        assert_eq!(ids(&store), vec![1, 2, 3]);

        store.remove_entries([RecordId(3)]);
        let record = store.add_entry("d=4").unwrap();
        assert_eq!(record.id, RecordId(4));
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut store = store_with(&["a=1", "b=2", "c=3", "d=4"]);
        let removed = store.remove_entries([RecordId(2), RecordId(4)]);

        assert_eq!(removed, 2);
        assert_eq!(names(&store), vec!["a", "c"]);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut store = store_with(&["a=1", "b=2"]);
        let removed = store.remove_entries([RecordId(99)]);

        assert_eq!(removed, 0);
        assert_eq!(names(&store), vec!["a", "b"]);
        assert_eq!(store.remove_entries(Vec::new()), 0);
    }

    #[test]
    fn remove_duplicate_ids_counts_once() {
        let mut store = store_with(&["a=1", "b=2"]);
        let removed = store.remove_entries([RecordId(1), RecordId(1)]);
        assert_eq!(removed, 1);
        assert_eq!(names(&store), vec!["b"]);
    }

    #[test]
    fn sort_by_name() {
        let mut store = store_with(&["b=1", "a=2"]);
        store.sort_by(Field::Name);
        assert_eq!(names(&store), vec!["a", "b"]);

        store.sort_by(Field::Name);
        assert_eq!(names(&store), vec!["a", "b"]);
    }

    #[test]
    fn sort_by_value_puts_numbers_first() {
        let mut store = store_with(&["a=zebra", "b=10", "c=9", "d=apple"]);
        store.sort_by(Field::Value);
        assert_eq!(names(&store), vec!["c", "b", "d", "a"]);
    }

    #[test]
    fn sort_by_id_restores_insertion_order() {
        let mut store = store_with(&["c=1", "a=2", "b=3"]);
        store.sort_by(Field::Name);
        store.sort_by(Field::Id);
        assert_eq!(ids(&store), vec![1, 2, 3]);
    }

    #[test]
    fn add_after_sort_appends() {
        let mut store = store_with(&["c=1", "b=2"]);
        store.sort_by(Field::Name);
        store.add_entry("a=3").unwrap();
        assert_eq!(names(&store), vec!["b", "c", "a"]);
    }

    #[test]
    fn list_items_follow_display_order() {
        let mut store = store_with(&["b=2", "a=x"]);
        store.sort_by(Field::Name);

        let items = store.list_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, RecordId(2));
        assert_eq!(items[0].label, "a=x");
        assert_eq!(items[1].label, "b=2");
    }

    #[test]
    fn markup_of_empty_store() {
        let store = KeyValueStore::new();
        assert_eq!(store.to_markup().len(), markup::EMPTY_DOCUMENT_LINES);
    }

    #[test]
    fn markup_does_not_mutate() {
        let store = store_with(&["a=1"]);
        let before = store.records().to_vec();
        let _ = store.to_markup();
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn export_import_roundtrip() {
        let mut store = store_with(&["a=1", "b=two", "c=3"]);
        store.remove_entries([RecordId(3)]);
        store.sort_by(Field::Name);

        let snapshot = store.export_state();
        assert_eq!(snapshot.next_id, RecordId(4));

        let mut restored = KeyValueStore::new();
        restored.import_state(snapshot).unwrap();
        assert_eq!(restored.records(), store.records());

        let record = restored.add_entry("d=4").unwrap();
        assert_eq!(record.id, RecordId(4));
    }

    #[test]
    fn rejected_import_leaves_store_untouched() {
        let mut store = store_with(&["a=1"]);
        let mut snapshot = store.export_state();
        snapshot.next_id = RecordId(0);

        assert!(matches!(
            store.import_state(snapshot),
            Err(Error::InvalidSnapshot(_))
        ));
        assert_eq!(names(&store), vec!["a"]);
    }

    #[test]
    fn store_serialization() {
        let store = store_with(&["a=1", "b=x"]);
        let json = serde_json::to_string(&store).unwrap();
        let parsed: KeyValueStore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.records(), store.records());
        assert_eq!(parsed.last_id(), store.last_id());
    }

    #[test]
    fn store_serializes_as_snapshot() {
        let store = store_with(&["a=1"]);
        let value = serde_json::to_value(&store).unwrap();
        assert_eq!(value["formatVersion"], 1);
        assert_eq!(value["nextId"], 2);
        assert_eq!(value["records"][0]["name"], "a");
    }

    #[test]
    fn deserialized_store_cannot_reuse_ids() {
        // Counter behind the stored ids
        let json = r#"{"formatVersion":1,"nextId":1,"records":[{"id":1,"name":"a","value":1}]}"#;
        assert!(serde_json::from_str::<KeyValueStore>(json).is_err());

        // Raw field layout is not accepted either
        let json = r#"{"lastId":0,"records":[{"id":1,"name":"a","value":1}]}"#;
        assert!(serde_json::from_str::<KeyValueStore>(json).is_err());

        let json = r#"{"formatVersion":1,"nextId":2,"records":[{"id":1,"name":"a","value":1}]}"#;
        let mut store: KeyValueStore = serde_json::from_str(json).unwrap();
        let record = store.add_entry("b=2").unwrap();
        assert_eq!(record.id, RecordId(2));
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn deserialized_store_rejects_invalid_records() {
        let json = r#"{"formatVersion":1,"nextId":2,"records":[{"id":1,"name":"12","value":1}]}"#;
        assert!(serde_json::from_str::<KeyValueStore>(json).is_err());
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_name() -> impl Strategy<Value = String> {
            "[a-zA-Z][0-9A-Za-z]{0,7}"
        }

        fn arb_value() -> impl Strategy<Value = String> {
            prop_oneof!["[0-9]{1,6}", "[a-zA-Z][0-9A-Za-z]{0,7}"]
        }

        fn arb_entries() -> impl Strategy<Value = Vec<(String, String)>> {
            prop::collection::vec((arb_name(), arb_value()), 0..20)
        }

        fn filled(entries: &[(String, String)]) -> KeyValueStore {
            let mut store = KeyValueStore::new();
            for (name, value) in entries {
                store.add_entry(&format!("{}={}", name, value)).unwrap();
            }
            store
        }

        proptest! {
            #[test]
            fn prop_add_assigns_increasing_ids(entries in arb_entries()) {
                let mut store = KeyValueStore::new();
                let mut previous = RecordId(0);

                for (i, (name, value)) in entries.iter().enumerate() {
                    let record = store.add_entry(&format!("{}={}", name, value)).unwrap();
                    prop_assert!(record.id > previous);
                    prop_assert_eq!(store.len(), i + 1);
                    previous = record.id;
                }
            }

            #[test]
            fn prop_sort_is_idempotent(entries in arb_entries(), field_index in 0usize..3) {
                let field = Field::ALL[field_index];
                let mut store = filled(&entries);

                store.sort_by(field);
                let once = store.records().to_vec();
                store.sort_by(field);

                prop_assert_eq!(store.records(), once.as_slice());
            }

            #[test]
            fn prop_sort_keeps_records(entries in arb_entries(), field_index in 0usize..3) {
                let mut store = filled(&entries);
                let mut before: Vec<u64> = store.records().iter().map(|r| r.id.0).collect();

                store.sort_by(Field::ALL[field_index]);
                let mut after: Vec<u64> = store.records().iter().map(|r| r.id.0).collect();

                before.sort_unstable();
                after.sort_unstable();
                prop_assert_eq!(before, after);
            }

            #[test]
            fn prop_remove_preserves_relative_order(
                entries in arb_entries(),
                doomed in prop::collection::vec(1u64..25, 0..10),
            ) {
                let mut store = filled(&entries);
                let doomed: HashSet<RecordId> = doomed.into_iter().map(RecordId).collect();

                let expected: Vec<RecordId> = store
                    .records()
                    .iter()
                    .map(|r| r.id)
                    .filter(|id| !doomed.contains(id))
                    .collect();
                let removed = store.remove_entries(doomed.iter().copied());

                let remaining: Vec<RecordId> = store.records().iter().map(|r| r.id).collect();
                prop_assert_eq!(remaining.len() + removed, entries.len());
                prop_assert_eq!(remaining, expected);
            }

            #[test]
            fn prop_markup_line_count(entries in arb_entries()) {
                let store = filled(&entries);
                let lines = store.to_markup();
                prop_assert_eq!(
                    lines.len(),
                    markup::EMPTY_DOCUMENT_LINES + entries.len() * (Field::ALL.len() + 2)
                );
            }
        }
    }
}
