//! Snapshot types for exporting and restoring store state.
//!
//! A snapshot is a plain JSON document holding the records in display order
//! and the next id to assign, so a host can hand the list back later without
//! ids being reused.

use crate::{error::Result, validate, Error, Record, RecordId, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Version of the snapshot format for future compatibility.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// A point-in-time snapshot of the store state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Snapshot format version
    pub format_version: u32,
    /// Id the store will assign to the next record
    pub next_id: RecordId,
    /// Records in display order
    pub records: Vec<Record>,
}

impl StoreSnapshot {
    /// Create a snapshot of the given records.
    pub fn new(next_id: RecordId, records: Vec<Record>) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            next_id,
            records,
        }
    }

    /// Count records in the snapshot.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Check the snapshot holds records the store could have produced.
    ///
    /// Ids must be unique and below `next_id`, and every name and value must
    /// pass the same rules as new input.
    pub fn validate(&self) -> Result<()> {
        self.check_format_version()?;

        if self.next_id.0 == 0 {
            return Err(Error::InvalidSnapshot("next id must be at least 1".into()));
        }

        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if !seen.insert(record.id) {
                return Err(Error::InvalidSnapshot(format!(
                    "duplicate record id {}",
                    record.id
                )));
            }

            if record.id.0 == 0 || record.id >= self.next_id {
                return Err(Error::InvalidSnapshot(format!(
                    "record id {} outside 1..{}",
                    record.id, self.next_id
                )));
            }

            let reject =
                |e: Error| Error::InvalidSnapshot(format!("record {}: {}", record.id, e));
            match &record.value {
                Value::Number(n) => {
                    validate::check_name(&record.name).map_err(reject)?;
                    if n.as_f64().map_or(true, |x| x < 0.0) {
                        return Err(Error::InvalidSnapshot(format!(
                            "record {}: negative value {}",
                            record.id, n
                        )));
                    }
                }
                Value::Text(text) => {
                    validate::check_pair(&record.name, text).map_err(reject)?;
                    if validate::is_numeric(text) {
                        return Err(Error::InvalidSnapshot(format!(
                            "record {}: numeric value {:?} stored as text",
                            record.id, text
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;

        snapshot.check_format_version()?;
        Ok(snapshot)
    }

    fn check_format_version(&self) -> Result<()> {
        if self.format_version > SNAPSHOT_FORMAT_VERSION {
            return Err(Error::InvalidSnapshot(format!(
                "unsupported snapshot format version: {} (max supported: {})",
                self.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }
        Ok(())
    }
}
