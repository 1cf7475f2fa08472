//! # Ferrand Engine
//!
//! A validated, ordered list of `name=value` records.
//!
//! This crate is the logic behind the Ferrand list editor. A host (a
//! browser page through the [`ffi`] layer, or the console front-end) feeds
//! it raw user input and selections; the engine validates, stores, sorts
//! and serializes.
//!
//! ## Design Principles
//!
//! - **No IO**: Engine has no knowledge of files, network, or UI toolkits
//! - **Explicit state**: A [`KeyValueStore`] is a plain value owned by its host
//! - **Typed errors**: Every rejection is an [`Error`] variant, never a panic
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`Record`] is an id assigned by the store, an alphanumeric name that is
//! not itself a number, and an alphanumeric [`Value`]. Values that read as a
//! number are stored as numbers.
//!
//! ### Validation
//!
//! Input goes through two checks in [`validate`]:
//! - structure: exactly one `=`, neither first nor last
//! - content: both halves alphanumeric after trimming, name not numeric
//!
//! ### Ordering
//!
//! Records keep insertion order until [`KeyValueStore::sort_by`] is called
//! with a [`Field`]. New records are always appended.
//!
//! ### Markup
//!
//! [`markup::to_markup`] renders records as XML-like lines for display;
//! [`markup::render_markup`] escapes them for an HTML or text host.
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrand_engine::{Field, KeyValueStore, RecordId, Value};
//!
//! let mut store = KeyValueStore::new();
//!
//! let record = store.add_entry("size=12").unwrap();
//! assert_eq!(record.id, RecordId(1));
//! assert_eq!(record.value, Value::from(12u64));
//!
//! store.add_entry("colour = red").unwrap();
//! assert!(store.add_entry("12=ab").is_err());
//!
//! store.sort_by(Field::Name);
//! assert_eq!(store.records()[0].name, "colour");
//!
//! store.remove_entries([RecordId(1)]);
//! assert_eq!(store.len(), 1);
//!
//! let lines = store.to_markup();
//! assert_eq!(lines[3], "  <id>2</id>");
//! ```
//!
//! ## FFI
//!
//! The [`ffi`] module provides C-compatible functions for hosts written in
//! other languages. All data is exchanged as JSON strings.

pub mod compare;
pub mod error;
pub mod ffi;
pub mod markup;
pub mod record;
pub mod snapshot;
pub mod store;
pub mod validate;

// Re-export main types at crate root
pub use compare::Field;
pub use error::Error;
pub use record::{ListItem, Record, RecordId, Value};
pub use snapshot::{StoreSnapshot, SNAPSHOT_FORMAT_VERSION};
pub use store::KeyValueStore;
