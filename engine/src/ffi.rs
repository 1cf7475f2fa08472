//! FFI layer for UI hosts.
//!
//! This module provides C-compatible functions that a browser (through a
//! WASM shim) or a native UI can call. All data crosses the boundary as JSON
//! strings.
//!
//! # Memory Management
//!
//! - Strings returned by `ferrand_*` functions are allocated by Rust
//! - Caller must free them with `ferrand_string_free`
//! - Store pointers must be freed with `ferrand_store_free`
//!
//! # Error Handling
//!
//! Functions return JSON with either:
//! - `{"ok": <result>}` on success
//! - `{"error": {"kind": "...", "title": "...", "message": "..."}}` on failure
//!
//! `kind` is stable and meant for matching; `title` and `message` are meant
//! for showing to the user.

use crate::{markup, validate, Error, Field, KeyValueStore, RecordId, StoreSnapshot};
use std::ffi::{c_char, CStr, CString};

/// Error body for FFI responses.
#[derive(serde::Serialize)]
struct FfiError {
    kind: &'static str,
    title: &'static str,
    message: String,
}

impl From<&Error> for FfiError {
    fn from(e: &Error) -> Self {
        Self {
            kind: e.kind(),
            title: e.title(),
            message: e.to_string(),
        }
    }
}

/// Result wrapper for FFI responses.
#[derive(serde::Serialize)]
#[serde(untagged)]
enum FfiResult<T: serde::Serialize> {
    Ok { ok: T },
    Err { error: FfiError },
}

impl<T: serde::Serialize> FfiResult<T> {
    fn ok(value: T) -> Self {
        FfiResult::Ok { ok: value }
    }

    fn engine(e: &Error) -> Self {
        FfiResult::Err { error: e.into() }
    }

    /// An error raised by the boundary itself rather than the engine.
    fn boundary(message: impl Into<String>) -> Self {
        FfiResult::Err {
            error: FfiError {
                kind: "boundary",
                title: "Bad call",
                message: message.into(),
            },
        }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"error":{{"kind":"boundary","title":"Bad call","message":"serialization failed: {}"}}}}"#,
                e
            )
        })
    }
}

/// Serialize an engine result into an owned C string.
fn respond<T: serde::Serialize>(result: crate::error::Result<T>) -> *mut c_char {
    match result {
        Ok(value) => to_c_string(FfiResult::ok(value).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::engine(&e).to_json()),
    }
}

fn boundary_error(message: impl Into<String>) -> *mut c_char {
    to_c_string(FfiResult::<()>::boundary(message).to_json())
}

/// Convert a Rust string to a C string pointer.
/// Caller must free with `ferrand_string_free`.
fn to_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => {
            // String contained null bytes - return error JSON
            let error = r#"{"error":{"kind":"boundary","title":"Bad call","message":"string contained null bytes"}}"#;
            CString::new(error).unwrap_or_default().into_raw()
        }
    }
}

/// Convert a C string pointer to a Rust string.
/// Returns None if pointer is null or invalid UTF-8.
unsafe fn from_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

// ============================================================================
// Store Lifecycle
// ============================================================================

/// Create a new, empty store.
///
/// # Returns
/// Pointer to the store. Free it with `ferrand_store_free`.
#[no_mangle]
pub extern "C" fn ferrand_store_new() -> *mut KeyValueStore {
    Box::into_raw(Box::new(KeyValueStore::new()))
}

/// Free a store.
///
/// # Safety
/// - `store` must be a valid pointer from `ferrand_store_new`
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn ferrand_store_free(store: *mut KeyValueStore) {
    if !store.is_null() {
        drop(Box::from_raw(store));
    }
}

/// Free a string allocated by the engine.
///
/// # Safety
/// - `s` must be a valid pointer from a `ferrand_*` function
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn ferrand_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

// ============================================================================
// Store Operations
// ============================================================================

/// Validate and add a `name=value` entry.
///
/// # Returns
/// JSON string: `{"ok": Record}` or `{"error": {...}}`
///
/// # Safety
/// - `store` must be a valid pointer from `ferrand_store_new` or null
/// - `raw` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `ferrand_string_free`
#[no_mangle]
pub unsafe extern "C" fn ferrand_store_add(
    store: *mut KeyValueStore,
    raw: *const c_char,
) -> *mut c_char {
    let store = match store.as_mut() {
        Some(s) => s,
        None => return boundary_error("null store pointer"),
    };

    // A missing or non-UTF-8 string is not a pair at all
    let raw = match from_c_string(raw) {
        Some(s) => s,
        None => return respond::<()>(Err(Error::Format(String::new()))),
    };

    respond(store.add_entry(&raw))
}

/// Remove the records with the given ids.
///
/// # Arguments
/// - `ids_json`: JSON array of record ids, e.g. `[1, 4]`
///
/// # Returns
/// JSON string: `{"ok": <removed count>}` or `{"error": {...}}`
///
/// # Safety
/// - `store` must be a valid pointer from `ferrand_store_new` or null
/// - `ids_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `ferrand_string_free`
#[no_mangle]
pub unsafe extern "C" fn ferrand_store_remove(
    store: *mut KeyValueStore,
    ids_json: *const c_char,
) -> *mut c_char {
    let store = match store.as_mut() {
        Some(s) => s,
        None => return boundary_error("null store pointer"),
    };

    let ids_str = match from_c_string(ids_json) {
        Some(s) => s,
        None => return boundary_error("invalid ids JSON"),
    };

    let ids: Vec<RecordId> = match serde_json::from_str(&ids_str) {
        Ok(ids) => ids,
        Err(e) => return boundary_error(format!("parse error: {}", e)),
    };

    respond(Ok(store.remove_entries(ids)))
}

/// Sort the store by a field.
///
/// # Arguments
/// - `field`: `"id"`, `"name"` or `"value"` (case-insensitive)
///
/// # Returns
/// JSON string: `{"ok": null}` or `{"error": {...}}`
///
/// # Safety
/// - `store` must be a valid pointer from `ferrand_store_new` or null
/// - `field` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `ferrand_string_free`
#[no_mangle]
pub unsafe extern "C" fn ferrand_store_sort(
    store: *mut KeyValueStore,
    field: *const c_char,
) -> *mut c_char {
    let store = match store.as_mut() {
        Some(s) => s,
        None => return boundary_error("null store pointer"),
    };

    let field_str = match from_c_string(field) {
        Some(s) => s,
        None => return boundary_error("invalid field"),
    };

    respond(
        field_str
            .parse::<Field>()
            .map(|field| store.sort_by(field)),
    )
}

/// Get all records in display order.
///
/// # Returns
/// JSON string: `{"ok": [Record, ...]}` or `{"error": {...}}`
///
/// # Safety
/// - `store` must be a valid pointer from `ferrand_store_new` or null
/// - Caller must free the returned string with `ferrand_string_free`
#[no_mangle]
pub unsafe extern "C" fn ferrand_store_records(store: *const KeyValueStore) -> *mut c_char {
    let store = match store.as_ref() {
        Some(s) => s,
        None => return boundary_error("null store pointer"),
    };

    respond(Ok(store.records()))
}

/// Get the rows of a selectable list view.
///
/// # Returns
/// JSON string: `{"ok": [{"id": 1, "label": "name=value"}, ...]}`
///
/// # Safety
/// - `store` must be a valid pointer from `ferrand_store_new` or null
/// - Caller must free the returned string with `ferrand_string_free`
#[no_mangle]
pub unsafe extern "C" fn ferrand_store_list_items(store: *const KeyValueStore) -> *mut c_char {
    let store = match store.as_ref() {
        Some(s) => s,
        None => return boundary_error("null store pointer"),
    };

    respond(Ok(store.list_items()))
}

/// Build markup lines.
///
/// # Arguments
/// - `records_json`: null for the whole store, otherwise a JSON array of
///   records. Any other JSON fails with kind `notASequence`.
///
/// # Returns
/// JSON string: `{"ok": ["<?xml ...?>", "<root>", ...]}` or `{"error": {...}}`
///
/// # Safety
/// - `store` must be a valid pointer from `ferrand_store_new` or null
/// - `records_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `ferrand_string_free`
#[no_mangle]
pub unsafe extern "C" fn ferrand_store_markup(
    store: *const KeyValueStore,
    records_json: *const c_char,
) -> *mut c_char {
    let store = match store.as_ref() {
        Some(s) => s,
        None => return boundary_error("null store pointer"),
    };

    if records_json.is_null() {
        return respond(Ok(store.to_markup()));
    }

    let records_str = match from_c_string(records_json) {
        Some(s) => s,
        None => return boundary_error("invalid records JSON"),
    };

    let records: serde_json::Value = match serde_json::from_str(&records_str) {
        Ok(v) => v,
        Err(e) => return respond::<()>(Err(Error::NotASequence(e.to_string()))),
    };

    respond(markup::markup_from_json(&records))
}

/// Escape markup lines for display.
///
/// # Arguments
/// - `lines_json`: JSON array of markup lines
/// - `line_break`: text appended to every line, e.g. `<br />`
///
/// # Returns
/// JSON string: `{"ok": "<escaped text>"}`, or `{"ok": null}` when the
/// document holds no records.
///
/// # Safety
/// - `lines_json` and `line_break` must be valid null-terminated C strings or null
/// - Caller must free the returned string with `ferrand_string_free`
#[no_mangle]
pub unsafe extern "C" fn ferrand_render_markup(
    lines_json: *const c_char,
    line_break: *const c_char,
) -> *mut c_char {
    let lines_str = match from_c_string(lines_json) {
        Some(s) => s,
        None => return boundary_error("invalid lines JSON"),
    };

    let line_break = match from_c_string(line_break) {
        Some(s) => s,
        None => return boundary_error("invalid line break"),
    };

    let lines: Vec<String> = match serde_json::from_str(&lines_str) {
        Ok(lines) => lines,
        Err(e) => return respond::<()>(Err(Error::NotASequence(e.to_string()))),
    };

    respond(Ok(markup::render_markup(&lines, &line_break)))
}

/// Check the structure of a `name=value` string.
///
/// # Returns
/// JSON string: `{"ok": true|false}`, or `{"error": {...}}` with kind
/// `format` when the input is too short to be a pair.
///
/// # Safety
/// - `raw` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `ferrand_string_free`
#[no_mangle]
pub unsafe extern "C" fn ferrand_validate_format(raw: *const c_char) -> *mut c_char {
    let raw = match from_c_string(raw) {
        Some(s) => s,
        None => return respond::<()>(Err(Error::Format(String::new()))),
    };

    respond(validate::validate_format(&raw))
}

// ============================================================================
// Snapshots
// ============================================================================

/// Export store state as a snapshot.
///
/// # Returns
/// JSON string: `{"ok": StoreSnapshot}` or `{"error": {...}}`
///
/// # Safety
/// - `store` must be a valid pointer from `ferrand_store_new` or null
/// - Caller must free the returned string with `ferrand_string_free`
#[no_mangle]
pub unsafe extern "C" fn ferrand_store_export(store: *const KeyValueStore) -> *mut c_char {
    let store = match store.as_ref() {
        Some(s) => s,
        None => return boundary_error("null store pointer"),
    };

    respond(Ok(store.export_state()))
}

/// Import state from a snapshot.
///
/// # Arguments
/// - `snapshot_json`: JSON string of StoreSnapshot
///
/// # Returns
/// JSON string: `{"ok": null}` or `{"error": {...}}`
///
/// # Safety
/// - `store` must be a valid pointer from `ferrand_store_new` or null
/// - `snapshot_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `ferrand_string_free`
#[no_mangle]
pub unsafe extern "C" fn ferrand_store_import(
    store: *mut KeyValueStore,
    snapshot_json: *const c_char,
) -> *mut c_char {
    let store = match store.as_mut() {
        Some(s) => s,
        None => return boundary_error("null store pointer"),
    };

    let snapshot_str = match from_c_string(snapshot_json) {
        Some(s) => s,
        None => return boundary_error("invalid snapshot JSON"),
    };

    respond(StoreSnapshot::from_json(&snapshot_str).and_then(|s| store.import_state(s)))
}

// ============================================================================
// Utility
// ============================================================================

/// Get the engine version.
///
/// # Returns
/// Static string pointer (do not free)
#[no_mangle]
pub extern "C" fn ferrand_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

/// Get the snapshot format version.
#[no_mangle]
pub extern "C" fn ferrand_snapshot_format_version() -> u32 {
    crate::SNAPSHOT_FORMAT_VERSION
}
