//! XML-like markup of the store for display.
//!
//! [`to_markup`] produces one string per line. Hosts that show the markup
//! as text pass the lines through [`render_markup`], which escapes them and
//! joins them with a host-specific line break.

use crate::{error::Result, Error, Field, Record};

/// First line of every document.
pub const XML_DECLARATION: &str = "<?xml version='1.0' encoding='UTF-8' standalone='yes'?>";

/// Element wrapping the whole collection.
pub const ROOT_ELEMENT: &str = "root";

/// Element wrapping a single record.
pub const ITEM_ELEMENT: &str = "dataitem";

/// Number of lines in a document with no records.
pub const EMPTY_DOCUMENT_LINES: usize = 3;

/// Build the markup lines for a sequence of records.
pub fn to_markup<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
    let records = records.into_iter();
    let (hint, _) = records.size_hint();
    let mut lines = Vec::with_capacity(EMPTY_DOCUMENT_LINES + hint * (Field::ALL.len() + 2));

    lines.push(XML_DECLARATION.to_string());
    lines.push(format!("<{}>", ROOT_ELEMENT));

    for record in records {
        lines.push(format!(" <{}>", ITEM_ELEMENT));
        for field in Field::ALL {
            let text = match field {
                Field::Id => record.id.to_string(),
                Field::Name => record.name.clone(),
                Field::Value => record.value.to_string(),
            };
            lines.push(format!("  <{0}>{1}</{0}>", field, text));
        }
        lines.push(format!(" </{}>", ITEM_ELEMENT));
    }

    lines.push(format!("</{}>", ROOT_ELEMENT));

    tracing::trace!(lines = lines.len(), "built markup");
    lines
}

/// Build markup from untyped JSON handed over by a host.
///
/// The input must be an array of records; anything else fails with
/// [`Error::NotASequence`].
pub fn markup_from_json(input: &serde_json::Value) -> Result<Vec<String>> {
    let items = input
        .as_array()
        .ok_or_else(|| Error::NotASequence(describe(input)))?;

    let records = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<Record>(item.clone())
                .map_err(|e| Error::NotASequence(format!("element {}: {}", i, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(to_markup(&records))
}

fn describe(value: &serde_json::Value) -> String {
    const MAX_LEN: usize = 64;
    let mut text = value.to_string();
    if text.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}

/// Escape the characters that are significant in HTML text.
pub fn escape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape markup lines for display, ending each with `line_break`.
///
/// Returns `None` when the document holds no records, in which case there
/// is nothing worth showing.
pub fn render_markup<S: AsRef<str>>(lines: &[S], line_break: &str) -> Option<String> {
    if lines.len() <= EMPTY_DOCUMENT_LINES {
        return None;
    }

    let mut out = String::new();
    for line in lines {
        out.push_str(&escape(line.as_ref()));
        out.push_str(line_break);
    }
    Some(out)
}
