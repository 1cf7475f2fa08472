//! Field comparison for sorting the store.
//!
//! Ordering rules, applied to the chosen field of two records:
//! 1. Equal values compare equal
//! 2. Numbers compare numerically
//! 3. Text compares case-insensitively first, then lowercase before uppercase
//! 4. A number always sorts before text

use crate::{Error, Record, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A record field the store can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    #[default]
    Id,
    Name,
    Value,
}

impl Field {
    /// All sortable fields, in markup order.
    pub const ALL: [Field; 3] = [Field::Id, Field::Name, Field::Value];

    /// The field's name as used in markup and commands.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Value => "value",
        }
    }

    /// Compare two records by this field.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self {
            Field::Id => a.id.cmp(&b.id),
            Field::Name => compare_text(&a.name, &b.name),
            Field::Value => compare_values(&a.value, &b.value),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Field::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownField(wanted.to_string()))
    }
}

/// Compare two values of possibly different runtime types.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::Text(x), Value::Text(y)) => compare_text(x, y),
        (Value::Number(_), Value::Text(_)) => Ordering::Less,
        (Value::Text(_), Value::Number(_)) => Ordering::Greater,
    }
}

fn compare_numbers(a: &serde_json::Number, b: &serde_json::Number) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

/// Compare text the way a reader expects a list to be ordered.
///
/// `apple` and `Apple` sort next to each other rather than after every
/// other capitalised word; at equal letters the lowercase form comes first.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded
        .then_with(|| a.chars().map(case_rank).cmp(b.chars().map(case_rank)))
        .then_with(|| a.cmp(b))
}

fn case_rank(c: char) -> u8 {
    u8::from(c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordId;

    fn record(id: u64, name: &str, value: Value) -> Record {
        Record::new(RecordId(id), name, value)
    }

    #[test]
    fn parse_field_names() {
        assert_eq!("id".parse::<Field>(), Ok(Field::Id));
        assert_eq!("Name".parse::<Field>(), Ok(Field::Name));
        assert_eq!(" VALUE ".parse::<Field>(), Ok(Field::Value));
        assert_eq!(
            "colour".parse::<Field>(),
            Err(Error::UnknownField("colour".into()))
        );
    }

    #[test]
    fn text_is_case_insensitive_with_lowercase_first() {
        assert_eq!(compare_text("a", "b"), Ordering::Less);
        assert_eq!(compare_text("B", "a"), Ordering::Greater);
        assert_eq!(compare_text("a", "A"), Ordering::Less);
        assert_eq!(compare_text("A", "b"), Ordering::Less);
        assert_eq!(compare_text("abc", "abc"), Ordering::Equal);
        assert_eq!(compare_text("ab", "abc"), Ordering::Less);
    }

    #[test]
    fn text_orders_digits_before_letters() {
        assert_eq!(compare_text("9", "a"), Ordering::Less);
        assert_eq!(compare_text("10", "9"), Ordering::Less);
    }

    #[test]
    fn numbers_compare_numerically() {
        let nine = Value::from(9u64);
        let ten = Value::from(10u64);
        assert_eq!(compare_values(&nine, &ten), Ordering::Less);
        assert_eq!(compare_values(&ten, &nine), Ordering::Greater);
        assert_eq!(compare_values(&ten, &ten.clone()), Ordering::Equal);
    }

    #[test]
    fn numbers_sort_before_text() {
        let number = Value::from(500u64);
        let text = Value::from("abc");
        assert_eq!(compare_values(&number, &text), Ordering::Less);
        assert_eq!(compare_values(&text, &number), Ordering::Greater);
    }

    #[test]
    fn compare_records_by_field() {
        let a = record(1, "zeta", Value::from(2u64));
        let b = record(2, "alpha", Value::from(1u64));

        assert_eq!(Field::Id.compare(&a, &b), Ordering::Less);
        assert_eq!(Field::Name.compare(&a, &b), Ordering::Greater);
        assert_eq!(Field::Value.compare(&a, &b), Ordering::Greater);
    }
}
