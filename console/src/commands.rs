//! Parsing of console input lines into commands.

use crate::error::{AppError, Result};
use ferrand_engine::{Field, RecordId};

/// Something the user asked the console to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a raw `name=value` entry
    Add(String),
    /// Delete the selected ids
    Delete(Vec<RecordId>),
    /// Sort by a field, or by the configured default
    Sort(Option<Field>),
    /// Show the list
    List,
    /// Show the list as escaped XML
    Xml,
    /// Dump the store as a JSON snapshot
    Json,
    Help,
    Quit,
}

/// Text printed by the `help` command.
pub const HELP: &str = "\
Commands:
  name=value          add an entry (letters and digits only; name not a number)
  add name=value      same as above
  delete <id>...      delete entries by id (also: del, rm)
  sort [id|name|value]
                      sort the list
  list                show the list (also: ls)
  xml                 show the list as XML
  json                show the list as a JSON snapshot
  help                show this help (also: ?)
  quit                leave (also: exit)";

impl Command {
    /// Parse one line of input.
    ///
    /// Returns `Ok(None)` for a blank line. A line containing `=`, or one
    /// that is not a known command word, is taken as an entry to add so
    /// the engine can report what is wrong with it.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        // `add = 5` is a pair named "add", not the keyword
        if word.eq_ignore_ascii_case("add") && !rest.starts_with('=') {
            return Ok(Some(Command::Add(rest.to_string())));
        }

        if line.contains('=') {
            return Ok(Some(Command::Add(line.to_string())));
        }

        let command = match word.to_ascii_lowercase().as_str() {
            "delete" | "del" | "rm" => Command::Delete(parse_ids(rest)?),
            "sort" if rest.is_empty() => Command::Sort(None),
            "sort" => Command::Sort(Some(rest.parse()?)),
            "list" | "ls" if rest.is_empty() => Command::List,
            "xml" if rest.is_empty() => Command::Xml,
            "json" if rest.is_empty() => Command::Json,
            "help" | "?" => Command::Help,
            "quit" | "exit" if rest.is_empty() => Command::Quit,
            _ => Command::Add(line.to_string()),
        };

        Ok(Some(command))
    }
}

fn parse_ids(text: &str) -> Result<Vec<RecordId>> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map(RecordId)
                .map_err(|_| AppError::BadCommand(format!("{:?} is not an entry id", s)))
        })
        .collect()
}
