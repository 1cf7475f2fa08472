//! Configuration management for the console.

use ferrand_engine::Field;
use std::env;

/// Console configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prompt printed before each line of input
    pub prompt: String,
    /// Text ending each line of displayed XML
    pub line_break: String,
    /// Field used by a bare `sort`
    pub default_sort: Field,
    /// Log the full list as JSON after every change
    pub echo_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            line_break: "\n".to_string(),
            default_sort: Field::Id,
            echo_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let prompt = lookup("FERRAND_PROMPT").unwrap_or(defaults.prompt);

        let line_break = lookup("FERRAND_LINE_BREAK")
            .map(|s| unescape(&s))
            .unwrap_or(defaults.line_break);

        let default_sort = match lookup("FERRAND_DEFAULT_SORT") {
            Some(s) => s
                .parse()
                .map_err(|_| ConfigError::InvalidSortField(s.clone()))?,
            None => defaults.default_sort,
        };

        let echo_json = match lookup("FERRAND_ECHO_JSON") {
            Some(s) => parse_bool(&s).ok_or(ConfigError::InvalidBool {
                var: "FERRAND_ECHO_JSON",
                value: s,
            })?,
            None => defaults.echo_json,
        };

        Ok(Self {
            prompt,
            line_break,
            default_sort,
            echo_json,
        })
    }
}

/// Turn `\n`, `\r` and `\t` escapes typed into a variable into characters.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("FERRAND_DEFAULT_SORT must be id, name or value (got {0:?})")]
    InvalidSortField(String),

    #[error("{var} must be a boolean (got {value:?})")]
    InvalidBool { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(load(&[]).unwrap(), Config::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = load(&[
            ("FERRAND_PROMPT", "kv> "),
            ("FERRAND_LINE_BREAK", "<br />"),
            ("FERRAND_DEFAULT_SORT", "Name"),
            ("FERRAND_ECHO_JSON", "yes"),
        ])
        .unwrap();

        assert_eq!(config.prompt, "kv> ");
        assert_eq!(config.line_break, "<br />");
        assert_eq!(config.default_sort, Field::Name);
        assert!(config.echo_json);
    }

    #[test]
    fn line_break_escapes() {
        let config = load(&[("FERRAND_LINE_BREAK", r"\r\n")]).unwrap();
        assert_eq!(config.line_break, "\r\n");

        assert_eq!(unescape(r"a\qb\"), r"a\qb\");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[("FERRAND_DEFAULT_SORT", "colour")]),
            Err(ConfigError::InvalidSortField(_))
        ));
        assert!(matches!(
            load(&[("FERRAND_ECHO_JSON", "maybe")]),
            Err(ConfigError::InvalidBool { .. })
        ));
    }
}
