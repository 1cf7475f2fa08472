//! Command handlers - apply console commands to the store.

use crate::commands::{Command, HELP};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::render;
use ferrand_engine::KeyValueStore;
use std::io::{BufRead, Write};

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this text and keep reading
    Show(String),
    /// Nothing to print
    Silent,
    /// Stop reading input
    Quit,
}

/// One interactive session over a single store.
#[derive(Debug)]
pub struct Session {
    store: KeyValueStore,
    config: Config,
}

impl Session {
    /// Start a session with an empty store.
    pub fn new(config: Config) -> Self {
        Self {
            store: KeyValueStore::new(),
            config,
        }
    }

    /// The store behind this session.
    pub fn store(&self) -> &KeyValueStore {
        &self.store
    }

    /// Apply one command.
    pub fn handle(&mut self, command: Command) -> Result<Reply> {
        let reply = match command {
            Command::Add(raw) => {
                let record = self.store.add_entry(&raw)?;
                tracing::info!(id = %record.id, "added {}", record.label());
                self.rendered()
            }
            Command::Delete(ids) => {
                // Nothing selected, nothing to do
                if ids.is_empty() {
                    return Ok(Reply::Silent);
                }
                let removed = self.store.remove_entries(ids);
                tracing::info!(removed, "deleted entries");
                self.rendered()
            }
            Command::Sort(field) => {
                let field = field.unwrap_or(self.config.default_sort);
                self.store.sort_by(field);
                self.rendered()
            }
            Command::List => Reply::Show(render::list(&self.store.list_items())),
            Command::Xml => match render::xml(&self.store, &self.config.line_break) {
                Some(text) => Reply::Show(text),
                None => Reply::Show("  (nothing to show)\n".to_string()),
            },
            Command::Json => {
                let mut json = self.store.export_state().to_json_pretty()?;
                json.push('\n');
                Reply::Show(json)
            }
            Command::Help => Reply::Show(format!("{}\n", HELP)),
            Command::Quit => Reply::Quit,
        };

        Ok(reply)
    }

    /// Re-render the list after a change.
    fn rendered(&self) -> Reply {
        if self.config.echo_json {
            match self.store.export_state().to_json() {
                Ok(json) => tracing::debug!(%json, "store state"),
                Err(e) => tracing::warn!("could not serialize store state: {}", e),
            }
        }
        Reply::Show(render::list(&self.store.list_items()))
    }

    /// Parse and apply one input line, turning failures into notices.
    ///
    /// Only I/O failures are returned as errors; everything else is shown to
    /// the user and the session carries on.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        let result = Command::parse(line).and_then(|command| match command {
            Some(command) => self.handle(command),
            None => Ok(Reply::Silent),
        });

        match result {
            Ok(reply) => reply,
            Err(e) => Reply::Show(render::notice(&e.to_notice())),
        }
    }

    /// Read commands from `input` until it ends or the user quits.
    pub fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        write!(output, "{}", self.config.prompt)?;
        output.flush()?;

        for line in input.lines() {
            let line = line.map_err(AppError::Io)?;

            match self.handle_line(&line) {
                Reply::Show(text) => output.write_all(text.as_bytes())?,
                Reply::Silent => {}
                Reply::Quit => return Ok(()),
            }

            write!(output, "{}", self.config.prompt)?;
            output.flush()?;
        }

        writeln!(output)?;
        Ok(())
    }
}
