use super::{Command, Connection, Response};
use crate::{
    stmt::{Record, Value},
    Result,
};

use std::sync::Arc;

/// An ordered list of commands bound to one source.
///
/// A batch is created for one logical operation and consumed when executed.
/// Executing a batch without commands is a no-op.
#[derive(Debug)]
pub struct Batch {
    source: String,
    connection: Arc<dyn Connection>,
    commands: Vec<Command>,
}

impl Batch {
    pub fn new(source: impl Into<String>, connection: Arc<dyn Connection>) -> Self {
        Self {
            source: source.into(),
            connection,
            commands: vec![],
        }
    }

    /// Appends a command, returning the batch for chaining.
    pub fn add_command(mut self, command: Command) -> Self {
        self.push(command);
        self
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.commands.extend(commands);
    }

    /// Name of the source the batch runs against.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Runs every command and returns one response per command.
    pub fn execute_responses(self) -> Result<Vec<Response>> {
        if self.commands.is_empty() {
            return Ok(vec![]);
        }

        tracing::debug!(
            source = %self.source,
            commands = self.commands.len(),
            "executing batch"
        );

        self.connection.exec(&self.commands)
    }

    /// Runs every command and returns the total number of rows affected.
    pub fn execute(self) -> Result<u64> {
        Ok(self
            .execute_responses()?
            .iter()
            .map(|response| response.rows.count())
            .sum())
    }

    /// Runs every command and materializes the final command's result set.
    pub fn execute_dynamic(self) -> Result<Vec<Record>> {
        Ok(self
            .execute_responses()?
            .pop()
            .map(|response| response.rows.into_records())
            .unwrap_or_default())
    }

    /// Runs every command and returns the first field of the first record of
    /// the final result set, or `Null` if there is none.
    pub fn execute_scalar(self) -> Result<Value> {
        let scalar = self
            .execute_dynamic()?
            .into_iter()
            .next()
            .and_then(|record| record.into_iter().next())
            .map(|(_, value)| value);

        Ok(scalar.unwrap_or_default())
    }

    /// Runs every command and returns the total rows affected together with
    /// the key each command generated, in command order.
    pub fn execute_with_keys(self) -> Result<(u64, Vec<Option<Value>>)> {
        let responses = self.execute_responses()?;
        let count = responses.iter().map(|response| response.rows.count()).sum();
        let keys = responses
            .into_iter()
            .map(|response| response.generated_key)
            .collect();
        Ok((count, keys))
    }
}
