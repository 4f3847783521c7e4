mod value;
pub(crate) use value::Value;

use rusqlite::Connection as RusqliteConnection;
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use url::Url;
use weave_core::{
    driver::{Capability, Command, CommandKind, Generator, Provider, Response, SourceHandle},
    err, Error, Mapping, Record, Result, Schema, Source,
};
use weave_sql::{Flavor, SqlGenerator};

/// Provider for sources with a `sqlite:` connection URL.
#[derive(Debug, Default)]
pub struct Sqlite;

impl Sqlite {
    pub fn new() -> Self {
        Self
    }
}

impl Provider for Sqlite {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn capability(&self) -> &Capability {
        &Capability::SQLITE
    }

    fn connect(&self, source: &Source) -> Result<Arc<dyn weave_core::Connection>> {
        let connection = Connection::from_url(&source.connection)?;
        Ok(Arc::new(connection))
    }

    fn generate(
        &self,
        source: &SourceHandle,
        mapping: &Arc<Mapping>,
        schema: &Schema,
    ) -> Result<Box<dyn Generator>> {
        let generator = SqlGenerator::new(Flavor::Sqlite, source, mapping, schema)?;
        Ok(Box::new(generator))
    }
}

/// Where a connection's database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    InMemory,
}

impl Location {
    /// Parses a `sqlite:` connection URL. `sqlite::memory:` opens a private
    /// in-memory database; anything else names a file.
    pub fn parse(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)?;

        if parsed.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url}"
            )));
        }

        match parsed.path() {
            ":memory:" => Ok(Self::InMemory),
            "" => Err(Error::invalid_connection_url(format!(
                "connection URL has no database path; url={url}"
            ))),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: Mutex<RusqliteConnection>,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::driver)?;
        Ok(Self::from_rusqlite(connection))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver)?;
        Ok(Self::from_rusqlite(connection))
    }

    pub fn from_url(url: &str) -> Result<Self> {
        match Location::parse(url)? {
            Location::InMemory => Self::in_memory(),
            Location::File(path) => Self::open(path),
        }
    }

    fn from_rusqlite(connection: RusqliteConnection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }
}

impl weave_core::Connection for Connection {
    fn exec(&self, commands: &[Command]) -> Result<Vec<Response>> {
        let mut connection = self
            .connection
            .lock()
            .map_err(|_| err!("sqlite connection lock poisoned"))?;

        // Dropping the transaction without committing rolls it back
        let tx = connection.transaction().map_err(Error::driver)?;

        let mut responses = Vec::with_capacity(commands.len());
        for command in commands {
            responses.push(exec_one(&tx, command)?);
        }

        tx.commit().map_err(Error::driver)?;
        Ok(responses)
    }
}

fn exec_one(connection: &RusqliteConnection, command: &Command) -> Result<Response> {
    match command.kind {
        CommandKind::Text => {}
        CommandKind::StoredProcedure => {
            return Err(Error::unsupported_feature(format!(
                "SQLite has no stored procedures; procedure={}",
                command.text
            )));
        }
        CommandKind::Native => {
            return Err(Error::unsupported_feature(format!(
                "native command `{}` on SQLite",
                command.text
            )));
        }
    }

    tracing::trace!(sql = %command.text, params = command.params.len(), "sqlite exec");

    let mut stmt = connection
        .prepare_cached(&command.text)
        .map_err(Error::driver)?;

    let params: Vec<Value> = command.params.iter().cloned().map(Value::from).collect();

    if stmt.column_count() == 0 {
        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver)?;

        let mut response = Response::count(count as u64);
        if command.generates_key {
            response = response.with_generated_key(connection.last_insert_rowid());
        }
        return Ok(response);
    }

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut rows = stmt
        .query(rusqlite::params_from_iter(params.iter()))
        .map_err(Error::driver)?;

    let mut records = vec![];

    while let Some(row) = rows.next().map_err(Error::driver)? {
        let mut record = Record::new();
        for (index, column) in columns.iter().enumerate() {
            let value = row.get_ref(index).map_err(Error::driver)?;
            record.insert(column.clone(), Value::from_sql(value)?.into_inner());
        }
        records.push(record);
    }

    Ok(Response::records(records))
}
