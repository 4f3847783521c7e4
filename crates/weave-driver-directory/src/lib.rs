mod generator;
pub use generator::DirectoryGenerator;

pub mod op;
use op::Request;

use indexmap::IndexMap;
use std::{
    fmt,
    sync::{Arc, Mutex},
};
use url::Url;
use weave_core::{
    driver::{Capability, Command, Generator, Provider, Response, SourceHandle},
    err, Error, Mapping, Record, Result, Schema, Source,
};

/// Provider for sources with a `directory:` connection URL.
///
/// Entries are addressed by distinguished name: each entity lives under the
/// base `ou=<table>` and each entry is named by `<identity column>=<value>`.
/// The provider has no join structures, so many-to-many associations are not
/// persisted on directory sources.
#[derive(Debug, Default)]
pub struct Directory;

impl Directory {
    pub fn new() -> Self {
        Self
    }
}

impl Provider for Directory {
    fn name(&self) -> &str {
        "directory"
    }

    fn capability(&self) -> &Capability {
        &Capability::DIRECTORY
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
        let generator = DirectoryGenerator::new(source, mapping, schema)?;
        Ok(Box::new(generator))
    }
}

/// Parses a `directory:` connection URL, returning the naming context every
/// base is qualified with. `directory://corp/dc=example,dc=com` yields
/// `dc=example,dc=com`; a URL without a path has an empty naming context.
pub fn naming_context(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;

    if parsed.scheme() != "directory" {
        return Err(Error::invalid_connection_url(format!(
            "connection URL does not have a `directory` scheme; url={url}"
        )));
    }

    Ok(parsed.path().trim_matches('/').to_string())
}

/// Entries keyed by qualified base, then by relative distinguished name.
#[derive(Debug, Default, Clone)]
pub(crate) struct Store {
    pub(crate) entries: IndexMap<String, IndexMap<String, Record>>,
}

/// An in-process directory tree.
///
/// Every batch runs against a staged copy of the tree which replaces the
/// live tree only when all commands succeed.
#[derive(Debug)]
pub struct Connection {
    naming_context: String,
    store: Mutex<Store>,
}

impl Connection {
    pub fn new(naming_context: impl Into<String>) -> Self {
        Self {
            naming_context: naming_context.into(),
            store: Mutex::default(),
        }
    }

    pub fn from_url(url: &str) -> Result<Self> {
        Ok(Self::new(naming_context(url)?))
    }

    pub fn naming_context(&self) -> &str {
        &self.naming_context
    }

    /// Number of entries under `base`.
    pub fn entry_count(&self, base: &str) -> Result<usize> {
        let store = self.lock()?;
        Ok(store
            .entries
            .get(&self.qualify(base))
            .map_or(0, IndexMap::len))
    }

    pub(crate) fn qualify(&self, base: &str) -> String {
        if self.naming_context.is_empty() {
            base.to_string()
        } else {
            format!("{base},{}", self.naming_context)
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| err!("directory store lock poisoned"))
    }
}

impl weave_core::Connection for Connection {
    fn exec(&self, commands: &[Command]) -> Result<Vec<Response>> {
        let requests = commands
            .iter()
            .map(Request::from_command)
            .collect::<Result<Vec<_>>>()?;

        let mut store = self.lock()?;
        let mut staged = store.clone();

        let responses = requests
            .into_iter()
            .map(|request| self.apply(&mut staged, request))
            .collect::<Result<Vec<_>>>()?;

        *store = staged;
        Ok(responses)
    }
}

/// Failures reported by the directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// An add named an entry that already exists
    EntryAlreadyExists { dn: String },
}

impl std::error::Error for DirectoryError {}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::EntryAlreadyExists { dn } => {
                write!(f, "entry already exists: {dn}")
            }
        }
    }
}
