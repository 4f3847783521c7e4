mod batch;
pub use batch::Batch;

mod capability;
pub use capability::Capability;

mod command;
pub use command::{Command, CommandKind};

mod response;
pub use response::{Response, Rows};

use crate::{
    schema::{Mapping, Property, Schema},
    stmt::{Filter, OrderBy, Record},
    Result, Source,
};

use std::{fmt::Debug, sync::Arc};

/// One source technology, e.g. a relational database or a directory service.
pub trait Provider: Debug + Send + Sync + 'static {
    /// Name matched against a source's provider, e.g. `sqlite`.
    fn name(&self) -> &str;

    /// Describes what the provider's generators can express.
    fn capability(&self) -> &Capability;

    /// Opens a connection to the source.
    fn connect(&self, source: &Source) -> Result<Arc<dyn Connection>>;

    /// Constructs an empty batch bound to the source.
    fn batch(&self, source: &SourceHandle) -> Batch {
        source.batch()
    }

    /// Builds a generator bound to one (entity, source, mapping) triple.
    /// `schema` resolves association targets.
    fn generate(
        &self,
        source: &SourceHandle,
        mapping: &Arc<Mapping>,
        schema: &Schema,
    ) -> Result<Box<dyn Generator>>;
}

/// Executes provider-native commands against one source.
pub trait Connection: Debug + Send + Sync + 'static {
    /// Runs all commands in order as one unit, returning one response per
    /// command. If the backend supports transactions, either every command
    /// applies or none does.
    fn exec(&self, commands: &[Command]) -> Result<Vec<Response>>;
}

/// Turns high-level operations into command batches for one entity on one
/// source.
///
/// Generators never execute anything. Every operation returns a fresh
/// [`Batch`]; an operation the provider cannot express returns a batch with
/// no commands.
pub trait Generator: Debug + Send + Sync + 'static {
    fn mapping(&self) -> &Arc<Mapping>;

    fn source(&self) -> &SourceHandle;

    /// Full scan, optionally filtered.
    fn all(&self, filters: &[Filter]) -> Result<Batch> {
        self.all_limit(None, filters)
    }

    /// Full scan bounded to `limit` rows.
    fn all_limit(&self, limit: Option<u64>, filters: &[Filter]) -> Result<Batch>;

    /// Yields at most one row.
    fn any(&self, filters: &[Filter]) -> Result<Batch>;

    /// One command per record. Commands of records with an unassigned
    /// auto-increment identity report the generated key.
    fn insert(&self, records: &[Record]) -> Result<Batch>;

    /// One command per record, keyed by identity. Records with an unassigned
    /// identity are skipped.
    fn update(&self, records: &[Record]) -> Result<Batch>;

    /// One command per record, keyed by identity.
    fn delete(&self, records: &[Record]) -> Result<Batch>;

    /// Rows of zero-based page `page_index`.
    fn paged(&self, page_size: u64, page_index: u64, order_by: &[OrderBy]) -> Result<Batch>;

    /// A batch whose single result is `ceil(rows / page_size)`.
    fn page_count(&self, page_size: u64) -> Result<Batch>;

    /// Commands materializing the target records of one association.
    fn load_property(&self, record: &Record, property: &Property) -> Result<Batch>;

    /// Replaces the link rows of a many-to-many association with the targets
    /// currently held by `record`.
    fn joins_save(&self, record: &Record, property: &Property) -> Result<Batch>;

    /// Removes every link row of a many-to-many association for `record`.
    fn joins_delete(&self, record: &Record, property: &Property) -> Result<Batch>;

    /// Pre-builds the CRUD command templates for the bound mapping.
    fn setup_commands(&mut self) -> Result<()>;

    /// Pre-builds the templates used to load and link one association.
    fn setup_load_commands(&mut self, property: &Property) -> Result<()>;

    /// Commands creating the containers of the bound mapping.
    fn create_storage(&self) -> Result<Batch>;
}

/// A source together with its open connection.
#[derive(Debug, Clone)]
pub struct SourceHandle {
    pub source: Arc<Source>,
    pub connection: Arc<dyn Connection>,
}

impl SourceHandle {
    pub fn new(source: Arc<Source>, connection: Arc<dyn Connection>) -> Self {
        Self { source, connection }
    }

    pub fn name(&self) -> &str {
        &self.source.name
    }

    /// An empty batch bound to this source.
    pub fn batch(&self) -> Batch {
        Batch::new(&self.source.name, self.connection.clone())
    }
}
