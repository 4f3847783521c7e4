pub mod driver;
pub use driver::{
    Batch, Capability, Command, CommandKind, Connection, Generator, Provider, SourceHandle,
};

mod error;
pub use error::Error;

pub mod schema;
pub use schema::{Mapping, Schema};

pub mod source;
pub use source::{Source, SourceConfig, SourceManager};

pub mod stmt;
pub use stmt::{Record, Value};

pub type Result<T, E = Error> = core::result::Result<T, E>;
