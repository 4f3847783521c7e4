pub mod db;
pub use db::Db;

mod engine;

mod entity;
pub use entity::{Entity, FromValue};

mod lazy;
pub use lazy::Lazy;

pub use weave_core::{
    bail, driver, err, schema,
    schema::{Mapping, RawCommand},
    source::{Source, SourceConfig},
    stmt::{Direction, Filter, FilterOp, OrderBy, Record, Value},
    Error, Result,
};

#[cfg(feature = "directory")]
pub use weave_driver_directory::Directory;

#[cfg(feature = "sqlite")]
pub use weave_driver_sqlite::Sqlite;
