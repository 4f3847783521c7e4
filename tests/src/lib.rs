mod audit;
pub use audit::{AuditEvent, AuditLog};

pub use exec_log::{ExecEntry, ExecLog};

mod logging_provider;
pub use logging_provider::{LoggingConnection, LoggingProvider};

pub mod models;

pub use std_util::*;

use weave::{db::Builder, Db, Directory, Source, Sqlite};

/// A database builder whose built-in providers record every command they
/// execute into `log`.
pub fn builder(log: &ExecLog) -> Builder {
    let mut builder = Db::builder();
    builder
        .provider(LoggingProvider::new(Sqlite::new(), log.clone()))
        .provider(LoggingProvider::new(Directory::new(), log.clone()));
    builder
}

/// A private in-memory SQLite source.
pub fn sqlite(name: &str, order: i32) -> Source {
    Source::new(name).connection("sqlite::memory:").order(order)
}

/// An empty in-process directory source.
pub fn directory(name: &str, order: i32) -> Source {
    Source::new(name)
        .connection("directory://corp/dc=example,dc=com")
        .order(order)
}

/// Builds the database, creates every container and clears the log so
/// tests only observe their own commands.
pub fn setup(builder: &Builder, log: &ExecLog) -> Db {
    let db = builder.build().unwrap();
    db.push_schema().unwrap();
    log.clear();
    db
}

/// Routes `tracing` output to the test writer. Honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
