use crate::ExecLog;

use std::sync::Arc;
use weave::{
    driver::{Capability, Command, Connection, Generator, Provider, Response, SourceHandle},
    schema::Schema,
    Mapping, Result, Source,
};

/// Wraps a provider so every command its connections run is logged.
///
/// The wrapper reports the inner provider's name, so registering it replaces
/// the built-in provider of the same name.
#[derive(Debug)]
pub struct LoggingProvider<P> {
    inner: P,
    log: ExecLog,
}

impl<P: Provider> LoggingProvider<P> {
    pub fn new(inner: P, log: ExecLog) -> Self {
        Self { inner, log }
    }
}

impl<P: Provider> Provider for LoggingProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn capability(&self) -> &Capability {
        self.inner.capability()
    }

    fn connect(&self, source: &Source) -> Result<Arc<dyn Connection>> {
        Ok(Arc::new(LoggingConnection {
            source: source.name.clone(),
            inner: self.inner.connect(source)?,
            log: self.log.clone(),
        }))
    }

    fn generate(
        &self,
        source: &SourceHandle,
        mapping: &Arc<Mapping>,
        schema: &Schema,
    ) -> Result<Box<dyn Generator>> {
        self.inner.generate(source, mapping, schema)
    }
}

/// Logs each command before handing the batch to the wrapped connection, so
/// failed batches show up too.
#[derive(Debug)]
pub struct LoggingConnection {
    source: String,
    inner: Arc<dyn Connection>,
    log: ExecLog,
}

impl Connection for LoggingConnection {
    fn exec(&self, commands: &[Command]) -> Result<Vec<Response>> {
        for command in commands {
            self.log.push(&self.source, command);
        }

        self.inner.exec(commands)
    }
}
