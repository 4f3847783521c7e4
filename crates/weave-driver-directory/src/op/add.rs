use super::{record, string, Connection, Store};
use crate::DirectoryError;

use weave_core::{driver::Response, Error, Record, Result};

/// Creates one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Add {
    pub base: String,
    pub rdn: String,
    pub entry: Record,
}

impl Add {
    pub(super) fn into_record(self) -> Record {
        Record::new()
            .with("base", self.base)
            .with("rdn", self.rdn)
            .with("entry", self.entry)
    }

    pub(super) fn from_record(body: &Record) -> Result<Self> {
        Ok(Self {
            base: string(body, "add", "base")?,
            rdn: string(body, "add", "rdn")?,
            entry: record(body, "add", "entry")?,
        })
    }
}

impl Connection {
    pub(crate) fn exec_add(&self, store: &mut Store, op: Add) -> Result<Response> {
        let base = self.qualify(&op.base);
        let entries = store.entries.entry(base.clone()).or_default();

        if entries.contains_key(&op.rdn) {
            return Err(Error::driver(DirectoryError::EntryAlreadyExists {
                dn: format!("{},{base}", op.rdn),
            }));
        }

        tracing::trace!(rdn = %op.rdn, base = %base, "add entry");

        // Absent attributes are not stored
        let entry = op.entry.into_iter().filter(|(_, value)| !value.is_null()).collect();
        entries.insert(op.rdn, entry);

        Ok(Response::count(1))
    }
}
