use super::{string, Connection, Store};

use weave_core::{driver::Response, Record, Result};

/// Removes one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub base: String,
    pub rdn: String,
}

impl Delete {
    pub(super) fn into_record(self) -> Record {
        Record::new().with("base", self.base).with("rdn", self.rdn)
    }

    pub(super) fn from_record(body: &Record) -> Result<Self> {
        Ok(Self {
            base: string(body, "delete", "base")?,
            rdn: string(body, "delete", "rdn")?,
        })
    }
}

impl Connection {
    pub(crate) fn exec_delete(&self, store: &mut Store, op: Delete) -> Result<Response> {
        let base = self.qualify(&op.base);

        let removed = store
            .entries
            .get_mut(&base)
            .and_then(|entries| entries.shift_remove(&op.rdn));

        match removed {
            Some(_) => {
                tracing::trace!(rdn = %op.rdn, base = %base, "delete entry");
                Ok(Response::count(1))
            }
            None => Ok(Response::count(0)),
        }
    }
}
