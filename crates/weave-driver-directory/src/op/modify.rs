use super::{record, string, Connection, Store};

use weave_core::{driver::Response, Record, Result};

/// Replaces attributes of one entry. A `Null` value removes the attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Modify {
    pub base: String,
    pub rdn: String,
    pub changes: Record,
}

impl Modify {
    pub(super) fn into_record(self) -> Record {
        Record::new()
            .with("base", self.base)
            .with("rdn", self.rdn)
            .with("changes", self.changes)
    }

    pub(super) fn from_record(body: &Record) -> Result<Self> {
        Ok(Self {
            base: string(body, "modify", "base")?,
            rdn: string(body, "modify", "rdn")?,
            changes: record(body, "modify", "changes")?,
        })
    }
}

impl Connection {
    pub(crate) fn exec_modify(&self, store: &mut Store, op: Modify) -> Result<Response> {
        let base = self.qualify(&op.base);

        let Some(entry) = store
            .entries
            .get_mut(&base)
            .and_then(|entries| entries.get_mut(&op.rdn))
        else {
            return Ok(Response::count(0));
        };

        tracing::trace!(rdn = %op.rdn, base = %base, "modify entry");

        for (attribute, value) in op.changes {
            if value.is_null() {
                entry.remove(&attribute);
            } else {
                entry.insert(attribute, value);
            }
        }

        Ok(Response::count(1))
    }
}
