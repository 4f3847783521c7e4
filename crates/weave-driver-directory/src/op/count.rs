use super::{malformed, optional_u64, string, u64_value, Connection, Store};

use weave_core::{driver::Response, Record, Result};

/// Counts the pages needed to list every entry under one base.
#[derive(Debug, Clone, PartialEq)]
pub struct Count {
    pub base: String,
    pub page_size: u64,
}

impl Count {
    pub(super) fn into_record(self) -> Record {
        Record::new()
            .with("base", self.base)
            .with("page_size", u64_value(self.page_size))
    }

    pub(super) fn from_record(body: &Record) -> Result<Self> {
        let page_size = optional_u64(body, "count", "page_size")?
            .filter(|size| *size > 0)
            .ok_or_else(|| malformed("count", "`page_size` must be positive"))?;

        Ok(Self {
            base: string(body, "count", "base")?,
            page_size,
        })
    }
}

impl Connection {
    pub(crate) fn exec_count(&self, store: &Store, op: Count) -> Result<Response> {
        let base = self.qualify(&op.base);
        let total = store.entries.get(&base).map_or(0, |entries| entries.len()) as u64;

        Ok(Response::records(vec![Record::new().with(
            "page_count",
            u64_value(total.div_ceil(op.page_size)),
        )]))
    }
}
