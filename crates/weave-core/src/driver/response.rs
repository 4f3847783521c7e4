use crate::stmt::{Record, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub rows: Rows,

    /// Key generated by the store for an inserted row
    pub generated_key: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    /// Number of rows impacted by the command
    Count(u64),

    /// Result set of a query
    Records(Vec<Record>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
            generated_key: None,
        }
    }

    pub fn records(records: Vec<Record>) -> Self {
        Self {
            rows: Rows::Records(records),
            generated_key: None,
        }
    }

    pub fn with_generated_key(mut self, key: impl Into<Value>) -> Self {
        self.generated_key = Some(key.into());
        self
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    /// Rows affected, or the number of rows returned by a query.
    pub fn count(&self) -> u64 {
        match self {
            Self::Count(count) => *count,
            Self::Records(records) => records.len() as u64,
        }
    }

    /// Query results. A count response has no records.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::Records(records) => records,
            Self::Count(_) => vec![],
        }
    }
}
