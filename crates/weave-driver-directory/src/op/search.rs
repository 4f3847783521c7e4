use super::{list, malformed, optional_u64, record, string, u64_value, Connection, Store};

use std::cmp::Ordering;
use weave_core::{
    driver::Response,
    stmt::{Direction, Filter, FilterOp, OrderBy},
    Record, Result, Value,
};

/// Reads entries under one base.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Search {
    pub base: String,

    /// Attributes returned, each renamed to its alias. Empty returns whole
    /// entries.
    pub attributes: Vec<(String, String)>,

    /// Every filter must match; fields name attributes
    pub filter: Vec<Filter>,

    /// Server-side sort; fields name attributes
    pub sort: Vec<OrderBy>,

    pub limit: Option<u64>,
    pub offset: u64,
}

impl Search {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    pub(super) fn into_record(self) -> Record {
        let attributes = self
            .attributes
            .into_iter()
            .map(|(attribute, alias)| (attribute, Value::String(alias)))
            .collect::<Record>();

        let filter = self
            .filter
            .into_iter()
            .map(|filter| {
                Value::Record(
                    Record::new()
                        .with("attribute", filter.field)
                        .with("op", filter.op.as_str())
                        .with("value", filter.value),
                )
            })
            .collect();

        let sort = self
            .sort
            .into_iter()
            .map(|order| {
                let desc = order.is_desc();
                Value::Record(
                    Record::new()
                        .with("attribute", order.field)
                        .with("desc", desc),
                )
            })
            .collect();

        Record::new()
            .with("base", self.base)
            .with("attributes", attributes)
            .with("filter", Value::List(filter))
            .with("sort", Value::List(sort))
            .with("limit", self.limit.map(u64_value).unwrap_or_default())
            .with("offset", u64_value(self.offset))
    }

    pub(super) fn from_record(body: &Record) -> Result<Self> {
        const VERB: &str = "search";

        let attributes = record(body, VERB, "attributes")?
            .into_iter()
            .map(|(attribute, alias)| match alias {
                Value::String(alias) => Ok((attribute, alias)),
                _ => Err(malformed(VERB, "attribute aliases must be strings")),
            })
            .collect::<Result<_>>()?;

        let filter = list(body, VERB, "filter")?
            .iter()
            .map(|item| {
                let item = item
                    .as_record()
                    .ok_or_else(|| malformed(VERB, "filter items must be records"))?;
                let op = item
                    .value("op")
                    .as_str()
                    .and_then(FilterOp::parse)
                    .ok_or_else(|| malformed(VERB, "unknown filter operator"))?;
                Ok(Filter::new(
                    string(item, VERB, "attribute")?,
                    op,
                    item.value("value").clone(),
                ))
            })
            .collect::<Result<_>>()?;

        let sort = list(body, VERB, "sort")?
            .iter()
            .map(|item| {
                let item = item
                    .as_record()
                    .ok_or_else(|| malformed(VERB, "sort keys must be records"))?;
                let attribute = string(item, VERB, "attribute")?;
                Ok(match item.value("desc") {
                    Value::Bool(true) => OrderBy::desc(attribute),
                    _ => OrderBy::asc(attribute),
                })
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            base: string(body, VERB, "base")?,
            attributes,
            filter,
            sort,
            limit: optional_u64(body, VERB, "limit")?,
            offset: optional_u64(body, VERB, "offset")?.unwrap_or(0),
        })
    }

    fn project(&self, entry: &Record) -> Record {
        if self.attributes.is_empty() {
            return entry.clone();
        }

        self.attributes
            .iter()
            .map(|(attribute, alias)| (alias.as_str(), entry.value(attribute).clone()))
            .collect()
    }
}

fn compare(sort: &[OrderBy], a: &Record, b: &Record) -> Ordering {
    for key in sort {
        let ordering = a
            .value(&key.field)
            .compare(b.value(&key.field))
            .unwrap_or(Ordering::Equal);

        let ordering = match key.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        };

        if ordering.is_ne() {
            return ordering;
        }
    }

    Ordering::Equal
}

impl Connection {
    pub(crate) fn exec_search(&self, store: &Store, op: Search) -> Result<Response> {
        let base = self.qualify(&op.base);

        let Some(entries) = store.entries.get(&base) else {
            return Ok(Response::records(vec![]));
        };

        let mut matched: Vec<&Record> = entries
            .values()
            .filter(|entry| op.filter.iter().all(|filter| filter.matches(entry)))
            .collect();

        // Stable, so unsorted ties keep insertion order
        matched.sort_by(|a, b| compare(&op.sort, a, b));

        let limit = op.limit.map_or(usize::MAX, |limit| limit as usize);
        let records = matched
            .into_iter()
            .skip(op.offset as usize)
            .take(limit)
            .map(|entry| op.project(entry))
            .collect();

        Ok(Response::records(records))
    }
}
