use crate::op::{Add, Count, Delete, Modify, Request, Search};

use indexmap::IndexMap;
use std::sync::Arc;
use weave_core::{
    driver::{Batch, CommandKind, Generator, SourceHandle},
    schema::{Property, PropertyKind, RawCommand, Schema},
    stmt::{Filter, OrderBy, Record},
    Error, Mapping, Result, Value,
};

/// Generates native directory requests for one entity on one source.
#[derive(Debug)]
pub struct DirectoryGenerator {
    source: SourceHandle,
    mapping: Arc<Mapping>,
    targets: IndexMap<String, Arc<Mapping>>,

    /// (attribute, record key) pairs returned by searches. Populated by
    /// `setup_commands`.
    attributes: Vec<(String, String)>,

    loads: IndexMap<String, Load>,
}

/// Prepared search for one association. The owner's `key` value is matched
/// against the target's `attribute`.
#[derive(Debug, Clone)]
struct Load {
    key: String,
    search: Search,
}

impl DirectoryGenerator {
    pub fn new(source: &SourceHandle, mapping: &Arc<Mapping>, schema: &Schema) -> Result<Self> {
        let mut targets = IndexMap::new();

        for property in mapping.associations() {
            // Targets not stored on this source cannot be loaded from it
            if let Some(target) = property
                .target()
                .and_then(|target| schema.find(target, source.name()))
            {
                targets.insert(property.name.clone(), target.clone());
            }
        }

        Ok(Self {
            source: source.clone(),
            mapping: mapping.clone(),
            targets,
            attributes: vec![],
            loads: IndexMap::new(),
        })
    }

    fn batch(&self, requests: impl IntoIterator<Item = Request>) -> Batch {
        let mut batch = self.source.batch();
        batch.extend(requests.into_iter().map(Request::into_command));
        batch
    }

    fn search(&self) -> Search {
        Search {
            attributes: self.attributes.clone(),
            ..Search::new(base(&self.mapping))
        }
    }

    fn filter(&self, filters: &[Filter]) -> Vec<Filter> {
        filters
            .iter()
            .map(|filter| Filter {
                field: self.mapping.column_for(&filter.field).to_string(),
                ..filter.clone()
            })
            .collect()
    }

    /// Only native overrides make sense against a directory.
    fn raw(&self, raw: &RawCommand, filters: &[Filter]) -> Result<Batch> {
        if raw.kind != CommandKind::Native {
            return Err(Error::unsupported_feature(format!(
                "{} overrides for `{}` on a directory source",
                raw.kind, self.mapping.entity
            )));
        }

        let command = weave_core::Command::native(&raw.text)
            .params(filters.iter().map(|filter| filter.value.clone()));
        Ok(self.source.batch().add_command(command))
    }

    /// Relative name of the entry holding `record`, or `None` when the
    /// identity is unassigned.
    fn rdn(&self, record: &Record) -> Option<String> {
        let identity = self.mapping.identity()?;
        let value = self.mapping.identity_value(record);
        (!value.is_default()).then(|| format!("{}={value}", identity.column))
    }
}

fn base(mapping: &Mapping) -> String {
    format!("ou={}", mapping.table_name)
}

fn attributes(mapping: &Mapping) -> Vec<(String, String)> {
    mapping
        .stored()
        .map(|property| (property.column.clone(), property.stored_key().to_string()))
        .collect()
}

fn check_page_size(page_size: u64) -> Result<()> {
    if page_size == 0 {
        return Err(Error::invalid_argument("page size must be greater than zero"));
    }
    Ok(())
}

impl Generator for DirectoryGenerator {
    fn mapping(&self) -> &Arc<Mapping> {
        &self.mapping
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn all_limit(&self, limit: Option<u64>, filters: &[Filter]) -> Result<Batch> {
        if let Some(raw) = &self.mapping.all_command {
            return self.raw(raw, filters);
        }

        let search = Search {
            filter: self.filter(filters),
            limit,
            ..self.search()
        };
        Ok(self.batch([search.into()]))
    }

    fn any(&self, filters: &[Filter]) -> Result<Batch> {
        if let Some(raw) = &self.mapping.any_command {
            return self.raw(raw, filters);
        }

        let search = Search {
            filter: self.filter(filters),
            limit: Some(1),
            ..self.search()
        };
        Ok(self.batch([search.into()]))
    }

    fn insert(&self, records: &[Record]) -> Result<Batch> {
        let mut requests: Vec<Request> = vec![];

        for record in records {
            // The directory cannot generate names
            let rdn = self.rdn(record).ok_or_else(|| {
                Error::invalid_argument(format!(
                    "`{}` entries need an assigned identity on directory source `{}`",
                    self.mapping.entity,
                    self.source.name()
                ))
            })?;

            let entry = self
                .mapping
                .stored()
                .map(|property| {
                    let value = match record.get(property.stored_key()) {
                        Some(value) if !value.is_null() => value.clone(),
                        _ => property.default.clone().unwrap_or_default(),
                    };
                    (property.column.as_str(), value)
                })
                .collect();

            requests.push(
                Add {
                    base: base(&self.mapping),
                    rdn,
                    entry,
                }
                .into(),
            );
        }

        Ok(self.batch(requests))
    }

    fn update(&self, records: &[Record]) -> Result<Batch> {
        let mut requests: Vec<Request> = vec![];

        for record in records {
            let Some(rdn) = self.rdn(record) else {
                continue;
            };

            let changes = self
                .mapping
                .stored()
                .filter(|property| !property.identity && record.contains(property.stored_key()))
                .map(|property| {
                    (
                        property.column.as_str(),
                        record.value(property.stored_key()).clone(),
                    )
                })
                .collect();

            requests.push(
                Modify {
                    base: base(&self.mapping),
                    rdn,
                    changes,
                }
                .into(),
            );
        }

        Ok(self.batch(requests))
    }

    fn delete(&self, records: &[Record]) -> Result<Batch> {
        let requests = records.iter().filter_map(|record| {
            let rdn = self.rdn(record)?;
            Some(Request::from(Delete {
                base: base(&self.mapping),
                rdn,
            }))
        });

        Ok(self.batch(requests))
    }

    fn paged(&self, page_size: u64, page_index: u64, order_by: &[OrderBy]) -> Result<Batch> {
        check_page_size(page_size)?;

        let mut sort: Vec<OrderBy> = order_by
            .iter()
            .map(|order| OrderBy {
                field: self.mapping.column_for(&order.field).to_string(),
                direction: order.direction,
            })
            .collect();

        if sort.is_empty() {
            if let Some(identity) = self.mapping.identity() {
                sort.push(OrderBy::asc(&identity.column));
            }
        }

        let search = Search {
            sort,
            limit: Some(page_size),
            offset: page_size.saturating_mul(page_index),
            ..self.search()
        };
        Ok(self.batch([search.into()]))
    }

    fn page_count(&self, page_size: u64) -> Result<Batch> {
        check_page_size(page_size)?;

        let count = Count {
            base: base(&self.mapping),
            page_size,
        };
        Ok(self.batch([count.into()]))
    }

    fn load_property(&self, record: &Record, property: &Property) -> Result<Batch> {
        let Some(load) = self.loads.get(&property.name) else {
            return Ok(self.source.batch());
        };

        let key = record.value(&load.key);
        if key.is_default() {
            return Ok(self.source.batch());
        }

        let mut search = load.search.clone();
        for filter in &mut search.filter {
            filter.value = key.clone();
        }

        Ok(self.batch([search.into()]))
    }

    fn joins_save(&self, _record: &Record, _property: &Property) -> Result<Batch> {
        Ok(self.source.batch())
    }

    fn joins_delete(&self, _record: &Record, _property: &Property) -> Result<Batch> {
        Ok(self.source.batch())
    }

    fn setup_commands(&mut self) -> Result<()> {
        self.attributes = attributes(&self.mapping);

        tracing::trace!(
            entity = %self.mapping.entity,
            base = %base(&self.mapping),
            source = %self.source.name(),
            "prepared directory searches"
        );

        Ok(())
    }

    fn setup_load_commands(&mut self, property: &Property) -> Result<()> {
        let Some(target) = self.targets.get(&property.name).cloned() else {
            return Ok(());
        };

        let (key, attribute, limit) = match &property.kind {
            PropertyKind::Map(_) => {
                let Some(identity) = target.identity() else {
                    return Ok(());
                };
                (property.column.clone(), identity.column.clone(), Some(1))
            }
            PropertyKind::ManyToOne(assoc) => {
                let Some(identity) = self.mapping.identity() else {
                    return Ok(());
                };
                let attribute = target.column_for(assoc.foreign_field()).to_string();
                (identity.name.clone(), attribute, assoc.single.then_some(1))
            }
            // No join structures
            PropertyKind::ManyToMany(_) | PropertyKind::Reference => return Ok(()),
        };

        let search = Search {
            attributes: attributes(&target),
            filter: vec![Filter::eq(attribute, Value::Null)],
            limit,
            ..Search::new(base(&target))
        };

        self.loads
            .insert(property.name.clone(), Load { key, search });

        Ok(())
    }

    fn create_storage(&self) -> Result<Batch> {
        // Bases are created on first add
        Ok(self.source.batch())
    }
}
