mod templates;
use templates::{JoinTemplates, LoadTemplate, Templates};

use crate::{
    stmt::{Column, ColumnDef, Condition, CreateTable, OrderByColumn, PageCount, Update},
    Flavor, Serializer, Statement,
};

use indexmap::IndexMap;
use std::sync::Arc;
use weave_core::{
    driver::{Batch, Command, Generator, SourceHandle},
    schema::{Property, PropertyKind, RawCommand, Schema},
    stmt::{Filter, OrderBy, Record},
    Error, Mapping, Result, Value,
};

/// Generates SQL batches for one entity on one relational source.
#[derive(Debug)]
pub struct SqlGenerator {
    serializer: Serializer,
    source: SourceHandle,
    mapping: Arc<Mapping>,

    /// Association targets on the same source, keyed by property name
    targets: IndexMap<String, Arc<Mapping>>,

    /// Populated by `setup_commands`
    templates: Option<Templates>,

    loads: IndexMap<String, LoadTemplate>,
    joins: IndexMap<String, JoinTemplates>,
}

impl SqlGenerator {
    pub fn new(
        flavor: Flavor,
        source: &SourceHandle,
        mapping: &Arc<Mapping>,
        schema: &Schema,
    ) -> Result<Self> {
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
            serializer: Serializer::new(flavor),
            source: source.clone(),
            mapping: mapping.clone(),
            targets,
            templates: None,
            loads: IndexMap::new(),
            joins: IndexMap::new(),
        })
    }

    fn templates(&self) -> Result<&Templates> {
        self.templates.as_ref().ok_or_else(|| {
            weave_core::err!(
                "command templates for `{}` were not prepared",
                self.mapping.entity
            )
        })
    }

    fn serialize(&self, stmt: impl Into<Statement>) -> Command {
        let mut params = vec![];
        let text = self.serializer.serialize(&stmt.into(), &mut params);
        Command::text(text).params(params)
    }

    fn conditions(&self, filters: &[Filter]) -> Vec<Condition> {
        filters
            .iter()
            .map(|filter| {
                Condition::new(
                    Column::new(self.mapping.column_for(&filter.field)),
                    filter.op,
                    filter.value.clone(),
                )
            })
            .collect()
    }

    /// Runs a caller-provided command, binding filter values in order.
    fn raw(&self, raw: &RawCommand, filters: &[Filter]) -> Batch {
        let command = Command::new(&raw.text, raw.kind)
            .params(filters.iter().map(|filter| filter.value.clone()));
        self.source.batch().add_command(command)
    }

    /// Identity of `record`, or `None` when unassigned.
    fn identity_of<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        let value = self.mapping.identity_value(record);
        (!value.is_default()).then_some(value)
    }

    fn target(&self, property: &Property) -> Result<&Arc<Mapping>> {
        self.targets.get(&property.name).ok_or_else(|| {
            Error::invalid_mapping(format!(
                "`{}::{}` is not an association",
                self.mapping.entity, property.name
            ))
        })
    }
}

/// Value written for `property`: the record's non-null value, else the
/// declared default.
fn stored_value(record: &Record, property: &Property) -> Value {
    match record.get(property.stored_key()) {
        Some(value) if !value.is_null() => value.clone(),
        _ => property.default.clone().unwrap_or_default(),
    }
}

fn check_page_size(page_size: u64) -> Result<()> {
    if page_size == 0 {
        return Err(Error::invalid_argument("page size must be greater than zero"));
    }
    Ok(())
}

impl Generator for SqlGenerator {
    fn mapping(&self) -> &Arc<Mapping> {
        &self.mapping
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn all_limit(&self, limit: Option<u64>, filters: &[Filter]) -> Result<Batch> {
        if let Some(raw) = &self.mapping.all_command {
            return Ok(self.raw(raw, filters));
        }

        let mut stmt = self.templates()?.select.clone();
        stmt.filter = self.conditions(filters);
        stmt.limit = limit;

        Ok(self.source.batch().add_command(self.serialize(stmt)))
    }

    fn any(&self, filters: &[Filter]) -> Result<Batch> {
        if let Some(raw) = &self.mapping.any_command {
            return Ok(self.raw(raw, filters));
        }

        let mut stmt = self.templates()?.select.clone();
        stmt.filter = self.conditions(filters);
        stmt.limit = Some(1);

        Ok(self.source.batch().add_command(self.serialize(stmt)))
    }

    fn insert(&self, records: &[Record]) -> Result<Batch> {
        let templates = self.templates()?;
        let mut batch = self.source.batch();

        for record in records {
            let generated = templates
                .insert_generated
                .as_ref()
                .filter(|_| self.identity_of(record).is_none());

            let command = match generated {
                Some(text) => Command::text(text)
                    .params(
                        self.mapping
                            .stored()
                            .filter(|p| !p.identity)
                            .map(|p| stored_value(record, p)),
                    )
                    .generates_key(),
                None => Command::text(&templates.insert)
                    .params(self.mapping.stored().map(|p| stored_value(record, p))),
            };

            batch.push(command);
        }

        Ok(batch)
    }

    fn update(&self, records: &[Record]) -> Result<Batch> {
        let templates = self.templates()?;
        let (Some(identity), Some(text)) = (self.mapping.identity(), &templates.update) else {
            return Ok(self.source.batch());
        };

        let mut batch = self.source.batch();

        for record in records {
            let Some(id) = self.identity_of(record) else {
                continue;
            };

            let columns: Vec<&Property> = self.mapping.stored().filter(|p| !p.identity).collect();
            let complete = columns.iter().all(|p| record.contains(p.stored_key()));

            let command = if complete {
                let mut params: Vec<Value> = columns
                    .iter()
                    .map(|p| stored_value(record, p))
                    .collect();
                if params.is_empty() {
                    params.push(id.clone());
                }
                params.push(id.clone());
                Command::text(text).params(params)
            } else {
                // Only touch the columns the record carries
                let mut assignments: Vec<_> = columns
                    .iter()
                    .filter(|p| record.contains(p.stored_key()))
                    .map(|p| (p.column.clone(), record.value(p.stored_key()).clone()))
                    .collect();
                if assignments.is_empty() {
                    assignments.push((identity.column.clone(), id.clone()));
                }
                self.serialize(Update {
                    table: self.mapping.table_name.clone(),
                    assignments,
                    filter: vec![Condition::eq(Column::new(&identity.column), id.clone())],
                })
            };

            batch.push(command);
        }

        Ok(batch)
    }

    fn delete(&self, records: &[Record]) -> Result<Batch> {
        let templates = self.templates()?;
        let mut batch = self.source.batch();

        let Some(text) = &templates.delete else {
            return Ok(batch);
        };

        for record in records {
            if let Some(id) = self.identity_of(record) {
                batch.push(Command::text(text).param(id.clone()));
            }
        }

        Ok(batch)
    }

    fn paged(&self, page_size: u64, page_index: u64, order_by: &[OrderBy]) -> Result<Batch> {
        check_page_size(page_size)?;

        let mut stmt = self.templates()?.select.clone();

        stmt.order_by = order_by
            .iter()
            .map(|order| OrderByColumn {
                column: Column::new(self.mapping.column_for(&order.field)),
                direction: order.direction,
            })
            .collect();

        // Pages must be stable between calls
        if stmt.order_by.is_empty() {
            if let Some(identity) = self.mapping.identity() {
                stmt.order_by.push(OrderByColumn {
                    column: Column::new(&identity.column),
                    direction: Default::default(),
                });
            }
        }

        stmt.limit = Some(page_size);
        stmt.offset = Some(page_size.saturating_mul(page_index));

        Ok(self.source.batch().add_command(self.serialize(stmt)))
    }

    fn page_count(&self, page_size: u64) -> Result<Batch> {
        check_page_size(page_size)?;

        let stmt = PageCount {
            table: self.mapping.table_name.clone(),
            page_size,
            filter: vec![],
        };

        Ok(self.source.batch().add_command(self.serialize(stmt)))
    }

    fn load_property(&self, record: &Record, property: &Property) -> Result<Batch> {
        let batch = self.source.batch();

        let Some(load) = self.loads.get(&property.name) else {
            return Ok(batch);
        };

        let key = record.value(&load.key);
        if key.is_default() {
            return Ok(batch);
        }

        Ok(batch.add_command(Command::text(&load.query).param(key.clone())))
    }

    fn joins_save(&self, record: &Record, property: &Property) -> Result<Batch> {
        let mut batch = self.source.batch();

        let (Some(joins), Some(owner)) =
            (self.joins.get(&property.name), self.identity_of(record))
        else {
            return Ok(batch);
        };

        let target = self.target(property)?;
        let targets = record
            .value(&property.name)
            .as_list()
            .unwrap_or_default();

        batch.push(Command::text(&joins.unlink).param(owner.clone()));

        for item in targets {
            let Some(item) = item.as_record() else {
                continue;
            };
            let id = target.identity_value(item);
            if !id.is_default() {
                batch.push(
                    Command::text(&joins.link)
                        .param(owner.clone())
                        .param(id.clone()),
                );
            }
        }

        Ok(batch)
    }

    fn joins_delete(&self, record: &Record, property: &Property) -> Result<Batch> {
        let batch = self.source.batch();

        match (self.joins.get(&property.name), self.identity_of(record)) {
            (Some(joins), Some(owner)) => {
                Ok(batch.add_command(Command::text(&joins.unlink).param(owner.clone())))
            }
            _ => Ok(batch),
        }
    }

    fn setup_commands(&mut self) -> Result<()> {
        self.templates = Some(templates::build(&self.serializer, &self.mapping));

        tracing::trace!(
            entity = %self.mapping.entity,
            table = %self.mapping.table_name,
            source = %self.source.name(),
            "prepared command templates"
        );

        Ok(())
    }

    fn setup_load_commands(&mut self, property: &Property) -> Result<()> {
        let Some(target) = self.targets.get(&property.name).cloned() else {
            return Ok(());
        };

        if let Some(load) = templates::load(&self.serializer, &self.mapping, property, &target) {
            self.loads.insert(property.name.clone(), load);
        }

        if let Some(joins) = templates::joins(&self.serializer, property) {
            self.joins.insert(property.name.clone(), joins);
        }

        Ok(())
    }

    fn create_storage(&self) -> Result<Batch> {
        // Columns are declared without types, which only SQLite accepts
        if !self.serializer.is_sqlite() {
            return Err(Error::unsupported_feature(format!(
                "creating storage for {:?}",
                self.serializer.flavor()
            )));
        }

        let columns = self
            .mapping
            .stored()
            .map(|property| ColumnDef {
                name: property.column.clone(),
                primary_key: property.identity,
                auto_increment: property.auto_increment,
                nullable: property.nullable || !matches!(property.kind, PropertyKind::Reference),
            })
            .collect();

        let mut batch = self.source.batch().add_command(self.serialize(CreateTable {
            table: self.mapping.table_name.clone(),
            columns,
            primary_key: vec![],
            if_not_exists: true,
        }));

        for property in self.mapping.associations() {
            let Some(join) = property.as_many_to_many() else {
                continue;
            };

            let columns = [join.owner_column(), join.target_column()];
            batch.push(self.serialize(CreateTable {
                table: join.table().to_string(),
                columns: columns
                    .iter()
                    .map(|column| ColumnDef {
                        nullable: false,
                        ..ColumnDef::new(*column)
                    })
                    .collect(),
                primary_key: columns.iter().map(|column| column.to_string()).collect(),
                if_not_exists: true,
            }));
        }

        Ok(batch)
    }
}
