mod binding;
pub use binding::Binding;

mod builder;
pub use builder::Builder;

use crate::{engine, Entity, Filter, OrderBy, Record, Result, Value};

use indexmap::IndexMap;
use weave_core::{Error, Schema, Source, SourceManager};

use std::sync::Arc;

/// Shared state between all `Db` clones. Immutable once built.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) sources: SourceManager,
    pub(crate) schema: Schema,

    /// Generator bindings per entity, sorted by effective order
    pub(crate) bindings: IndexMap<String, Vec<Binding>>,
}

/// Handle to the ORM context: every source, mapping and generator.
///
/// Cloning is cheap; clones share the same context.
#[derive(Debug, Clone)]
pub struct Db {
    pub(crate) shared: Arc<Shared>,
}

impl Shared {
    pub(crate) fn bindings(&self, entity: &str) -> Result<&[Binding]> {
        self.bindings
            .get(entity)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::unknown_mapping(entity))
    }
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.shared.schema
    }

    pub fn source(&self, name: &str) -> Result<&Source> {
        self.shared.sources.source(name)
    }

    /// The source registered with the marker type `M`.
    pub fn source_for<M: 'static>(&self) -> Result<&Source> {
        self.shared.sources.source_for::<M>()
    }

    /// Every source, sorted by ascending order.
    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.shared.sources.iter()
    }

    /// Generators bound to `entity`, in save order.
    pub fn bindings(&self, entity: &str) -> Result<&[Binding]> {
        self.shared.bindings(entity)
    }

    /// Creates the containers of every mapping on every source that
    /// supports it.
    pub fn push_schema(&self) -> Result<()> {
        for (entity, bindings) in &self.shared.bindings {
            for binding in bindings {
                let batch = binding.generator().create_storage()?;
                engine::run(binding, entity, "create_storage", batch)?;
            }
        }

        Ok(())
    }

    /// Inserts or updates `entity` on every writable source.
    ///
    /// When a source fails, the others are still written and the first
    /// failure is returned. `entity` still receives any identity generated
    /// before the failure.
    pub fn save<T: Entity>(&self, entity: &mut T) -> Result<()> {
        let mut record = entity.to_record();
        let res = engine::save(&self.shared, T::NAME, &mut record);
        *entity = T::from_record(record)?;
        res
    }

    pub fn save_all<T: Entity>(&self, entities: &mut [T]) -> Result<()> {
        for entity in entities {
            self.save(entity)?;
        }
        Ok(())
    }

    pub fn delete<T: Entity>(&self, entity: &T) -> Result<()> {
        engine::delete(&self.shared, T::NAME, &entity.to_record())
    }

    pub fn all<T: Entity>(&self, filters: &[Filter]) -> Result<Vec<T>> {
        typed(self.all_records(T::NAME, filters)?)
    }

    pub fn all_limit<T: Entity>(&self, limit: u64, filters: &[Filter]) -> Result<Vec<T>> {
        typed(self.all_limit_records(T::NAME, limit, filters)?)
    }

    pub fn any<T: Entity>(&self, filters: &[Filter]) -> Result<Option<T>> {
        self.any_record(T::NAME, filters)?
            .map(T::from_record)
            .transpose()
    }

    /// Fetches the instance holding `identity`. Fails with a not-found error
    /// if no readable source has it.
    pub fn get<T: Entity>(&self, identity: impl Into<Value>) -> Result<T> {
        T::from_record(self.get_record(T::NAME, identity)?)
    }

    /// Rows of zero-based page `page_index`.
    pub fn paged<T: Entity>(
        &self,
        page_size: u64,
        page_index: u64,
        order_by: &[OrderBy],
    ) -> Result<Vec<T>> {
        typed(self.paged_records(T::NAME, page_size, page_index, order_by)?)
    }

    pub fn page_count<T: Entity>(&self, page_size: u64) -> Result<u64> {
        self.page_count_records(T::NAME, page_size)
    }

    /// Loads the targets of one association of `owner`.
    pub fn load<T: Entity, U: Entity>(&self, owner: &T, property: &str) -> Result<Vec<U>> {
        typed(self.load_property(T::NAME, &owner.to_record(), property)?)
    }

    /// Loads the target of a single-valued association of `owner`.
    pub fn load_one<T: Entity, U: Entity>(&self, owner: &T, property: &str) -> Result<Option<U>> {
        self.load_property(T::NAME, &owner.to_record(), property)?
            .into_iter()
            .next()
            .map(U::from_record)
            .transpose()
    }

    /// Like [`save`](Self::save) for a dynamic record. The record receives
    /// any identity generated by the store.
    pub fn save_record(&self, entity: &str, record: &mut Record) -> Result<()> {
        engine::save(&self.shared, entity, record)
    }

    pub fn delete_record(&self, entity: &str, record: &Record) -> Result<()> {
        engine::delete(&self.shared, entity, record)
    }

    pub fn all_records(&self, entity: &str, filters: &[Filter]) -> Result<Vec<Record>> {
        engine::read(&self.shared, entity, "all", None, |generator| {
            generator.all(filters)
        })
    }

    pub fn all_limit_records(
        &self,
        entity: &str,
        limit: u64,
        filters: &[Filter],
    ) -> Result<Vec<Record>> {
        engine::read(&self.shared, entity, "all", Some(limit), |generator| {
            generator.all_limit(Some(limit), filters)
        })
    }

    pub fn any_record(&self, entity: &str, filters: &[Filter]) -> Result<Option<Record>> {
        let records = engine::read(&self.shared, entity, "any", Some(1), |generator| {
            generator.any(filters)
        })?;
        Ok(records.into_iter().next())
    }

    pub fn get_record(&self, entity: &str, identity: impl Into<Value>) -> Result<Record> {
        let identity = identity.into();
        let name = engine::identity_name(&self.shared, entity)?;

        self.any_record(entity, &[Filter::eq(name, identity.clone())])?
            .ok_or_else(|| Error::record_not_found(format!("entity={entity} identity={identity}")))
    }

    pub fn paged_records(
        &self,
        entity: &str,
        page_size: u64,
        page_index: u64,
        order_by: &[OrderBy],
    ) -> Result<Vec<Record>> {
        engine::read(&self.shared, entity, "paged", Some(page_size), |generator| {
            generator.paged(page_size, page_index, order_by)
        })
    }

    /// Number of pages of `page_size` rows. With several readable sources
    /// the largest count wins.
    pub fn page_count_records(&self, entity: &str, page_size: u64) -> Result<u64> {
        engine::page_count(&self.shared, entity, page_size)
    }

    /// Materializes one association of a dynamic record.
    pub fn load_property(&self, entity: &str, record: &Record, property: &str) -> Result<Vec<Record>> {
        engine::load(&self.shared, entity, record, property)
    }
}

fn typed<T: Entity>(records: Vec<Record>) -> Result<Vec<T>> {
    records.into_iter().map(T::from_record).collect()
}
