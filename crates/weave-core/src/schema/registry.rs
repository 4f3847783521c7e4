use super::Mapping;
use crate::{Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// Every declared mapping, grouped by entity in declaration order.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    mappings: IndexMap<String, Vec<Arc<Mapping>>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mapping: Mapping) -> Arc<Mapping> {
        let mapping = Arc::new(mapping);
        self.mappings
            .entry(mapping.entity.clone())
            .or_default()
            .push(mapping.clone());
        mapping
    }

    /// All mappings declared for `entity`.
    pub fn mappings(&self, entity: &str) -> Result<&[Arc<Mapping>]> {
        self.mappings
            .get(entity)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::unknown_mapping(entity))
    }

    /// The mapping that stores `entity` on `source`. When several mappings
    /// claim the same source, the first declared one wins.
    pub fn resolve(&self, entity: &str, source: &str) -> Result<&Arc<Mapping>> {
        self.mappings(entity)?;
        self.find(entity, source)
            .ok_or_else(|| Error::unknown_mapping(format!("{entity}` on source `{source}")))
    }

    /// Like [`resolve`](Self::resolve), returning `None` when `entity` is
    /// not stored on `source`.
    pub fn find(&self, entity: &str, source: &str) -> Option<&Arc<Mapping>> {
        self.mappings
            .get(entity)?
            .iter()
            .find(|mapping| mapping.applies_to(source))
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.mappings.contains_key(entity)
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.mappings.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Mapping>> {
        self.mappings.values().flatten()
    }
}
