use super::{MappingBuilder, Name, Property, PropertyKind, Schema};
use crate::{
    driver::{CommandKind, Generator, Provider, SourceHandle},
    stmt::{Record, Value},
    Result,
};

use std::sync::Arc;

/// Describes how one entity type is stored.
///
/// A mapping is declared once through [`Mapping::builder`] and is immutable
/// afterwards. Provider-specific command templates are not stored on the
/// mapping itself; [`Mapping::add_to_provider`] hands the mapping to a
/// provider, which caches them on the returned [`Generator`].
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    /// Entity type name, e.g. `User`
    pub entity: String,

    /// Entity name split into words
    pub name: Name,

    /// Physical container name
    pub table_name: String,

    /// Index of the identity property in `properties`
    pub(super) identity: Option<usize>,

    pub properties: Vec<Property>,

    /// Replaces the generated full-scan command
    pub all_command: Option<RawCommand>,

    /// Replaces the generated single-row command
    pub any_command: Option<RawCommand>,

    /// Sources this mapping is bound to. Empty binds to every source.
    pub sources: Vec<SourceBinding>,
}

/// Caller-provided command text that bypasses generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommand {
    pub text: String,
    pub kind: CommandKind,
}

/// Binds a mapping to one named source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBinding {
    pub source: String,

    /// Overrides the source's order for this mapping's entity
    pub order: Option<i32>,
}

impl Mapping {
    pub fn builder(entity: &str) -> MappingBuilder {
        MappingBuilder::new(entity)
    }

    pub fn identity(&self) -> Option<&Property> {
        self.identity.map(|index| &self.properties[index])
    }

    /// Returns the record's identity value, or `Null` if the mapping has no
    /// identity or the record does not carry it.
    pub fn identity_value<'a>(&self, record: &'a Record) -> &'a Value {
        static NULL: Value = Value::Null;

        match self.identity() {
            Some(identity) => record.value(&identity.name),
            None => &NULL,
        }
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// Properties occupying a column in this mapping's container.
    pub fn stored(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|property| property.is_stored())
    }

    pub fn associations(&self) -> impl Iterator<Item = &Property> {
        self.properties
            .iter()
            .filter(|property| property.is_association())
    }

    /// Record key under which the value of `field` is stored. For `Map`
    /// associations this is the foreign reference column; fields the
    /// mapping does not declare are returned unchanged.
    pub fn stored_key<'a>(&'a self, field: &'a str) -> &'a str {
        match self.property(field) {
            Some(property) => property.stored_key(),
            None => field,
        }
    }

    /// Storage column for `field`, following the same rules as
    /// [`stored_key`](Self::stored_key).
    pub fn column_for<'a>(&'a self, field: &'a str) -> &'a str {
        match self.property(field) {
            Some(property) => &property.column,
            None => field,
        }
    }

    /// True if the mapping is bound to the named source.
    pub fn applies_to(&self, source: &str) -> bool {
        self.sources.is_empty() || self.sources.iter().any(|b| b.source == source)
    }

    /// Order override declared for the named source.
    pub fn order_for(&self, source: &str) -> Option<i32> {
        self.sources
            .iter()
            .find(|binding| binding.source == source)
            .and_then(|binding| binding.order)
    }

    /// Asks the source's provider for a generator bound to this mapping and
    /// pre-builds every command template it will need.
    pub fn add_to_provider(
        self: &Arc<Self>,
        provider: &dyn Provider,
        source: &SourceHandle,
        schema: &Schema,
    ) -> Result<Box<dyn Generator>> {
        let mut generator = provider.generate(source, self, schema)?;
        generator.setup_commands()?;

        for property in self.associations() {
            generator.setup_load_commands(property)?;
        }

        Ok(generator)
    }
}

impl Property {
    /// Record key holding this property's stored value.
    pub fn stored_key(&self) -> &str {
        match self.kind {
            PropertyKind::Map(_) => &self.column,
            _ => &self.name,
        }
    }
}

impl RawCommand {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CommandKind::Text,
        }
    }

    pub fn stored_procedure(name: impl Into<String>) -> Self {
        Self {
            text: name.into(),
            kind: CommandKind::StoredProcedure,
        }
    }
}
