use super::{
    Association, JoinTable, Mapping, Name, Property, PropertyKind, RawCommand, SourceBinding,
};
use crate::{stmt::Value, Error, Result};

/// Declares a [`Mapping`] for one entity type.
///
/// Every declaration appends a property and hands back a [`PropertyBuilder`]
/// for per-field configuration. Nothing is validated until [`build`], except
/// the identity, which may only be declared once.
///
/// [`build`]: MappingBuilder::build
#[derive(Debug)]
pub struct MappingBuilder {
    entity: String,
    table_name: Option<String>,
    prefix: String,
    suffix: String,
    identity: Option<usize>,
    properties: Vec<Property>,
    all_command: Option<RawCommand>,
    any_command: Option<RawCommand>,
    sources: Vec<SourceBinding>,
}

/// Configures the property most recently declared on a [`MappingBuilder`].
#[derive(Debug)]
pub struct PropertyBuilder<'a> {
    property: &'a mut Property,
}

impl MappingBuilder {
    pub(super) fn new(entity: &str) -> Self {
        Self {
            entity: entity.to_string(),
            table_name: None,
            prefix: String::new(),
            suffix: "_".to_string(),
            identity: None,
            properties: vec![],
            all_command: None,
            any_command: None,
            sources: vec![],
        }
    }

    /// Use an explicit container name instead of the conventional one.
    ///
    /// The conventional name is the prefix, the snake-cased entity name and
    /// the suffix, so `BlogPost` is stored in `blog_post_` with the default
    /// empty prefix and `_` suffix.
    pub fn table(&mut self, name: impl Into<String>) -> &mut Self {
        self.table_name = Some(name.into());
        self
    }

    pub fn prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(&mut self, suffix: impl Into<String>) -> &mut Self {
        self.suffix = suffix.into();
        self
    }

    /// Designates the identity field. Fails if an identity was already declared.
    pub fn identity(&mut self, field: &str) -> Result<PropertyBuilder<'_>> {
        if let Some(index) = self.identity {
            return Err(Error::duplicate_identity(
                &self.entity,
                &self.properties[index].name,
                field,
            ));
        }

        self.identity = Some(self.properties.len());

        let mut property = Property::new(field, PropertyKind::Reference);
        property.identity = true;
        Ok(self.push(property))
    }

    /// Declares a scalar field.
    pub fn reference(&mut self, field: &str) -> PropertyBuilder<'_> {
        self.push(Property::new(field, PropertyKind::Reference))
    }

    /// Declares a single-valued association to `target`, stored as a foreign
    /// reference column named `{field}_id` unless overridden.
    pub fn map(&mut self, field: &str, target: &str) -> PropertyBuilder<'_> {
        self.push(Property::new(
            field,
            PropertyKind::Map(Association {
                target: target.to_string(),
                foreign_field: None,
                single: true,
            }),
        ))
    }

    /// Declares the "one" side of a one-to-many association. The targets
    /// reference the owner through their `foreign_field`.
    pub fn many_to_one(&mut self, field: &str, target: &str) -> PropertyBuilder<'_> {
        self.push(Property::new(
            field,
            PropertyKind::ManyToOne(Association {
                target: target.to_string(),
                foreign_field: None,
                single: false,
            }),
        ))
    }

    /// Declares a many-to-many association stored in a join container.
    pub fn many_to_many(&mut self, field: &str, target: &str) -> PropertyBuilder<'_> {
        self.push(Property::new(
            field,
            PropertyKind::ManyToMany(JoinTable {
                target: target.to_string(),
                table: None,
                owner_column: None,
                target_column: None,
            }),
        ))
    }

    /// Replaces the generated full-scan command.
    pub fn all_command(&mut self, command: RawCommand) -> &mut Self {
        self.all_command = Some(command);
        self
    }

    /// Replaces the generated single-row command.
    pub fn any_command(&mut self, command: RawCommand) -> &mut Self {
        self.any_command = Some(command);
        self
    }

    /// Binds the mapping to a named source. A mapping without explicit
    /// sources binds to every registered source.
    pub fn source(&mut self, name: impl Into<String>) -> &mut Self {
        self.sources.push(SourceBinding {
            source: name.into(),
            order: None,
        });
        self
    }

    /// Binds the mapping to a named source, overriding the source's write
    /// order for this entity.
    pub fn source_with_order(&mut self, name: impl Into<String>, order: i32) -> &mut Self {
        self.sources.push(SourceBinding {
            source: name.into(),
            order: Some(order),
        });
        self
    }

    fn push(&mut self, property: Property) -> PropertyBuilder<'_> {
        let index = self.properties.len();
        self.properties.push(property);
        PropertyBuilder {
            property: &mut self.properties[index],
        }
    }

    /// Freezes the declaration into an immutable mapping.
    pub fn build(&mut self) -> Result<Mapping> {
        let name = Name::new(&self.entity);
        let owner = name.snake_case();

        let table_name = match &self.table_name {
            Some(table_name) => table_name.clone(),
            None => format!("{}{}{}", self.prefix, owner, self.suffix),
        };

        let mut properties = self.properties.clone();

        for (i, property) in properties.iter().enumerate() {
            if properties[..i].iter().any(|p| p.name == property.name) {
                return Err(Error::invalid_mapping(format!(
                    "`{}` declares property `{}` more than once",
                    self.entity, property.name
                )));
            }

            if property.auto_increment && !property.identity {
                return Err(Error::invalid_mapping(format!(
                    "`{}::{}` is auto-increment but is not the identity",
                    self.entity, property.name
                )));
            }
        }

        for property in &mut properties {
            match &mut property.kind {
                PropertyKind::ManyToOne(assoc) => {
                    if assoc.foreign_field.is_none() {
                        assoc.foreign_field = Some(owner.clone());
                    }
                }
                PropertyKind::ManyToMany(join) => {
                    let target = Name::new(&join.target).snake_case();

                    if join.table.is_none() {
                        join.table = Some(format!(
                            "{}{}_{}{}",
                            self.prefix, owner, target, self.suffix
                        ));
                    }

                    let owner_column = join
                        .owner_column
                        .get_or_insert_with(|| format!("{owner}_id"))
                        .clone();

                    if join.target_column.is_none() {
                        let mut target_column = format!("{target}_id");
                        // Self-referential joins need distinct columns
                        if target_column == owner_column {
                            target_column = format!("{}_id", property.name);
                        }
                        join.target_column = Some(target_column);
                    }
                }
                _ => {}
            }
        }

        Ok(Mapping {
            entity: self.entity.clone(),
            name,
            table_name,
            identity: self.identity,
            properties,
            all_command: self.all_command.clone(),
            any_command: self.any_command.clone(),
            sources: self.sources.clone(),
        })
    }
}

impl PropertyBuilder<'_> {
    /// Overrides the storage name.
    pub fn column(self, name: impl Into<String>) -> Self {
        self.property.column = name.into();
        self
    }

    pub fn auto_increment(self) -> Self {
        self.property.auto_increment = true;
        self
    }

    pub fn nullable(self) -> Self {
        self.property.nullable = true;
        self
    }

    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.property.default = Some(value.into());
        self
    }

    pub fn cascade_on_update(self) -> Self {
        self.property.cascade.on_update = true;
        self
    }

    pub fn cascade_on_delete(self) -> Self {
        self.property.cascade.on_delete = true;
        self
    }

    pub fn set_null_on_delete(self) -> Self {
        self.property.cascade.set_null_on_delete = true;
        self
    }

    /// For `ManyToOne`: the target field referencing the owner.
    pub fn foreign_field(self, field: impl Into<String>) -> Self {
        if let PropertyKind::ManyToOne(assoc) = &mut self.property.kind {
            assoc.foreign_field = Some(field.into());
        }
        self
    }

    /// For `ManyToOne`: the association holds at most one target.
    pub fn single(self) -> Self {
        if let PropertyKind::ManyToOne(assoc) = &mut self.property.kind {
            assoc.single = true;
        }
        self
    }

    /// For `ManyToMany`: the join container name.
    pub fn join_table(self, name: impl Into<String>) -> Self {
        if let PropertyKind::ManyToMany(join) = &mut self.property.kind {
            join.table = Some(name.into());
        }
        self
    }

    /// For `ManyToMany`: the owner and target reference columns.
    pub fn join_columns(self, owner: impl Into<String>, target: impl Into<String>) -> Self {
        if let PropertyKind::ManyToMany(join) = &mut self.property.kind {
            join.owner_column = Some(owner.into());
            join.target_column = Some(target.into());
        }
        self
    }

    pub fn property(&self) -> &Property {
        self.property
    }
}
