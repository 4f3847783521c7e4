use crate::stmt::Value;

/// One field descriptor of a [`Mapping`](super::Mapping).
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Application-level field name
    pub name: String,

    /// Storage name of the column/attribute holding the value. For `Map`
    /// associations this is the foreign reference column.
    pub column: String,

    pub kind: PropertyKind,

    /// True for the mapping's identity property
    pub identity: bool,

    /// The store generates the value on insert
    pub auto_increment: bool,

    pub nullable: bool,

    /// Value written when the record does not carry the field
    pub default: Option<Value>,

    pub cascade: Cascade,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    /// Scalar field stored directly in the container
    Reference,

    /// Single-valued association stored through a foreign reference column
    Map(Association),

    /// Association owned by the "one" side; the targets hold a foreign
    /// reference back to the owner
    ManyToOne(Association),

    /// Collection association stored in a join structure
    ManyToMany(JoinTable),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    /// Entity name of the associated type
    pub target: String,

    /// For `ManyToOne`: the field on the target that references the owner
    pub foreign_field: Option<String>,

    /// For `ManyToOne`: the association holds at most one target
    pub single: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTable {
    /// Entity name of the associated type
    pub target: String,

    /// Join container name; resolved when the mapping is built
    pub table: Option<String>,

    /// Column referencing the owner's identity
    pub owner_column: Option<String>,

    /// Column referencing the target's identity
    pub target_column: Option<String>,
}

/// Cascade behavior of an association.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cascade {
    /// Saving the owner also saves the associated instances
    pub on_update: bool,

    /// Deleting the owner also deletes the associated instances
    pub on_delete: bool,

    /// Deleting the owner clears the targets' foreign reference instead
    pub set_null_on_delete: bool,
}

impl Property {
    pub(crate) fn new(name: &str, kind: PropertyKind) -> Self {
        let column = match kind {
            PropertyKind::Map(_) => format!("{name}_id"),
            _ => name.to_string(),
        };

        Self {
            name: name.to_string(),
            column,
            kind,
            identity: false,
            auto_increment: false,
            nullable: false,
            default: None,
            cascade: Cascade::default(),
        }
    }

    /// True if the property occupies a column in the entity's own container.
    pub fn is_stored(&self) -> bool {
        matches!(self.kind, PropertyKind::Reference | PropertyKind::Map(_))
    }

    pub fn is_association(&self) -> bool {
        !matches!(self.kind, PropertyKind::Reference)
    }

    /// Entity name of the association target.
    pub fn target(&self) -> Option<&str> {
        match &self.kind {
            PropertyKind::Reference => None,
            PropertyKind::Map(assoc) | PropertyKind::ManyToOne(assoc) => Some(&assoc.target),
            PropertyKind::ManyToMany(join) => Some(&join.target),
        }
    }

    /// True if the property resolves to a list of target records.
    pub fn is_collection(&self) -> bool {
        match &self.kind {
            PropertyKind::ManyToOne(assoc) => !assoc.single,
            PropertyKind::ManyToMany(_) => true,
            _ => false,
        }
    }

    pub fn as_many_to_one(&self) -> Option<&Association> {
        match &self.kind {
            PropertyKind::ManyToOne(assoc) => Some(assoc),
            _ => None,
        }
    }

    pub fn as_many_to_many(&self) -> Option<&JoinTable> {
        match &self.kind {
            PropertyKind::ManyToMany(join) => Some(join),
            _ => None,
        }
    }
}

impl Association {
    pub fn foreign_field(&self) -> &str {
        self.foreign_field.as_deref().unwrap_or_default()
    }
}

impl JoinTable {
    pub fn table(&self) -> &str {
        self.table.as_deref().unwrap_or_default()
    }

    pub fn owner_column(&self) -> &str {
        self.owner_column.as_deref().unwrap_or_default()
    }

    pub fn target_column(&self) -> &str {
        self.target_column.as_deref().unwrap_or_default()
    }
}
