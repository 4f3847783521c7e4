use crate::{
    stmt::{Column, ColumnAlias, Condition, Delete, Insert, Join, Select, Update},
    Serializer,
};

use weave_core::{
    schema::{Property, PropertyKind},
    Mapping, Value,
};

/// Stand-in for a parameter bound at execution time. Must not be `Null`,
/// which would render as `IS NULL`.
fn slot() -> Value {
    Value::I64(0)
}

/// Command text prepared once per mapping.
#[derive(Debug, Clone)]
pub(super) struct Templates {
    /// Unfiltered scan of every stored column, aliased to record keys
    pub(super) select: Select,

    /// Insert of every stored column
    pub(super) insert: String,

    /// Insert leaving the identity to the store
    pub(super) insert_generated: Option<String>,

    /// Update of every stored non-identity column, keyed by identity
    pub(super) update: Option<String>,

    pub(super) delete: Option<String>,
}

/// Query loading one association, with the record key supplying its
/// single parameter.
#[derive(Debug, Clone)]
pub(super) struct LoadTemplate {
    pub(super) key: String,
    pub(super) query: String,
}

/// Link maintenance for one many-to-many association.
#[derive(Debug, Clone)]
pub(super) struct JoinTemplates {
    /// Removes every link of one owner
    pub(super) unlink: String,

    /// Adds one (owner, target) link
    pub(super) link: String,
}

pub(super) fn select(mapping: &Mapping, table_alias: Option<&str>) -> Select {
    let columns = mapping
        .stored()
        .map(|property| {
            let column = match table_alias {
                Some(alias) => Column::qualified(alias, &property.column),
                None => Column::new(&property.column),
            };
            ColumnAlias::new(column, property.stored_key())
        })
        .collect();

    let mut select = Select::new(&mapping.table_name, columns);
    select.alias = table_alias.map(str::to_string);
    select
}

fn serialize(serializer: &Serializer, stmt: impl Into<crate::Statement>) -> String {
    serializer.serialize(&stmt.into(), &mut Vec::<Value>::new())
}

pub(super) fn build(serializer: &Serializer, mapping: &Mapping) -> Templates {
    let identity = mapping.identity();
    let stored: Vec<&Property> = mapping.stored().collect();

    let insert = serialize(
        serializer,
        Insert {
            table: mapping.table_name.clone(),
            columns: stored.iter().map(|p| p.column.clone()).collect(),
            values: stored.iter().map(|_| slot()).collect(),
        },
    );

    let insert_generated = identity.filter(|id| id.auto_increment).map(|_| {
        let columns: Vec<_> = stored.iter().filter(|p| !p.identity).collect();
        serialize(
            serializer,
            Insert {
                table: mapping.table_name.clone(),
                columns: columns.iter().map(|p| p.column.clone()).collect(),
                values: columns.iter().map(|_| slot()).collect(),
            },
        )
    });

    let update = identity.map(|id| {
        let mut assignments: Vec<_> = stored
            .iter()
            .filter(|p| !p.identity)
            .map(|p| (p.column.clone(), slot()))
            .collect();

        if assignments.is_empty() {
            assignments.push((id.column.clone(), slot()));
        }

        serialize(
            serializer,
            Update {
                table: mapping.table_name.clone(),
                assignments,
                filter: vec![Condition::eq(Column::new(&id.column), slot())],
            },
        )
    });

    let delete = identity.map(|id| {
        serialize(
            serializer,
            Delete {
                table: mapping.table_name.clone(),
                filter: vec![Condition::eq(Column::new(&id.column), slot())],
            },
        )
    });

    Templates {
        select: select(mapping, None),
        insert,
        insert_generated,
        update,
        delete,
    }
}

/// Builds the load query for `property`. `target` is the association's
/// mapping on the same source.
pub(super) fn load(
    serializer: &Serializer,
    owner: &Mapping,
    property: &Property,
    target: &Mapping,
) -> Option<LoadTemplate> {
    let owner_identity = owner.identity()?;

    let (key, stmt) = match &property.kind {
        PropertyKind::Reference => return None,
        PropertyKind::Map(_) => {
            let target_identity = target.identity()?;
            let mut stmt = select(target, None);
            stmt.filter
                .push(Condition::eq(Column::new(&target_identity.column), slot()));
            (property.column.clone(), stmt)
        }
        PropertyKind::ManyToOne(assoc) => {
            let foreign = target.column_for(assoc.foreign_field());
            let mut stmt = select(target, None);
            stmt.filter.push(Condition::eq(Column::new(foreign), slot()));
            if assoc.single {
                stmt.limit = Some(1);
            }
            (owner_identity.name.clone(), stmt)
        }
        PropertyKind::ManyToMany(join) => {
            let target_identity = target.identity()?;
            let mut stmt = select(target, Some("t"));
            stmt.join = Some(Join {
                table: join.table().to_string(),
                alias: "j".to_string(),
                left: Column::qualified("j", join.target_column()),
                right: Column::qualified("t", &target_identity.column),
            });
            stmt.filter.push(Condition::eq(
                Column::qualified("j", join.owner_column()),
                slot(),
            ));
            (owner_identity.name.clone(), stmt)
        }
    };

    Some(LoadTemplate {
        key,
        query: serialize(serializer, stmt),
    })
}

pub(super) fn joins(serializer: &Serializer, property: &Property) -> Option<JoinTemplates> {
    let join = property.as_many_to_many()?;

    let unlink = serialize(
        serializer,
        Delete {
            table: join.table().to_string(),
            filter: vec![Condition::eq(Column::new(join.owner_column()), slot())],
        },
    );

    let link = serialize(
        serializer,
        Insert {
            table: join.table().to_string(),
            columns: vec![
                join.owner_column().to_string(),
                join.target_column().to_string(),
            ],
            values: vec![slot(), slot()],
        },
    );

    Some(JoinTemplates { unlink, link })
}
