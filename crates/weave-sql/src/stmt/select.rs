use super::{Column, ColumnAlias, Condition};

use weave_core::stmt::Direction;

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub columns: Vec<ColumnAlias>,
    pub table: String,

    /// Alias of `table`, needed when joining
    pub alias: Option<String>,

    pub join: Option<Join>,

    /// Conditions joined with `AND`
    pub filter: Vec<Condition>,

    pub order_by: Vec<OrderByColumn>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// `INNER JOIN table AS alias ON left = right`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub alias: String,
    pub left: Column,
    pub right: Column,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByColumn {
    pub column: Column,
    pub direction: Direction,
}

impl Select {
    pub fn new(table: impl Into<String>, columns: Vec<ColumnAlias>) -> Self {
        Self {
            columns,
            table: table.into(),
            alias: None,
            join: None,
            filter: vec![],
            order_by: vec![],
            limit: None,
            offset: None,
        }
    }
}
