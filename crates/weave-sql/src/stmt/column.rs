/// A column reference, optionally qualified by a table alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub table: Option<String>,
    pub name: String,
}

/// A selected column and the record key it is returned under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAlias {
    pub column: Column,
    pub alias: String,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }
}

impl ColumnAlias {
    pub fn new(column: Column, alias: impl Into<String>) -> Self {
        Self {
            column,
            alias: alias.into(),
        }
    }
}
