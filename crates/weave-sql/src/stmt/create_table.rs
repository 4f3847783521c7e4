#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    pub table: String,
    pub columns: Vec<ColumnDef>,

    /// Columns of a composite primary key. A single-column key is declared
    /// on the column itself.
    pub primary_key: Vec<String>,

    pub if_not_exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub nullable: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: false,
            auto_increment: false,
            nullable: true,
        }
    }
}
