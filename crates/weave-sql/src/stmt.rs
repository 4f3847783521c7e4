mod column;
pub use column::{Column, ColumnAlias};

mod condition;
pub use condition::Condition;

mod create_table;
pub use create_table::{ColumnDef, CreateTable};

mod delete;
pub use delete::Delete;

mod insert;
pub use insert::Insert;

mod page_count;
pub use page_count::PageCount;

mod select;
pub use select::{Join, OrderByColumn, Select};

mod update;
pub use update::Update;

/// A SQL statement understood by the [`Serializer`](crate::Serializer).
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    Delete(Delete),
    Insert(Insert),
    PageCount(PageCount),
    Select(Select),
    Update(Update),
}

macro_rules! impl_from {
    ( $( $variant:ident ),* ) => {
        $(
            impl From<$variant> for Statement {
                fn from(src: $variant) -> Self {
                    Self::$variant(src)
                }
            }
        )*
    };
}

impl_from!(CreateTable, Delete, Insert, PageCount, Select, Update);
