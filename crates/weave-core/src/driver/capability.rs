#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    /// When true, the provider speaks a SQL-based command language.
    pub sql: bool,

    /// Many-to-many join structures can be stored and queried.
    pub joins: bool,

    /// The store can generate identity values on insert.
    pub auto_increment: bool,

    /// All commands of one batch apply atomically.
    pub transactions: bool,

    /// Offset/limit paging is native. When false, generators emulate it.
    pub paging: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        sql: true,
        joins: true,
        auto_increment: true,
        transactions: true,
        paging: true,
    };

    /// Directory service capabilities
    pub const DIRECTORY: Self = Self {
        sql: false,
        joins: false,
        auto_increment: false,
        transactions: true,
        paging: false,
    };
}
