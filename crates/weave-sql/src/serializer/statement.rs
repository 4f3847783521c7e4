use super::{And, Comma, Flavor, Formatter, Ident, Params, ToSql};

use crate::stmt::{
    Column, ColumnAlias, ColumnDef, Condition, CreateTable, Delete, Insert, Join, OrderByColumn,
    PageCount, Select, Statement, Update,
};
use weave_core::{
    stmt::{Direction, FilterOp},
    Value,
};

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::PageCount(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &Column {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if let Some(table) = &self.table {
            fmt!(f, Ident(table) ".");
        }
        fmt!(f, Ident(&self.name));
    }
}

impl ToSql for &ColumnAlias {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, &self.column " AS " Ident(&self.alias));
    }
}

impl ToSql for &Condition {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match (self.op, &self.value) {
            (FilterOp::Eq, Value::Null) => fmt!(f, &self.column " IS NULL"),
            (FilterOp::Ne, Value::Null) => fmt!(f, &self.column " IS NOT NULL"),
            (op, value) => fmt!(f, &self.column " " op.as_str() " " value),
        }
    }
}

/// ` WHERE a AND b`, or nothing when there are no conditions.
struct Where<'a>(&'a [Condition]);

impl ToSql for Where<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if !self.0.is_empty() {
            fmt!(f, " WHERE " And(self.0));
        }
    }
}

impl ToSql for &Join {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(
            f, " INNER JOIN " Ident(&self.table) " AS " Ident(&self.alias)
            " ON " { &self.left } " = " { &self.right }
        );
    }
}

impl ToSql for &OrderByColumn {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let direction = match self.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };
        fmt!(f, &self.column direction);
    }
}

impl ToSql for &Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "SELECT " Comma(&self.columns) " FROM " Ident(&self.table));
        if let Some(alias) = &self.alias {
            fmt!(f, " AS " Ident(alias));
        }
        fmt!(f, self.join.as_ref() Where(&self.filter));

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY " Comma(&self.order_by));
        }

        match (self.limit, self.offset) {
            (Some(limit), offset) => {
                fmt!(f, " LIMIT " limit);
                if let Some(offset) = offset {
                    fmt!(f, " OFFSET " offset);
                }
            }
            (None, Some(offset)) => {
                // SQLite and MySQL only accept OFFSET after a LIMIT
                match f.serializer.flavor {
                    Flavor::Sqlite => fmt!(f, " LIMIT -1"),
                    Flavor::Mysql => fmt!(f, " LIMIT " u64::MAX),
                    Flavor::Postgresql => {}
                }
                fmt!(f, " OFFSET " offset);
            }
            (None, None) => {}
        }
    }
}

impl ToSql for &Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "INSERT INTO " Ident(&self.table));

        if self.columns.is_empty() {
            match f.serializer.flavor {
                Flavor::Mysql => fmt!(f, " () VALUES ()"),
                Flavor::Postgresql | Flavor::Sqlite => fmt!(f, " DEFAULT VALUES"),
            }
            return;
        }

        let columns = Comma(self.columns.iter().map(Ident));
        fmt!(f, " (" columns ") VALUES (" Comma(&self.values) ")");
    }
}

struct Assignment<'a>(&'a str, &'a Value);

impl ToSql for Assignment<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(self.0) " = " self.1);
    }
}

impl ToSql for &Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let assignments = Comma(
            self.assignments
                .iter()
                .map(|(column, value)| Assignment(column, value)),
        );
        fmt!(f, "UPDATE " Ident(&self.table) " SET " assignments Where(&self.filter));
    }
}

impl ToSql for &Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "DELETE FROM " Ident(&self.table) Where(&self.filter));
    }
}

impl ToSql for &PageCount {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        // Integer division rounding up
        fmt!(
            f, "SELECT (COUNT(*) + " self.page_size.saturating_sub(1) ") / " self.page_size
            " AS " Ident("page_count") " FROM " Ident(&self.table) Where(&self.filter)
        );
    }
}

impl ToSql for &ColumnDef {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(&self.name));

        if self.auto_increment {
            let def = match f.serializer.flavor {
                Flavor::Sqlite => " INTEGER PRIMARY KEY AUTOINCREMENT",
                Flavor::Postgresql => " BIGSERIAL PRIMARY KEY",
                Flavor::Mysql => " BIGINT AUTO_INCREMENT PRIMARY KEY",
            };
            fmt!(f, def);
            return;
        }

        if self.primary_key {
            fmt!(f, " PRIMARY KEY");
        } else if !self.nullable {
            fmt!(f, " NOT NULL");
        }
    }
}

impl ToSql for &CreateTable {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let if_not_exists = if self.if_not_exists {
            "IF NOT EXISTS "
        } else {
            ""
        };

        fmt!(f, "CREATE TABLE " if_not_exists Ident(&self.table) " (");

        for (index, column) in self.columns.iter().enumerate() {
            fmt!(f, "\n    " column);
            if index < self.columns.len() - 1 {
                fmt!(f, ",");
            }
        }

        if !self.primary_key.is_empty() {
            let pk = Comma(self.primary_key.iter().map(Ident));
            fmt!(f, ",\n    PRIMARY KEY (" pk ")");
        }

        fmt!(f, "\n)");
    }
}
