use crate::common::error::AppError;
use crate::common::schema::{ColumnDef, ColumnType, TableDef};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageType {
    Sqlite,
    MySql,
}

impl StorageType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StorageType::Sqlite => "sqlite",
            StorageType::MySql => "mysql",
        }
    }

    pub fn dialect(self) -> Box<dyn Dialect> {
        match self {
            StorageType::Sqlite => Box::new(SqliteDialect),
            StorageType::MySql => Box::new(MySqlDialect),
        }
    }
}

impl FromStr for StorageType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("sqlite") {
            Ok(StorageType::Sqlite)
        } else if s.eq_ignore_ascii_case("mysql") {
            Ok(StorageType::MySql)
        } else {
            Err(AppError::StorageInvalidType)
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL syntax that differs between backends.
///
/// Only identifiers taken from a [`TableDef`] are ever interpolated into the
/// generated statements; values always go through bind parameters.
pub trait Dialect: Send + Sync {
    fn storage_type(&self) -> StorageType;

    fn quote(&self, ident: &str) -> String;

    fn column_type(&self, ty: ColumnType) -> &'static str;

    /// Query returning one `name` row per column of the table bound to `?`.
    fn column_names_query(&self) -> &'static str;

    fn create_table(&self, table: &TableDef) -> String;

    fn rename_table(&self, from: &str, to: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {}",
            self.quote(from),
            self.quote(to)
        )
    }

    fn drop_table(&self, name: &str) -> String {
        format!("DROP TABLE {}", self.quote(name))
    }

    /// Statements rebuilding `table` from an existing table with
    /// `existing_columns`, keeping the data of the columns both share.
    fn alter_table(
        &self,
        table: &TableDef,
        existing_columns: &[String],
        temp_name: &str,
    ) -> Vec<String> {
        let shared = table
            .columns
            .iter()
            .filter(|column| {
                existing_columns
                    .iter()
                    .any(|existing| existing.eq_ignore_ascii_case(column.name))
            })
            .map(|column| self.quote(column.name))
            .collect::<Vec<_>>()
            .join(", ");

        let mut statements = vec![
            self.rename_table(table.name, temp_name),
            self.create_table(table),
        ];
        if !shared.is_empty() {
            statements.push(format!(
                "INSERT INTO {} ({shared}) SELECT {shared} FROM {}",
                self.quote(table.name),
                self.quote(temp_name),
            ));
        }
        statements.push(self.drop_table(temp_name));
        statements
    }
}

pub struct SqliteDialect;

impl SqliteDialect {
    fn column(&self, column: &ColumnDef) -> String {
        let mut sql = format!(
            "{} {}",
            self.quote(column.name),
            self.column_type(column.ty)
        );
        if column.primary {
            sql.push_str(" PRIMARY KEY");
        }
        if column.auto_increment {
            sql.push_str(" AUTOINCREMENT");
        }
        sql
    }
}

impl Dialect for SqliteDialect {
    fn storage_type(&self) -> StorageType {
        StorageType::Sqlite
    }

    fn quote(&self, ident: &str) -> String {
        format!("\"{ident}\"")
    }

    fn column_type(&self, ty: ColumnType) -> &'static str {
        match ty {
            ColumnType::Int32 => "INTEGER",
            ColumnType::Text => "TEXT",
        }
    }

    fn column_names_query(&self) -> &'static str {
        "SELECT name FROM pragma_table_info(?) ORDER BY cid"
    }

    fn create_table(&self, table: &TableDef) -> String {
        let columns = table
            .columns
            .iter()
            .map(|column| self.column(column))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({columns})",
            self.quote(table.name)
        )
    }
}

pub struct MySqlDialect;

impl MySqlDialect {
    fn column(&self, column: &ColumnDef) -> String {
        let mut sql = format!(
            "{} {}",
            self.quote(column.name),
            self.column_type(column.ty)
        );
        if column.primary {
            sql.push_str(" NOT NULL");
        }
        if column.auto_increment {
            sql.push_str(" AUTO_INCREMENT");
        }
        sql
    }
}

impl Dialect for MySqlDialect {
    fn storage_type(&self) -> StorageType {
        StorageType::MySql
    }

    fn quote(&self, ident: &str) -> String {
        format!("`{ident}`")
    }

    fn column_type(&self, ty: ColumnType) -> &'static str {
        match ty {
            ColumnType::Int32 => "INT",
            ColumnType::Text => "TEXT",
        }
    }

    fn column_names_query(&self) -> &'static str {
        const_str::concat!(
            "SELECT CAST(COLUMN_NAME AS CHAR) AS name ",
            "FROM information_schema.COLUMNS ",
            "WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? ",
            "ORDER BY ORDINAL_POSITION"
        )
    }

    fn create_table(&self, table: &TableDef) -> String {
        let mut definitions = table
            .columns
            .iter()
            .map(|column| self.column(column))
            .collect::<Vec<_>>();
        let primary = table
            .columns
            .iter()
            .filter(|column| column.primary)
            .map(|column| self.quote(column.name))
            .collect::<Vec<_>>();
        if !primary.is_empty() {
            definitions.push(format!("PRIMARY KEY ({})", primary.join(", ")));
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({}) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
            self.quote(table.name),
            definitions.join(", ")
        )
    }
}
