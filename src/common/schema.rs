use crate::common::dialect::Dialect;
use sqlx::AnyPool;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Int32,
    Text,
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub primary: bool,
    pub auto_increment: bool,
}

impl ColumnDef {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            primary: false,
            auto_increment: false,
        }
    }

    pub const fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    /// Whether `columns` names exactly this table's columns, ignoring case and order.
    pub fn matches_columns(&self, columns: &[String]) -> bool {
        let all_defined = self.columns.iter().all(|defined| {
            columns
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(defined.name))
        });
        let none_extra = columns.iter().all(|existing| {
            self.columns
                .iter()
                .any(|defined| defined.name.eq_ignore_ascii_case(existing))
        });
        all_defined && none_extra
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaChange {
    Created,
    Altered,
    Unchanged,
}

pub async fn fetch_column_names(
    db: &AnyPool,
    dialect: &dyn Dialect,
    table_name: &str,
) -> sqlx::Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(dialect.column_names_query())
        .bind(table_name)
        .fetch_all(db)
        .await?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

/// Creates `table` if it is missing, rebuilds it if its column set differs
/// and leaves it alone otherwise.
pub async fn ensure_table_structure(
    db: &AnyPool,
    dialect: &dyn Dialect,
    table: &TableDef,
) -> sqlx::Result<SchemaChange> {
    let existing = fetch_column_names(db, dialect, table.name).await?;
    if existing.is_empty() {
        sqlx::query(&dialect.create_table(table)).execute(db).await?;
        info!(
            table = table.name,
            storage_type = dialect.storage_type().as_str(),
            "Created table"
        );
        return Ok(SchemaChange::Created);
    }
    if table.matches_columns(&existing) {
        return Ok(SchemaChange::Unchanged);
    }

    let temp_name = format!("{}_{}", table.name, rand::random::<u32>());
    let mut tx = db.begin().await?;
    for statement in dialect.alter_table(table, &existing, &temp_name) {
        sqlx::query(&statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!(
        table = table.name,
        storage_type = dialect.storage_type().as_str(),
        previous_columns = existing.join(", "),
        "Altered table structure"
    );
    Ok(SchemaChange::Altered)
}
