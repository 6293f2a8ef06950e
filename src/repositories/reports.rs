use crate::common::context::Context;
use crate::common::schema::{ColumnDef, ColumnType, TableDef};
use crate::common::sql_value::{SqlValue, bind_values};
use crate::entities::reports::Report;
use futures_util::stream::BoxStream;
use sqlx::any::AnyRow;

const TABLE_NAME: &str = "Reports";
const READ_FIELDS: &str = "ReportID, UserID, ReportedID, Message, Position, State";

pub const REPORTS_TABLE: TableDef = TableDef {
    name: TABLE_NAME,
    columns: &[
        ColumnDef::new("ReportID", ColumnType::Int32)
            .primary()
            .auto_increment(),
        ColumnDef::new("UserID", ColumnType::Int32),
        ColumnDef::new("ReportedID", ColumnType::Int32),
        ColumnDef::new("Message", ColumnType::Text),
        ColumnDef::new("Position", ColumnType::Text),
        ColumnDef::new("State", ColumnType::Int32),
    ],
};

/// Columns of the `Reports` table. These are the only identifiers ever
/// formatted into a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportColumn {
    ReportId,
    UserId,
    ReportedId,
    Message,
    Position,
    State,
}

impl ReportColumn {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReportColumn::ReportId => "ReportID",
            ReportColumn::UserId => "UserID",
            ReportColumn::ReportedId => "ReportedID",
            ReportColumn::Message => "Message",
            ReportColumn::Position => "Position",
            ReportColumn::State => "State",
        }
    }
}

/// Runs a read query, yielding rows as the backend produces them.
pub fn query_reader<'a, C: Context>(
    ctx: &'a C,
    sql: &'a str,
    args: &[SqlValue],
) -> BoxStream<'a, sqlx::Result<AnyRow>> {
    bind_values(sqlx::query(sql), args).fetch(ctx.db())
}

/// Runs a write query and returns the number of affected rows.
pub async fn query<C: Context>(ctx: &C, sql: &str, args: &[SqlValue]) -> sqlx::Result<u64> {
    let res = bind_values(sqlx::query(sql), args)
        .execute(ctx.db())
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_value<C: Context>(
    ctx: &C,
    column: ReportColumn,
    value: impl Into<SqlValue>,
) -> sqlx::Result<bool> {
    let sql = format!("DELETE FROM {TABLE_NAME} WHERE {} = ?", column.as_str());
    let affected = query(ctx, &sql, &[value.into()]).await?;
    Ok(affected > 0)
}

pub async fn set_value<C: Context>(
    ctx: &C,
    column: ReportColumn,
    value: impl Into<SqlValue>,
    where_column: ReportColumn,
    where_value: impl Into<SqlValue>,
) -> sqlx::Result<bool> {
    let sql = format!(
        "UPDATE {TABLE_NAME} SET {} = ? WHERE {} = ?",
        column.as_str(),
        where_column.as_str()
    );
    let affected = query(ctx, &sql, &[value.into(), where_value.into()]).await?;
    Ok(affected > 0)
}

pub async fn create<C: Context>(
    ctx: &C,
    user_id: i64,
    reported_id: i64,
    message: String,
    position: String,
    state: i64,
) -> sqlx::Result<Report> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (UserID, ReportedID, Message, Position, State) ",
        "VALUES (?, ?, ?, ?, ?)"
    );
    let res = sqlx::query(QUERY)
        .bind(user_id)
        .bind(reported_id)
        .bind(message.clone())
        .bind(position.clone())
        .bind(state)
        .execute(ctx.db())
        .await?;
    let id = res
        .last_insert_id()
        .ok_or_else(|| sqlx::Error::Protocol("backend returned no insert id".to_owned()))?;
    Ok(Report {
        id,
        user_id,
        reported_id,
        message,
        position,
        state,
    })
}

pub async fn fetch_one<C: Context>(ctx: &C, report_id: i64) -> sqlx::Result<Option<Report>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE ReportID = ?"
    );
    sqlx::query_as(QUERY)
        .bind(report_id)
        .fetch_optional(ctx.db())
        .await
}

pub async fn fetch_all<C: Context>(ctx: &C) -> sqlx::Result<Vec<Report>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " ORDER BY ReportID"
    );
    sqlx::query_as(QUERY).fetch_all(ctx.db()).await
}

pub async fn fetch_by_state<C: Context>(ctx: &C, state: i64) -> sqlx::Result<Vec<Report>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE State = ? ORDER BY ReportID"
    );
    sqlx::query_as(QUERY)
        .bind(state)
        .fetch_all(ctx.db())
        .await
}
