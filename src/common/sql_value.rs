use sqlx::Any;
use sqlx::any::AnyArguments;
use sqlx::query::Query;

pub type AnyQuery<'q> = Query<'q, Any, AnyArguments<'q>>;

/// A positional query parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
    Null,
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value.into())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_owned())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Binds `values` to the `?` placeholders of `query`, in order.
pub fn bind_values<'q>(mut query: AnyQuery<'q>, values: &[SqlValue]) -> AnyQuery<'q> {
    for value in values {
        query = match value {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Null => query.bind(None::<i64>),
        };
    }
    query
}
