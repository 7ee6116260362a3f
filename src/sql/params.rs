//! Typed bind values for built queries.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

/// A value bound to a positional placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    I32(i32),
    I64(i64),
    Text(String),
    Uuid(uuid::Uuid),
}

impl From<i32> for BindValue {
    fn from(n: i32) -> Self {
        BindValue::I32(n)
    }
}

impl From<i64> for BindValue {
    fn from(n: i64) -> Self {
        BindValue::I64(n)
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::Text(s)
    }
}

impl From<uuid::Uuid> for BindValue {
    fn from(u: uuid::Uuid) -> Self {
        BindValue::Uuid(u)
    }
}

/// Bind `params` in placeholder order.
pub fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [BindValue],
) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        query = match p {
            BindValue::I32(n) => query.bind(*n),
            BindValue::I64(n) => query.bind(*n),
            BindValue::Text(s) => query.bind(s.as_str()),
            BindValue::Uuid(u) => query.bind(*u),
        };
    }
    query
}
