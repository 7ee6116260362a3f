//! Table DDL and database bootstrap. All tables live in the schema named by `TOOLDB_SCHEMA` (default `tooldb`).

use crate::error::AppError;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Create the schema, tables and indexes if they do not exist yet. Safe to run on every start.
pub async fn ensure_schema(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    let s = quote_ident(schema);
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", s))
        .execute(pool)
        .await?;

    let statements = [
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {s}."tools" (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                description TEXT,
                website_url TEXT,
                github_url TEXT,
                submitted_by TEXT,
                upvotes INTEGER NOT NULL DEFAULT 0 CHECK (upvotes >= 0),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {s}."categories" (
                id BIGSERIAL PRIMARY KEY,
                category_name TEXT NOT NULL UNIQUE,
                category_icon TEXT,
                category_description TEXT
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {s}."tool_categories" (
                tool_id BIGINT NOT NULL REFERENCES {s}."tools"(id) ON DELETE CASCADE,
                category_id BIGINT NOT NULL REFERENCES {s}."categories"(id) ON DELETE CASCADE,
                PRIMARY KEY (tool_id, category_id)
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {s}."tool_votes" (
                user_id UUID NOT NULL,
                tool_id BIGINT NOT NULL REFERENCES {s}."tools"(id) ON DELETE CASCADE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (user_id, tool_id)
            )
            "#
        ),
        format!(r#"CREATE INDEX IF NOT EXISTS tools_upvotes_idx ON {s}."tools" (upvotes DESC, id)"#),
        format!(r#"CREATE INDEX IF NOT EXISTS tools_created_at_idx ON {s}."tools" (created_at DESC, id DESC)"#),
        format!(r#"CREATE INDEX IF NOT EXISTS tool_categories_category_idx ON {s}."tool_categories" (category_id)"#),
    ];
    for ddl in &statements {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(schema = %schema, "schema ready");
    Ok(())
}

/// Connect to the `postgres` admin database and create the target database when it is missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| i + scheme_end + 1)
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, q)) => (name.trim(), Some(q)),
        None => (path_and_query.trim(), None),
    };
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name() {
        let (admin, name) = parse_db_name_from_url("postgres://me:pw@localhost:5432/tooldb").unwrap();
        assert_eq!(admin, "postgres://me:pw@localhost:5432/postgres");
        assert_eq!(name, "tooldb");
    }

    #[test]
    fn keeps_query_on_admin_url() {
        let (admin, name) = parse_db_name_from_url("postgres://localhost/tooldb?sslmode=require").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres?sslmode=require");
        assert_eq!(name, "tooldb");
    }

    #[test]
    fn rejects_url_without_path() {
        assert!(parse_db_name_from_url("postgres://localhost").is_err());
    }
}
