//! Schema bootstrap for MySQL: create the database and the entity tables when missing.

use crate::error::AppError;
use crate::model::{all_tables, ColumnDef, ColumnDefault, TableDef};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, MySqlPool};
use std::str::FromStr;

fn column_ddl(table: &TableDef, c: &ColumnDef) -> String {
    let mut ddl = format!("`{}` {}", c.name, c.sql_type.ddl());
    ddl.push_str(if c.nullable { " NULL" } else { " NOT NULL" });
    match c.default {
        ColumnDefault::None => {}
        ColumnDefault::AutoIncrement => ddl.push_str(" AUTO_INCREMENT"),
        ColumnDefault::Now => ddl.push_str(" DEFAULT CURRENT_TIMESTAMP"),
        ColumnDefault::Text(s) => ddl.push_str(&format!(" DEFAULT '{}'", s.replace('\'', "''"))),
        ColumnDefault::Int(n) => ddl.push_str(&format!(" DEFAULT {}", n)),
    }
    if c.name == table.id_column {
        ddl.push_str(" PRIMARY KEY");
    }
    ddl
}

/// CREATE TABLE IF NOT EXISTS for one table definition.
pub fn create_table_sql(table: &TableDef) -> String {
    let cols: Vec<String> = table.columns.iter().map(|c| column_ddl(table, c)).collect();
    format!(
        "CREATE TABLE IF NOT EXISTS `{}` (\n    {}\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
        table.name,
        cols.join(",\n    ")
    )
}

/// Create every entity table that does not exist yet. Existing tables are left untouched.
pub async fn ensure_tables(pool: &MySqlPool) -> Result<(), AppError> {
    for table in all_tables() {
        sqlx::query(&create_table_sql(table)).execute(pool).await?;
        tracing::debug!(table = table.name, "table ensured");
    }
    Ok(())
}

/// Ensure the database named in `database_url` exists. Connects without a default database
/// to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (server_url, db_name) = split_db_name(database_url)?;
    if db_name.is_empty() {
        return Ok(());
    }
    let opts = MySqlConnectOptions::from_str(&server_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: MySqlConnection = opts.connect().await?;
    sqlx::query(&format!("CREATE DATABASE IF NOT EXISTS {}", quote_ident(&db_name)))
        .execute(&mut conn)
        .await?;
    Ok(())
}

/// Split `mysql://user@host/db?opts` into (`mysql://user@host/?opts`, `db`).
fn split_db_name(url: &str) -> Result<(String, String), AppError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = match url[scheme_end..].find('/') {
        Some(i) => scheme_end + i + 1,
        None => return Ok((url.to_string(), String::new())),
    };
    let rest = &url[path_start..];
    let (db_name, query) = match rest.split_once('?') {
        Some((db, q)) => (db, Some(q)),
        None => (rest, None),
    };
    let mut server_url = url[..path_start].to_string();
    if let Some(q) = query {
        server_url.push('?');
        server_url.push_str(q);
    }
    Ok((server_url, db_name.trim().to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
