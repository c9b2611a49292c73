//! DuckDB migrations

use super::TableRef;
use crate::error::Result;
use duckdb::Connection;

/// Run all DuckDB migrations for the given stock table
pub fn run_migrations(conn: &Connection, table: &TableRef) -> Result<()> {
    // name is the primary key since we don't need auto-increment
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS migrations (
            name VARCHAR PRIMARY KEY,
            applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )?;

    run_migration(
        conn,
        &format!("001_stock_data:{}.{}", table.schema, table.table),
        &create_stock_data(table),
    )?;

    tracing::info!("DuckDB migrations completed");
    Ok(())
}

fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM migrations WHERE name = ?",
        [name],
        |row| row.get(0),
    )?;

    if !exists {
        tracing::info!("Running DuckDB migration: {}", name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO migrations (name) VALUES (?)", [name])?;
    }

    Ok(())
}

fn create_stock_data(table: &TableRef) -> String {
    format!(
        r#"
CREATE SCHEMA IF NOT EXISTS {schema};

CREATE TABLE IF NOT EXISTS {qualified} (
    isin VARCHAR PRIMARY KEY,
    name VARCHAR NOT NULL,
    label VARCHAR NOT NULL,
    pe_ratio DOUBLE NOT NULL,
    div_yield DOUBLE NOT NULL,
    scraped_at TIMESTAMP NOT NULL
);
"#,
        schema = table.qualified_schema(),
        qualified = table.qualified(),
    )
}
