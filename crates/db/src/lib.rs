//! SQLite connection pool and table bootstrap.

use std::str::FromStr;

use anyhow::Context;
use folio_kernel::{settings::DatabaseSettings, SchemaStatement};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Open a pool against the configured database, creating the file if it does not exist.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to database '{}'", settings.url))?;

    tracing::info!(
        target: "folio-db",
        url = %settings.url,
        max_connections = settings.max_connections,
        "database pool ready"
    );

    Ok(pool)
}

/// Single-connection pool over a private in-memory database.
///
/// Every connection to `sqlite::memory:` sees its own database, so the pool is
/// capped at one connection to keep tables visible across queries.
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    connect(&DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
}

/// Execute each module's DDL in order. Statements must be idempotent.
pub async fn apply_schema(
    pool: &SqlitePool,
    statements: &[(&'static str, SchemaStatement)],
) -> anyhow::Result<()> {
    for (module, statement) in statements {
        tracing::info!(
            target: "folio-db",
            module = %module,
            statement = statement.id,
            "applying schema statement"
        );

        sqlx::raw_sql(statement.ddl)
            .execute(pool)
            .await
            .with_context(|| {
                format!(
                    "failed to apply schema statement '{}' for module '{}'",
                    statement.id, module
                )
            })?;
    }

    Ok(())
}
