//! Data access for the `users` table.

use anyhow::Context;
use folio_kernel::SchemaStatement;
use sqlx::SqlitePool;

use super::models::{NewUser, User};

pub const USERS_TABLE: SchemaStatement = SchemaStatement {
    id: "001_users",
    ddl: r#"
        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            email           TEXT    NOT NULL UNIQUE,
            username        TEXT    NOT NULL UNIQUE,
            first_name      TEXT    NOT NULL,
            last_name       TEXT    NOT NULL,
            hashed_password TEXT    NOT NULL,
            is_active       BOOLEAN NOT NULL DEFAULT 1,
            role            TEXT    NOT NULL,
            phone_number    TEXT
        );
    "#,
};

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, hashed_password, is_active, role, phone_number";

#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load user {id}"))
    }

    /// Store a new password hash. Returns whether a row was updated.
    pub async fn update_password(&self, id: i64, hashed_password: &str) -> anyhow::Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to open transaction")?;

        let result = sqlx::query("UPDATE users SET hashed_password = ? WHERE id = ?")
            .bind(hashed_password)
            .bind(id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to update password for user {id}"))?;

        tx.commit().await.context("failed to commit password change")?;

        Ok(result.rows_affected() > 0)
    }

    /// Insert a user and return its id
    pub async fn create(&self, user: &NewUser) -> anyhow::Result<i64> {
        let result = sqlx::query(
            "INSERT INTO users (email, username, first_name, last_name, hashed_password, is_active, role, phone_number) \
             VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.hashed_password)
        .bind(&user.role)
        .bind(&user.phone_number)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to create user '{}'", user.username))?;

        Ok(result.last_insert_rowid())
    }
}
