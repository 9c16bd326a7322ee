//! Repository for the append-only `logs` table.

use sqlx::PgPool;

use crate::models::log::LogEntry;

pub struct LogRepo;

impl LogRepo {
    pub async fn append(pool: &PgPool, message: &str) -> Result<LogEntry, sqlx::Error> {
        sqlx::query_as::<_, LogEntry>(
            "INSERT INTO logs (message) VALUES ($1) RETURNING id, message, created_at",
        )
        .bind(message)
        .fetch_one(pool)
        .await
    }

    /// All entries, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<LogEntry>, sqlx::Error> {
        sqlx::query_as::<_, LogEntry>(
            "SELECT id, message, created_at FROM logs ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(pool)
        .await
    }
}
