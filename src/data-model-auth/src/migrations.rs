use diesel_async::SimpleAsyncConnection;

use crate::db::DbPool;
use crate::store::StoreError;

/// Schema setup. Safe to run any number of times, including from several processes at once:
/// the advisory lock serializes concurrent first-time initialization, which plain
/// `CREATE TABLE IF NOT EXISTS` does not.
const CREATE_USERS_TABLE: &str = r#"
BEGIN;
SELECT pg_advisory_xact_lock(8463219666995607089); -- "users_v1" as a big-endian i64
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL,
    password TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS users_username_idx ON users (username);
COMMIT;
"#;

/// Creates the schema. Run once at startup, before the server accepts requests.
pub async fn run_migrations(pool: &DbPool) -> Result<(), StoreError> {
    let mut conn = pool.get().await?;
    conn.batch_execute(CREATE_USERS_TABLE).await?;

    tracing::info!("Database schema is up to date");
    Ok(())
}
