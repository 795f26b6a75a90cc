use data_model_auth::db::{ConnectionPoolError, DbPool, establish_connection_pool};

use crate::common::env_check::{ConfigError, require_non_empty_env_vars};

#[derive(Debug, thiserror::Error)]
pub enum DbEnvError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Couldn't connect to the database: {0}")]
    Connection(#[from] ConnectionPoolError),
}

/// Uses the env var DATABASE_URL to establish a database connection pool using diesel.
/// Fails if DATABASE_URL is unset or blank, or if the database can't be reached.
pub async fn get_db_pool() -> Result<DbPool, DbEnvError> {
    let database_url = get_database_url()?;
    let pool = establish_connection_pool(&database_url).await?;
    Ok(pool)
}

/// Retrieves the value for the env var DATABASE_URL.
pub fn get_database_url() -> Result<String, ConfigError> {
    require_non_empty_env_vars(&["DATABASE_URL"])?;
    std::env::var("DATABASE_URL").map_err(|e| ConfigError::InvalidValue {
        name: "DATABASE_URL",
        reason: e.to_string(),
    })
}
