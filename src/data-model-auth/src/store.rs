use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::{DbPool, PoolError};
use crate::models::{NewUser, User};
use crate::schema::users;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to get a database connection: {0}")]
    Pool(#[from] PoolError),
    #[error("Database query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

/// Persistence for user records.
///
/// Users are only ever created and read: nothing updates or deletes a row.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user row and returns it as stored.
    /// Does not check whether the username is already taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// The oldest user with exactly this username, if any.
    async fn find_first_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Every user, oldest first.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
}

/// `UserStore` backed by the `users` table in Postgres.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        PgUserStore { pool }
    }
}

pub async fn insert_user(conn: &mut AsyncPgConnection, new_user: &NewUser) -> Result<User, diesel::result::Error> {
    diesel::insert_into(users::table)
        .values(new_user)
        .returning(User::as_returning())
        .get_result(conn)
        .await
}

pub async fn fetch_first_by_username(
    conn: &mut AsyncPgConnection,
    username: &str,
) -> Result<Option<User>, diesel::result::Error> {
    users::table
        .filter(users::username.eq(username))
        .order((users::created_at.asc(), users::id.asc()))
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
}

pub async fn fetch_all_users(conn: &mut AsyncPgConnection) -> Result<Vec<User>, diesel::result::Error> {
    users::table
        .order((users::created_at.asc(), users::id.asc()))
        .select(User::as_select())
        .load(conn)
        .await
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut conn = self.pool.get().await?;
        let user = insert_user(&mut conn, &new_user).await?;
        tracing::debug!(user_id = %user.id, "Inserted user row");
        Ok(user)
    }

    async fn find_first_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get().await?;
        Ok(fetch_first_by_username(&mut conn, username).await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut conn = self.pool.get().await?;
        Ok(fetch_all_users(&mut conn).await?)
    }
}
