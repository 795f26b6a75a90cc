use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::password::PasswordHash;

// users table model (database representation)
// Not Serialize: the password hash must never leave the server. Use `UserView` for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// bcrypt hash of the user's password
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// A user row about to be inserted. `created_at` is filled in by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
    pub password: String,
}

impl NewUser {
    /// Creates a row with a freshly generated id. Only accepts an already-hashed password.
    pub fn new(username: String, password: PasswordHash) -> Self {
        NewUser {
            id: Uuid::new_v4(),
            username,
            password: password.into_string(),
        }
    }
}

/// Externally visible representation of a user: everything except the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            id: user.id,
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}
