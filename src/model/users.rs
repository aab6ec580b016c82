//! Administrator accounts
//!
//! The auth subsystem only reads this table; writes happen through the
//! startup bootstrap (and tests).

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::prelude::Type;
use thiserror::Error;
use tracing::info;

use crate::config;
use crate::model::auth;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Invalid user id format")]
    InvalidUserId,
}

/// Newtype for user id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct UserId(i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.parse().map_err(|_| Error::InvalidUserId)?;
        Ok(Self(id))
    }
}

impl UserId {
    /// Fetches `User` with this id from database
    pub async fn fetch(
        self,
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    ) -> Result<Option<User>> {
        User::fetch(db, self).await
    }
}

/// User queryable data
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Login name, unique across the service
    pub username: String,
}

impl User {
    /// Helper to create an user
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// Fetches user from the database
    pub async fn fetch(
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
        user_id: UserId,
    ) -> Result<Option<Self>> {
        let row: Option<(String,)> = sqlx::query_as("select username from users where id = ?")
            .bind(user_id)
            .fetch_optional(db)
            .await?;

        Ok(row.map(|(username,)| Self { username }))
    }

    /// Creates user in the database, storing the password as an argon2 hash
    pub async fn create(
        self,
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
        password: &str,
    ) -> Result<UserId> {
        let password_hash = auth::hash_password(password)?;
        let result = sqlx::query("insert into users(username, password_hash) values (?, ?)")
            .bind(self.username)
            .bind(password_hash)
            .execute(db)
            .await?;

        Ok(UserId(result.last_insert_rowid()))
    }
}

/// Seeds the configured credential unless the username is already taken
pub async fn bootstrap(db: &sqlx::SqlitePool, config: &config::Bootstrap) -> Result<()> {
    let existing: Option<(UserId,)> = sqlx::query_as("select id from users where username = ?")
        .bind(&config.username)
        .fetch_optional(db)
        .await?;

    if existing.is_none() {
        let user_id = User::new(&config.username)
            .create(db, &config.password)
            .await?;
        info!(username = %config.username, %user_id, "Created bootstrap user");
    }

    Ok(())
}
