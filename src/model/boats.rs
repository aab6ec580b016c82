//! Rental fleet records - boats and jetskis

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::prelude::Type;

/// Newtype for boat id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct BoatId(i64);

impl std::fmt::Display for BoatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fleet unit as shown on the boats screen
#[derive(Debug, Clone, PartialEq)]
pub struct Boat {
    pub id: BoatId,
    pub name: String,
    /// Free-form unit kind, "Boat" or "Jetski" in practice
    pub kind: String,
    pub capacity: i64,
    pub available: bool,
}

impl Boat {
    /// Lists the whole fleet ordered by name
    pub async fn list(db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>) -> Result<Vec<Self>> {
        let rows: Vec<(BoatId, String, String, i64, bool)> =
            sqlx::query_as("select id, name, type, capacity, available from boats order by name")
                .fetch_all(db)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, kind, capacity, available)| Self {
                id,
                name,
                kind,
                capacity,
                available,
            })
            .collect())
    }
}

/// New fleet unit as submitted from the add form
#[derive(Debug, Clone)]
pub struct NewBoat {
    pub name: String,
    pub kind: String,
    pub capacity: i64,
    pub available: bool,
}

impl NewBoat {
    /// Creates the fleet unit in the database
    pub async fn create(
        self,
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    ) -> Result<BoatId> {
        let result =
            sqlx::query("insert into boats(name, type, capacity, available) values (?, ?, ?, ?)")
                .bind(self.name)
                .bind(self.kind)
                .bind(self.capacity)
                .bind(self.available)
                .execute(db)
                .await?;

        Ok(BoatId(result.last_insert_rowid()))
    }
}
