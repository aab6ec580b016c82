//! Maintenance records for fleet units

use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::prelude::Type;

use crate::model::boats::BoatId;

/// Newtype for maintenance record id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct MaintenanceId(i64);

impl std::fmt::Display for MaintenanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maintenance row as shown on the maintenance screen
#[derive(Debug, Clone, PartialEq)]
pub struct Maintenance {
    pub id: MaintenanceId,
    pub boat_id: BoatId,
    pub description: String,
    pub date: DateTime<Utc>,
    pub completed: bool,
}

impl Maintenance {
    /// Lists all maintenance records, newest first
    pub async fn list(db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>) -> Result<Vec<Self>> {
        let rows: Vec<(MaintenanceId, BoatId, String, DateTime<Utc>, bool)> = sqlx::query_as(
            "select id, boat_id, description, date, completed \
             from maintenances order by date desc",
        )
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, boat_id, description, date, completed)| Self {
                id,
                boat_id,
                description,
                date,
                completed,
            })
            .collect())
    }
}

/// New maintenance record as submitted from the add form
#[derive(Debug, Clone)]
pub struct NewMaintenance {
    pub boat_id: BoatId,
    pub description: String,
    pub completed: bool,
}

impl NewMaintenance {
    /// Records the maintenance entry, dated now
    pub async fn create(
        self,
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    ) -> Result<MaintenanceId> {
        let result = sqlx::query(
            "insert into maintenances(boat_id, description, date, completed) values (?, ?, ?, ?)",
        )
        .bind(self.boat_id)
        .bind(self.description)
        .bind(Utc::now())
        .bind(self.completed)
        .execute(db)
        .await?;

        Ok(MaintenanceId(result.last_insert_rowid()))
    }
}
