//! Reservation records

use chrono::NaiveDateTime;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::prelude::Type;

use crate::model::boats::BoatId;
use crate::model::clients::ClientId;

/// Newtype for reservation id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct ReservationId(i64);

impl std::fmt::Display for ReservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reservation row as shown on the reservations screen
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: ReservationId,
    pub client_id: ClientId,
    pub boat_id: BoatId,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    /// Free-form status, created as `pending`
    pub status: String,
}

impl Reservation {
    /// Lists all reservations, most recent start first
    pub async fn list(db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>) -> Result<Vec<Self>> {
        let rows: Vec<(
            ReservationId,
            ClientId,
            BoatId,
            NaiveDateTime,
            NaiveDateTime,
            String,
        )> = sqlx::query_as(
            "select id, client_id, boat_id, start_date, end_date, status \
             from reservations order by start_date desc",
        )
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, client_id, boat_id, start_date, end_date, status)| Self {
                id,
                client_id,
                boat_id,
                start_date,
                end_date,
                status,
            })
            .collect())
    }
}

/// New reservation as submitted from the add form
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub client_id: ClientId,
    pub boat_id: BoatId,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

impl NewReservation {
    /// Creates the reservation in the database with `pending` status
    pub async fn create(
        self,
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    ) -> Result<ReservationId> {
        let result = sqlx::query(
            "insert into reservations(client_id, boat_id, start_date, end_date) \
             values (?, ?, ?, ?)",
        )
        .bind(self.client_id)
        .bind(self.boat_id)
        .bind(self.start_date)
        .bind(self.end_date)
        .execute(db)
        .await?;

        Ok(ReservationId(result.last_insert_rowid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use sqlx::SqlitePool;

    use crate::model::boats::NewBoat;
    use crate::model::clients::NewClient;

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("model/migrations").run(&pool).await.unwrap();
        pool
    }

    fn date(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[tokio::test]
    async fn create_and_list_most_recent_first() {
        let pool = setup_pool().await;

        let client_id = NewClient {
            name: "Ann".into(),
            email: None,
            phone: None,
        }
        .create(&pool)
        .await
        .unwrap();

        let boat_id = NewBoat {
            name: "Wave Rider".into(),
            kind: "Jetski".into(),
            capacity: 2,
            available: true,
        }
        .create(&pool)
        .await
        .unwrap();

        let early = NewReservation {
            client_id,
            boat_id,
            start_date: date("2026-07-01 10:00"),
            end_date: date("2026-07-01 12:00"),
        }
        .create(&pool)
        .await
        .unwrap();

        let late = NewReservation {
            client_id,
            boat_id,
            start_date: date("2026-08-01 10:00"),
            end_date: date("2026-08-01 12:00"),
        }
        .create(&pool)
        .await
        .unwrap();

        let reservations = Reservation::list(&pool).await.unwrap();
        assert_eq!(
            reservations.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![late, early]
        );
        assert!(reservations.iter().all(|r| r.status == "pending"));
    }
}
