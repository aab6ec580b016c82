//! Invoice records

use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::prelude::Type;

use crate::model::reservations::ReservationId;

/// Newtype for invoice id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct InvoiceId(i64);

impl std::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Invoice row as shown on the invoices screen
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: InvoiceId,
    pub reservation_id: ReservationId,
    pub amount: f64,
    pub paid: bool,
    pub date: DateTime<Utc>,
}

impl Invoice {
    /// Lists all invoices, newest first
    pub async fn list(db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>) -> Result<Vec<Self>> {
        let rows: Vec<(InvoiceId, ReservationId, f64, bool, DateTime<Utc>)> = sqlx::query_as(
            "select id, reservation_id, amount, paid, date from invoices order by date desc",
        )
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, reservation_id, amount, paid, date)| Self {
                id,
                reservation_id,
                amount,
                paid,
                date,
            })
            .collect())
    }
}

/// New invoice as submitted from the add form
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub reservation_id: ReservationId,
    pub amount: f64,
}

impl NewInvoice {
    /// Creates the invoice in the database, unpaid and dated now
    pub async fn create(
        self,
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    ) -> Result<InvoiceId> {
        let result =
            sqlx::query("insert into invoices(reservation_id, amount, date) values (?, ?, ?)")
                .bind(self.reservation_id)
                .bind(self.amount)
                .bind(Utc::now())
                .execute(db)
                .await?;

        Ok(InvoiceId(result.last_insert_rowid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDateTime;
    use sqlx::SqlitePool;

    use crate::model::boats::NewBoat;
    use crate::model::clients::NewClient;
    use crate::model::reservations::NewReservation;

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("model/migrations").run(&pool).await.unwrap();
        pool
    }

    async fn seed_reservation(pool: &SqlitePool) -> ReservationId {
        let client_id = NewClient {
            name: "Ann".into(),
            email: None,
            phone: None,
        }
        .create(pool)
        .await
        .unwrap();

        let boat_id = NewBoat {
            name: "Pelican".into(),
            kind: "Boat".into(),
            capacity: 6,
            available: true,
        }
        .create(pool)
        .await
        .unwrap();

        NewReservation {
            client_id,
            boat_id,
            start_date: NaiveDateTime::parse_from_str("2026-08-01 10:00", "%Y-%m-%d %H:%M")
                .unwrap(),
            end_date: NaiveDateTime::parse_from_str("2026-08-01 12:00", "%Y-%m-%d %H:%M").unwrap(),
        }
        .create(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn created_invoice_is_unpaid() {
        let pool = setup_pool().await;
        let reservation_id = seed_reservation(&pool).await;

        let id = NewInvoice {
            reservation_id,
            amount: 150.0,
        }
        .create(&pool)
        .await
        .unwrap();

        let invoices = Invoice::list(&pool).await.unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].id, id);
        assert_eq!(invoices[0].amount, 150.0);
        assert!(!invoices[0].paid);
    }
}
