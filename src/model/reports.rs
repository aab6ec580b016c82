//! Aggregate reporting queries

use color_eyre::Result;

/// Figures shown on the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_reservations: i64,
    /// Sum over paid invoices
    pub paid_income: f64,
    pub available_boats: i64,
}

impl DashboardStats {
    pub async fn fetch(db: impl sqlx::Acquire<'_, Database = sqlx::Sqlite>) -> Result<Self> {
        let mut conn = db.acquire().await?;

        let (total_reservations,): (i64,) = sqlx::query_as("select count(*) from reservations")
            .fetch_one(&mut *conn)
            .await?;

        let (paid_income,): (f64,) =
            sqlx::query_as("select coalesce(sum(amount), 0.0) from invoices where paid = 1")
                .fetch_one(&mut *conn)
                .await?;

        let (available_boats,): (i64,) =
            sqlx::query_as("select count(*) from boats where available = 1")
                .fetch_one(&mut *conn)
                .await?;

        Ok(Self {
            total_reservations,
            paid_income,
            available_boats,
        })
    }
}

/// Paid income grouped by calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyIncome {
    /// Month in `YYYY-MM` form
    pub month: String,
    pub total: f64,
}

impl MonthlyIncome {
    /// Paid income per month, most recent month first
    pub async fn report(db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>) -> Result<Vec<Self>> {
        let rows: Vec<(String, f64)> = sqlx::query_as(
            "select strftime('%Y-%m', date) as month, sum(amount) as total \
             from invoices where paid = 1 group by month order by month desc",
        )
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(month, total)| Self { month, total })
            .collect())
    }
}

/// Reservation count per fleet unit
#[derive(Debug, Clone, PartialEq)]
pub struct BoatOccupancy {
    pub boat: String,
    pub reservations: i64,
}

impl BoatOccupancy {
    /// Reservation counts, busiest unit first; units without reservations count zero
    pub async fn report(db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>) -> Result<Vec<Self>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "select boats.name, count(reservations.id) as reservations \
             from boats left join reservations on boats.id = reservations.boat_id \
             group by boats.id order by reservations desc",
        )
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(boat, reservations)| Self { boat, reservations })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDateTime;
    use sqlx::SqlitePool;

    use crate::model::boats::NewBoat;
    use crate::model::clients::NewClient;
    use crate::model::invoices::NewInvoice;
    use crate::model::reservations::NewReservation;

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("model/migrations").run(&pool).await.unwrap();
        pool
    }

    fn date(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[tokio::test]
    async fn aggregates_match_seeded_data() {
        let pool = setup_pool().await;

        let client_id = NewClient {
            name: "Ann".into(),
            email: None,
            phone: None,
        }
        .create(&pool)
        .await
        .unwrap();

        let busy = NewBoat {
            name: "Pelican".into(),
            kind: "Boat".into(),
            capacity: 6,
            available: true,
        }
        .create(&pool)
        .await
        .unwrap();

        NewBoat {
            name: "Dry Dock".into(),
            kind: "Boat".into(),
            capacity: 4,
            available: false,
        }
        .create(&pool)
        .await
        .unwrap();

        let reservation_id = NewReservation {
            client_id,
            boat_id: busy,
            start_date: date("2026-08-01 10:00"),
            end_date: date("2026-08-01 12:00"),
        }
        .create(&pool)
        .await
        .unwrap();

        let paid = NewInvoice {
            reservation_id,
            amount: 150.0,
        }
        .create(&pool)
        .await
        .unwrap();

        // Second invoice stays unpaid and must not show up in income figures
        NewInvoice {
            reservation_id,
            amount: 75.0,
        }
        .create(&pool)
        .await
        .unwrap();

        sqlx::query("update invoices set paid = 1 where id = ?")
            .bind(paid)
            .execute(&pool)
            .await
            .unwrap();

        let stats = DashboardStats::fetch(&pool).await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_reservations: 1,
                paid_income: 150.0,
                available_boats: 1,
            }
        );

        let income = MonthlyIncome::report(&pool).await.unwrap();
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].total, 150.0);

        let occupancy = BoatOccupancy::report(&pool).await.unwrap();
        assert_eq!(
            occupancy,
            vec![
                BoatOccupancy {
                    boat: "Pelican".into(),
                    reservations: 1,
                },
                BoatOccupancy {
                    boat: "Dry Dock".into(),
                    reservations: 0,
                },
            ]
        );
    }
}
