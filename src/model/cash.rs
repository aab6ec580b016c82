//! Cash register - payments recorded against invoices

use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::prelude::Type;

use crate::model::invoices::InvoiceId;

/// Newtype for cash transaction id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct TransactionId(i64);

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment row as shown on the cash screen
#[derive(Debug, Clone, PartialEq)]
pub struct CashTransaction {
    pub id: TransactionId,
    pub invoice_id: InvoiceId,
    pub amount: f64,
    /// Payment method as picked on the form, e.g. `Cash` or `Card`
    pub method: String,
    pub date: DateTime<Utc>,
}

impl CashTransaction {
    /// Lists all payments, newest first
    pub async fn list(db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>) -> Result<Vec<Self>> {
        let rows: Vec<(TransactionId, InvoiceId, f64, String, DateTime<Utc>)> = sqlx::query_as(
            "select id, invoice_id, amount, method, date \
             from cash_transactions order by date desc",
        )
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, invoice_id, amount, method, date)| Self {
                id,
                invoice_id,
                amount,
                method,
                date,
            })
            .collect())
    }
}

/// New payment as submitted from the add form
#[derive(Debug, Clone)]
pub struct NewCashTransaction {
    pub invoice_id: InvoiceId,
    pub amount: f64,
    pub method: String,
}

impl NewCashTransaction {
    /// Records the payment, dated now
    pub async fn create(
        self,
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    ) -> Result<TransactionId> {
        let result = sqlx::query(
            "insert into cash_transactions(invoice_id, amount, method, date) values (?, ?, ?, ?)",
        )
        .bind(self.invoice_id)
        .bind(self.amount)
        .bind(self.method)
        .bind(Utc::now())
        .execute(db)
        .await?;

        Ok(TransactionId(result.last_insert_rowid()))
    }
}
