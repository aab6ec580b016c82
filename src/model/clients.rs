//! Client records

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::prelude::Type;

/// Newtype for client id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct ClientId(i64);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client row as shown on the clients screen
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Client {
    /// Lists all clients ordered by name
    pub async fn list(
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    ) -> Result<Vec<Self>> {
        let rows: Vec<(ClientId, String, Option<String>, Option<String>)> =
            sqlx::query_as("select id, name, email, phone from clients order by name")
                .fetch_all(db)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, email, phone)| Self {
                id,
                name,
                email,
                phone,
            })
            .collect())
    }
}

/// New client as submitted from the add form
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl NewClient {
    /// Creates the client in the database
    pub async fn create(
        self,
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    ) -> Result<ClientId> {
        let result = sqlx::query("insert into clients(name, email, phone) values (?, ?, ?)")
            .bind(self.name)
            .bind(self.email)
            .bind(self.phone)
            .execute(db)
            .await?;

        Ok(ClientId(result.last_insert_rowid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("model/migrations").run(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn create_and_list_ordered_by_name() {
        let pool = setup_pool().await;

        let zoe = NewClient {
            name: "Zoe".into(),
            email: None,
            phone: Some("555-0101".into()),
        }
        .create(&pool)
        .await
        .unwrap();

        let ann = NewClient {
            name: "Ann".into(),
            email: Some("ann@example.com".into()),
            phone: None,
        }
        .create(&pool)
        .await
        .unwrap();

        let clients = Client::list(&pool).await.unwrap();
        assert_eq!(
            clients,
            vec![
                Client {
                    id: ann,
                    name: "Ann".into(),
                    email: Some("ann@example.com".into()),
                    phone: None,
                },
                Client {
                    id: zoe,
                    name: "Zoe".into(),
                    email: None,
                    phone: Some("555-0101".into()),
                },
            ]
        );
    }
}
