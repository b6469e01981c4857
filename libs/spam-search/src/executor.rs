//! Query execution
//!
//! The search only produces SQL text. Running it belongs to a [`QueryExecutor`],
//! which owns connections and transactions.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row;

use crate::config::DatabaseConfig;
use crate::Result;

/// One row of the spam search listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactRow {
    pub contact_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub postcode: Option<String>,
}

/// Executes search SQL against the contact store.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a `SELECT COUNT(*) ...` statement and return the count.
    async fn fetch_count(&self, sql: &str) -> Result<i64>;

    /// Run a listing statement and decode its rows.
    ///
    /// Columns missing from the select (id-only listings) decode as `None`.
    async fn fetch_rows(&self, sql: &str) -> Result<Vec<ContactRow>>;
}

/// MySQL-backed executor.
#[derive(Clone)]
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        tracing::debug!(max_connections = config.max_connections, "Connected to MySQL");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl QueryExecutor for MySqlExecutor {
    async fn fetch_count(&self, sql: &str) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(crate::Error::Database)?;

        Ok(total.max(0))
    }

    async fn fetch_rows(&self, sql: &str) -> Result<Vec<ContactRow>> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(crate::Error::Database)?;

        rows.iter().map(decode_row).collect()
    }
}

/// Id-only listings carry no display columns; only a missing column maps to `None`.
fn missing_as_none<T>(decoded: std::result::Result<Option<T>, sqlx::Error>) -> Result<Option<T>> {
    match decoded {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnNotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn decode_row(row: &MySqlRow) -> Result<ContactRow> {
    let text = |name: &str| missing_as_none(row.try_get::<Option<String>, _>(name));

    // civicrm_contact.id is INT UNSIGNED; signed decode only covers derived tables.
    let contact_id = match row.try_get::<i64, _>("contact_id") {
        Ok(id) => id,
        Err(_) => {
            let id = row.try_get::<u64, _>("contact_id")?;
            i64::try_from(id).map_err(|e| anyhow::anyhow!("contact id {id} out of range: {e}"))?
        }
    };

    Ok(ContactRow {
        contact_id,
        first_name: text("first_name")?,
        last_name: text("last_name")?,
        email: text("email")?,
        phone: text("phone")?,
        postcode: text("postcode")?,
    })
}
