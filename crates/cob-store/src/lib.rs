//! Postgres persistence adapter for the two contact tables.
//!
//! Connections are opened per operation and closed before the call returns;
//! nothing is pooled or shared across operations. Batch inserts run inside
//! one transaction and roll back as a whole on any failure.

use async_trait::async_trait;
use cob_core::{ContactStore, ContactTable, StoreConfig, StoreError};
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use std::time::Duration;
use tracing::{error, info, warn};

const PROBE_MAX_ATTEMPTS: u32 = 10;
const PROBE_RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct PgContactStore {
    options: PgConnectOptions,
}

impl PgContactStore {
    pub fn new(config: &StoreConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);
        Self { options }
    }

    async fn connect(&self) -> Result<PgConnection, StoreError> {
        PgConnection::connect_with(&self.options)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }

    /// Startup gate: up to `PROBE_MAX_ATTEMPTS` connection attempts with a
    /// fixed delay in between. Returns false when all attempts fail; the
    /// process must then refuse to start serving. This is not a runtime
    /// retry policy for individual operations.
    pub async fn probe_connectivity(&self) -> bool {
        for attempt in 1..=PROBE_MAX_ATTEMPTS {
            info!(
                event = "store_probe",
                attempt,
                max_attempts = PROBE_MAX_ATTEMPTS
            );
            match self.connect().await {
                Ok(conn) => {
                    let _ = conn.close().await;
                    info!(event = "store_probe_ok", attempt);
                    return true;
                }
                Err(err) => {
                    warn!(event = "store_probe_failed", attempt, error = %err);
                }
            }
            if attempt < PROBE_MAX_ATTEMPTS {
                tokio::time::sleep(PROBE_RETRY_DELAY).await;
            }
        }
        error!(event = "store_probe_exhausted", attempts = PROBE_MAX_ATTEMPTS);
        false
    }
}

fn insert_sql(table: ContactTable) -> &'static str {
    match table {
        ContactTable::Emails => "INSERT INTO emails (email) VALUES ($1)",
        ContactTable::PhoneNumbers => "INSERT INTO phone_numbers (phone_number) VALUES ($1)",
    }
}

fn select_sql(table: ContactTable) -> &'static str {
    match table {
        ContactTable::Emails => "SELECT email FROM emails",
        ContactTable::PhoneNumbers => "SELECT phone_number FROM phone_numbers",
    }
}

fn op_err(err: sqlx::Error) -> StoreError {
    StoreError::Operation(err.to_string())
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn insert_many(&self, table: ContactTable, values: &[String]) -> Result<(), StoreError> {
        if values.is_empty() {
            return Ok(());
        }
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await.map_err(op_err)?;
        for value in values {
            sqlx::query(insert_sql(table))
                .bind(value)
                .execute(&mut *tx)
                .await
                .map_err(op_err)?;
        }
        tx.commit().await.map_err(op_err)?;
        let _ = conn.close().await;
        Ok(())
    }

    async fn select_all(&self, table: ContactTable) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query_scalar::<_, String>(select_sql(table))
            .fetch_all(&mut conn)
            .await
            .map_err(op_err)?;
        let _ = conn.close().await;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_targets_the_single_relevant_column() {
        assert_eq!(insert_sql(ContactTable::Emails), "INSERT INTO emails (email) VALUES ($1)");
        assert_eq!(
            insert_sql(ContactTable::PhoneNumbers),
            "INSERT INTO phone_numbers (phone_number) VALUES ($1)"
        );
        assert_eq!(select_sql(ContactTable::Emails), "SELECT email FROM emails");
        assert_eq!(
            select_sql(ContactTable::PhoneNumbers),
            "SELECT phone_number FROM phone_numbers"
        );
    }
}
