use crate::error::{RemoteError, StoreError};
use async_trait::async_trait;

/// The two single-column contact tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactTable {
    Emails,
    PhoneNumbers,
}

/// Captured result of one remote shell invocation. Only stdout is read;
/// stderr is not part of the contract.
#[derive(Debug, Clone)]
pub struct RemoteOutput {
    pub command_line: String,
    pub stdout: String,
    pub exit_code: Option<i32>,
}

/// Persistence seam. Batch inserts are all-or-nothing; `select_all` returns
/// an empty vec (not an error) for an empty table.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert_many(&self, table: ContactTable, values: &[String]) -> Result<(), StoreError>;
    async fn select_all(&self, table: ContactTable) -> Result<Vec<String>, StoreError>;
}

/// Remote-execution seam. One session per call, closed on every exit path,
/// no retries.
#[async_trait]
pub trait RemoteRunner: Send + Sync {
    async fn execute(&self, command_line: &str) -> Result<RemoteOutput, RemoteError>;
}
