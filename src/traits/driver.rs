use async_trait::async_trait;

use crate::error::Result;
use crate::types::RawQueryResult;

/// Trait for database driver implementations.
/// Drivers are responsible for:
/// - Managing the server session (connecting, liveness checks, reconnects)
/// - Executing SQL text verbatim
/// - Converting native rows to RawQueryResult
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Execute a single SQL statement.
    async fn execute(&self, sql: &str) -> Result<RawQueryResult>;

    /// Close the current session, if any. The next `execute` reconnects.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
