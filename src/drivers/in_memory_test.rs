use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{MysqlRsError, Result};
use crate::traits::DatabaseDriver;
use crate::types::{RawQueryResult, SqlValue};

/// A queued outcome for the next statement.
enum Response {
    Rows(RawQueryResult),
    ServerError { code: u16, message: String },
}

/// An in-memory database driver for testing.
///
/// Allows configuring expected responses and verifying executed statements.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use mysqlrs::drivers::{InMemoryTestDriver, InMemoryTestResponseBuilder};
/// use mysqlrs::RelationalDriver;
///
/// let driver = Arc::new(
///     InMemoryTestDriver::new().with_response(
///         InMemoryTestResponseBuilder::new()
///             .columns(&["id", "name"])
///             .row(&["1", "Alice"])
///             .build(),
///     ),
/// );
/// let relational = RelationalDriver::with_driver(driver.clone());
/// ```
pub struct InMemoryTestDriver {
    responses: Mutex<VecDeque<Response>>,
    recorded_queries: Mutex<Vec<String>>,
    default_response: RawQueryResult,
    close_count: AtomicUsize,
}

impl InMemoryTestDriver {
    /// Create a new in-memory test driver with no pre-configured responses.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            recorded_queries: Mutex::new(Vec::new()),
            default_response: RawQueryResult::empty(),
            close_count: AtomicUsize::new(0),
        }
    }

    /// Add a response to be returned by the next statement.
    /// Responses are returned in FIFO order.
    pub fn with_response(self, response: RawQueryResult) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Response::Rows(response));
        self
    }

    /// Add multiple responses to be returned by subsequent statements.
    pub fn with_responses(self, responses: impl IntoIterator<Item = RawQueryResult>) -> Self {
        let mut queue = self.responses.lock().unwrap();
        for response in responses {
            queue.push_back(Response::Rows(response));
        }
        drop(queue);
        self
    }

    /// Make the next statement fail as if the server rejected it.
    pub fn with_server_error(self, code: u16, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Response::ServerError {
            code,
            message: message.into(),
        });
        self
    }

    /// Set a default response to use when no queued responses remain.
    pub fn with_default_response(mut self, response: RawQueryResult) -> Self {
        self.default_response = response;
        self
    }

    /// Get all recorded statements that have been executed.
    pub fn recorded_queries(&self) -> Vec<String> {
        self.recorded_queries.lock().unwrap().clone()
    }

    /// Get the last recorded statement, if any.
    pub fn last_query(&self) -> Option<String> {
        self.recorded_queries.lock().unwrap().last().cloned()
    }

    /// Clear all recorded statements.
    pub fn clear_recorded_queries(&self) {
        self.recorded_queries.lock().unwrap().clear();
    }

    /// Number of times `close` was called.
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }

    /// Assert that the last statement matches the expected SQL.
    pub fn assert_last_query(&self, expected_sql: &str) {
        let last = self.last_query().expect("No queries were recorded");
        assert_eq!(
            last, expected_sql,
            "SQL mismatch.\nExpected: {}\nActual: {}",
            expected_sql, last
        );
    }

    /// Assert that exactly n statements were executed.
    pub fn assert_query_count(&self, expected: usize) {
        let actual = self.recorded_queries.lock().unwrap().len();
        assert_eq!(
            actual, expected,
            "Query count mismatch. Expected: {}, Actual: {}",
            expected, actual
        );
    }
}

impl Default for InMemoryTestDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for InMemoryTestDriver {
    async fn execute(&self, sql: &str) -> Result<RawQueryResult> {
        // Record the statement
        self.recorded_queries.lock().unwrap().push(sql.to_string());

        // Return next queued response or default
        let response = self.responses.lock().unwrap().pop_front();

        match response {
            Some(Response::Rows(result)) => Ok(result),
            Some(Response::ServerError { code, message }) => {
                Err(MysqlRsError::QueryFailed { code, message })
            }
            None => Ok(self.default_response.clone()),
        }
    }

    async fn close(&self) -> Result<()> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Builder for creating test responses easily.
pub struct InMemoryTestResponseBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
    affected_rows: u64,
}

impl InMemoryTestResponseBuilder {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            affected_rows: 0,
        }
    }

    /// Set the column names for the response.
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a row of text values, the way the server's text protocol sends them.
    pub fn row(mut self, values: &[&str]) -> Self {
        self.rows
            .push(values.iter().map(|s| SqlValue::from(*s)).collect());
        self
    }

    /// Add a row of typed values.
    pub fn value_row(mut self, values: Vec<SqlValue>) -> Self {
        self.rows.push(values);
        self
    }

    /// Set the affected row count reported for a mutating statement.
    pub fn affected_rows(mut self, affected_rows: u64) -> Self {
        self.affected_rows = affected_rows;
        self
    }

    /// Build the RawQueryResult.
    pub fn build(self) -> RawQueryResult {
        RawQueryResult::new(self.columns, self.rows).with_affected_rows(self.affected_rows)
    }
}

impl Default for InMemoryTestResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
