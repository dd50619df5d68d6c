use std::sync::Arc;

use crate::builders::{build_delete_by_id, build_select_by_id, build_upsert, Query};
use crate::config::DriverConfig;
use crate::drivers::MysqlAsyncDriver;
use crate::error::{MysqlRsError, Result};
use crate::traits::{ColumnDef, DatabaseDriver, Model};
use crate::types::{QueryResult, RawQueryResult, Row, SqlValue};

/// Main entry point for mysqlrs.
/// Stores, loads and deletes models and runs queries against their tables.
pub struct RelationalDriver {
    driver: Arc<dyn DatabaseDriver>,
}

impl RelationalDriver {
    /// Create a driver for the configured server. No connection is made
    /// until the first statement runs.
    pub fn new(config: DriverConfig) -> Self {
        Self {
            driver: Arc::new(MysqlAsyncDriver::new(config)),
        }
    }

    /// Create a driver and connect right away, failing early on bad
    /// credentials.
    ///
    /// # Example
    /// ```ignore
    /// let driver = RelationalDriver::connect(
    ///     DriverConfig::new().host("localhost").username("app").password("secret"),
    /// )
    /// .await?;
    /// ```
    pub async fn connect(config: DriverConfig) -> Result<Self> {
        let driver = MysqlAsyncDriver::connect(config).await?;
        Ok(Self {
            driver: Arc::new(driver),
        })
    }

    /// Create a new driver on top of a custom database driver.
    /// Useful for testing or using alternative database drivers.
    pub fn with_driver(driver: Arc<dyn DatabaseDriver>) -> Self {
        Self { driver }
    }

    /// Execute a SQL statement verbatim.
    pub async fn raw_query(&self, sql: &str) -> Result<RawQueryResult> {
        self.driver.execute(sql).await
    }

    /// Insert the model, or overwrite the row that has the same key.
    pub async fn save<M: Model>(&self, model: &M) -> Result<bool> {
        let sql = build_upsert(model);
        self.raw_query(&sql).await?;
        Ok(true)
    }

    /// Load the row whose id matches the model's id into the model.
    ///
    /// Returns false, leaving the model unchanged, when no row matches.
    /// When several rows match only the first is used. If any column fails
    /// to convert, the error is returned and the model is left unchanged.
    pub async fn get<M: Model>(&self, model: &mut M) -> Result<bool> {
        let sql = build_select_by_id(model)?;
        let result = self.raw_query(&sql).await?;

        let Some(row) = result.into_rows().into_iter().next() else {
            return Ok(false);
        };

        hydrate_all_or_nothing(model, row)?;
        Ok(true)
    }

    /// Delete the row whose id matches the model's id.
    /// Succeeds whether or not a row was removed.
    pub async fn delete<M: Model>(&self, model: &M) -> Result<bool> {
        let sql = build_delete_by_id(model)?;
        self.raw_query(&sql).await?;
        Ok(true)
    }

    /// Execute a SELECT, UPDATE or DELETE query.
    ///
    /// SELECT rows are hydrated into fresh `M` instances; mutating queries
    /// report their affected row count.
    pub async fn query<M: Model>(&self, query: &Query<M>) -> Result<QueryResult<M>> {
        let sql = query.build_sql();
        let raw = self.raw_query(&sql).await?;

        let mut result = QueryResult::new(true);
        result.set_affected_rows(raw.affected_rows);

        for row in raw.into_rows() {
            let mut model = M::default();
            hydrate(&mut model, row)?;
            result.add(model);
        }

        Ok(result)
    }

    /// Close the underlying session. The next statement reconnects.
    pub async fn close(&self) -> Result<()> {
        self.driver.close().await
    }
}

type Assignment<M> = (&'static ColumnDef<M>, String, SqlValue);

/// Pair each column of `row` with the model attribute of the same name.
fn assignments<M: Model>(row: Row) -> Vec<Assignment<M>> {
    row.into_iter()
        .filter_map(|(name, value)| match M::column(&name) {
            Some(column) => Some((column, name, value)),
            None => {
                tracing::trace!(
                    table = M::table_name(),
                    column = %name,
                    "skipping column without model attribute"
                );
                None
            }
        })
        .collect()
}

fn apply<M: Model>(
    model: &mut M,
    column: &ColumnDef<M>,
    name: &str,
    value: SqlValue,
) -> Result<()> {
    (column.set)(model, value).map_err(|e| match e {
        MysqlRsError::InvalidValue { column, message } if column.is_empty() => {
            MysqlRsError::InvalidValue {
                column: name.to_string(),
                message,
            }
        }
        other => other,
    })
}

/// Copy every column of `row` onto the model attribute of the same name.
fn hydrate<M: Model>(model: &mut M, row: Row) -> Result<()> {
    for (column, name, value) in assignments::<M>(row) {
        apply(model, column, &name, value)?;
    }
    Ok(())
}

/// Like `hydrate`, but every value is converted on a scratch instance first
/// so a bad column leaves `model` untouched.
fn hydrate_all_or_nothing<M: Model>(model: &mut M, row: Row) -> Result<()> {
    let assignments = assignments::<M>(row);

    let mut scratch = M::default();
    for (column, name, value) in &assignments {
        apply(&mut scratch, column, name, value.clone())?;
    }

    for (column, name, value) in assignments {
        apply(model, column, &name, value)?;
    }
    Ok(())
}
