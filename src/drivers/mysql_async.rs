use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, OptsBuilder, Row as MySqlRow, Value};
use tokio::sync::Mutex;

use crate::config::DriverConfig;
use crate::error::{MysqlRsError, Result};
use crate::traits::DatabaseDriver;
use crate::types::{RawQueryResult, SqlValue};

/// MySQL driver implementation using mysql_async.
///
/// Holds at most one server session. The session is opened on first use,
/// pinged before every later use and reopened when the ping fails.
pub struct MysqlAsyncDriver {
    config: DriverConfig,
    session: Mutex<Option<Conn>>,
}

impl MysqlAsyncDriver {
    /// Create a driver without connecting.
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
        }
    }

    /// Create a driver and open its session immediately.
    pub async fn connect(config: DriverConfig) -> Result<Self> {
        let driver = Self::new(config);
        let conn = driver.open().await?;
        *driver.session.lock().await = Some(conn);
        Ok(driver)
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    fn opts(&self) -> OptsBuilder {
        let config = &self.config;
        let host = if config.host.is_empty() {
            "localhost"
        } else {
            config.host.as_str()
        };

        OptsBuilder::default()
            .ip_or_hostname(host)
            .tcp_port(config.port)
            .user(Some(config.username.as_str()).filter(|u| !u.is_empty()))
            .pass(Some(config.password.as_str()).filter(|p| !p.is_empty()))
            .db_name(Some(config.database.as_str()).filter(|d| !d.is_empty()))
            .socket(config.socket_path())
    }

    async fn open(&self) -> Result<Conn> {
        let conn = Conn::new(self.opts())
            .await
            .map_err(|e| MysqlRsError::ConnectionFailed(e.to_string()))?;

        tracing::info!(
            host = %self.config.host,
            port = self.config.port,
            database = %self.config.database,
            "opened MySQL session"
        );
        Ok(conn)
    }

    /// Takes the session out of `slot`, validating it with a ping, or opens
    /// a new one. The caller puts it back once the statement succeeds.
    async fn acquire(&self, slot: &mut Option<Conn>) -> Result<Conn> {
        if let Some(mut conn) = slot.take() {
            match conn.ping().await {
                Ok(()) => return Ok(conn),
                Err(e) => {
                    tracing::warn!(error = %e, "MySQL session failed liveness check, reconnecting");
                }
            }
        }
        self.open().await
    }
}

#[async_trait]
impl DatabaseDriver for MysqlAsyncDriver {
    async fn execute(&self, sql: &str) -> Result<RawQueryResult> {
        let mut slot = self.session.lock().await;
        let mut conn = self.acquire(&mut slot).await?;

        tracing::debug!(sql = %sql, "executing statement");

        match run_statement(&mut conn, sql).await {
            Ok(result) => {
                *slot = Some(conn);
                Ok(result)
            }
            Err(mysql_async::Error::Server(e)) => {
                // The server rejected the statement; the session itself is fine.
                *slot = Some(conn);
                Err(MysqlRsError::QueryFailed {
                    code: e.code,
                    message: e.message,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding MySQL session after failure");
                Err(MysqlRsError::query(e.to_string()))
            }
        }
    }

    async fn close(&self) -> Result<()> {
        if let Some(conn) = self.session.lock().await.take() {
            conn.disconnect()
                .await
                .map_err(|e| MysqlRsError::query(e.to_string()))?;
            tracing::info!("closed MySQL session");
        }
        Ok(())
    }
}

async fn run_statement(
    conn: &mut Conn,
    sql: &str,
) -> std::result::Result<RawQueryResult, mysql_async::Error> {
    let mut result = conn.query_iter(sql).await?;
    let rows: Vec<MySqlRow> = result.collect().await?;
    let affected_rows = result.affected_rows();
    result.drop_result().await?;

    // Extract column names
    let columns: Vec<String> = rows
        .first()
        .map(|row| {
            row.columns_ref()
                .iter()
                .map(|c| c.name_str().into_owned())
                .collect()
        })
        .unwrap_or_default();

    let result_rows: Vec<Vec<SqlValue>> = rows
        .into_iter()
        .map(|row| row.unwrap().into_iter().map(value_to_sql_value).collect())
        .collect();

    Ok(RawQueryResult::new(columns, result_rows).with_affected_rows(affected_rows))
}

/// Convert a wire value to a SqlValue. The text protocol delivers most
/// values as bytes; those become text when they are valid UTF-8.
fn value_to_sql_value(value: Value) -> SqlValue {
    match value {
        Value::NULL => SqlValue::Null,
        Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => SqlValue::Text(text),
            Err(e) => SqlValue::Bytes(e.into_bytes()),
        },
        Value::Int(i) => SqlValue::Int64(i),
        Value::UInt(u) => SqlValue::UInt64(u),
        Value::Float(f) => SqlValue::Float64(f64::from(f)),
        Value::Double(d) => SqlValue::Float64(d),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            let mut text = format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            );
            if micros > 0 {
                text.push_str(&format!(".{:06}", micros));
            }
            SqlValue::Text(text)
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let total_hours = u64::from(days) * 24 + u64::from(hours);
            let mut text = format!(
                "{}{:02}:{:02}:{:02}",
                if negative { "-" } else { "" },
                total_hours,
                minutes,
                seconds
            );
            if micros > 0 {
                text.push_str(&format!(".{:06}", micros));
            }
            SqlValue::Text(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_bytes_become_text() {
        assert_eq!(
            value_to_sql_value(Value::Bytes(b"Alice".to_vec())),
            SqlValue::Text("Alice".to_string())
        );
        assert_eq!(
            value_to_sql_value(Value::Bytes(vec![0xff, 0x00])),
            SqlValue::Bytes(vec![0xff, 0x00])
        );
        assert_eq!(value_to_sql_value(Value::NULL), SqlValue::Null);
    }

    #[test]
    fn test_numeric_values() {
        assert_eq!(value_to_sql_value(Value::Int(-4)), SqlValue::Int64(-4));
        assert_eq!(value_to_sql_value(Value::UInt(9)), SqlValue::UInt64(9));
        assert_eq!(value_to_sql_value(Value::Double(0.25)), SqlValue::Float64(0.25));
    }

    #[test]
    fn test_temporal_values() {
        assert_eq!(
            value_to_sql_value(Value::Date(2024, 2, 29, 13, 5, 9, 0)),
            SqlValue::Text("2024-02-29 13:05:09".to_string())
        );
        assert_eq!(
            value_to_sql_value(Value::Time(true, 1, 2, 3, 4, 500)),
            SqlValue::Text("-26:03:04.000500".to_string())
        );
    }

    #[tokio::test]
    async fn test_new_does_not_connect() {
        let driver = MysqlAsyncDriver::new(DriverConfig::new().host("203.0.113.1"));
        assert!(driver.session.lock().await.is_none());
        assert_eq!(driver.config().port, 3306);
        // Closing an unopened session is a no-op.
        driver.close().await.unwrap();
    }

    fn unreachable_config() -> DriverConfig {
        // Nothing listens on port 1, so the connect is refused at once.
        DriverConfig::new().host("127.0.0.1").port(1)
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_connection_failed() {
        let driver = MysqlAsyncDriver::new(unreachable_config());

        let err = driver.execute("SELECT 1").await.unwrap_err();
        assert!(
            matches!(err, MysqlRsError::ConnectionFailed(_)),
            "Expected ConnectionFailed error, got {:?}",
            err
        );
        assert!(driver.session.lock().await.is_none());

        // Every attempt tries again rather than caching the failure.
        assert!(matches!(
            driver.execute("SELECT 1").await,
            Err(MysqlRsError::ConnectionFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_eager_connect_reports_connection_failed() {
        assert!(matches!(
            MysqlAsyncDriver::connect(unreachable_config()).await,
            Err(MysqlRsError::ConnectionFailed(_))
        ));

        let driver = crate::RelationalDriver::new(unreachable_config());
        assert!(matches!(
            driver.raw_query("SELECT 1").await,
            Err(MysqlRsError::ConnectionFailed(_))
        ));
    }
}
