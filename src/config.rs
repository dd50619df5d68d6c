//! Connection settings for the MySQL driver.

use serde::Deserialize;

/// Credentials and location of the MySQL server.
///
/// Every field has a default, so a partial document deserializes cleanly:
/// ```
/// use mysqlrs::DriverConfig;
///
/// let config = DriverConfig::new().host("db.internal").username("app");
/// assert_eq!(config.port, 3306);
/// assert_eq!(config.database, "data");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Host address
    pub host: String,
    /// Host port
    pub port: u16,
    /// Authentication username
    pub username: String,
    /// Authentication password
    pub password: String,
    /// Unix socket path or named pipe; empty means TCP only
    pub socket: String,
    /// Database selected on connect
    pub database: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 3306,
            username: String::new(),
            password: String::new(),
            socket: String::new(),
            database: "data".to_string(),
        }
    }
}

impl DriverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn socket(mut self, socket: impl Into<String>) -> Self {
        self.socket = socket.into();
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Returns the socket path, if one was configured.
    pub fn socket_path(&self) -> Option<&str> {
        Some(self.socket.as_str()).filter(|s| !s.is_empty())
    }
}
