//! mysqlrs - A MySQL storage driver for model objects
//!
//! # Example
//! ```ignore
//! use mysqlrs::{DriverConfig, OrderField, Query, RelationalDriver, WhereNode};
//!
//! let driver = RelationalDriver::new(
//!     DriverConfig::new().host("localhost").username("app").password("secret"),
//! );
//!
//! // Insert or overwrite a row
//! driver.save(&user).await?;
//!
//! // Load by primary key
//! let mut user = User { id: 1, ..Default::default() };
//! let found = driver.get(&mut user).await?;
//!
//! // Query the table
//! let result = driver
//!     .query(
//!         &Query::<User>::select()
//!             .where_(WhereNode::eq("name", "John"))
//!             .order_by(OrderField::desc("id"))
//!             .limit(0, 10),
//!     )
//!     .await?;
//! ```

pub mod builders;
pub mod clauses;
pub mod config;
pub mod drivers;
pub mod error;
pub mod traits;
pub mod types;

mod relational;

// Re-export main types for convenient access
pub use builders::{Query, QueryKind};
pub use clauses::{Conjunction, Direction, Limit, OrderField, WhereCondition, WhereGroup, WhereNode};
pub use config::DriverConfig;
pub use error::{MysqlRsError, Result};
pub use relational::RelationalDriver;
pub use traits::{ColumnDef, DatabaseDriver, Model};
pub use types::{FromSqlValue, QueryResult, RawQueryResult, Row, SqlValue};
