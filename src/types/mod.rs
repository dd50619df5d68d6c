mod query_result;
mod row;
mod sql_value;

pub use query_result::QueryResult;
pub use row::{RawQueryResult, Row};
pub use sql_value::{escape_string, is_numeric, quote_identifier, FromSqlValue, SqlValue};
