use crate::error::{MysqlRsError, Result};

/// Represents a scalar column value in a driver-agnostic way.
/// Model getters produce these; model setters consume them.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Int32(i32),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Renders the value as a SQL literal.
    ///
    /// Numbers (and text that reads as a number) are written bare, NULL as
    /// `NULL`, everything else escaped and single-quoted.
    pub fn to_sql_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Int32(i) => i.to_string(),
            SqlValue::Int64(i) => i.to_string(),
            SqlValue::UInt64(i) => i.to_string(),
            SqlValue::Float64(f) if f.is_finite() => f.to_string(),
            SqlValue::Float64(_) => "NULL".to_string(),
            SqlValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            SqlValue::Text(s) => {
                let escaped = escape_string(s);
                if is_numeric(&escaped) {
                    escaped
                } else {
                    format!("'{}'", escaped)
                }
            }
            SqlValue::Bytes(b) => hex_literal(b),
        }
    }

    /// Renders the value as a quoted string literal, even when numeric.
    /// Used for primary key comparisons.
    pub fn to_quoted_literal(&self) -> String {
        match self {
            SqlValue::Bytes(b) => hex_literal(b),
            SqlValue::Null => "''".to_string(),
            other => format!("'{}'", escape_string(&other.to_text())),
        }
    }

    /// Text form of the value, as the server would print it.
    pub fn to_text(&self) -> String {
        match self {
            SqlValue::Null => String::new(),
            SqlValue::Text(s) => s.clone(),
            SqlValue::Int32(i) => i.to_string(),
            SqlValue::Int64(i) => i.to_string(),
            SqlValue::UInt64(i) => i.to_string(),
            SqlValue::Float64(f) => f.to_string(),
            SqlValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            SqlValue::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }
}

/// Escapes a string for inclusion between single quotes, with the same
/// character set as the MySQL client's `mysql_real_escape_string`.
pub fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    for ch in s.chars() {
        match ch {
            '\0' => result.push_str("\\0"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '\x1a' => result.push_str("\\Z"),
            _ => result.push(ch),
        }
    }
    result
}

/// Quotes an identifier with backticks, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn hex_literal(data: &[u8]) -> String {
    let mut result = String::with_capacity(data.len() * 2 + 3);
    result.push_str("X'");
    for byte in data {
        result.push_str(&format!("{byte:02X}"));
    }
    result.push('\'');
    result
}

/// Returns true if `s` is a plain decimal number: optional surrounding
/// whitespace, optional sign, digits with an optional fraction, and an
/// optional exponent. Hex, binary and empty strings are not numeric.
pub fn is_numeric(s: &str) -> bool {
    let s = s.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'));
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }

    if digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(value.clone())
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int32(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int64(value)
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::Int64(i64::from(value))
    }
}

impl From<u64> for SqlValue {
    fn from(value: u64) -> Self {
        SqlValue::UInt64(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float64(value)
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        SqlValue::Float64(f64::from(value))
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Bytes(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

/// Conversion from a column value into a model attribute type.
///
/// Errors are `MysqlRsError::InvalidValue` with an empty column name; the
/// hydration code fills in the column.
pub trait FromSqlValue: Sized {
    fn from_sql_value(value: SqlValue) -> Result<Self>;
}

fn invalid(message: impl Into<String>) -> MysqlRsError {
    MysqlRsError::InvalidValue {
        column: String::new(),
        message: message.into(),
    }
}

fn unexpected(target: &str, value: &SqlValue) -> MysqlRsError {
    invalid(format!("cannot convert {:?} to {}", value, target))
}

impl FromSqlValue for SqlValue {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        Ok(value)
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Null => Err(invalid("unexpected NULL")),
            SqlValue::Text(s) => Ok(s),
            SqlValue::Bytes(b) => {
                String::from_utf8(b).map_err(|e| invalid(format!("invalid UTF-8: {}", e)))
            }
            other => Ok(other.to_text()),
        }
    }
}

macro_rules! impl_from_sql_value_int {
    ($($t:ty),*) => {
        $(
            impl FromSqlValue for $t {
                fn from_sql_value(value: SqlValue) -> Result<Self> {
                    let converted = match &value {
                        SqlValue::Int32(i) => <$t>::try_from(*i).ok(),
                        SqlValue::Int64(i) => <$t>::try_from(*i).ok(),
                        SqlValue::UInt64(i) => <$t>::try_from(*i).ok(),
                        SqlValue::Bool(b) => Some(<$t>::from(*b)),
                        SqlValue::Text(s) => s.trim().parse::<$t>().ok(),
                        SqlValue::Bytes(b) => std::str::from_utf8(b)
                            .ok()
                            .and_then(|s| s.trim().parse::<$t>().ok()),
                        SqlValue::Null | SqlValue::Float64(_) => None,
                    };
                    converted.ok_or_else(|| unexpected(stringify!($t), &value))
                }
            }
        )*
    };
}

impl_from_sql_value_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromSqlValue for f64 {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        let converted = match &value {
            SqlValue::Float64(f) => Some(*f),
            SqlValue::Int32(i) => Some(f64::from(*i)),
            SqlValue::Int64(i) => Some(*i as f64),
            SqlValue::UInt64(i) => Some(*i as f64),
            SqlValue::Text(s) => s.trim().parse().ok(),
            SqlValue::Bytes(b) => std::str::from_utf8(b)
                .ok()
                .and_then(|s| s.trim().parse().ok()),
            SqlValue::Null | SqlValue::Bool(_) => None,
        };
        converted.ok_or_else(|| unexpected("f64", &value))
    }
}

impl FromSqlValue for f32 {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        f64::from_sql_value(value).map(|f| f as f32)
    }
}

impl FromSqlValue for bool {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        let converted = match &value {
            SqlValue::Bool(b) => Some(*b),
            SqlValue::Int32(i) => Some(*i != 0),
            SqlValue::Int64(i) => Some(*i != 0),
            SqlValue::UInt64(i) => Some(*i != 0),
            SqlValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
            _ => None,
        };
        converted.ok_or_else(|| unexpected("bool", &value))
    }
}

impl FromSqlValue for Vec<u8> {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Bytes(b) => Ok(b),
            SqlValue::Null => Err(invalid("unexpected NULL")),
            other => Ok(other.to_text().into_bytes()),
        }
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_sql_value(other).map(Some),
        }
    }
}
