use std::fmt;
use std::str::FromStr;

use crate::error::MysqlRsError;
use crate::types::quote_identifier;

/// Sort direction of an ORDER BY field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = MysqlRsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" | "ASCENDING" => Ok(Direction::Ascending),
            "DESC" | "DESCENDING" => Ok(Direction::Descending),
            _ => Err(MysqlRsError::InvalidDirection(s.to_string())),
        }
    }
}

/// Numeric tags: 0 is ascending, 1 is descending.
impl TryFrom<i32> for Direction {
    type Error = MysqlRsError;

    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Direction::Ascending),
            1 => Ok(Direction::Descending),
            other => Err(MysqlRsError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderField {
    pub field: String,
    pub direction: Direction,
}

impl OrderField {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Ascending)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Descending)
    }

    /// Builds an order field from a textual direction tag such as `"DESC"`.
    pub fn from_tag(field: impl Into<String>, tag: &str) -> Result<Self, MysqlRsError> {
        Ok(Self::new(field, tag.parse()?))
    }

    pub fn build_sql(&self) -> String {
        format!("{} {}", quote_identifier(&self.field), self.direction)
    }
}

/// Renders `ORDER BY `a` ASC, `b` DESC`.
pub fn build_order_sql(fields: &[OrderField]) -> String {
    let parts: Vec<String> = fields.iter().map(OrderField::build_sql).collect();
    format!("ORDER BY {}", parts.join(", "))
}
