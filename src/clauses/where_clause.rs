use std::fmt;
use std::str::FromStr;

use crate::error::MysqlRsError;
use crate::types::{quote_identifier, SqlValue};

/// How the children of a group are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    /// The separator placed between rendered children.
    pub fn separator(self) -> &'static str {
        match self {
            Conjunction::And => " AND ",
            Conjunction::Or => " OR ",
        }
    }
}

impl FromStr for Conjunction {
    type Err = MysqlRsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Conjunction::And),
            "OR" => Ok(Conjunction::Or),
            _ => Err(MysqlRsError::InvalidConjunction(s.to_string())),
        }
    }
}

/// Numeric tags: 0 is AND, 1 is OR.
impl TryFrom<i32> for Conjunction {
    type Error = MysqlRsError;

    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Conjunction::And),
            1 => Ok(Conjunction::Or),
            other => Err(MysqlRsError::InvalidConjunction(other.to_string())),
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.separator().trim())
    }
}

/// A single comparison: `field operator value`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCondition {
    pub field: String,
    pub operator: String,
    pub value: SqlValue,
}

impl WhereCondition {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<SqlValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    pub fn build_sql(&self) -> String {
        format!(
            "{} {} {}",
            quote_identifier(&self.field),
            self.operator,
            self.value.to_sql_literal()
        )
    }
}

/// An ordered list of nodes joined by one conjunction.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereGroup {
    pub conjunction: Conjunction,
    pub children: Vec<WhereNode>,
}

impl WhereGroup {
    pub fn new(conjunction: Conjunction, children: Vec<WhereNode>) -> Self {
        Self {
            conjunction,
            children,
        }
    }

    /// Builds a group from a textual conjunction tag such as `"AND"`.
    pub fn from_tag(tag: &str, children: Vec<WhereNode>) -> Result<Self, MysqlRsError> {
        Ok(Self::new(tag.parse()?, children))
    }

    pub fn push(&mut self, node: impl Into<WhereNode>) {
        self.children.push(node.into());
    }

    /// Renders every child and wraps the joined result in parentheses.
    pub fn build_sql(&self) -> String {
        let parts: Vec<String> = self.children.iter().map(WhereNode::build_sql).collect();
        format!("({})", parts.join(self.conjunction.separator()))
    }
}

/// A node of a WHERE tree.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereNode {
    Condition(WhereCondition),
    Group(WhereGroup),
}

impl WhereNode {
    /// Creates a condition with an arbitrary operator.
    pub fn condition(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<SqlValue>,
    ) -> Self {
        WhereNode::Condition(WhereCondition::new(field, operator, value))
    }

    /// Creates an equality condition: field = value
    pub fn eq(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::condition(field, "=", value)
    }

    /// Groups nodes with AND.
    pub fn all(children: impl IntoIterator<Item = WhereNode>) -> Self {
        WhereNode::Group(WhereGroup::new(
            Conjunction::And,
            children.into_iter().collect(),
        ))
    }

    /// Groups nodes with OR.
    pub fn any(children: impl IntoIterator<Item = WhereNode>) -> Self {
        WhereNode::Group(WhereGroup::new(
            Conjunction::Or,
            children.into_iter().collect(),
        ))
    }

    /// Builds the SQL fragment for this node and its descendants.
    pub fn build_sql(&self) -> String {
        match self {
            WhereNode::Condition(condition) => condition.build_sql(),
            WhereNode::Group(group) => group.build_sql(),
        }
    }
}

impl From<WhereCondition> for WhereNode {
    fn from(condition: WhereCondition) -> Self {
        WhereNode::Condition(condition)
    }
}

impl From<WhereGroup> for WhereNode {
    fn from(group: WhereGroup) -> Self {
        WhereNode::Group(group)
    }
}
