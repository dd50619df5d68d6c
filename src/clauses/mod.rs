mod limit;
mod order;
mod where_clause;

pub use limit::Limit;
pub use order::{build_order_sql, Direction, OrderField};
pub use where_clause::{Conjunction, WhereCondition, WhereGroup, WhereNode};
