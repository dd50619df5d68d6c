use crate::error::Result;
use crate::types::SqlValue;

/// Describes one persisted attribute of a model: its column name and how to
/// read and write it.
pub struct ColumnDef<M> {
    pub name: &'static str,
    pub get: fn(&M) -> SqlValue,
    pub set: fn(&mut M, SqlValue) -> Result<()>,
}

impl<M> ColumnDef<M> {
    pub const fn new(
        name: &'static str,
        get: fn(&M) -> SqlValue,
        set: fn(&mut M, SqlValue) -> Result<()>,
    ) -> Self {
        Self { name, get, set }
    }
}

/// Trait for entities stored one-per-row in a table.
/// Implementations are typically written alongside the entity struct.
///
/// # Example
/// ```
/// use mysqlrs::{ColumnDef, FromSqlValue, Model};
///
/// #[derive(Default)]
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// static USER_COLUMNS: &[ColumnDef<User>] = &[
///     ColumnDef::new("id", |u| u.id.into(), |u, v| {
///         u.id = i64::from_sql_value(v)?;
///         Ok(())
///     }),
///     ColumnDef::new("name", |u| u.name.as_str().into(), |u, v| {
///         u.name = String::from_sql_value(v)?;
///         Ok(())
///     }),
/// ];
///
/// impl Model for User {
///     fn table_name() -> &'static str {
///         "users"
///     }
///     fn columns() -> &'static [ColumnDef<Self>] {
///         USER_COLUMNS
///     }
/// }
///
/// let user = User { id: 7, name: "Ann".into() };
/// assert_eq!(user.id().to_text(), "7");
/// ```
pub trait Model: Default + Send + 'static {
    /// Returns the table name as it appears in the database.
    fn table_name() -> &'static str;

    /// Returns the name of the primary key column.
    fn id_field() -> &'static str {
        "id"
    }

    /// Returns every persisted column, in insertion order.
    fn columns() -> &'static [ColumnDef<Self>];

    /// Returns the primary key value, or `Null` when `id_field` names no
    /// declared column. Statements keyed by id refuse to run in that case.
    fn id(&self) -> SqlValue {
        Self::column(Self::id_field())
            .map(|column| (column.get)(self))
            .unwrap_or(SqlValue::Null)
    }

    /// Looks up a column descriptor by name.
    fn column(name: &str) -> Option<&'static ColumnDef<Self>> {
        Self::columns().iter().find(|column| column.name == name)
    }
}
