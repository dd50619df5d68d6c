//! Statements that address a single model by its primary key.

use crate::error::{MysqlRsError, Result};
use crate::traits::Model;
use crate::types::quote_identifier;

/// `INSERT INTO t (`a`,`b`) VALUES (..) ON DUPLICATE KEY UPDATE `a`=..,`b`=..`
/// covering every column the model exposes.
pub fn build_upsert<M: Model>(model: &M) -> String {
    let mut columns = Vec::with_capacity(M::columns().len());
    let mut values = Vec::with_capacity(M::columns().len());
    let mut updates = Vec::with_capacity(M::columns().len());

    for column in M::columns() {
        let name = quote_identifier(column.name);
        let value = (column.get)(model).to_sql_literal();
        updates.push(format!("{}={}", name, value));
        columns.push(name);
        values.push(value);
    }

    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON DUPLICATE KEY UPDATE {}",
        M::table_name(),
        columns.join(","),
        values.join(","),
        updates.join(",")
    )
}

/// `SELECT * FROM t WHERE id = '<id>'`
pub fn build_select_by_id<M: Model>(model: &M) -> Result<String> {
    Ok(format!(
        "SELECT * FROM {} WHERE {} = {}",
        M::table_name(),
        M::id_field(),
        id_literal(model)?
    ))
}

/// `DELETE FROM t WHERE id = '<id>'`
pub fn build_delete_by_id<M: Model>(model: &M) -> Result<String> {
    Ok(format!(
        "DELETE FROM {} WHERE {} = {}",
        M::table_name(),
        M::id_field(),
        id_literal(model)?
    ))
}

/// The id must come from a declared column; otherwise the statement would
/// match every row with an empty key.
fn id_literal<M: Model>(model: &M) -> Result<String> {
    let column = M::column(M::id_field()).ok_or_else(|| {
        MysqlRsError::ColumnNotFound(format!("{}.{}", M::table_name(), M::id_field()))
    })?;
    Ok((column.get)(model).to_quoted_literal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ColumnDef;
    use crate::types::FromSqlValue;

    #[derive(Default)]
    struct Note {
        slug: String,
        body: String,
        views: i64,
        rating: Option<f64>,
    }

    static NOTE_COLUMNS: &[ColumnDef<Note>] = &[
        ColumnDef::new(
            "slug",
            |n| n.slug.as_str().into(),
            |n, v| {
                n.slug = String::from_sql_value(v)?;
                Ok(())
            },
        ),
        ColumnDef::new(
            "body",
            |n| n.body.as_str().into(),
            |n, v| {
                n.body = String::from_sql_value(v)?;
                Ok(())
            },
        ),
        ColumnDef::new(
            "views",
            |n| n.views.into(),
            |n, v| {
                n.views = i64::from_sql_value(v)?;
                Ok(())
            },
        ),
        ColumnDef::new(
            "rating",
            |n| n.rating.into(),
            |n, v| {
                n.rating = Option::<f64>::from_sql_value(v)?;
                Ok(())
            },
        ),
    ];

    impl Model for Note {
        fn table_name() -> &'static str {
            "notes"
        }
        fn id_field() -> &'static str {
            "slug"
        }
        fn columns() -> &'static [ColumnDef<Self>] {
            NOTE_COLUMNS
        }
    }

    fn note() -> Note {
        Note {
            slug: "n1".to_string(),
            body: "it's \"quoted\"\n".to_string(),
            views: 12,
            rating: None,
        }
    }

    #[test]
    fn test_upsert() {
        assert_eq!(
            build_upsert(&note()),
            "INSERT INTO notes (`slug`,`body`,`views`,`rating`) \
             VALUES ('n1','it\\'s \\\"quoted\\\"\\n',12,NULL) \
             ON DUPLICATE KEY UPDATE `slug`='n1',`body`='it\\'s \\\"quoted\\\"\\n',`views`=12,`rating`=NULL"
        );
    }

    #[test]
    fn test_upsert_numeric_text_is_bare() {
        let mut note = note();
        note.body = "42".to_string();
        note.rating = Some(4.5);
        let sql = build_upsert(&note);
        assert!(sql.contains("VALUES ('n1',42,12,4.5)"), "{sql}");
    }

    #[test]
    fn test_select_by_id() {
        assert_eq!(
            build_select_by_id(&note()).unwrap(),
            "SELECT * FROM notes WHERE slug = 'n1'"
        );
    }

    #[test]
    fn test_delete_by_id() {
        assert_eq!(
            build_delete_by_id(&note()).unwrap(),
            "DELETE FROM notes WHERE slug = 'n1'"
        );
    }

    #[test]
    fn test_id_is_escaped() {
        let mut note = note();
        note.slug = "x' OR '1'='1".to_string();
        assert_eq!(
            build_delete_by_id(&note).unwrap(),
            "DELETE FROM notes WHERE slug = 'x\\' OR \\'1\\'=\\'1'"
        );
    }

    #[derive(Default)]
    struct Orphan {
        name: String,
    }

    static ORPHAN_COLUMNS: &[ColumnDef<Orphan>] = &[ColumnDef::new(
        "name",
        |o| o.name.as_str().into(),
        |o, v| {
            o.name = String::from_sql_value(v)?;
            Ok(())
        },
    )];

    impl Model for Orphan {
        fn table_name() -> &'static str {
            "orphans"
        }
        fn columns() -> &'static [ColumnDef<Self>] {
            ORPHAN_COLUMNS
        }
    }

    #[test]
    fn test_undeclared_id_column_is_rejected() {
        let orphan = Orphan::default();
        assert!(matches!(
            build_delete_by_id(&orphan),
            Err(MysqlRsError::ColumnNotFound(c)) if c == "orphans.id"
        ));
        assert!(matches!(
            build_select_by_id(&orphan),
            Err(MysqlRsError::ColumnNotFound(_))
        ));
    }
}
