//! SQL fragments appended to statements built by the store engine.

use crate::connection::{SqlConnection, value_as_i64};
use crate::error::Result;
use crate::spatial_sql::{
    SQL_LAST_VALUE, quote_ident, sequence_name, sql_find_sequence, sql_next_sequence_value,
};
use crate::types::QueryHints;
use tracing::debug;

/// Append a column name, optionally qualified by a table alias.
pub fn encode_column_name(prefix: Option<&str>, column: &str, sql: &mut String) {
    if let Some(prefix) = prefix {
        sql.push_str(&quote_ident(prefix));
        sql.push('.');
    }
    sql.push_str(&quote_ident(column));
}

/// Geometry projection honoring the 2D hint.
pub fn encode_geometry_column(
    prefix: Option<&str>,
    column: &str,
    hints: &QueryHints,
    sql: &mut String,
) {
    sql.push_str("ST_AsBinary(");
    if hints.force_2d {
        sql.push_str("ST_Force2D(");
        encode_column_name(prefix, column, sql);
        sql.push(')');
    } else {
        encode_column_name(prefix, column, sql);
    }
    sql.push(')');
}

pub fn encode_geometry_column_simplified(
    prefix: Option<&str>,
    column: &str,
    distance: f64,
    sql: &mut String,
) {
    sql.push_str("ST_AsBinary(ST_Simplify(");
    encode_column_name(prefix, column, sql);
    sql.push_str(&format!(", {distance}))"));
}

/// Bounding box of a whole column, read back with `decode_extent`.
pub fn encode_geometry_envelope(column: &str, sql: &mut String) {
    sql.push_str("ST_AsText(ST_Extent(");
    sql.push_str(&quote_ident(column));
    sql.push_str("::geometry))");
}

/// Append paging clauses.
///
/// A limit counts only when it is positive and below `i32::MAX`; anything
/// else means unbounded. Offsets count when positive.
pub fn apply_limit_offset(sql: &mut String, limit: i32, offset: i32) {
    if limit > 0 && limit < i32::MAX {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    if offset > 0 {
        sql.push_str(&format!(" OFFSET {offset}"));
    }
}

pub fn encode_primary_key(column: &str, sql: &mut String) {
    encode_column_name(None, column, sql);
    sql.push_str(" SERIAL PRIMARY KEY");
}

/// Whether a table should be exposed as a feature type.
///
/// The engine's own spatial catalogs are hidden.
pub fn include_table(table: &str) -> bool {
    !(table.eq_ignore_ascii_case("geometry_columns")
        || table.to_lowercase().starts_with("spatial_ref_sys"))
}

/// Name of the sequence backing `column`, if the engine has one.
pub fn sequence_for_column<C: SqlConnection>(
    table: &str,
    column: &str,
    cx: &C,
) -> Result<Option<String>> {
    let sequence = sequence_name(table, column);
    let sql = sql_find_sequence(&sequence);
    debug!(%sql, "sequence lookup");
    Ok(cx.query_first(&sql)?.map(|_| sequence))
}

pub fn next_sequence_value<C: SqlConnection>(sequence: &str, cx: &C) -> Result<Option<i64>> {
    let sql = sql_next_sequence_value(sequence);
    debug!(%sql, "next sequence value");
    Ok(value_as_i64(cx.query_first(&sql)?))
}

/// Last value generated on this connection by any sequence.
pub fn last_auto_generated_value<C: SqlConnection>(cx: &C) -> Result<Option<i64>> {
    debug!(sql = SQL_LAST_VALUE, "last generated value");
    Ok(value_as_i64(cx.query_first(SQL_LAST_VALUE)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use crate::test_utils::{RecordingConnection, spatial_connection};
    use rusqlite::functions::FunctionFlags;
    use rusqlite::types::Value;

    fn paging(limit: i32, offset: i32) -> String {
        let mut sql = String::new();
        apply_limit_offset(&mut sql, limit, offset);
        sql
    }

    #[test]
    fn paging_fragments() {
        assert_eq!(paging(10, 0), " LIMIT 10");
        assert_eq!(paging(10, 20), " LIMIT 10 OFFSET 20");
        assert_eq!(paging(-1, 5), " OFFSET 5");
        assert_eq!(paging(i32::MAX, 5), " OFFSET 5");
        assert_eq!(paging(0, 0), "");
        assert_eq!(paging(-1, 0), "");
    }

    #[test]
    fn geometry_projections() {
        let mut sql = String::new();
        encode_geometry_column(Some("a"), "geom", &QueryHints::default(), &mut sql);
        assert_eq!(sql, r#"ST_AsBinary("a"."geom")"#);

        let hints = QueryHints {
            force_2d: true,
            ..QueryHints::default()
        };
        let mut sql = String::new();
        encode_geometry_column(None, "geom", &hints, &mut sql);
        assert_eq!(sql, r#"ST_AsBinary(ST_Force2D("geom"))"#);

        let mut sql = String::new();
        encode_geometry_column_simplified(None, "geom", 0.25, &mut sql);
        assert_eq!(sql, r#"ST_AsBinary(ST_Simplify("geom", 0.25))"#);
    }

    #[test]
    fn envelope_and_primary_key() {
        let mut sql = String::new();
        encode_geometry_envelope("the_geom", &mut sql);
        assert_eq!(sql, r#"ST_AsText(ST_Extent("the_geom"::geometry))"#);

        let mut sql = String::new();
        encode_primary_key("fid", &mut sql);
        assert_eq!(sql, r#""fid" SERIAL PRIMARY KEY"#);
    }

    #[test]
    fn hides_spatial_catalogs() {
        assert!(!include_table("geometry_columns"));
        assert!(!include_table("GEOMETRY_COLUMNS"));
        assert!(!include_table("spatial_ref_sys"));
        assert!(!include_table("SPATIAL_REF_SYS_AUX"));
        assert!(include_table("roads"));
        assert!(include_table("my_geometry_columns"));
    }

    #[test]
    fn finds_sequence_in_catalog() -> Result<()> {
        let conn = spatial_connection()?;
        conn.execute_batch(
            "ATTACH DATABASE ':memory:' AS INFORMATION_SCHEMA;
            CREATE TABLE INFORMATION_SCHEMA.SEQUENCES (SEQUENCE_NAME TEXT);
            INSERT INTO INFORMATION_SCHEMA.SEQUENCES VALUES ('ROADS_FID_SEQUENCE');",
        )?;

        assert_eq!(
            sequence_for_column("roads", "fid", &conn)?,
            Some("ROADS_FID_SEQUENCE".to_string())
        );
        assert_eq!(sequence_for_column("rivers", "fid", &conn)?, None);
        Ok(())
    }

    #[test]
    fn reads_sequence_values() -> Result<()> {
        let conn = spatial_connection()?;
        conn.create_scalar_function("nextval", 1, FunctionFlags::SQLITE_UTF8, |ctx| {
            let name: String = ctx.get(0)?;
            Ok(if name == "ROADS_FID_SEQUENCE" { 42 } else { 0 })
        })?;

        assert_eq!(next_sequence_value("ROADS_FID_SEQUENCE", &conn)?, Some(42));
        Ok(())
    }

    #[test]
    fn last_value_absent_is_none() -> Result<()> {
        let cx = RecordingConnection::new();
        assert_eq!(last_auto_generated_value(&cx)?, None);
        assert_eq!(cx.queries(), vec!["SELECT lastval()"]);

        let cx = RecordingConnection::new().answer("lastval", Value::Integer(7));
        assert_eq!(last_auto_generated_value(&cx)?, Some(7));
        Ok(())
    }
}
